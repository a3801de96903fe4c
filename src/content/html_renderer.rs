use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::content::{RichTextBlock, Span};

lazy_static! {
    // Rich text comes from an editor and ends up unescaped in the page
    static ref SANITIZER: ammonia::Builder<'static> = {
        let mut builder = ammonia::Builder::default();
        builder.add_generic_attributes(&["class"]);
        builder.url_schemes(HashSet::from(["http", "https", "mailto"]));
        builder.link_rel(None);
        builder
    };
}

#[derive(Copy, Clone, PartialEq, Debug)]
enum ListKind {
    Bullets,
    Numbered,
}

impl ListKind {
    fn of(block: &RichTextBlock) -> Option<ListKind> {
        match block.kind.as_str() {
            "list-item" => Some(ListKind::Bullets),
            "o-list-item" => Some(ListKind::Numbered),
            _ => None,
        }
    }

    fn open_tag(&self) -> &'static str {
        match self {
            ListKind::Bullets => "<ul>",
            ListKind::Numbered => "<ol>",
        }
    }

    fn close_tag(&self) -> &'static str {
        match self {
            ListKind::Bullets => "</ul>",
            ListKind::Numbered => "</ol>",
        }
    }
}

/// Renders rich text to sanitized HTML. Consecutive list items are grouped in
/// one list. Unknown block types are skipped, and links or images with a
/// scheme other than http, https or mailto lose their URL.
pub fn to_display_markup(blocks: &[RichTextBlock]) -> String {
    SANITIZER.clean(&render_blocks(blocks)).to_string()
}

fn render_blocks(blocks: &[RichTextBlock]) -> String {
    let mut html = String::new();
    let mut open_list: Option<ListKind> = None;

    for block in blocks {
        let list = ListKind::of(block);
        if open_list != list {
            if let Some(kind) = open_list {
                html.push_str(kind.close_tag());
            }
            if let Some(kind) = list {
                html.push_str(kind.open_tag());
            }
            open_list = list;
        }
        render_block(block, &mut html);
    }

    if let Some(kind) = open_list {
        html.push_str(kind.close_tag());
    }

    html
}

fn render_block(block: &RichTextBlock, html: &mut String) {
    let tag = match block.kind.as_str() {
        "paragraph" => "p",
        "heading1" => "h1",
        "heading2" => "h2",
        "heading3" => "h3",
        "heading4" => "h4",
        "heading5" => "h5",
        "heading6" => "h6",
        "preformatted" => "pre",
        "list-item" | "o-list-item" => "li",
        "image" => {
            if let Some(ref url) = block.url {
                html.push_str(&format!(r#"<p class="block-img"><img src="{}" alt="{}"></p>"#,
                                       escape_html(url),
                                       escape_html(block.alt.as_deref().unwrap_or(""))));
            }
            return;
        }
        _ => return,
    };

    html.push('<');
    html.push_str(tag);
    html.push('>');
    html.push_str(&render_spans(&block.text, &block.spans));
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}

fn open_tag(span: &Span) -> String {
    match span.kind.as_str() {
        "strong" => "<strong>".to_string(),
        "em" => "<em>".to_string(),
        "hyperlink" => {
            let url = span.data.as_ref().and_then(|d| d.url.as_deref()).unwrap_or("#");
            format!(r#"<a href="{}">"#, escape_html(url))
        }
        "label" => {
            let label = span.data.as_ref().and_then(|d| d.label.as_deref()).unwrap_or("");
            format!(r#"<span class="{}">"#, escape_html(label))
        }
        _ => "<span>".to_string(),
    }
}

fn close_tag(span: &Span) -> &'static str {
    match span.kind.as_str() {
        "strong" => "</strong>",
        "em" => "</em>",
        "hyperlink" => "</a>",
        _ => "</span>",
    }
}

fn render_spans(text: &str, spans: &[Span]) -> String {
    if spans.is_empty() {
        return escape_html(text);
    }

    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let end_of = |span: &Span| span.end.min(len);

    // Outer spans first when two start at the same position
    let mut pending: Vec<&Span> = spans.iter()
        .filter(|s| s.start < s.end && s.start < len)
        .collect();
    pending.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(text.len() * 2);
    let mut open: Vec<&Span> = vec![];
    let mut next = 0;

    for pos in 0..=len {
        if open.iter().any(|s| end_of(s) == pos) {
            // Overlapping spans get closed and reopened so tags stay balanced
            let mut reopen = vec![];
            while let Some(span) = open.pop() {
                out.push_str(close_tag(span));
                if end_of(span) != pos {
                    reopen.push(span);
                }
                if !open.iter().any(|s| end_of(s) == pos) {
                    break;
                }
            }
            while let Some(span) = reopen.pop() {
                out.push_str(&open_tag(span));
                open.push(span);
            }
        }

        while next < pending.len() && pending[next].start == pos {
            out.push_str(&open_tag(pending[next]));
            open.push(pending[next]);
            next += 1;
        }

        if pos < len {
            push_escaped(&mut out, chars[pos]);
        }
    }

    out
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        c => out.push(c),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        push_escaped(&mut out, c);
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::content::SpanData;

    use super::*;

    fn span(start: usize, end: usize, kind: &str) -> Span {
        Span { start, end, kind: kind.to_string(), data: None }
    }

    fn block(kind: &str, text: &str, spans: Vec<Span>) -> RichTextBlock {
        RichTextBlock {
            kind: kind.to_string(),
            text: text.to_string(),
            spans,
            url: None,
            alt: None,
        }
    }

    #[test]
    fn test_paragraph_and_heading() {
        let blocks = vec![
            block("heading2", "Title", vec![]),
            block("paragraph", "a < b & c", vec![]),
        ];
        assert_eq!(to_display_markup(&blocks), "<h2>Title</h2><p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_spans() {
        let blocks = vec![block("paragraph", "Hello bold world", vec![span(6, 10, "strong")])];
        assert_eq!(to_display_markup(&blocks), "<p>Hello <strong>bold</strong> world</p>");
    }

    #[test]
    fn test_nested_spans() {
        let blocks = vec![block("paragraph", "abcdef", vec![span(2, 4, "em"), span(0, 6, "strong")])];
        assert_eq!(to_display_markup(&blocks), "<p><strong>ab<em>cd</em>ef</strong></p>");
    }

    #[test]
    fn test_overlapping_spans_stay_balanced() {
        let blocks = vec![block("paragraph", "abcdef", vec![span(0, 4, "strong"), span(2, 6, "em")])];
        assert_eq!(to_display_markup(&blocks),
                   "<p><strong>ab<em>cd</em></strong><em>ef</em></p>");
    }

    #[test]
    fn test_hyperlink_and_multibyte() {
        let mut link = span(0, 5, "hyperlink");
        link.data = Some(SpanData { url: Some("https://rust-lang.org".to_string()), label: None });
        let blocks = vec![block("paragraph", "órbita!", vec![link])];
        assert_eq!(to_display_markup(&blocks),
                   r#"<p><a href="https://rust-lang.org">órbit</a>a!</p>"#);
    }

    #[test]
    fn test_lists_are_grouped() {
        let blocks = vec![
            block("list-item", "one", vec![]),
            block("list-item", "two", vec![]),
            block("o-list-item", "first", vec![]),
            block("paragraph", "after", vec![]),
        ];
        assert_eq!(to_display_markup(&blocks),
                   "<ul><li>one</li><li>two</li></ul><ol><li>first</li></ol><p>after</p>");
    }

    #[test]
    fn test_image_and_unknown() {
        let mut image = block("image", "", vec![]);
        image.url = Some("https://images.example.com/x.png".to_string());
        image.alt = Some("a \"quoted\" alt".to_string());
        let blocks = vec![image, block("embed", "ignored", vec![])];
        assert_eq!(to_display_markup(&blocks),
                   r#"<p class="block-img"><img src="https://images.example.com/x.png" alt="a &quot;quoted&quot; alt"></p>"#);
    }

    fn link(start: usize, end: usize, url: &str) -> Span {
        let mut link = span(start, end, "hyperlink");
        link.data = Some(SpanData { url: Some(url.to_string()), label: None });
        link
    }

    #[test]
    fn test_script_links_are_dropped() {
        let blocks = vec![block("paragraph", "click", vec![link(0, 5, "javascript:alert(document.cookie)")])];
        let html = to_display_markup(&blocks);
        assert!(!html.contains("javascript"));
        assert!(!html.contains("href"));
        assert!(html.contains(">click</a></p>"));

        let mut image = block("image", "", vec![]);
        image.url = Some("javascript:alert(1)".to_string());
        assert!(!to_display_markup(&[image]).contains("javascript"));
    }

    #[test]
    fn test_safe_links_are_kept() {
        let blocks = vec![
            block("paragraph", "mail", vec![link(0, 4, "mailto:me@example.com")]),
            block("paragraph", "next", vec![link(0, 4, "/post/next-post")]),
        ];
        assert_eq!(to_display_markup(&blocks),
                   r#"<p><a href="mailto:me@example.com">mail</a></p><p><a href="/post/next-post">next</a></p>"#);
    }

    #[test]
    fn test_span_past_end_is_clamped() {
        let blocks = vec![block("paragraph", "abc", vec![span(1, 10, "em"), span(5, 8, "strong")])];
        assert_eq!(to_display_markup(&blocks), "<p>a<em>bc</em></p>");
    }
}
