use std::io;

use ramhorns::Template;

use crate::config::Comments;
use crate::content::to_display_markup;
use crate::post::PostSummary;
use crate::post_assembler::AssembledPost;
use crate::text_utils::{format_date_time, format_optional_date, reading_label};
use crate::view::{parse_template, SiteHeader};

#[derive(ramhorns::Content)]
struct PostView<'a> {
    header: SiteHeader<'a>,
    title: &'a str,
    subtitle: &'a str,
    author: &'a str,
    date: String,
    edited: Option<EditedView>,
    reading_time: String,
    banner_url: &'a str,
    banner_alt: &'a str,
    sections: Vec<SectionView<'a>>,
    previous: Option<NavLink<'a>>,
    next: Option<NavLink<'a>>,
    comments: Option<CommentsView<'a>>,
    show_exit_preview: bool,
}

#[derive(ramhorns::Content)]
struct EditedView {
    date: String,
    time: String,
}

#[derive(ramhorns::Content)]
struct SectionView<'a> {
    heading: &'a str,
    content: String,
}

#[derive(ramhorns::Content)]
struct NavLink<'a> {
    link: String,
    title: &'a str,
}

#[derive(ramhorns::Content)]
struct CommentsView<'a> {
    repo: &'a str,
    issue_term: &'a str,
    theme: &'a str,
}

fn nav_link(post: Option<&PostSummary>) -> Option<NavLink<'_>> {
    post.map(|p| NavLink {
        link: format!("/post/{}", p.slug),
        title: p.title.as_str(),
    })
}

pub struct PostRenderer<'a> {
    pub template: Template<'a>,
}

impl PostRenderer<'_> {
    pub fn new(view_tpl_src: &str) -> io::Result<PostRenderer<'_>> {
        let template = parse_template(view_tpl_src, "post view")?;
        Ok(PostRenderer {
            template,
        })
    }

    pub fn render(&self, header: SiteHeader, assembled: &AssembledPost, comments: Option<&Comments>) -> String {
        let post = &assembled.post;

        let edited = match post.updated_at {
            Some(ref updated) if post.was_edited() => {
                let (date, time) = format_date_time(updated);
                Some(EditedView { date, time })
            }
            _ => None,
        };

        let sections = post.sections.iter()
            .map(|section| SectionView {
                heading: section.heading.as_str(),
                content: to_display_markup(&section.body),
            })
            .collect();

        // Discussions are keyed on the slug, which stays stable across edits
        let comments = comments.map(|c| CommentsView {
            repo: c.repo.as_str(),
            issue_term: assembled.comment_key.as_str(),
            theme: c.theme.as_str(),
        });

        self.template.render(&PostView {
            header,
            title: post.title.as_str(),
            subtitle: post.subtitle.as_str(),
            author: post.author.as_str(),
            date: format_optional_date(post.published_at.as_ref()),
            edited,
            reading_time: reading_label(assembled.reading_minutes),
            banner_url: post.banner_url.as_str(),
            banner_alt: post.banner_alt.as_str(),
            sections,
            previous: nav_link(assembled.adjacent.previous.as_ref()),
            next: nav_link(assembled.adjacent.next.as_ref()),
            comments,
            show_exit_preview: assembled.show_exit_preview,
        })
    }
}
