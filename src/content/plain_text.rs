use crate::content::RichTextBlock;

/// Text of every block, one block per line. Images contribute nothing.
pub fn to_plain_text(blocks: &[RichTextBlock]) -> String {
    blocks.iter()
        .filter(|block| !block.text.is_empty())
        .map(|block| block.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn word_count(blocks: &[RichTextBlock]) -> usize {
    to_plain_text(blocks).split_whitespace().count()
}
