use crate::content::plain_text::word_count;
use crate::post::Section;

pub const WORDS_PER_MINUTE: usize = 200;

/// Minutes needed to read the section bodies, rounded up. Never less than 1,
/// even for a post without any text.
pub fn estimate_reading_minutes(sections: &[Section]) -> u32 {
    let words: usize = sections.iter()
        .map(|section| word_count(&section.body))
        .sum();

    let minutes = words.div_ceil(WORDS_PER_MINUTE);
    minutes.max(1) as u32
}
