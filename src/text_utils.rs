use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

pub fn format_date(date_time: &DateTime<Utc>) -> String {
    date_time.format("%d %b %Y").to_string()
}

pub fn format_date_time(date_time: &DateTime<Utc>) -> (String, String) {
    let date = format_date(date_time);
    let time = date_time.format("%H:%M").to_string();
    (date, time)
}

/// Date for the listing and the post header. Unpublished drafts have none.
pub fn format_optional_date(date_time: Option<&DateTime<Utc>>) -> String {
    match date_time {
        Some(dt) => format_date(dt),
        None => "Not published".to_string(),
    }
}

/// Slugs are lowercase words separated by dashes or underscores.
pub fn is_valid_slug(slug: &str) -> bool {
    lazy_static! {
        static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").unwrap();
    }
    slug.len() <= 200 && SLUG_REGEX.is_match(slug)
}

pub fn reading_label(minutes: u32) -> String {
    format!("{} min", minutes)
}
