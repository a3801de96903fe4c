pub mod config;
pub mod server;
pub mod logger;
pub mod error;
pub mod post;
pub mod content;
pub mod gateway;
pub mod listing;
pub mod preview;
pub mod post_assembler;
pub mod reading_time;
pub mod content_cache;
mod text_utils;
mod query_string;
mod view;
mod post_processor;
#[cfg(test)]
mod test_data;
