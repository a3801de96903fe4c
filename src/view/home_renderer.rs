use std::io;

use ramhorns::Template;

use crate::post::PostSummary;
use crate::text_utils::format_optional_date;
use crate::view::{parse_template, SiteHeader};

#[derive(ramhorns::Content)]
struct HomePage<'a> {
    header: SiteHeader<'a>,
    post_list: Vec<PostItem<'a>>,
    has_more: bool,
    more_link: String,
    load_failed: bool,
    is_preview: bool,
}

#[derive(ramhorns::Content)]
struct PostItem<'a> {
    link: String,
    title: &'a str,
    subtitle: &'a str,
    date: String,
    author: &'a str,
}

/// Where the listing stands after the pages were fetched.
pub struct ListingStatus {
    pub pages_shown: u32,
    pub has_more: bool,
    pub load_failed: bool,
}

impl ListingStatus {
    /// Link that loads one more page, which is also the retry after a failed load.
    pub fn more_link(&self) -> String {
        format!("/?pages={}", self.pages_shown + 1)
    }
}

pub struct HomeRenderer<'a> {
    pub template: Template<'a>,
}

impl HomeRenderer<'_> {
    pub fn new(home_tpl_src: &str) -> io::Result<HomeRenderer<'_>> {
        let template = parse_template(home_tpl_src, "home")?;
        Ok(HomeRenderer {
            template,
        })
    }

    pub fn render(&self, header: SiteHeader, posts: &[PostSummary], status: &ListingStatus, is_preview: bool) -> String {
        let post_list = posts.iter()
            .map(|post| PostItem {
                link: format!("/post/{}", post.slug),
                title: post.title.as_str(),
                subtitle: post.subtitle.as_str(),
                date: format_optional_date(post.published_at.as_ref()),
                author: post.author.as_str(),
            })
            .collect();

        self.template.render(&HomePage {
            header,
            post_list,
            has_more: status.has_more || status.load_failed,
            more_link: status.more_link(),
            load_failed: status.load_failed,
            is_preview,
        })
    }
}
