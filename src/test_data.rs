#![cfg(test)]

use chrono::{TimeZone, Utc};

use crate::content::RichTextBlock;
use crate::post::{PostDetail, PostSummary, Section};

pub const PRISMIC_SEARCH_PAGE: &str = r##"{
  "page": 1,
  "results_per_page": 2,
  "results_size": 2,
  "total_results_size": 5,
  "total_pages": 3,
  "next_page": "https://travelog.cdn.prismic.io/api/v2/documents/search?ref=YFyUcxIAACUAkOSl&page=2&pageSize=2",
  "prev_page": null,
  "results": [
    {
      "id": "YFyTpxIAACUAkOLq",
      "uid": "como-utilizar-hooks",
      "type": "post",
      "first_publication_date": "2021-03-15T19:25:28+0000",
      "last_publication_date": "2021-03-25T19:25:28+0000",
      "data": {
        "title": "Como utilizar Hooks",
        "subtitle": "Pensando em sincronização em vez de ciclos de vida",
        "author": "Joseph Oliveira"
      }
    },
    {
      "id": "YFyUHBIAACMAkOQf",
      "uid": "criando-um-app-cra-do-zero",
      "type": "post",
      "first_publication_date": null,
      "last_publication_date": null,
      "data": {
        "title": "Criando um app CRA do zero",
        "subtitle": "Tudo sobre como criar a sua primeira aplicação utilizando Create React App",
        "author": "Danilo Vieira"
      }
    }
  ]
}"##;

pub const PRISMIC_DOCUMENT: &str = r##"{
  "id": "YFyTpxIAACUAkOLq",
  "uid": "como-utilizar-hooks",
  "type": "post",
  "first_publication_date": "2021-03-15T19:25:28+0000",
  "last_publication_date": "2021-03-25T19:25:28+0000",
  "data": {
    "title": "Como utilizar Hooks",
    "subtitle": "Pensando em sincronização em vez de ciclos de vida",
    "author": "Joseph Oliveira",
    "banner": {
      "url": "https://images.prismic.io/criando-projeto-do-zero/banner.png",
      "alt": "banner"
    },
    "content": [
      {
        "heading": "Proin et varius",
        "body": [
          {"type": "paragraph", "text": "Lorem ipsum dolor sit amet", "spans": []}
        ]
      },
      {
        "heading": "Cras laoreet mi",
        "body": [
          {"type": "paragraph", "text": "Nullam dolor sapien", "spans": [{"start": 0, "end": 6, "type": "strong"}]},
          {"type": "list-item", "text": "Ut venenatis", "spans": []}
        ]
      }
    ]
  }
}"##;

fn published(day: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, day, 12, 0, 0).unwrap()
}

pub fn summary(slug: &str, day: u32) -> PostSummary {
    PostSummary {
        slug: slug.to_string(),
        published_at: Some(published(day)),
        title: format!("title of {}", slug),
        subtitle: format!("subtitle of {}", slug),
        author: "Thiago".to_string(),
    }
}

pub fn detail(slug: &str, id: &str, day: u32) -> PostDetail {
    PostDetail {
        id: id.to_string(),
        slug: slug.to_string(),
        published_at: Some(published(day)),
        updated_at: Some(published(day)),
        title: format!("title of {}", slug),
        subtitle: format!("subtitle of {}", slug),
        author: "Thiago".to_string(),
        banner_url: format!("https://images.example.com/{}.png", slug),
        banner_alt: "banner".to_string(),
        sections: vec![Section {
            heading: "Introduction".to_string(),
            body: vec![RichTextBlock::paragraph(&format!("The body of {}", slug))],
        }],
    }
}

pub const TRAVELOG_CONFIG: &str = r##"
[site]
title = "spacetraveling"

[paths]
template_dir = "res/template"
public_dir = "res/public"

[cms]
api_endpoint = "https://travelog.cdn.prismic.io/api/v2"
page_size = 2

[defaults]
rendering_cache_enabled = true

[server]
address = "127.0.0.1"
port = 8001
"##;
