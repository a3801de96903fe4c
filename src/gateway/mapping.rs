//! The one place where repository responses are checked and turned into
//! [`PostSummary`], [`PostDetail`] and [`PostPage`]. Code past this point
//! never looks at raw shapes again.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::content::RichText;
use crate::error::ContentError;
use crate::post::{PostDetail, PostPage, PostSummary, Section};

#[derive(Debug, Deserialize)]
pub struct RawSearchResponse {
    pub page: Option<u32>,
    pub next_page: Option<String>,
    pub results: Option<Vec<RawDocument>>,
}

#[derive(Debug, Deserialize)]
pub struct RawDocument {
    pub id: Option<String>,
    pub uid: Option<String>,
    pub first_publication_date: Option<String>,
    pub last_publication_date: Option<String>,
    pub data: Option<RawPostData>,
}

#[derive(Debug, Deserialize)]
pub struct RawPostData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub banner: Option<RawBanner>,
    pub content: Option<Vec<RawSection>>,
}

#[derive(Debug, Deserialize)]
pub struct RawBanner {
    pub url: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSection {
    pub heading: Option<String>,
    pub body: Option<RichText>,
}

fn missing(field: &str, doc: &RawDocument) -> ContentError {
    let who = doc.uid.as_deref().or(doc.id.as_deref()).unwrap_or("<unknown>");
    ContentError::DataShape(format!("document {} has no {}", who, field))
}

/// Accepts the repository format (`2021-03-25T19:25:28+0000`) and RFC 3339.
pub fn parse_timestamp(value: Option<&str>) -> Result<Option<DateTime<Utc>>, ContentError> {
    let Some(value) = value else {
        return Ok(None);
    };

    let parsed = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map_err(|e| ContentError::DataShape(format!("invalid timestamp {}: {}", value, e)))?;

    Ok(Some(parsed.with_timezone(&Utc)))
}

pub fn to_summary(doc: RawDocument) -> Result<PostSummary, ContentError> {
    let slug = doc.uid.clone().ok_or_else(|| missing("uid", &doc))?;
    let published_at = parse_timestamp(doc.first_publication_date.as_deref())?;
    let data = doc.data.as_ref().ok_or_else(|| missing("data", &doc))?;
    let title = data.title.clone().ok_or_else(|| missing("title", &doc))?;

    Ok(PostSummary {
        slug,
        published_at,
        title,
        subtitle: data.subtitle.clone().unwrap_or_default(),
        author: data.author.clone().unwrap_or_default(),
    })
}

pub fn to_detail(doc: RawDocument) -> Result<PostDetail, ContentError> {
    let id = doc.id.clone().ok_or_else(|| missing("id", &doc))?;
    let slug = doc.uid.clone().ok_or_else(|| missing("uid", &doc))?;
    let published_at = parse_timestamp(doc.first_publication_date.as_deref())?;
    let updated_at = parse_timestamp(doc.last_publication_date.as_deref())?;

    let Some(data) = doc.data else {
        return Err(ContentError::DataShape(format!("document {} has no data", slug)));
    };
    let Some(title) = data.title else {
        return Err(ContentError::DataShape(format!("document {} has no title", slug)));
    };
    let Some(content) = data.content else {
        return Err(ContentError::DataShape(format!("document {} has no content", slug)));
    };

    let sections = content.into_iter()
        .map(|section| Section {
            heading: section.heading.unwrap_or_default(),
            body: section.body.unwrap_or_default(),
        })
        .collect();

    let (banner_url, banner_alt) = match data.banner {
        Some(banner) => (banner.url.unwrap_or_default(), banner.alt.unwrap_or_default()),
        None => (String::new(), String::new()),
    };

    Ok(PostDetail {
        id,
        slug,
        published_at,
        updated_at,
        title,
        subtitle: data.subtitle.unwrap_or_default(),
        author: data.author.unwrap_or_default(),
        banner_url,
        banner_alt,
        sections,
    })
}

/// `requested_page` is used when the response does not echo its page number.
pub fn to_page(response: RawSearchResponse, requested_page: u32) -> Result<PostPage, ContentError> {
    let Some(results) = response.results else {
        return Err(ContentError::DataShape("search response has no results field".to_string()));
    };

    let items = results.into_iter()
        .map(to_summary)
        .collect::<Result<Vec<_>, _>>()?;

    let page = response.page.unwrap_or(requested_page);
    let next_cursor = response.next_page.map(|_| (page + 1).to_string());

    Ok(PostPage {
        items,
        next_cursor,
    })
}

/// First document of a single-result query.
pub fn first_result(response: RawSearchResponse) -> Result<Option<RawDocument>, ContentError> {
    match response.results {
        Some(results) => Ok(results.into_iter().next()),
        None => Err(ContentError::DataShape("search response has no results field".to_string())),
    }
}

pub fn decode_search(body: &str) -> Result<RawSearchResponse, ContentError> {
    serde_json::from_str(body)
        .map_err(|e| ContentError::DataShape(format!("undecodable search response: {}", e)))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::test_data::{PRISMIC_DOCUMENT, PRISMIC_SEARCH_PAGE};

    use super::*;

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2021, 3, 25, 19, 25, 28).unwrap();
        assert_eq!(parse_timestamp(Some("2021-03-25T19:25:28+0000")).unwrap(), Some(expected));
        assert_eq!(parse_timestamp(Some("2021-03-25T21:25:28+02:00")).unwrap(), Some(expected));
        assert_eq!(parse_timestamp(None).unwrap(), None);
        assert!(matches!(parse_timestamp(Some("yesterday")), Err(ContentError::DataShape(_))));
    }

    #[test]
    fn test_search_page() {
        let raw = decode_search(PRISMIC_SEARCH_PAGE).unwrap();
        let page = to_page(raw, 1).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].slug, "como-utilizar-hooks");
        assert_eq!(page.items[0].author, "Joseph Oliveira");
        assert_eq!(page.items[1].slug, "criando-um-app-cra-do-zero");
        assert_eq!(page.items[1].published_at, None);
        assert_eq!(page.next_cursor.as_deref(), Some("2"));
    }

    #[test]
    fn test_last_page_has_no_cursor() {
        let raw = decode_search(r#"{"page": 3, "next_page": null, "results": []}"#).unwrap();
        let page = to_page(raw, 3).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn test_missing_results_is_data_shape_error() {
        let raw = decode_search(r#"{"page": 1, "next_page": null}"#).unwrap();
        assert!(matches!(to_page(raw, 1), Err(ContentError::DataShape(_))));

        let raw = decode_search(r#"{"page": 1}"#).unwrap();
        assert!(matches!(first_result(raw), Err(ContentError::DataShape(_))));
    }

    #[test]
    fn test_undecodable_response() {
        assert!(matches!(decode_search("<html>oops</html>"), Err(ContentError::DataShape(_))));
    }

    #[test]
    fn test_detail() {
        let doc: RawDocument = serde_json::from_str(PRISMIC_DOCUMENT).unwrap();
        let post = to_detail(doc).unwrap();
        assert_eq!(post.id, "YFyTpxIAACUAkOLq");
        assert_eq!(post.slug, "como-utilizar-hooks");
        assert_eq!(post.banner_url, "https://images.prismic.io/criando-projeto-do-zero/banner.png");
        assert_eq!(post.sections.len(), 2);
        assert_eq!(post.sections[0].heading, "Proin et varius");
        assert_eq!(post.sections[1].body.len(), 2);
        assert!(post.was_edited());
    }

    #[test]
    fn test_detail_without_content() {
        let doc: RawDocument = serde_json::from_str(
            r#"{"id": "x", "uid": "no-body", "data": {"title": "Missing body"}}"#).unwrap();
        let err = to_detail(doc).unwrap_err();
        assert_eq!(err, ContentError::DataShape("document no-body has no content".to_string()));
    }

    #[test]
    fn test_summary_without_uid() {
        let doc: RawDocument = serde_json::from_str(r#"{"id": "abc", "data": {"title": "t"}}"#).unwrap();
        let err = to_summary(doc).unwrap_err();
        assert_eq!(err, ContentError::DataShape("document abc has no uid".to_string()));
    }
}
