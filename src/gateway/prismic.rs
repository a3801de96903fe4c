use std::io;
use std::io::ErrorKind;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use spdlog::{debug, warn};

use crate::config::Cms;
use crate::error::ContentError;
use crate::gateway::mapping::{decode_search, first_result, to_detail, to_page, to_summary, RawSearchResponse};
use crate::gateway::{ContentGateway, Direction};
use crate::post::{PostDetail, PostPage, PostSummary};

const PUBLISH_DATE: &str = "document.first_publication_date";

/// How long a master ref is reused. Queries of one page build share a ref
/// and the api root is fetched once per build instead of once per query.
const MASTER_REF_TTL: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct ApiRoot {
    refs: Vec<ApiRef>,
}

#[derive(Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

enum SearchError {
    // The repository refused the query itself, typically an unknown ref
    Rejected(StatusCode),
    Failed(ContentError),
}

impl From<ContentError> for SearchError {
    fn from(value: ContentError) -> Self {
        SearchError::Failed(value)
    }
}

impl SearchError {
    fn into_content_error(self, on_rejected: impl FnOnce(StatusCode) -> ContentError) -> ContentError {
        match self {
            SearchError::Rejected(status) => on_rejected(status),
            SearchError::Failed(e) => e,
        }
    }
}

fn rejected(status: StatusCode) -> ContentError {
    ContentError::UpstreamUnavailable(format!("query rejected with status {}", status))
}

struct CachedRef {
    reference: String,
    fetched_at: Instant,
}

/// Content gateway over the Prismic REST API (`/api/v2`).
pub struct PrismicGateway {
    client: Client,
    api_root: Url,
    search_url: Url,
    access_token: Option<String>,
    document_type: String,
    master_ref: RwLock<Option<CachedRef>>,
}

impl PrismicGateway {
    pub fn new(cms: &Cms) -> io::Result<PrismicGateway> {
        let mut api_root = Url::parse(&cms.api_endpoint)
            .map_err(|e| io::Error::new(ErrorKind::InvalidInput, format!("Invalid api_endpoint {}: {}", cms.api_endpoint, e)))?;
        if !api_root.path().ends_with('/') {
            let path = format!("{}/", api_root.path());
            api_root.set_path(&path);
        }
        let search_url = api_root.join("documents/search")
            .map_err(|e| io::Error::new(ErrorKind::InvalidInput, format!("Invalid api_endpoint {}: {}", cms.api_endpoint, e)))?;

        let mut builder = Client::builder()
            .user_agent(concat!("travelog/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = cms.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(io::Error::other)?;

        Ok(PrismicGateway {
            client,
            api_root,
            search_url,
            access_token: cms.access_token.clone(),
            document_type: cms.document_type.clone(),
            master_ref: RwLock::new(None),
        })
    }

    fn at(path: &str, value: &str) -> String {
        // A JSON string literal is also a valid predicate literal
        let quoted = serde_json::Value::String(value.to_string()).to_string();
        format!("[[at({}, {})]]", path, quoted)
    }

    fn fetch_fields(&self) -> String {
        ["title", "subtitle", "author"].iter()
            .map(|field| format!("{}.{}", self.document_type, field))
            .collect::<Vec<_>>()
            .join(",")
    }

    async fn get_text(&self, url: Url, params: &[(&str, String)]) -> Result<String, SearchError> {
        let mut request = self.client.get(url.clone()).query(params);
        if let Some(ref token) = self.access_token {
            request = request.query(&[("access_token", token.as_str())]);
        }

        debug!("Querying {} with {:?}", url, params);
        let response = request.send().await.map_err(|e| {
            warn!("Content repository unreachable: {}", e);
            ContentError::UpstreamUnavailable(e.to_string())
        })?;

        let status = response.status();
        if status.is_server_error() {
            warn!("Content repository failed with status {}", status);
            return Err(ContentError::UpstreamUnavailable(format!("status {}", status)).into());
        }
        if !status.is_success() {
            return Err(SearchError::Rejected(status));
        }

        let body = response.text().await
            .map_err(|e| ContentError::UpstreamUnavailable(e.to_string()))?;
        Ok(body)
    }

    fn cached_master_ref(&self) -> Option<String> {
        let cached = self.master_ref.read().unwrap_or_else(PoisonError::into_inner);
        cached.as_ref()
            .filter(|c| c.fetched_at.elapsed() < MASTER_REF_TTL)
            .map(|c| c.reference.clone())
    }

    async fn master_ref(&self) -> Result<String, ContentError> {
        if let Some(reference) = self.cached_master_ref() {
            return Ok(reference);
        }

        let reference = self.fetch_master_ref().await?;
        debug!("Using master ref {}", reference);
        *self.master_ref.write().unwrap_or_else(PoisonError::into_inner) = Some(CachedRef {
            reference: reference.clone(),
            fetched_at: Instant::now(),
        });
        Ok(reference)
    }

    async fn fetch_master_ref(&self) -> Result<String, ContentError> {
        let body = self.get_text(self.api_root.clone(), &[]).await
            .map_err(|e| e.into_content_error(rejected))?;
        let root: ApiRoot = serde_json::from_str(&body)
            .map_err(|e| ContentError::DataShape(format!("undecodable api root: {}", e)))?;

        root.refs.into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or_else(|| ContentError::DataShape("api root has no master ref".to_string()))
    }

    async fn search(&self, revision_ref: Option<&str>, params: Vec<(&str, String)>) -> Result<RawSearchResponse, SearchError> {
        let reference = match revision_ref {
            Some(r) => r.to_string(),
            None => self.master_ref().await?,
        };

        let mut params = params;
        params.push(("ref", reference));
        let body = self.get_text(self.search_url.clone(), &params).await?;
        Ok(decode_search(&body)?)
    }
}

fn parse_cursor(cursor: Option<&str>) -> Result<u32, ContentError> {
    match cursor {
        None => Ok(1),
        Some(cursor) => match cursor.parse::<u32>() {
            Ok(page) if page >= 2 => Ok(page),
            _ => Err(ContentError::DataShape(format!("invalid cursor {}", cursor))),
        },
    }
}

#[async_trait]
impl ContentGateway for PrismicGateway {
    async fn query_post_summaries(&self, page_size: u32, cursor: Option<&str>) -> Result<PostPage, ContentError> {
        let page = parse_cursor(cursor)?;
        let params = vec![
            ("q", Self::at("document.type", &self.document_type)),
            ("orderings", format!("[{} desc]", PUBLISH_DATE)),
            ("fetch", self.fetch_fields()),
            ("pageSize", page_size.to_string()),
            ("page", page.to_string()),
        ];

        let response = self.search(None, params).await
            .map_err(|e| e.into_content_error(rejected))?;
        to_page(response, page)
    }

    async fn get_post_by_slug(&self, slug: &str, revision_ref: Option<&str>) -> Result<PostDetail, ContentError> {
        let params = vec![
            ("q", Self::at(&format!("my.{}.uid", self.document_type), slug)),
            ("pageSize", "1".to_string()),
        ];

        let response = self.search(revision_ref, params).await
            .map_err(|e| e.into_content_error(|status| match revision_ref {
                Some(_) => ContentError::not_found(slug, revision_ref),
                None => rejected(status),
            }))?;

        match first_result(response)? {
            Some(doc) => to_detail(doc),
            None => Err(ContentError::not_found(slug, revision_ref)),
        }
    }

    async fn query_adjacent(&self, subject_id: &str, direction: Direction) -> Result<Option<PostSummary>, ContentError> {
        let ordering = match direction {
            Direction::Older => format!("[{} desc]", PUBLISH_DATE),
            Direction::Newer => format!("[{}]", PUBLISH_DATE),
        };
        let params = vec![
            ("q", Self::at("document.type", &self.document_type)),
            ("orderings", ordering),
            ("after", subject_id.to_string()),
            ("fetch", self.fetch_fields()),
            ("pageSize", "1".to_string()),
        ];

        let response = self.search(None, params).await
            .map_err(|e| e.into_content_error(rejected))?;
        first_result(response)?.map(to_summary).transpose()
    }

    async fn get_slug_by_id(&self, id: &str, revision_ref: Option<&str>) -> Result<Option<String>, ContentError> {
        let params = vec![
            ("q", Self::at("document.id", id)),
            ("pageSize", "1".to_string()),
        ];

        let response = self.search(revision_ref, params).await
            .map_err(|e| e.into_content_error(|status| match revision_ref {
                Some(_) => ContentError::not_found(id, revision_ref),
                None => rejected(status),
            }))?;
        Ok(first_result(response)?.and_then(|doc| doc.uid))
    }
}
