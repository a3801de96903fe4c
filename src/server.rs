use std::io;
use std::sync::Arc;

use chrono::Duration;
use ntex::http::header;
use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use spdlog::{error, info, warn};

use crate::config::Config;
use crate::content_cache::{CacheKey, ContentCache};
use crate::error::ContentError;
use crate::gateway::prismic::PrismicGateway;
use crate::gateway::ContentGateway;
use crate::post_assembler::assemble_post;
use crate::post_processor::{build_listing, log_failure, render_error, render_home, render_post};
use crate::preview::{clear_cookie_value, set_cookie_value, PreviewContext};
use crate::query_string::QueryString;
use crate::text_utils::is_valid_slug;

pub struct AppState {
    pub config: Config,
    pub gateway: Arc<dyn ContentGateway>,
    pub cache: ContentCache<String>,
}

type SharedState = web::types::State<Arc<AppState>>;

impl AppState {
    pub fn new(config: Config, gateway: Arc<dyn ContentGateway>) -> Self {
        let cache = if config.defaults.rendering_cache_enabled {
            ContentCache::new()
        } else {
            ContentCache::non_caching()
        };

        AppState {
            config,
            gateway,
            cache,
        }
    }

    fn store(&self, key: Option<CacheKey>, rendered: &str) {
        let Some(key) = key else {
            return;
        };
        let Some(ttl) = Duration::try_seconds(self.config.defaults.revalidate_secs) else {
            warn!("Invalid revalidate_secs {}, not caching", self.config.defaults.revalidate_secs);
            return;
        };

        self.cache.purge_expired();
        self.cache.add(&key, rendered.to_string(), ttl);
    }
}

/// The one place a request's preview state is read.
fn preview_of(req: &HttpRequest) -> PreviewContext {
    let cookies = req.headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok());
    PreviewContext::from_cookie_header(cookies)
}

fn query_of(req: &HttpRequest) -> QueryString {
    QueryString::from(req.uri().query().unwrap_or(""))
}

fn html_ok(body: String) -> web::HttpResponse {
    web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn not_found(config: &Config, message: &str) -> web::HttpResponse {
    web::HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(render_error(config, 404, message))
}

fn internal_error(config: &Config, message: &str) -> web::HttpResponse {
    web::HttpResponse::InternalServerError()
        .content_type("text/html; charset=utf-8")
        .body(render_error(config, 500, message))
}

fn error_response(config: &Config, err: &ContentError) -> web::HttpResponse {
    match err {
        ContentError::NotFound { .. } => not_found(config, "This post does not exist."),
        ContentError::DataShape(_) | ContentError::UpstreamUnavailable(_) => {
            internal_error(config, "Could not load content, please try again later.")
        }
    }
}

fn redirect(location: String) -> web::HttpResponse {
    web::HttpResponse::TemporaryRedirect()
        .header("Location", location)
        .content_type("text/html; charset=utf-8")
        .finish()
}

// Begin: Redirect region --------
#[web::get("/post/{slug}/")]
async fn post_with_slash(path: web::types::Path<String>) -> web::HttpResponse {
    redirect(format!("/post/{}", path.into_inner()))
}
// End: Redirect region --------

#[web::get("/")]
async fn index(req: HttpRequest, state: SharedState) -> web::HttpResponse {
    let config = &state.config;
    let preview = preview_of(&req);
    let pages = query_of(&req).get_pages(config.defaults.max_pages);

    let cache_key = CacheKey::home(pages, &preview);
    if let Some(cached) = cache_key.as_ref().and_then(|key| state.cache.get(key)) {
        return html_ok(cached.as_str().to_string());
    }

    let (listing, status) = match build_listing(state.gateway.as_ref(), config.cms.page_size, pages).await {
        Ok(built) => built,
        Err(e) => {
            log_failure("home page", &e);
            return error_response(config, &e);
        }
    };

    let rendered = match render_home(config, &listing, &status, preview.is_preview) {
        Ok(rendered) => rendered,
        Err(e) => {
            error!("Error rendering home page: {}", e);
            return internal_error(config, "Could not render the page.");
        }
    };
    info!("Rendered home page with {} posts", listing.len());

    // A partial listing is retried on the next request instead of being cached
    if !status.load_failed {
        state.store(cache_key, &rendered);
    }

    html_ok(rendered)
}

#[web::get("/post/{slug}")]
async fn view_post(req: HttpRequest, path: web::types::Path<String>, state: SharedState) -> web::HttpResponse {
    let config = &state.config;
    let slug = path.into_inner();
    if !is_valid_slug(&slug) {
        return not_found(config, "This post does not exist.");
    }

    let preview = preview_of(&req);
    let cache_key = CacheKey::post(&slug, &preview);
    if let Some(cached) = cache_key.as_ref().and_then(|key| state.cache.get(key)) {
        return html_ok(cached.as_str().to_string());
    }

    let assembled = match assemble_post(&slug, &preview, state.gateway.as_ref()).await {
        Ok(assembled) => assembled,
        Err(e) => {
            log_failure(&format!("post {}", slug), &e);
            return error_response(config, &e);
        }
    };

    match render_post(config, &assembled) {
        Ok(rendered) => {
            state.store(cache_key, &rendered);
            html_ok(rendered)
        }
        Err(e) => {
            error!("Error rendering post {}: {}", slug, e);
            internal_error(config, "Could not render the page.")
        }
    }
}

#[web::get("/api/preview")]
async fn enter_preview(req: HttpRequest, state: SharedState) -> web::HttpResponse {
    let qs = query_of(&req);
    let Some(token) = qs.get("token") else {
        return web::HttpResponse::BadRequest()
            .body("Missing preview token");
    };

    let location = match qs.get("documentId") {
        Some(document_id) => match state.gateway.get_slug_by_id(document_id, Some(token)).await {
            Ok(Some(slug)) if is_valid_slug(&slug) => format!("/post/{}", slug),
            Ok(_) => "/".to_string(),
            Err(e) => {
                warn!("Could not resolve previewed document {}: {}", document_id, e);
                return error_response(&state.config, &e);
            }
        },
        None => "/".to_string(),
    };

    info!("Entering preview, redirecting to {}", location);
    web::HttpResponse::TemporaryRedirect()
        .header("Location", location)
        .header(header::SET_COOKIE, set_cookie_value(token))
        .finish()
}

#[web::get("/api/exit-preview")]
async fn exit_preview() -> web::HttpResponse {
    info!("Leaving preview");
    web::HttpResponse::TemporaryRedirect()
        .header("Location", "/")
        .header(header::SET_COOKIE, clear_cookie_value())
        .finish()
}

#[web::get("/public/{file_name}")]
async fn public_files(path: web::types::Path<String>, state: SharedState) -> Result<NamedFile, web::Error> {
    let file_name = path.into_inner();
    if file_name.contains("..") || file_name.contains('/') {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = state.config.paths.public_dir.join(file_name);
    Ok(NamedFile::open(file_path)?)
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let gateway = PrismicGateway::new(&config.cms)?;
    info!("Reading content from {}", config.cms.api_endpoint);

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState::new(config, Arc::new(gateway)));

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(index)
            .service(view_post)
            .service(post_with_slash)
            .service(enter_preview)
            .service(exit_preview)
            .service(public_files)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}
