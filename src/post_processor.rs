use std::io;

use spdlog::{error, info, warn};

use crate::config::Config;
use crate::content::html_renderer::escape_html;
use crate::error::ContentError;
use crate::gateway::ContentGateway;
use crate::listing::{Listing, ListingError};
use crate::post_assembler::AssembledPost;
use crate::view::error_renderer::ErrorRenderer;
use crate::view::home_renderer::{HomeRenderer, ListingStatus};
use crate::view::post_renderer::PostRenderer;
use crate::view::{read_template, SiteHeader};

pub fn site_header(config: &Config) -> SiteHeader<'_> {
    SiteHeader {
        site_title: config.site.title.as_str(),
        logo: config.site.logo.as_deref().unwrap_or(""),
    }
}

/// Walks the listing from its first page, loading up to `pages` pages.
/// Failing on the first page fails the whole build; a later failure keeps
/// what was loaded and is reported in the status.
pub async fn build_listing<G>(gateway: &G, page_size: u32, pages: u32) -> Result<(Listing, ListingStatus), ContentError>
where
    G: ContentGateway + ?Sized,
{
    let listing = Listing::new(page_size);
    let mut loaded = 0;
    let mut load_failed = false;

    while loaded < pages && listing.has_more() {
        match listing.load_more(gateway).await {
            Ok(_) => loaded += 1,
            Err(ListingError::Content(e)) if loaded == 0 => return Err(e),
            Err(ListingError::Content(e)) => {
                warn!("Showing {} pages out of {}: {}", loaded, pages, e);
                load_failed = true;
                break;
            }
            Err(ListingError::Exhausted) => break,
            Err(ListingError::LoadInProgress) => {
                return Err(ContentError::UpstreamUnavailable("listing is already loading".to_string()));
            }
        }
    }

    let status = ListingStatus {
        pages_shown: loaded,
        has_more: listing.has_more(),
        load_failed,
    };
    Ok((listing, status))
}

pub fn render_home(config: &Config, listing: &Listing, status: &ListingStatus, is_preview: bool) -> io::Result<String> {
    let template_src = read_template(&config.paths.template_dir, "home.tpl")?;
    let renderer = HomeRenderer::new(&template_src)?;
    Ok(renderer.render(site_header(config), &listing.items(), status, is_preview))
}

pub fn render_post(config: &Config, assembled: &AssembledPost) -> io::Result<String> {
    let template_src = read_template(&config.paths.template_dir, "post.tpl")?;
    let renderer = PostRenderer::new(&template_src)?;
    Ok(renderer.render(site_header(config), assembled, config.comments.as_ref()))
}

/// Error page body. Falls back to a bare page when the template is unusable.
pub fn render_error(config: &Config, status: u16, message: &str) -> String {
    let rendered = read_template(&config.paths.template_dir, "error.tpl")
        .and_then(|src| {
            let renderer = ErrorRenderer::new(&src)?;
            Ok(renderer.render(site_header(config), status, message))
        });

    match rendered {
        Ok(page) => page,
        Err(e) => {
            error!("Could not render error page: {}", e);
            format!("<!DOCTYPE html><html><body><h1>{}</h1><p>{}</p></body></html>", status, escape_html(message))
        }
    }
}

pub fn log_failure(what: &str, err: &ContentError) {
    match err {
        ContentError::NotFound { .. } => info!("Not found: {}: {}", what, err),
        e => error!("Failed loading {}: {}", what, e),
    }
}
