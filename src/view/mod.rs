use std::io;
use std::io::ErrorKind;
use std::path::Path;

use ramhorns::Template;

pub mod error_renderer;
pub mod home_renderer;
pub mod post_renderer;

/// Header data shared by every page.
#[derive(ramhorns::Content, Clone)]
pub struct SiteHeader<'a> {
    pub site_title: &'a str,
    pub logo: &'a str,
}

pub fn read_template(tpl_dir: &Path, file_name: &str) -> io::Result<String> {
    let full_path = tpl_dir.join(file_name);
    std::fs::read_to_string(&full_path)
        .map_err(|e| io::Error::new(e.kind(), format!("Error loading template {}: {}", full_path.display(), e)))
}

pub fn parse_template<'a>(src: &'a str, what: &str) -> io::Result<Template<'a>> {
    Template::new(src)
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, format!("Error parsing {} template: {}", what, e)))
}
