use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

#[derive(Deserialize)]
pub struct Site {
    pub title: String,
    pub logo: Option<String>,
}

#[derive(Deserialize)]
pub struct Paths {
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
}

#[derive(Deserialize, Clone)]
pub struct Cms {
    pub api_endpoint: String,
    pub access_token: Option<String>,
    #[serde(default = "default_document_type")]
    pub document_type: String,
    pub page_size: u32,
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize)]
pub struct Defaults {
    #[serde(default = "default_revalidate_secs")]
    pub revalidate_secs: i64,
    pub rendering_cache_enabled: bool,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Settings of the embedded utterances widget.
#[derive(Deserialize)]
pub struct Comments {
    pub repo: String,
    #[serde(default = "default_comments_theme")]
    pub theme: String,
}

#[derive(Deserialize)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    pub cms: Cms,
    pub defaults: Defaults,
    pub server: Server,
    pub log: Option<Log>,
    pub comments: Option<Comments>,
}

fn default_document_type() -> String {
    "post".to_string()
}

// Same interval the site was regenerated with
fn default_revalidate_secs() -> i64 {
    3600
}

/// Upper bound for `revalidate_secs`, one year.
pub const MAX_REVALIDATE_SECS: i64 = 365 * 24 * 3600;

fn default_max_pages() -> u32 {
    20
}

fn default_comments_theme() -> String {
    "github-dark".to_string()
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    let Some(str_path) = path.to_str() else {
        return Ok(path);
    };
    if !str_path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent()
        .and_then(|p| p.to_str())
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Could not find the executable directory"))?;
    Ok(PathBuf::from(str_path.replace("${exe_dir}", exe_dir)))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    if cfg.cms.page_size == 0 {
        return Err(io::Error::new(ErrorKind::InvalidData, "cms.page_size has to be greater than 0"));
    }
    if cfg.defaults.max_pages == 0 {
        return Err(io::Error::new(ErrorKind::InvalidData, "defaults.max_pages has to be greater than 0"));
    }
    if !(1..=MAX_REVALIDATE_SECS).contains(&cfg.defaults.revalidate_secs) {
        return Err(io::Error::new(ErrorKind::InvalidData,
                                  format!("defaults.revalidate_secs has to be between 1 and {}", MAX_REVALIDATE_SECS)));
    }

    cfg.paths = Paths {
        template_dir: parse_path(cfg.paths.template_dir)?,
        public_dir: parse_path(cfg.paths.public_dir)?,
    };

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}
