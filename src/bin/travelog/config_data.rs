use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::Path;

const CONFIG_SAMPLE: &str = r#"[site]
title = "spacetraveling"
logo = "/public/logo.svg"

# For the file locations, If you want it to be relative to the executable directory
# use ${exe_dir}/location
[paths]
template_dir = "res/template"
public_dir = "res/public"

[cms]
api_endpoint = "https://your-repository.cdn.prismic.io/api/v2"
# access_token = "..."
document_type = "post"
page_size = 5
timeout_secs = 10

[defaults]
# Seconds a rendered page is served before being rebuilt
revalidate_secs = 3600
rendering_cache_enabled = true
max_pages = 20

[server]
address = "0.0.0.0"
port = 8001

[log]
level = "Info"
log_to_console = true

# [comments]
# repo = "user/repository"
# theme = "github-dark"
"#;

pub(crate) fn write_sample_cfg(file_path: &Path) -> io::Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(CONFIG_SAMPLE.as_bytes())?;
    writer.flush()
}
