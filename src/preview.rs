use url::form_urlencoded;

/// Name of the cookie holding the preview ref, as set by the repository toolbar.
pub const PREVIEW_COOKIE: &str = "io.prismic.preview";

/// Which content revision a request resolves against. Built once from the
/// request and passed to every resolution call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewContext {
    pub is_preview: bool,
    pub preview_ref: Option<String>,
}

impl PreviewContext {
    pub fn published() -> Self {
        PreviewContext::default()
    }

    pub fn with_ref(preview_ref: &str) -> Self {
        PreviewContext {
            is_preview: true,
            preview_ref: Some(preview_ref.to_string()),
        }
    }

    /// Reads the preview cookie out of a `Cookie` header value.
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        let Some(header) = header else {
            return PreviewContext::published();
        };

        let value = header.split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == PREVIEW_COOKIE)
            .map(|(_, value)| value);

        match value {
            Some(raw) => {
                let decoded: String = form_urlencoded::parse(format!("v={}", raw).as_bytes())
                    .map(|(_, v)| v.into_owned())
                    .next()
                    .unwrap_or_default();
                if decoded.is_empty() {
                    PreviewContext::published()
                } else {
                    PreviewContext::with_ref(&decoded)
                }
            }
            None => PreviewContext::published(),
        }
    }

    /// Cache key namespace for this revision, or `None` when the result must not be cached.
    pub fn cache_namespace(&self) -> Option<&'static str> {
        if self.is_preview {
            None
        } else {
            Some("published")
        }
    }
}

pub fn set_cookie_value(preview_ref: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(preview_ref.as_bytes()).collect();
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", PREVIEW_COOKIE, encoded)
}

pub fn clear_cookie_value() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", PREVIEW_COOKIE)
}
