use std::collections::HashMap;

#[derive(PartialEq, Debug)]
pub struct QueryString {
    items: HashMap<String, String>,
}

impl QueryString {
    pub fn from(buf: &str) -> Self {
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        QueryString {
            items,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key)
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// How many listing pages the home page shows, between 1 and `max_pages`.
    pub fn get_pages(&self, max_pages: u32) -> u32 {
        let val: u32 = self.get("pages")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        val.clamp(1, max_pages)
    }
}
