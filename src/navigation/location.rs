use url::{Url, form_urlencoded};

/// An in-app location: a path plus decoded query parameters, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    params: Vec<(String, String)>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.starts_with('/') { path } else { format!("/{}", path) },
            params: Vec::new(),
        }
    }

    /// Parses either a relative href (`/dashboard?tab=x`) or an absolute URL.
    pub fn parse(href: &str) -> Self {
        let href = href.trim();
        if href.contains("://") {
            if let Ok(url) = Url::parse(href) {
                return Self {
                    path: url.path().to_string(),
                    params: url.query_pairs().into_owned().collect(),
                };
            }
        }

        let without_fragment = href.split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, query),
            None => (without_fragment, ""),
        };
        let mut location = Self::new(if path.is_empty() { "/" } else { path });
        location.params = form_urlencoded::parse(query.as_bytes()).into_owned().collect();
        location
    }

    #[cfg(test)]
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replaces every value of `key` with a single `value`, keeping the position of the first.
    pub fn set_param(&mut self, key: &str, value: &str) {
        match self.params.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.params[first].1 = value.to_string();
                let mut index = 0;
                self.params.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => self.params.push((key.to_string(), value.to_string())),
        }
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.set_param(key, value);
        self
    }

    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }

    pub fn href(&self) -> String {
        if self.params.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string())
        }
    }
}
