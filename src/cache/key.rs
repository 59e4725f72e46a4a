//! Canonical cache keys.
//!
//! A key is the endpoint id followed by its parameters sorted by name:
//! `stock:symbol=AAPL`, `news:category=technology&country=us&pageSize=10`.
//! Parameter names and values have `%`, `&` and `=` percent-escaped so no
//! two distinct requests render to the same key.

use std::collections::BTreeMap;
use std::fmt;

/// A logical request: endpoint id plus named string parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationRequest {
    endpoint: &'static str,
    params: BTreeMap<String, String>,
}

impl AggregationRequest {
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            params: BTreeMap::new(),
        }
    }

    /// Add (or replace) a parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Render the canonical key. Insertion order of parameters is irrelevant.
    pub fn key(&self) -> CacheKey {
        let mut rendered = String::with_capacity(self.endpoint.len() + 16 * self.params.len());
        rendered.push_str(self.endpoint);
        rendered.push(':');
        for (i, (name, value)) in self.params.iter().enumerate() {
            if i > 0 {
                rendered.push('&');
            }
            escape_into(&mut rendered, name);
            rendered.push('=');
            escape_into(&mut rendered, value);
        }
        CacheKey(rendered)
    }
}

fn escape_into(out: &mut String, raw: &str) {
    for c in raw.chars() {
        match c {
            '%' => out.push_str("%25"),
            '&' => out.push_str("%26"),
            '=' => out.push_str("%3D"),
            c => out.push(c),
        }
    }
}

/// Rendered cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Endpoint namespace of the key (the part before the first `:`).
    pub fn endpoint(&self) -> &str {
        self.0.split_once(':').map_or(&self.0, |(endpoint, _)| endpoint)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&AggregationRequest> for CacheKey {
    fn from(request: &AggregationRequest) -> Self {
        request.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_render_sorted() {
        let key = AggregationRequest::new("news")
            .param("pageSize", 10)
            .param("country", "us")
            .param("category", "technology")
            .key();
        assert_eq!(
            key.as_str(),
            "news:category=technology&country=us&pageSize=10"
        );
        assert_eq!(key.endpoint(), "news");
    }

    #[test]
    fn no_params_renders_bare_endpoint() {
        assert_eq!(AggregationRequest::new("ping").key().as_str(), "ping:");
    }

    #[test]
    fn separators_are_escaped() {
        let a = AggregationRequest::new("e").param("a", "1&b=2").key();
        let b = AggregationRequest::new("e")
            .param("a", "1")
            .param("b", "2")
            .key();
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "e:a=1%26b%3D2");
        assert_eq!(
            AggregationRequest::new("e").param("p", "100%").key().as_str(),
            "e:p=100%25"
        );
    }
}
