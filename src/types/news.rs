use crate::{GatewayError, Result};

/// Headline slice requested from the news provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub category: String,
    pub country: String,
    pub page_size: u32,
}

impl NewsQuery {
    pub const DEFAULT_CATEGORY: &str = "technology";
    pub const DEFAULT_COUNTRY: &str = "us";
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    /// Largest page the provider serves.
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Build a query from optional raw request parameters, applying defaults
    /// for missing or blank values.
    pub fn from_params(
        category: Option<&str>,
        country: Option<&str>,
        page_size: Option<&str>,
    ) -> Result<Self> {
        let page_size = match non_blank(page_size) {
            None => Self::DEFAULT_PAGE_SIZE,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=Self::MAX_PAGE_SIZE).contains(n))
                .ok_or_else(|| {
                    GatewayError::InvalidInput(format!(
                        "pageSize must be between 1 and {}, got {raw:?}",
                        Self::MAX_PAGE_SIZE
                    ))
                })?,
        };

        Ok(Self {
            category: non_blank(category)
                .unwrap_or(Self::DEFAULT_CATEGORY)
                .to_lowercase(),
            country: non_blank(country)
                .unwrap_or(Self::DEFAULT_COUNTRY)
                .to_lowercase(),
            page_size,
        })
    }
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            category: Self::DEFAULT_CATEGORY.to_owned(),
            country: Self::DEFAULT_COUNTRY.to_owned(),
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
