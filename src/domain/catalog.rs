use super::product::Product;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of products per page when the caller does not ask for a size.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Category value that disables the category filter.
pub const ALL_CATEGORIES: &str = "All";

/// Ordering applied after all filters.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    None,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(SortKey::None),
            "price-asc" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            "rating-desc" => Ok(SortKey::RatingDesc),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::None => "none",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::RatingDesc => "rating-desc",
        };
        f.write_str(name)
    }
}

/// Inclusive price bounds.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl PriceRange {
    pub fn new(min: u64, max: u64) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    /// Parses the `"min-max"` form used by price filter controls.
    ///
    /// Malformed input yields `None`, which callers treat as "no price filter".
    pub fn parse(raw: &str) -> Option<Self> {
        let (min, max) = raw.trim().split_once('-')?;
        let min = min.trim().parse().ok()?;
        let max = max.trim().parse().ok()?;
        Self::new(min, max)
    }

    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// A combined filter, sort and pagination request over the catalog.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct QuerySpec {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price_range: Option<PriceRange>,
    pub sort: SortKey,
    pub search: Option<String>,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            category: None,
            brand: None,
            price_range: None,
            sort: SortKey::None,
            search: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QuerySpec {
    /// The category filter, with `"All"` normalised to no filter.
    pub fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .filter(|category| *category != ALL_CATEGORIES)
    }

    /// The lower-cased search term, with blank terms normalised to no filter.
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }

    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

/// One page of query results.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    pub items: Vec<Product>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Distinct filter values offered for a catalog.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Facets {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
}
