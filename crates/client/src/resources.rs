//! Paginated back-office resources (banks, companies, challans, haltings,
//! truck payments). Records are kept as raw JSON: the list screens only
//! display and export them.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Bank,
    Company,
    Challan,
    Halting,
    TruckPayment,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Bank,
        Resource::Company,
        Resource::Challan,
        Resource::Halting,
        Resource::TruckPayment,
    ];

    /// Collection path on the API.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Bank => "/bank",
            Resource::Company => "/company",
            Resource::Challan => "/challans",
            Resource::Halting => "/haltings",
            Resource::TruckPayment => "/truck-payments",
        }
    }

    /// Plural name used for titles and export file names.
    pub fn plural(&self) -> &'static str {
        match self {
            Resource::Bank => "banks",
            Resource::Company => "companies",
            Resource::Challan => "challans",
            Resource::Halting => "haltings",
            Resource::TruckPayment => "truck-payments",
        }
    }
}

impl core::str::FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Resource::ALL
            .into_iter()
            .find(|r| {
                let path = r.path().trim_start_matches('/');
                s == path || s == r.plural() || s.trim_end_matches('s') == path.trim_end_matches('s')
            })
            .ok_or_else(|| {
                format!(
                    "unknown resource {s:?}; expected one of: {}",
                    Resource::ALL.map(|r| r.plural()).join(", ")
                )
            })
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// `{page, limit, search, filters...}` as query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub filters: Vec<(String, String)>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            filters: Vec::new(),
        }
    }
}

impl PageQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: page.max(1),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.trim().is_empty()).then_some(search);
        self
    }

    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.max(1).to_string()),
            ("limit".to_string(), self.limit.max(1).to_string()),
        ];
        if let Some(search) = &self.search {
            pairs.push(("search".to_string(), search.trim().to_string()));
        }
        pairs.extend(
            self.filters
                .iter()
                .filter(|(_, v)| !v.trim().is_empty())
                .cloned(),
        );
        pairs
    }
}
