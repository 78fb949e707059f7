// Request-side types for the /taxes endpoints: the writable field set
// for create/update and the validated collection query parameters.

use serde::{Deserialize, Deserializer};

use crate::core::{AppError, Result};

/// Writable fields accepted by POST /taxes and PUT/PATCH /taxes/{id}.
/// Absent fields are left untouched on update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpsertTaxRateRequest {
    /// Rejected on create; a resource must not pre-exist
    pub id: Option<u64>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub rate: Option<String>,
    pub name: Option<String>,
    pub priority: Option<u32>,
    pub compound: Option<bool>,
    pub shipping: Option<bool>,
    pub order: Option<u32>,
    pub class: Option<String>,
    /// Stored as locale rows, not as a rate column
    pub postcode: Option<String>,
    /// Stored as locale rows, not as a rate column
    pub city: Option<String>,
}

/// Sort direction for collections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Sortable attributes of a tax rate collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    Id,
    #[default]
    Order,
}

impl OrderBy {
    /// Storage column backing this sort attribute
    pub fn column(self) -> &'static str {
        match self {
            OrderBy::Id => "tax_rate_id",
            OrderBy::Order => "tax_rate_order",
        }
    }
}

/// Query parameters for GET /taxes
#[derive(Debug, Clone, Deserialize)]
pub struct ListTaxRatesQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub orderby: OrderBy,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub include: Vec<u64>,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

impl Default for ListTaxRatesQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            offset: None,
            order: SortOrder::default(),
            orderby: OrderBy::default(),
            class: None,
            code: None,
            include: Vec::new(),
        }
    }
}

impl ListTaxRatesQuery {
    /// Range checks enforced before any endpoint logic runs
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(AppError::invalid_param("page must be at least 1"));
        }
        if self.per_page < 1 || self.per_page > 100 {
            return Err(AppError::invalid_param(
                "per_page must be between 1 and 100",
            ));
        }
        Ok(())
    }
}

/// Comma-separated identifier list, e.g. `include=3,5,9`
fn deserialize_id_list<'de, D>(deserializer: D) -> std::result::Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(Vec::new()),
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u64>().map_err(|_| {
                    serde::de::Error::custom(format!("invalid id in include list: {part}"))
                })
            })
            .collect(),
    }
}

/// Query parameters for DELETE /taxes/{id}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteParams {
    /// Must be true; tax rates have no trash state
    #[serde(default)]
    pub force: bool,
}

/// Filter predicate shared by the listing and the count query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxRateFilter {
    /// Storage-normalized class (empty string for standard)
    pub class: Option<String>,
    /// Substring match against the synthesized tax code
    pub code: Option<String>,
    /// Restrict to these identifiers when non-empty
    pub include: Vec<u64>,
}

impl TaxRateFilter {
    pub fn is_empty(&self) -> bool {
        self.class.is_none() && self.code.is_none() && self.include.is_empty()
    }
}
