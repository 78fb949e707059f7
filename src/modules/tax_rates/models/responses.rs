// Public response shapes. Storage column names never leak here; locale
// rows are merged back onto the flat object by location type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::tax_rate::{LocationType, TaxRate, TaxRateLocation};

/// A single tax rate as serialized to API consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxRateResponse {
    pub id: u64,
    pub country: String,
    pub state: String,
    pub postcode: String,
    pub city: String,
    pub rate: String,
    pub name: String,
    pub priority: u32,
    pub compound: bool,
    pub shipping: bool,
    pub order: u32,
    pub class: String,
    #[serde(rename = "_links")]
    pub links: ResourceLinks,
    /// Properties contributed by registered field extensions
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaxRateResponse {
    /// Shape a stored rate for the API, overlaying its locale rows.
    /// When several rows share a type the last one read wins.
    pub fn from_rate(rate: TaxRate, locations: &[TaxRateLocation], base_url: &str) -> Self {
        let mut postcode = String::new();
        let mut city = String::new();
        for location in locations {
            match location.location_type {
                LocationType::Postcode => postcode = location.code.clone(),
                LocationType::City => city = location.code.clone(),
            }
        }

        let links = ResourceLinks::for_tax_rate(base_url, rate.id);
        let class = rate.class_name().to_string();

        Self {
            id: rate.id,
            country: rate.country,
            state: rate.state,
            postcode,
            city,
            rate: rate.rate,
            name: rate.name,
            priority: rate.priority,
            compound: rate.compound,
            shipping: rate.shipping,
            order: rate.order,
            class,
            links,
            extra: Map::new(),
        }
    }
}

/// Hyperlinks for self and collection navigation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub collection: Link,
}

impl ResourceLinks {
    pub fn for_tax_rate(base_url: &str, id: u64) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            self_: Link {
                href: format!("{base}/taxes/{id}"),
            },
            collection: Link {
                href: format!("{base}/taxes"),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

/// One page of tax rates plus the totals reported via response headers
#[derive(Debug, Clone)]
pub struct TaxRateListing {
    pub items: Vec<TaxRateResponse>,
    pub total: u64,
    pub total_pages: u64,
}
