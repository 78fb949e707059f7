// Tax rate entity as stored in the tax_rates table.
//
// A rate is a named, prioritized tax percentage applicable to a class of
// goods, optionally compound and optionally applied to shipping. The
// postcode/city matchers live in tax_rate_locations as separate rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::sanitize::slugify;

/// Public name of the default tax class. Stored as an empty string.
pub const STANDARD_CLASS: &str = "standard";

/// A stored tax rate. Field names are the public API names; the
/// `tax_rate_*` storage columns are mapped via sqlx renames.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TaxRate {
    #[sqlx(rename = "tax_rate_id")]
    pub id: u64,
    #[sqlx(rename = "tax_rate_country")]
    pub country: String,
    #[sqlx(rename = "tax_rate_state")]
    pub state: String,
    #[sqlx(rename = "tax_rate")]
    pub rate: String,
    #[sqlx(rename = "tax_rate_name")]
    pub name: String,
    #[sqlx(rename = "tax_rate_priority")]
    pub priority: u32,
    #[sqlx(rename = "tax_rate_compound")]
    pub compound: bool,
    #[sqlx(rename = "tax_rate_shipping")]
    pub shipping: bool,
    #[sqlx(rename = "tax_rate_order")]
    pub order: u32,
    /// Storage form: empty string means the standard class
    #[sqlx(rename = "tax_rate_class")]
    pub class: String,
}

impl TaxRate {
    /// Synthesized tax code: country, state, name, and priority joined
    /// with `-`, skipping empty parts. Priority 0 counts as empty.
    pub fn code(&self) -> String {
        let priority = if self.priority == 0 {
            String::new()
        } else {
            self.priority.to_string()
        };

        [
            self.country.as_str(),
            self.state.as_str(),
            self.name.as_str(),
            priority.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("-")
    }

    /// Public class name for this rate
    pub fn class_name(&self) -> &str {
        public_class(&self.class)
    }
}

/// Map a public class value to its storage form. "standard" is stored as
/// an empty string; everything else is slug-sanitized.
pub fn storage_class(public: &str) -> String {
    let slug = slugify(public);
    if slug == STANDARD_CLASS {
        String::new()
    } else {
        slug
    }
}

/// Map a stored class value back to its public form.
pub fn public_class(storage: &str) -> &str {
    if storage.is_empty() {
        STANDARD_CLASS
    } else {
        storage
    }
}

/// Location type of a locale row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(40)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Postcode,
    City,
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationType::Postcode => write!(f, "postcode"),
            LocationType::City => write!(f, "city"),
        }
    }
}

/// A geographic matcher row associated with a tax rate
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TaxRateLocation {
    #[sqlx(rename = "location_code")]
    pub code: String,
    #[sqlx(rename = "location_type")]
    pub location_type: LocationType,
}

/// Coerced, storage-ready field changes for an insert or update. Only
/// fields present in the request (and, on update, differing from the
/// stored value) are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxRateChanges {
    pub country: Option<String>,
    pub state: Option<String>,
    pub rate: Option<String>,
    pub name: Option<String>,
    pub priority: Option<u32>,
    pub compound: Option<bool>,
    pub shipping: Option<bool>,
    pub order: Option<u32>,
    /// Storage form, already normalized (empty string for standard)
    pub class: Option<String>,
}

impl TaxRateChanges {
    pub fn is_empty(&self) -> bool {
        self.country.is_none()
            && self.state.is_none()
            && self.rate.is_none()
            && self.name.is_none()
            && self.priority.is_none()
            && self.compound.is_none()
            && self.shipping.is_none()
            && self.order.is_none()
            && self.class.is_none()
    }
}
