use serde_json::{Map, Value};

use crate::modules::tax_rates::models::TaxRate;

/// Hook for merging additional properties onto a serialized tax rate
/// without touching the controller or service logic. Extensions run in
/// registration order; later keys overwrite earlier ones.
pub trait FieldExtension: Send + Sync {
    fn extend(&self, rate: &TaxRate) -> Map<String, Value>;
}
