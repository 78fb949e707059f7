use std::sync::Arc;

use ratebook::modules::tax_rates::models::UpsertTaxRateRequest;
use ratebook::modules::tax_rates::services::TaxRateService;

use super::memory_repository::{MemoryTaxClassRepository, MemoryTaxRateRepository};

pub const TEST_BASE_URL: &str = "http://localhost:8080";

/// Service wired to in-memory repositories, plus the rate repository
/// handle for inspecting stored state and write counters.
pub fn test_service() -> (Arc<TaxRateService>, Arc<MemoryTaxRateRepository>) {
    let rates = Arc::new(MemoryTaxRateRepository::new());
    let classes = Arc::new(MemoryTaxClassRepository::default());
    let service = Arc::new(TaxRateService::new(
        rates.clone(),
        classes,
        TEST_BASE_URL,
    ));
    (service, rates)
}

/// Test data factory for tax rate payloads
pub struct TestDataFactory;

impl TestDataFactory {
    /// The worked example: US 7.5% rate named US-TAX
    pub fn us_rate_request() -> UpsertTaxRateRequest {
        UpsertTaxRateRequest {
            country: Some("US".to_string()),
            rate: Some("7.5".to_string()),
            name: Some("US-TAX".to_string()),
            ..Default::default()
        }
    }

    /// A request with every writable field populated
    pub fn full_rate_request() -> UpsertTaxRateRequest {
        UpsertTaxRateRequest {
            country: Some("GB".to_string()),
            state: Some("".to_string()),
            rate: Some("20.0000".to_string()),
            name: Some("VAT".to_string()),
            priority: Some(2),
            compound: Some(true),
            shipping: Some(false),
            order: Some(3),
            class: Some("reduced-rate".to_string()),
            postcode: Some("SW1A 1AA".to_string()),
            city: Some("London".to_string()),
            ..Default::default()
        }
    }
}
