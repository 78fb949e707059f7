pub mod field_extension;
pub mod tax_rate_service;

pub use field_extension::FieldExtension;
pub use tax_rate_service::TaxRateService;
