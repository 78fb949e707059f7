pub mod tax_class_repository;
pub mod tax_rate_repository;

pub use tax_class_repository::{MySqlTaxClassRepository, TaxClassRepository};
pub use tax_rate_repository::{MySqlTaxRateRepository, TaxRateRepository};
