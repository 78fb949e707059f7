pub mod controllers;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod services;

pub use models::{TaxRate, TaxRateResponse};
pub use repositories::{TaxClassRepository, TaxRateRepository};
pub use services::{FieldExtension, TaxRateService};
