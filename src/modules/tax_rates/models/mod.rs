pub mod requests;
pub mod responses;
pub mod tax_rate;

pub use requests::{
    DeleteParams, ListTaxRatesQuery, OrderBy, SortOrder, TaxRateFilter, UpsertTaxRateRequest,
};
pub use responses::{Link, ResourceLinks, TaxRateListing, TaxRateResponse};
pub use tax_rate::{
    public_class, storage_class, LocationType, TaxRate, TaxRateChanges, TaxRateLocation,
    STANDARD_CLASS,
};
