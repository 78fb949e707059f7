// Business rules for tax rate CRUD: field allowlist and coercion,
// no-op write elision, class normalization, locale replacement, the
// force-delete protocol, and response shaping.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::core::pagination::{self, PageWindow};
use crate::core::sanitize::clean;
use crate::core::{AppError, Result};
use crate::modules::tax_rates::models::{
    storage_class, ListTaxRatesQuery, LocationType, TaxRate, TaxRateChanges, TaxRateFilter,
    TaxRateListing, TaxRateResponse, UpsertTaxRateRequest,
};
use crate::modules::tax_rates::repositories::{TaxClassRepository, TaxRateRepository};
use crate::modules::tax_rates::schema;
use crate::modules::tax_rates::services::field_extension::FieldExtension;

/// Service for tax rate business logic
pub struct TaxRateService {
    rates: Arc<dyn TaxRateRepository>,
    classes: Arc<dyn TaxClassRepository>,
    extensions: Vec<Arc<dyn FieldExtension>>,
    base_url: String,
}

impl TaxRateService {
    pub fn new(
        rates: Arc<dyn TaxRateRepository>,
        classes: Arc<dyn TaxClassRepository>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            rates,
            classes,
            extensions: Vec::new(),
            base_url: base_url.into(),
        }
    }

    /// Register a field extension that contributes extra response
    /// properties
    pub fn with_extension(mut self, extension: Arc<dyn FieldExtension>) -> Self {
        self.extensions.push(extension);
        self
    }

    /// List rates matching the query. The total is counted with the same
    /// predicate and no pagination window.
    pub async fn list(&self, query: ListTaxRatesQuery) -> Result<TaxRateListing> {
        query.validate()?;

        let filter = self.build_filter(&query).await?;
        let window = PageWindow::from_params(query.page, query.per_page, query.offset);

        let rates = self
            .rates
            .list(&filter, query.orderby, query.order, window)
            .await?;
        let total = self.rates.count(&filter).await?;
        let total_pages = pagination::total_pages(total, query.per_page);

        let mut items = Vec::with_capacity(rates.len());
        for rate in rates {
            items.push(self.to_response(rate).await?);
        }

        Ok(TaxRateListing {
            items,
            total,
            total_pages,
        })
    }

    /// Create a rate. Fails when the payload carries an identifier.
    pub async fn create(&self, request: UpsertTaxRateRequest) -> Result<TaxRateResponse> {
        if request.id.is_some() {
            return Err(AppError::resource_exists("tax rate"));
        }

        let class_slugs = self.classes.list_slugs().await?;
        let changes = self.coerce_changes(&request, None, &class_slugs)?;

        let id = self.rates.insert(&changes).await?;
        self.apply_locales(id, &request).await?;

        let rate = self
            .rates
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("tax rate {id} missing after insert")))?;

        tracing::info!(tax_rate_id = id, "Created tax rate");

        self.to_response(rate).await
    }

    pub async fn get(&self, id: u64) -> Result<TaxRateResponse> {
        let rate = self
            .rates
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::invalid_id(format!("tax rate {id}")))?;

        self.to_response(rate).await
    }

    /// Partial update: only supplied fields are considered, and of those
    /// only the ones differing from stored values are written. When
    /// nothing differs, no UPDATE statement is issued.
    pub async fn update(&self, id: u64, request: UpsertTaxRateRequest) -> Result<TaxRateResponse> {
        let current = self
            .rates
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::invalid_id(format!("tax rate {id}")))?;

        let class_slugs = self.classes.list_slugs().await?;
        let changes = self.coerce_changes(&request, Some(&current), &class_slugs)?;

        if !changes.is_empty() {
            self.rates.update(id, &changes).await?;
        }
        self.apply_locales(id, &request).await?;

        let rate = self
            .rates
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal(format!("tax rate {id} missing after update")))?;

        self.to_response(rate).await
    }

    /// Delete a rate. Requires force; this resource has no trash state.
    /// Responds with the rate's last representation.
    pub async fn delete(&self, id: u64, force: bool) -> Result<TaxRateResponse> {
        if !force {
            return Err(AppError::TrashNotSupported(
                "tax rates must be deleted with force=true".to_string(),
            ));
        }

        let current = self
            .rates
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::invalid_id(format!("tax rate {id}")))?;

        let response = self.to_response(current).await?;

        let affected = self.rates.delete(id).await?;
        if affected == 0 {
            // Existence check and delete disagreed
            return Err(AppError::CannotDelete(format!("tax rate {id}")));
        }

        tracing::info!(tax_rate_id = id, "Deleted tax rate");

        Ok(response)
    }

    /// Resource schema with the class enum sourced from stored classes
    pub async fn describe_schema(&self) -> Result<Value> {
        let class_slugs = self.classes.list_slugs().await?;
        Ok(schema::describe(&class_slugs))
    }

    async fn build_filter(&self, query: &ListTaxRatesQuery) -> Result<TaxRateFilter> {
        let class = match &query.class {
            None => None,
            Some(class) => {
                let storage = storage_class(class);
                if !storage.is_empty() {
                    let slugs = self.classes.list_slugs().await?;
                    if !slugs.iter().any(|slug| slug == &storage) {
                        return Err(AppError::invalid_param(format!(
                            "unknown tax class '{class}'"
                        )));
                    }
                }
                Some(storage)
            }
        };

        let code = query
            .code
            .as_deref()
            .map(clean)
            .filter(|code| !code.is_empty());

        Ok(TaxRateFilter {
            class,
            code,
            include: query.include.clone(),
        })
    }

    /// Allowlist-and-coerce routine shared by create and update. On
    /// update, fields equal to the stored value are dropped so no-op
    /// writes are skipped.
    fn coerce_changes(
        &self,
        request: &UpsertTaxRateRequest,
        current: Option<&TaxRate>,
        class_slugs: &[String],
    ) -> Result<TaxRateChanges> {
        let mut changes = TaxRateChanges::default();

        if let Some(country) = &request.country {
            let country = clean(country);
            if current.map_or(true, |c| c.country != country) {
                changes.country = Some(country);
            }
        }

        if let Some(state) = &request.state {
            let state = clean(state);
            if current.map_or(true, |c| c.state != state) {
                changes.state = Some(state);
            }
        }

        if let Some(rate) = &request.rate {
            let rate = clean(rate);
            let parsed = Decimal::from_str(&rate).map_err(|_| {
                AppError::invalid_param(format!("rate '{rate}' is not a valid decimal"))
            })?;
            if parsed < Decimal::ZERO {
                return Err(AppError::invalid_param("rate must not be negative"));
            }
            if current.map_or(true, |c| c.rate != rate) {
                changes.rate = Some(rate);
            }
        }

        if let Some(name) = &request.name {
            let name = clean(name);
            if current.map_or(true, |c| c.name != name) {
                changes.name = Some(name);
            }
        }

        if let Some(priority) = request.priority {
            if current.map_or(true, |c| c.priority != priority) {
                changes.priority = Some(priority);
            }
        }

        if let Some(compound) = request.compound {
            if current.map_or(true, |c| c.compound != compound) {
                changes.compound = Some(compound);
            }
        }

        if let Some(shipping) = request.shipping {
            if current.map_or(true, |c| c.shipping != shipping) {
                changes.shipping = Some(shipping);
            }
        }

        if let Some(order) = request.order {
            if current.map_or(true, |c| c.order != order) {
                changes.order = Some(order);
            }
        }

        if let Some(class) = &request.class {
            let storage = storage_class(class);
            if !storage.is_empty() && !class_slugs.iter().any(|slug| slug == &storage) {
                return Err(AppError::invalid_param(format!(
                    "unknown tax class '{class}'"
                )));
            }
            if current.map_or(true, |c| c.class != storage) {
                changes.class = Some(storage);
            }
        }

        Ok(changes)
    }

    /// Store supplied postcode/city values as locale rows, replacing any
    /// prior rows of the same type. Absent or empty values leave the
    /// existing rows untouched.
    async fn apply_locales(&self, id: u64, request: &UpsertTaxRateRequest) -> Result<()> {
        if let Some(postcode) = &request.postcode {
            let postcode = clean(postcode);
            if !postcode.is_empty() {
                self.rates
                    .replace_locations(id, LocationType::Postcode, &[postcode])
                    .await?;
            }
        }

        if let Some(city) = &request.city {
            let city = clean(city);
            if !city.is_empty() {
                self.rates
                    .replace_locations(id, LocationType::City, &[city])
                    .await?;
            }
        }

        Ok(())
    }

    async fn to_response(&self, rate: TaxRate) -> Result<TaxRateResponse> {
        let locations = self.rates.locations(rate.id).await?;

        let mut extra = serde_json::Map::new();
        for extension in &self.extensions {
            extra.extend(extension.extend(&rate));
        }

        let mut response = TaxRateResponse::from_rate(rate, &locations, &self.base_url);
        response.extra = extra;

        Ok(response)
    }
}
