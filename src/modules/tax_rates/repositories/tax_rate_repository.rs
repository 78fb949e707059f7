// Tax rate persistence over MySQL.
//
// The listing and count share one filter-pushing routine so the reported
// total always comes from the same predicate as the page itself.

use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use crate::core::pagination::PageWindow;
use crate::core::sanitize::escape_like;
use crate::core::Result;
use crate::modules::tax_rates::models::{
    LocationType, OrderBy, SortOrder, TaxRate, TaxRateChanges, TaxRateFilter, TaxRateLocation,
};

const RATE_COLUMNS: &str = "tax_rate_id, tax_rate_country, tax_rate_state, tax_rate, \
     tax_rate_name, tax_rate_priority, tax_rate_compound, tax_rate_shipping, \
     tax_rate_order, tax_rate_class";

/// Repository for tax rate storage operations
#[async_trait]
pub trait TaxRateRepository: Send + Sync {
    /// Insert a new rate, applying storage defaults for absent fields,
    /// and return its generated identifier
    async fn insert(&self, changes: &TaxRateChanges) -> Result<u64>;

    /// Apply the given field changes to an existing rate
    async fn update(&self, id: u64, changes: &TaxRateChanges) -> Result<()>;

    async fn find_by_id(&self, id: u64) -> Result<Option<TaxRate>>;

    /// Delete a rate and its locale rows, returning the number of rate
    /// rows affected
    async fn delete(&self, id: u64) -> Result<u64>;

    async fn list(
        &self,
        filter: &TaxRateFilter,
        orderby: OrderBy,
        order: SortOrder,
        window: PageWindow,
    ) -> Result<Vec<TaxRate>>;

    /// Count rows matching `filter` with no pagination window
    async fn count(&self, filter: &TaxRateFilter) -> Result<u64>;

    /// Locale rows associated with a rate
    async fn locations(&self, id: u64) -> Result<Vec<TaxRateLocation>>;

    /// Replace every locale row of the given type for a rate
    async fn replace_locations(
        &self,
        id: u64,
        location_type: LocationType,
        codes: &[String],
    ) -> Result<()>;
}

pub struct MySqlTaxRateRepository {
    pool: MySqlPool,
}

impl MySqlTaxRateRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Append the shared WHERE predicate for `filter` onto a query that
/// already ends in `WHERE 1 = 1`.
fn push_filter<'args>(qb: &mut QueryBuilder<'args, MySql>, filter: &'args TaxRateFilter) {
    if let Some(class) = &filter.class {
        qb.push(" AND tax_rate_class = ").push_bind(class);
    }

    if let Some(code) = &filter.code {
        qb.push(
            " AND CONCAT_WS('-', NULLIF(tax_rate_country, ''), NULLIF(tax_rate_state, ''), \
             NULLIF(tax_rate_name, ''), NULLIF(CAST(tax_rate_priority AS CHAR), '0')) LIKE ",
        )
        .push_bind(format!("%{}%", escape_like(code)));
    }

    if !filter.include.is_empty() {
        qb.push(" AND tax_rate_id IN (");
        let mut ids = qb.separated(", ");
        for id in &filter.include {
            ids.push_bind(*id);
        }
        qb.push(")");
    }
}

#[async_trait]
impl TaxRateRepository for MySqlTaxRateRepository {
    async fn insert(&self, changes: &TaxRateChanges) -> Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO tax_rates (
                tax_rate_country, tax_rate_state, tax_rate, tax_rate_name,
                tax_rate_priority, tax_rate_compound, tax_rate_shipping,
                tax_rate_order, tax_rate_class
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(changes.country.as_deref().unwrap_or(""))
        .bind(changes.state.as_deref().unwrap_or(""))
        .bind(changes.rate.as_deref().unwrap_or("0"))
        .bind(changes.name.as_deref().unwrap_or(""))
        .bind(changes.priority.unwrap_or(1))
        .bind(changes.compound.unwrap_or(false))
        .bind(changes.shipping.unwrap_or(true))
        .bind(changes.order.unwrap_or(0))
        .bind(changes.class.as_deref().unwrap_or(""))
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_id())
    }

    async fn update(&self, id: u64, changes: &TaxRateChanges) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut qb = QueryBuilder::<MySql>::new("UPDATE tax_rates SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(country) = &changes.country {
                set.push("tax_rate_country = ").push_bind_unseparated(country);
            }
            if let Some(state) = &changes.state {
                set.push("tax_rate_state = ").push_bind_unseparated(state);
            }
            if let Some(rate) = &changes.rate {
                set.push("tax_rate = ").push_bind_unseparated(rate);
            }
            if let Some(name) = &changes.name {
                set.push("tax_rate_name = ").push_bind_unseparated(name);
            }
            if let Some(priority) = changes.priority {
                set.push("tax_rate_priority = ").push_bind_unseparated(priority);
            }
            if let Some(compound) = changes.compound {
                set.push("tax_rate_compound = ").push_bind_unseparated(compound);
            }
            if let Some(shipping) = changes.shipping {
                set.push("tax_rate_shipping = ").push_bind_unseparated(shipping);
            }
            if let Some(order) = changes.order {
                set.push("tax_rate_order = ").push_bind_unseparated(order);
            }
            if let Some(class) = &changes.class {
                set.push("tax_rate_class = ").push_bind_unseparated(class);
            }
        }
        qb.push(" WHERE tax_rate_id = ").push_bind(id);

        qb.build().execute(&self.pool).await?;

        Ok(())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<TaxRate>> {
        let rate = sqlx::query_as::<_, TaxRate>(&format!(
            "SELECT {RATE_COLUMNS} FROM tax_rates WHERE tax_rate_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rate)
    }

    async fn delete(&self, id: u64) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tax_rate_locations WHERE tax_rate_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tax_rates WHERE tax_rate_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected())
    }

    async fn list(
        &self,
        filter: &TaxRateFilter,
        orderby: OrderBy,
        order: SortOrder,
        window: PageWindow,
    ) -> Result<Vec<TaxRate>> {
        let mut qb = QueryBuilder::<MySql>::new(format!(
            "SELECT {RATE_COLUMNS} FROM tax_rates WHERE 1 = 1"
        ));
        push_filter(&mut qb, filter);

        // orderby resolves to a fixed column name, never raw input
        qb.push(" ORDER BY ")
            .push(orderby.column())
            .push(" ")
            .push(order.sql());
        qb.push(" LIMIT ").push_bind(window.limit);
        qb.push(" OFFSET ").push_bind(window.offset);

        let rates = qb
            .build_query_as::<TaxRate>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rates)
    }

    async fn count(&self, filter: &TaxRateFilter) -> Result<u64> {
        let mut qb =
            QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM tax_rates WHERE 1 = 1");
        push_filter(&mut qb, filter);

        let total = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total as u64)
    }

    async fn locations(&self, id: u64) -> Result<Vec<TaxRateLocation>> {
        let locations = sqlx::query_as::<_, TaxRateLocation>(
            r#"
            SELECT location_code, location_type
            FROM tax_rate_locations
            WHERE tax_rate_id = ?
            ORDER BY location_id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(locations)
    }

    async fn replace_locations(
        &self,
        id: u64,
        location_type: LocationType,
        codes: &[String],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tax_rate_locations WHERE tax_rate_id = ? AND location_type = ?")
            .bind(id)
            .bind(location_type)
            .execute(&mut *tx)
            .await?;

        for code in codes {
            sqlx::query(
                "INSERT INTO tax_rate_locations (tax_rate_id, location_code, location_type) \
                 VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(code)
            .bind(location_type)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
