use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::Result;

/// Repository enumerating the known tax classes
#[async_trait]
pub trait TaxClassRepository: Send + Sync {
    /// Slugs of every stored (non-standard) tax class, in creation order
    async fn list_slugs(&self) -> Result<Vec<String>>;
}

pub struct MySqlTaxClassRepository {
    pool: MySqlPool,
}

impl MySqlTaxClassRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaxClassRepository for MySqlTaxClassRepository {
    async fn list_slugs(&self) -> Result<Vec<String>> {
        let slugs =
            sqlx::query_scalar::<_, String>("SELECT slug FROM tax_classes ORDER BY tax_class_id")
                .fetch_all(&self.pool)
                .await?;

        Ok(slugs)
    }
}
