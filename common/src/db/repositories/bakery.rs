// Bakery repository implementation

use crate::db::repositories::baked_good::BakedGoodRepository;
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::Bakery;
use std::collections::HashMap;
use tracing::instrument;

/// Repository for bakery-related database operations
#[derive(Debug, Clone)]
pub struct BakeryRepository {
    pool: DbPool,
}

impl BakeryRepository {
    /// Create a new BakeryRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Find a bakery by ID together with its baked goods
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Bakery>, DatabaseError> {
        let bakery = sqlx::query_as::<_, Bakery>(
            r#"
            SELECT id, name, created_at
            FROM bakeries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;

        let Some(mut bakery) = bakery else {
            return Ok(None);
        };

        bakery.baked_goods = BakedGoodRepository::new(self.pool.clone())
            .find_by_bakery_ids(&[bakery.id])
            .await?;

        Ok(Some(bakery))
    }

    /// List all bakeries with their baked goods.
    ///
    /// Baked goods are loaded with one extra query for the whole listing.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Bakery>, DatabaseError> {
        let mut bakeries = sqlx::query_as::<_, Bakery>(
            r#"
            SELECT id, name, created_at
            FROM bakeries
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool.pool())
        .await?;

        if bakeries.is_empty() {
            return Ok(bakeries);
        }

        let ids: Vec<i64> = bakeries.iter().map(|b| b.id).collect();
        let goods = BakedGoodRepository::new(self.pool.clone())
            .find_by_bakery_ids(&ids)
            .await?;

        let positions: HashMap<i64, usize> = bakeries
            .iter()
            .enumerate()
            .map(|(pos, b)| (b.id, pos))
            .collect();
        for good in goods {
            if let Some(&pos) = positions.get(&good.bakery_id) {
                bakeries[pos].baked_goods.push(good);
            }
        }

        tracing::debug!(count = bakeries.len(), "Listed bakeries");
        Ok(bakeries)
    }

    /// Rename a bakery inside a transaction and return its new state
    ///
    /// Returns `DatabaseError::NotFound` when no row has the given id.
    #[instrument(skip(self))]
    pub async fn update_name(&self, id: i64, name: &str) -> Result<Bakery, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Bakery>(
            r#"
            UPDATE bakeries
            SET name = $2
            WHERE id = $1
            RETURNING id, name, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping `tx` on the early return rolls the statement back
        let mut bakery =
            updated.ok_or_else(|| DatabaseError::NotFound(format!("Bakery not found: {}", id)))?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        bakery.baked_goods = BakedGoodRepository::new(self.pool.clone())
            .find_by_bakery_ids(&[bakery.id])
            .await?;

        tracing::info!(bakery_id = id, bakery_name = %name, "Bakery renamed");
        Ok(bakery)
    }
}

