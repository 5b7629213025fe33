// Baked good repository implementation

use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{BakedGood, NewBakedGood};
use tracing::instrument;

/// Repository for baked-good database operations
#[derive(Debug, Clone)]
pub struct BakedGoodRepository {
    pool: DbPool,
}

impl BakedGoodRepository {
    /// Create a new BakedGoodRepository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a baked good inside a transaction.
    ///
    /// `bakery_id` is not checked here; a dangling reference fails on the
    /// foreign key constraint and surfaces as `ForeignKeyViolation`.
    #[instrument(skip(self, new_good), fields(bakery_id = new_good.bakery_id))]
    pub async fn create(&self, new_good: &NewBakedGood) -> Result<BakedGood, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let good = sqlx::query_as::<_, BakedGood>(
            r#"
            INSERT INTO baked_goods (name, price, bakery_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, bakery_id, created_at
            "#,
        )
        .bind(&new_good.name)
        .bind(new_good.price)
        .bind(new_good.bakery_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tracing::info!(
            baked_good_id = good.id,
            baked_good_name = %good.name,
            price = good.price,
            "Baked good created"
        );
        Ok(good)
    }

    /// Delete a baked good inside a transaction
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM baked_goods WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Baked good not found: {}",
                id
            )));
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        tracing::info!(baked_good_id = id, "Baked good deleted");
        Ok(())
    }

    /// All baked goods ordered by price, most expensive first
    #[instrument(skip(self))]
    pub async fn list_by_price_desc(&self) -> Result<Vec<BakedGood>, DatabaseError> {
        let goods = sqlx::query_as::<_, BakedGood>(
            r#"
            SELECT id, name, price, bakery_id, created_at
            FROM baked_goods
            ORDER BY price DESC, id ASC
            "#,
        )
        .fetch_all(self.pool.pool())
        .await?;

        tracing::debug!(count = goods.len(), "Listed baked goods by price");
        Ok(goods)
    }

    /// The single most expensive baked good, if any exist
    #[instrument(skip(self))]
    pub async fn find_most_expensive(&self) -> Result<Option<BakedGood>, DatabaseError> {
        let good = sqlx::query_as::<_, BakedGood>(
            r#"
            SELECT id, name, price, bakery_id, created_at
            FROM baked_goods
            ORDER BY price DESC, id ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool.pool())
        .await?;

        Ok(good)
    }

    /// Baked goods belonging to any of the given bakeries, ordered by id
    #[instrument(skip(self, bakery_ids), fields(bakeries = bakery_ids.len()))]
    pub async fn find_by_bakery_ids(
        &self,
        bakery_ids: &[i64],
    ) -> Result<Vec<BakedGood>, DatabaseError> {
        let goods = sqlx::query_as::<_, BakedGood>(
            r#"
            SELECT id, name, price, bakery_id, created_at
            FROM baked_goods
            WHERE bakery_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(bakery_ids)
        .fetch_all(self.pool.pool())
        .await?;

        Ok(goods)
    }
}
