// Data access trait used by the HTTP handlers

use crate::db::repositories::{BakedGoodRepository, BakeryRepository};
use crate::db::DbPool;
use crate::errors::DatabaseError;
use crate::models::{BakedGood, Bakery, NewBakedGood};
use async_trait::async_trait;

/// CRUD primitives over bakeries and baked goods.
///
/// Every mutation commits a single-row change atomically; on failure nothing
/// is written and the store's message is returned unchanged.
#[async_trait]
pub trait BakeryStore: Send + Sync {
    /// Fetch one bakery with its baked goods
    async fn get_bakery(&self, id: i64) -> Result<Bakery, DatabaseError>;

    /// All bakeries with their baked goods
    async fn list_bakeries(&self) -> Result<Vec<Bakery>, DatabaseError>;

    /// Rename a bakery, returning the updated record
    async fn update_bakery_name(&self, id: i64, name: &str) -> Result<Bakery, DatabaseError>;

    /// Insert a baked good and return it with its assigned id
    async fn create_baked_good(&self, new_good: NewBakedGood) -> Result<BakedGood, DatabaseError>;

    /// Remove a baked good
    async fn delete_baked_good(&self, id: i64) -> Result<(), DatabaseError>;

    /// Baked goods sorted by price descending, ties by id ascending
    async fn list_baked_goods_by_price_desc(&self) -> Result<Vec<BakedGood>, DatabaseError>;

    /// The baked good with the highest price, `None` when there are none
    async fn most_expensive_baked_good(&self) -> Result<Option<BakedGood>, DatabaseError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// PostgreSQL-backed store
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
    bakeries: BakeryRepository,
    baked_goods: BakedGoodRepository,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            bakeries: BakeryRepository::new(pool.clone()),
            baked_goods: BakedGoodRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl BakeryStore for PgStore {
    async fn get_bakery(&self, id: i64) -> Result<Bakery, DatabaseError> {
        self.bakeries
            .find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Bakery not found: {}", id)))
    }

    async fn list_bakeries(&self) -> Result<Vec<Bakery>, DatabaseError> {
        self.bakeries.list_all().await
    }

    async fn update_bakery_name(&self, id: i64, name: &str) -> Result<Bakery, DatabaseError> {
        self.bakeries.update_name(id, name).await
    }

    async fn create_baked_good(&self, new_good: NewBakedGood) -> Result<BakedGood, DatabaseError> {
        self.baked_goods.create(&new_good).await
    }

    async fn delete_baked_good(&self, id: i64) -> Result<(), DatabaseError> {
        self.baked_goods.delete(id).await
    }

    async fn list_baked_goods_by_price_desc(&self) -> Result<Vec<BakedGood>, DatabaseError> {
        self.baked_goods.list_by_price_desc().await
    }

    async fn most_expensive_baked_good(&self) -> Result<Option<BakedGood>, DatabaseError> {
        self.baked_goods.find_most_expensive().await
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.pool.health_check().await
    }
}
