// In-process store with the same observable behaviour as PgStore

use crate::db::store::BakeryStore;
use crate::errors::DatabaseError;
use crate::models::{by_price_desc, BakedGood, Bakery, NewBakedGood};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Tables {
    bakeries: BTreeMap<i64, Bakery>,
    baked_goods: BTreeMap<i64, BakedGood>,
    next_bakery_id: i64,
    next_baked_good_id: i64,
    offline: bool,
    failing_mutation: Option<DatabaseError>,
}

impl Tables {
    fn with_goods(&self, bakery: &Bakery) -> Bakery {
        let mut bakery = bakery.clone();
        bakery.baked_goods = self
            .baked_goods
            .values()
            .filter(|g| g.bakery_id == bakery.id)
            .cloned()
            .collect();
        bakery
    }

    fn ensure_online(&self) -> Result<(), DatabaseError> {
        if self.offline {
            return Err(DatabaseError::ConnectionFailed(
                "store is offline".to_string(),
            ));
        }
        Ok(())
    }

    fn begin_mutation(&mut self) -> Result<(), DatabaseError> {
        self.ensure_online()?;
        match self.failing_mutation.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Store keeping both tables in memory.
///
/// Ids are assigned from 1 and never reused. The `bakery_id` foreign key is
/// enforced unless disabled with [`MemoryStore::without_foreign_keys`].
#[derive(Debug)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    enforce_foreign_keys: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables {
                next_bakery_id: 1,
                next_baked_good_id: 1,
                ..Tables::default()
            }),
            enforce_foreign_keys: true,
        }
    }

    /// A store that accepts baked goods pointing at missing bakeries
    pub fn without_foreign_keys() -> Self {
        Self {
            enforce_foreign_keys: false,
            ..Self::new()
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        // A panic while holding the lock cannot leave a half-written row
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a bakery. There is no HTTP route for this; it seeds data.
    pub fn insert_bakery(&self, name: impl Into<String>) -> Bakery {
        let mut tables = self.lock();
        let id = tables.next_bakery_id;
        tables.next_bakery_id += 1;

        let bakery = Bakery {
            id,
            name: name.into(),
            created_at: Utc::now(),
            baked_goods: Vec::new(),
        };
        tables.bakeries.insert(id, bakery.clone());
        bakery
    }

    /// Simulate a lost connection: every operation fails while offline
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Make the next create, rename or delete fail with `err` without
    /// touching any row. Reads are unaffected.
    pub fn fail_next_mutation(&self, err: DatabaseError) {
        self.lock().failing_mutation = Some(err);
    }

    /// Number of stored baked goods
    pub fn baked_good_count(&self) -> usize {
        self.lock().baked_goods.len()
    }
}

#[async_trait]
impl BakeryStore for MemoryStore {
    async fn get_bakery(&self, id: i64) -> Result<Bakery, DatabaseError> {
        let tables = self.lock();
        tables.ensure_online()?;
        tables
            .bakeries
            .get(&id)
            .map(|b| tables.with_goods(b))
            .ok_or_else(|| DatabaseError::NotFound(format!("Bakery not found: {}", id)))
    }

    async fn list_bakeries(&self) -> Result<Vec<Bakery>, DatabaseError> {
        let tables = self.lock();
        tables.ensure_online()?;
        Ok(tables
            .bakeries
            .values()
            .map(|b| tables.with_goods(b))
            .collect())
    }

    async fn update_bakery_name(&self, id: i64, name: &str) -> Result<Bakery, DatabaseError> {
        let mut tables = self.lock();
        tables.begin_mutation()?;
        let bakery = tables
            .bakeries
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("Bakery not found: {}", id)))?;
        bakery.name = name.to_string();
        let updated = bakery.clone();
        Ok(tables.with_goods(&updated))
    }

    async fn create_baked_good(&self, new_good: NewBakedGood) -> Result<BakedGood, DatabaseError> {
        let mut tables = self.lock();
        tables.begin_mutation()?;

        if self.enforce_foreign_keys && !tables.bakeries.contains_key(&new_good.bakery_id) {
            return Err(DatabaseError::ForeignKeyViolation(format!(
                "insert or update on table \"baked_goods\" violates foreign key constraint \"baked_goods_bakery_id_fkey\": Key (bakery_id)=({}) is not present in table \"bakeries\"",
                new_good.bakery_id
            )));
        }

        let id = tables.next_baked_good_id;
        tables.next_baked_good_id += 1;

        let good = BakedGood {
            id,
            name: new_good.name,
            price: new_good.price,
            bakery_id: new_good.bakery_id,
            created_at: Utc::now(),
        };
        tables.baked_goods.insert(id, good.clone());
        Ok(good)
    }

    async fn delete_baked_good(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.lock();
        tables.begin_mutation()?;
        tables
            .baked_goods
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(format!("Baked good not found: {}", id)))
    }

    async fn list_baked_goods_by_price_desc(&self) -> Result<Vec<BakedGood>, DatabaseError> {
        let tables = self.lock();
        tables.ensure_online()?;
        let mut goods: Vec<BakedGood> = tables.baked_goods.values().cloned().collect();
        goods.sort_by(by_price_desc);
        Ok(goods)
    }

    async fn most_expensive_baked_good(&self) -> Result<Option<BakedGood>, DatabaseError> {
        let tables = self.lock();
        tables.ensure_online()?;
        Ok(tables.baked_goods.values().min_by(|a, b| by_price_desc(a, b)).cloned())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.lock().ensure_online()
    }
}
