use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Bakery Models
// ============================================================================

/// Bakery owning zero or more baked goods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Bakery {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub baked_goods: Vec<BakedGood>,
}

// ============================================================================
// Baked Good Models
// ============================================================================

/// BakedGood belongs to exactly one bakery through `bakery_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BakedGood {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub bakery_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a baked good; the id and timestamp are
/// assigned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBakedGood {
    pub name: String,
    pub price: f64,
    pub bakery_id: i64,
}

/// Order baked goods by price descending, ties by id ascending.
///
/// `total_cmp` keeps the ordering total even for NaN prices, which the
/// numeric parse accepts.
pub fn by_price_desc(a: &BakedGood, b: &BakedGood) -> std::cmp::Ordering {
    b.price.total_cmp(&a.price).then(a.id.cmp(&b.id))
}
