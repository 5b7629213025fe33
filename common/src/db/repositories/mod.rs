// Repository layer for database operations

pub mod baked_good;
pub mod bakery;

pub use baked_good::BakedGoodRepository;
pub use bakery::BakeryRepository;
