pub mod user;
pub mod warehouse;

pub use warehouse::WarehouseStatus;
