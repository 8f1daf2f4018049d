pub mod api;
pub mod config;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod migrator;
pub mod password;
pub mod seed;
pub mod telemetry;

pub use error::SeedError;
pub use sea_orm;
