//! Dealer Core - inventory and sales records for a car dealership
//!
//! Cars are validated on construction, kept in memory by a
//! [`DealerManager`], and persisted as two JSON array files
//! (`cars.json` and `sales.json` by default).

pub mod car;
pub mod config;
pub mod error;
pub mod manager;
pub mod store;

pub use car::{Car, CarChanges, CarRecord, SaleRecord, PLACEHOLDER_IMAGE};
pub use config::DealerConfig;
pub use error::{DealerError, ValidationError};
pub use manager::{DealerManager, LoadReport, SalesReport};
