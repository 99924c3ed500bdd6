//! Storage locations for the dealer's data files.

use std::path::{Path, PathBuf};

/// Default inventory file, relative to the working directory
pub const DEFAULT_INVENTORY_FILE: &str = "cars.json";

/// Default sales history file, relative to the working directory
pub const DEFAULT_SALES_FILE: &str = "sales.json";

/// Where the inventory and the sales history are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealerConfig {
    pub inventory_path: PathBuf,
    pub sales_path: PathBuf,
}

impl DealerConfig {
    pub fn with_paths(inventory_path: impl Into<PathBuf>, sales_path: impl Into<PathBuf>) -> Self {
        Self {
            inventory_path: inventory_path.into(),
            sales_path: sales_path.into(),
        }
    }

    /// Both files placed inside `dir` under their default names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::with_paths(dir.join(DEFAULT_INVENTORY_FILE), dir.join(DEFAULT_SALES_FILE))
    }
}

impl Default for DealerConfig {
    fn default() -> Self {
        Self::with_paths(DEFAULT_INVENTORY_FILE, DEFAULT_SALES_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = DealerConfig::default();
        assert_eq!(config.inventory_path, PathBuf::from("cars.json"));
        assert_eq!(config.sales_path, PathBuf::from("sales.json"));
    }

    #[test]
    fn test_in_dir() {
        let config = DealerConfig::in_dir("/var/lib/dealer");
        assert_eq!(config.inventory_path, PathBuf::from("/var/lib/dealer/cars.json"));
        assert_eq!(config.sales_path, PathBuf::from("/var/lib/dealer/sales.json"));
    }
}
