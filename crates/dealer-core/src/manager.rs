//! Inventory and sales bookkeeping.
//!
//! [`DealerManager`] is the only owner of the inventory and the sales log.
//! A car moves one way: added to the inventory, then sold, at which point a
//! [`SaleRecord`] snapshot is appended to the log and the car leaves the
//! inventory in the same call.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use crate::car::{normalize_vin, Car, CarChanges, SaleRecord};
use crate::config::DealerConfig;
use crate::error::{DealerError, Result};
use crate::store::{self, LoadOutcome};

/// Totals and history derived from the sales log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub total_sold: usize,
    pub total_revenue: f64,
    /// Most recent sale first.
    pub history: Vec<SaleRecord>,
}

/// What a load found on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub cars_loaded: usize,
    pub cars_skipped: usize,
    pub sales_loaded: usize,
    pub sales_skipped: usize,
}

impl LoadReport {
    pub fn has_skipped(&self) -> bool {
        self.cars_skipped > 0 || self.sales_skipped > 0
    }
}

/// Owns the inventory and the sales log, and persists both as JSON.
#[derive(Debug)]
pub struct DealerManager {
    config: DealerConfig,
    inventory: Vec<Car>,
    sales: Vec<SaleRecord>,
}

impl DealerManager {
    /// Creates an empty manager. Nothing is read until [`load`](Self::load).
    pub fn new(config: DealerConfig) -> Self {
        Self {
            config,
            inventory: Vec::new(),
            sales: Vec::new(),
        }
    }

    /// Creates a manager and loads both files.
    pub fn open(config: DealerConfig) -> Self {
        let mut manager = Self::new(config);
        manager.load();
        manager
    }

    /// Replaces the in-memory state with the contents of both files.
    ///
    /// Never fails: a malformed record is skipped, and an unreadable or
    /// unparseable file leaves its collection empty. The two files are
    /// loaded independently.
    pub fn load(&mut self) -> LoadReport {
        let cars = load_or_empty::<Car>(&self.config.inventory_path);
        let sales = load_or_empty::<SaleRecord>(&self.config.sales_path);

        let read = cars.records.len();
        self.inventory = dedup_by_vin(cars.records, &self.config.inventory_path);
        self.sales = sales.records;

        let report = LoadReport {
            cars_loaded: self.inventory.len(),
            cars_skipped: cars.skipped + (read - self.inventory.len()),
            sales_loaded: self.sales.len(),
            sales_skipped: sales.skipped,
        };

        tracing::info!(
            cars = self.inventory.len(),
            sales = self.sales.len(),
            skipped = report.cars_skipped + report.sales_skipped,
            "loaded dealer data"
        );
        report
    }

    /// Overwrites the inventory file with the current inventory.
    pub fn save(&self) -> Result<()> {
        store::write_records(&self.config.inventory_path, &self.inventory)?;
        tracing::info!(
            path = %self.config.inventory_path.display(),
            cars = self.inventory.len(),
            "inventory saved"
        );
        Ok(())
    }

    /// Overwrites the sales file with the full sales log.
    pub fn save_sales(&self) -> Result<()> {
        store::write_records(&self.config.sales_path, &self.sales)?;
        tracing::info!(
            path = %self.config.sales_path.display(),
            sales = self.sales.len(),
            "sales history saved"
        );
        Ok(())
    }

    /// Saves the inventory, then the sales log. Stops at the first failure.
    pub fn save_all(&self) -> Result<()> {
        self.save()?;
        self.save_sales()
    }

    pub fn inventory(&self) -> &[Car] {
        &self.inventory
    }

    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    pub fn len(&self) -> usize {
        self.inventory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inventory.is_empty()
    }

    /// Looks a car up by VIN, ignoring case and surrounding whitespace.
    pub fn find_by_vin(&self, vin: &str) -> Option<&Car> {
        self.position(vin).map(|i| &self.inventory[i])
    }

    /// Adds a car unless one with the same VIN is already in stock.
    ///
    /// Sold cars do not block: a VIN that only appears in the sales log can
    /// be added again.
    pub fn add(&mut self, car: Car) -> Result<()> {
        if self.position(car.vin()).is_some() {
            tracing::debug!(vin = car.vin(), "rejected duplicate VIN");
            return Err(DealerError::Duplicate(car.vin().to_string()));
        }
        tracing::debug!(vin = car.vin(), "added car");
        self.inventory.push(car);
        Ok(())
    }

    /// Applies `changes` to the car with this VIN.
    ///
    /// All provided fields are validated first; if any is invalid the car is
    /// left exactly as it was.
    pub fn edit(&mut self, vin: &str, changes: &CarChanges) -> Result<&Car> {
        let index = self
            .position(vin)
            .ok_or_else(|| DealerError::NotFound(normalize_vin(vin)))?;

        let updated = self.inventory[index].with_changes(changes)?;
        tracing::debug!(vin = updated.vin(), ?changes, "edited car");
        self.inventory[index] = updated;
        Ok(&self.inventory[index])
    }

    /// Sells the car with this VIN, stamping the sale with the current time.
    pub fn remove(&mut self, vin: &str) -> Result<&SaleRecord> {
        self.remove_at(vin, Local::now().naive_local())
    }

    /// Sells the car with this VIN at `sale_date`.
    ///
    /// The car leaves the inventory and its snapshot joins the sales log in
    /// one step; on `NotFound` neither collection changes.
    pub fn remove_at(&mut self, vin: &str, sale_date: NaiveDateTime) -> Result<&SaleRecord> {
        let index = self
            .position(vin)
            .ok_or_else(|| DealerError::NotFound(normalize_vin(vin)))?;

        let car = self.inventory.remove(index);
        tracing::debug!(vin = car.vin(), %sale_date, "sold car");
        self.sales.push(SaleRecord::new(car, sale_date));

        let last = self.sales.len() - 1;
        Ok(&self.sales[last])
    }

    /// Cars whose make, model or VIN contains `query`, case-insensitively.
    ///
    /// A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Car> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.inventory.iter().collect();
        }
        self.inventory.iter().filter(|car| car.matches(&query)).collect()
    }

    /// Summarizes the sales log as it stands now.
    pub fn sales_report(&self) -> SalesReport {
        let mut history: Vec<SaleRecord> = self.sales.iter().rev().cloned().collect();
        // Stable, so equal timestamps keep the latest append first.
        history.sort_by(|a, b| b.sale_date().cmp(&a.sale_date()));

        SalesReport {
            total_sold: self.sales.len(),
            total_revenue: self.sales.iter().map(SaleRecord::price).sum(),
            history,
        }
    }

    fn position(&self, vin: &str) -> Option<usize> {
        let vin = normalize_vin(vin);
        self.inventory.iter().position(|car| car.vin() == vin)
    }
}

fn load_or_empty<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> LoadOutcome<T> {
    match store::read_records(path) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(error = %e, "could not load data file, starting empty");
            LoadOutcome::empty()
        }
    }
}

/// Keeps the first car for each VIN; later duplicates in a file are dropped.
fn dedup_by_vin(cars: Vec<Car>, path: &std::path::Path) -> Vec<Car> {
    let mut kept: Vec<Car> = Vec::with_capacity(cars.len());
    for car in cars {
        if kept.iter().any(|k| k.vin() == car.vin()) {
            tracing::warn!(
                path = %path.display(),
                vin = car.vin(),
                "skipping duplicate VIN"
            );
            continue;
        }
        kept.push(car);
    }
    kept
}
