//! Pharmacy Core Library
//!
//! Inventory and billing consistency workflow for a pharmacy counter.
//!
//! # Architecture
//!
//! ```text
//!   User composes bill rows (BillDraft)
//!        │  autocomplete against last-good inventory snapshot,
//!        │  price snapshotted at selection time
//!        ▼
//!   line_items()  — field validation (blocks submission inline)
//!        │
//!        ▼
//!   validate_stock()  — fresh catalog read, fail-fast per medicine
//!        │
//!        ▼
//!   finalize_bill()  — one transaction: conditional stock decrement
//!                      (re-checked at write time) + bill insert
//!
//!   Inventory insertion:
//!        probe find_duplicate(name, price, expiry)
//!        → ask the user → DuplicatePolicy::{MergeQuantity, InsertNew}
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite backing store for inventory and bills
//! - [`models`]: Domain types (InventoryItem, Bill, BillLineItem, enums)
//! - [`editor`]: In-memory bill composition with derived totals
//! - [`validator`]: Stock validation against a catalog snapshot
//! - [`catalog`]: Autocomplete suggestion ranking
//! - [`money`]: Integer-cent price parsing and formatting

pub mod catalog;
pub mod db;
pub mod editor;
pub mod models;
pub mod money;
pub mod validator;

// Re-export commonly used types
pub use db::{Database, DbError, StockDecrement};
pub use editor::{BillDraft, LineDraft, LineField, SearchState};
pub use models::{
    Bill, BillLineItem, Category, InventoryItem, PaymentMethod, Supplier, LOW_STOCK_THRESHOLD,
};
pub use validator::StockError;

use chrono::NaiveDate;
use log::{debug, info};

// =========================================================================
// Error Type
// =========================================================================

/// Top-level error taxonomy. Every variant is recoverable: the caller
/// shows the message and returns control to the user.
#[derive(Debug, thiserror::Error)]
pub enum PharmacyError {
    /// Malformed or missing client-side input; blocks the operation.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Business-rule failure from stock validation.
    #[error("{0}")]
    Stock(#[from] StockError),

    /// Backing-store failure; the operation aborted with no partial state.
    #[error("Database error: {0}")]
    Db(DbError),

    /// Target record absent on update/delete.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<DbError> for PharmacyError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::StockConflict {
                medicine_name,
                requested,
                available,
            } => PharmacyError::Stock(StockError::InsufficientStock {
                medicine_name,
                requested,
                available,
            }),
            DbError::NotFound(what) => PharmacyError::NotFound(what),
            other => PharmacyError::Db(other),
        }
    }
}

pub type PharmacyResult<T> = Result<T, PharmacyError>;

// =========================================================================
// Workflow Inputs
// =========================================================================

/// Outcome of a user confirmation prompt. Destructive operations and
/// duplicate merges must not proceed without `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// What to do when inserting an item that exactly duplicates an existing
/// one (same name, price, and expiry date).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Always insert a fresh row.
    InsertNew,
    /// Fold the incoming quantity into the existing row instead.
    MergeQuantity,
}

/// Counter-level aggregates for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PharmacyStats {
    pub inventory_count: usize,
    pub low_stock_count: usize,
    /// Sum of price x quantity over the inventory, in cents
    pub inventory_value_cents: i64,
    pub bill_count: usize,
    /// Sum of bill totals, in cents
    pub revenue_cents: i64,
}

// =========================================================================
// Main API Object
// =========================================================================

/// The pharmacy workflow facade: wires the editor, validator, duplicate
/// probe, and persistence together over one database handle.
pub struct Pharmacy {
    db: Database,
}

impl Pharmacy {
    /// Open or create the backing store at the given path.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> PharmacyResult<Self> {
        Ok(Self {
            db: Database::open(path)?,
        })
    }

    /// Create an in-memory store (for testing).
    pub fn open_in_memory() -> PharmacyResult<Self> {
        Ok(Self {
            db: Database::open_in_memory()?,
        })
    }

    // =====================================================================
    // Inventory
    // =====================================================================

    /// Full inventory, ordered by name.
    pub fn list_inventory(&self) -> PharmacyResult<Vec<InventoryItem>> {
        Ok(self.db.list_inventory()?)
    }

    /// Case-insensitive substring search on medicine name.
    pub fn search_inventory(&self, query: &str) -> PharmacyResult<Vec<InventoryItem>> {
        Ok(self.db.search_inventory(query)?)
    }

    /// Items currently flagged low-stock (quantity below 25).
    pub fn low_stock_items(&self) -> PharmacyResult<Vec<InventoryItem>> {
        let items = self.db.list_inventory()?;
        Ok(items.into_iter().filter(InventoryItem::is_low_stock).collect())
    }

    /// Duplicate probe: does an entry with exactly this name, price, and
    /// expiry already exist? Read-only; callers prompt the user before
    /// choosing a [`DuplicatePolicy`].
    pub fn check_duplicate(
        &self,
        medicine_name: &str,
        price_cents: i64,
        expiry_date: NaiveDate,
    ) -> PharmacyResult<bool> {
        Ok(self
            .db
            .find_duplicate(medicine_name, price_cents, expiry_date)?
            .is_some())
    }

    /// Insert a new inventory item, or merge into an exact duplicate when
    /// the policy says so. Returns the item as persisted.
    pub fn add_inventory_item(
        &self,
        item: InventoryItem,
        policy: DuplicatePolicy,
    ) -> PharmacyResult<InventoryItem> {
        item.validate_fields().map_err(PharmacyError::Validation)?;
        if item.quantity < 1 {
            return Err(PharmacyError::Validation(
                "Quantity must be at least 1".into(),
            ));
        }
        let today = chrono::Local::now().date_naive();
        if item.expiry_date < today {
            return Err(PharmacyError::Validation(
                "Expiry date must not be in the past".into(),
            ));
        }

        if policy == DuplicatePolicy::MergeQuantity {
            if let Some(existing) =
                self.db
                    .find_duplicate(&item.medicine_name, item.price_cents, item.expiry_date)?
            {
                info!(
                    "merging {} units of {} into existing entry {}",
                    item.quantity, item.medicine_name, existing.id
                );
                self.db.add_inventory_quantity(&existing.id, item.quantity)?;
                return self
                    .db
                    .get_inventory_item(&existing.id)?
                    .ok_or_else(|| PharmacyError::NotFound(existing.id));
            }
        }

        self.db.insert_inventory_item(&item)?;
        Ok(item)
    }

    /// Replace an inventory item (full-record update).
    ///
    /// The expiry floor is not re-checked here: an already-stocked item
    /// may legitimately carry a past expiry by the time it is edited.
    pub fn update_inventory_item(&self, id: &str, item: &InventoryItem) -> PharmacyResult<()> {
        item.validate_fields().map_err(PharmacyError::Validation)?;
        if !self.db.update_inventory_item(id, item)? {
            return Err(PharmacyError::NotFound(format!("inventory item {}", id)));
        }
        Ok(())
    }

    /// Delete an inventory item, gated on user confirmation. Returns
    /// whether anything was deleted.
    pub fn delete_inventory_item(
        &self,
        id: &str,
        confirmation: Confirmation,
    ) -> PharmacyResult<bool> {
        if confirmation == Confirmation::Declined {
            debug!("inventory delete declined for {}", id);
            return Ok(false);
        }
        Ok(self.db.delete_inventory_item(id)?)
    }

    // =====================================================================
    // Billing
    // =====================================================================

    /// All bills, newest first.
    pub fn list_bills(&self) -> PharmacyResult<Vec<Bill>> {
        Ok(self.db.list_bills()?)
    }

    /// Get a bill by id.
    pub fn get_bill(&self, id: &str) -> PharmacyResult<Option<Bill>> {
        Ok(self.db.get_bill(id)?)
    }

    /// Submit a composed draft: field validation, fresh catalog read,
    /// stock validation, then an atomic decrement-and-insert. Any failure
    /// leaves the store exactly as it was.
    pub fn finalize_bill(&mut self, draft: &BillDraft) -> PharmacyResult<Bill> {
        let payment_method = draft.validate_header().map_err(PharmacyError::Validation)?;
        let line_items = draft.line_items().map_err(PharmacyError::Validation)?;

        // Fresh read right before commit to narrow the race window; the
        // transaction's conditional decrement closes it entirely.
        let snapshot = self.db.list_inventory()?;
        validator::validate_stock(&line_items, &snapshot)?;

        let mut decrements = Vec::with_capacity(line_items.len());
        for line in &line_items {
            let entry = validator::resolve_line(line, &snapshot).ok_or_else(|| {
                StockError::NotFound {
                    medicine_name: line.medicine_name.clone(),
                }
            })?;
            decrements.push(StockDecrement {
                item_id: entry.id.clone(),
                medicine_name: line.medicine_name.clone(),
                quantity: line.quantity,
            });
        }

        let bill = Bill::new(
            draft.customer_name.trim().to_string(),
            payment_method,
            draft.bill_date,
            line_items,
        );
        self.db.finalize_bill(&bill, &decrements)?;
        Ok(bill)
    }

    /// Replace a bill record. The total is always re-derived from the
    /// provided line items. Stock is not re-validated on edit (the edit
    /// flow never re-reserves inventory).
    pub fn update_bill(
        &self,
        id: &str,
        customer_name: String,
        payment_method: PaymentMethod,
        bill_date: NaiveDate,
        line_items: Vec<BillLineItem>,
    ) -> PharmacyResult<Bill> {
        if customer_name.trim().is_empty() {
            return Err(PharmacyError::Validation("Customer name is required".into()));
        }
        for line in &line_items {
            if line.medicine_name.trim().is_empty() {
                return Err(PharmacyError::Validation("Medicine name is required".into()));
            }
            if line.quantity < 1 {
                return Err(PharmacyError::Validation(format!(
                    "Invalid quantity for {}",
                    line.medicine_name
                )));
            }
            if line.unit_price_cents < 0 {
                return Err(PharmacyError::Validation(format!(
                    "Invalid price for {}",
                    line.medicine_name
                )));
            }
        }

        let existing = self
            .db
            .get_bill(id)?
            .ok_or_else(|| PharmacyError::NotFound(format!("bill {}", id)))?;

        let mut bill = Bill {
            id: existing.id,
            customer_name,
            payment_method,
            bill_date,
            line_items,
            total_cents: 0,
            created_at: existing.created_at,
            updated_at: chrono::Utc::now().to_rfc3339(),
        };
        bill.recompute_total();

        self.db.update_bill(id, &bill)?;
        Ok(bill)
    }

    /// Delete a bill, gated on user confirmation. Returns whether
    /// anything was deleted.
    pub fn delete_bill(&self, id: &str, confirmation: Confirmation) -> PharmacyResult<bool> {
        if confirmation == Confirmation::Declined {
            debug!("bill delete declined for {}", id);
            return Ok(false);
        }
        Ok(self.db.delete_bill(id)?)
    }

    // =====================================================================
    // Reporting
    // =====================================================================

    /// Counter-level aggregates for the dashboard.
    pub fn stats(&self) -> PharmacyResult<PharmacyStats> {
        let inventory = self.db.list_inventory()?;
        let bills = self.db.list_bills()?;
        Ok(PharmacyStats {
            inventory_count: inventory.len(),
            low_stock_count: inventory.iter().filter(|i| i.is_low_stock()).count(),
            inventory_value_cents: inventory
                .iter()
                .map(|i| i.price_cents.saturating_mul(i.quantity))
                .fold(0i64, i64::saturating_add),
            bill_count: bills.len(),
            revenue_cents: bills
                .iter()
                .map(|b| b.total_cents)
                .fold(0i64, i64::saturating_add),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn future_date() -> NaiveDate {
        chrono::Local::now().date_naive() + chrono::Days::new(365)
    }

    fn make_item(name: &str, price_cents: i64, quantity: i64) -> InventoryItem {
        InventoryItem::new(
            name.into(),
            Category::Antibiotics,
            price_cents,
            quantity,
            future_date(),
            Supplier::GlobalMeds,
        )
    }

    #[test]
    fn test_add_rejects_past_expiry() {
        let pharmacy = Pharmacy::open_in_memory().unwrap();
        let mut item = make_item("Amoxil", 500, 10);
        item.expiry_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        let err = pharmacy
            .add_inventory_item(item, DuplicatePolicy::InsertNew)
            .unwrap_err();
        assert!(matches!(err, PharmacyError::Validation(_)));
    }

    #[test]
    fn test_add_rejects_zero_quantity() {
        let pharmacy = Pharmacy::open_in_memory().unwrap();
        let item = make_item("Amoxil", 500, 0);
        let err = pharmacy
            .add_inventory_item(item, DuplicatePolicy::InsertNew)
            .unwrap_err();
        assert!(matches!(err, PharmacyError::Validation(_)));
    }

    #[test]
    fn test_stock_conflict_maps_to_insufficient_stock() {
        let err: PharmacyError = DbError::StockConflict {
            medicine_name: "Panadol".into(),
            requested: 6,
            available: 5,
        }
        .into();
        match err {
            PharmacyError::Stock(StockError::InsufficientStock {
                medicine_name,
                available,
                ..
            }) => {
                assert_eq!(medicine_name, "Panadol");
                assert_eq!(available, 5);
            }
            other => panic!("Expected InsufficientStock, got {:?}", other),
        }
    }

    #[test]
    fn test_stats() {
        let pharmacy = Pharmacy::open_in_memory().unwrap();
        pharmacy
            .add_inventory_item(make_item("Amoxil", 500, 10), DuplicatePolicy::InsertNew)
            .unwrap();
        pharmacy
            .add_inventory_item(make_item("Panadol", 1000, 40), DuplicatePolicy::InsertNew)
            .unwrap();

        let stats = pharmacy.stats().unwrap();
        assert_eq!(stats.inventory_count, 2);
        assert_eq!(stats.low_stock_count, 1);
        assert_eq!(stats.inventory_value_cents, 500 * 10 + 1000 * 40);
        assert_eq!(stats.bill_count, 0);
        assert_eq!(stats.revenue_cents, 0);
    }
}
