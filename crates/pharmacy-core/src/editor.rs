//! In-memory bill composition.
//!
//! `BillDraft` is the explicit state behind the billing form: raw string
//! fields exactly as the user typed them, plus a per-row autocomplete
//! state machine. Transitions are plain methods; the derived total is
//! recomputed on demand and treats invalid or missing numbers as zero, so
//! a half-filled form never errors.

use chrono::NaiveDate;

use crate::models::{BillLineItem, InventoryItem, PaymentMethod};
use crate::money;

/// Autocomplete state for one bill row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// No name typed yet
    Idle,
    /// Name typed, suggestions open
    Searching,
    /// A catalog entry was picked; name and price snapshot are fixed
    Selected,
}

/// Editable field within a bill row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    MedicineName,
    Quantity,
    Price,
}

/// One editable bill row, raw user input.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDraft {
    /// Medicine name as typed or selected
    pub medicine_name: String,
    /// Quantity field, unparsed
    pub quantity: String,
    /// Price field, unparsed
    pub price: String,
    /// Inventory id, set when the row came from autocomplete
    pub item_id: Option<String>,
    /// Autocomplete state
    pub search: SearchState,
}

impl LineDraft {
    fn empty() -> Self {
        Self {
            medicine_name: String::new(),
            quantity: String::new(),
            price: String::new(),
            item_id: None,
            search: SearchState::Idle,
        }
    }

    /// Row contribution to the running total, invalid input counted as 0.
    /// Saturates rather than overflowing on absurdly large input.
    pub fn subtotal_cents(&self) -> i64 {
        money::parse_quantity_or_zero(&self.quantity)
            .saturating_mul(money::parse_price_or_zero(&self.price))
    }
}

/// The full state of a bill being composed.
#[derive(Debug, Clone, PartialEq)]
pub struct BillDraft {
    /// Customer name field
    pub customer_name: String,
    /// Payment method, unset until chosen
    pub payment_method: Option<PaymentMethod>,
    /// Bill date (the form defaults it to today)
    pub bill_date: NaiveDate,
    /// Editable rows, at least one
    pub lines: Vec<LineDraft>,
}

impl BillDraft {
    /// Start a fresh draft with one empty row.
    pub fn new(bill_date: NaiveDate) -> Self {
        Self {
            customer_name: String::new(),
            payment_method: None,
            bill_date,
            lines: vec![LineDraft::empty()],
        }
    }

    /// Append an empty row.
    pub fn add_line(&mut self) {
        self.lines.push(LineDraft::empty());
    }

    /// Remove a row. Out-of-range indices are ignored.
    pub fn remove_line(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    /// Mutate one field of one row. Out-of-range indices are ignored.
    ///
    /// Editing the name of a selected row breaks the catalog link and
    /// reopens the search; editing the price after selection is allowed
    /// and does not (the snapshot is a starting value, not a lock).
    pub fn edit_line(&mut self, index: usize, field: LineField, value: &str) {
        let Some(line) = self.lines.get_mut(index) else {
            return;
        };
        match field {
            LineField::MedicineName => {
                line.medicine_name = value.to_string();
                line.item_id = None;
                line.search = if value.is_empty() {
                    SearchState::Idle
                } else {
                    SearchState::Searching
                };
            }
            LineField::Quantity => line.quantity = value.to_string(),
            LineField::Price => line.price = value.to_string(),
        }
    }

    /// Fill a row from an autocomplete pick: fixes the name, snapshots the
    /// catalog price, records the stable item id, and closes the search.
    pub fn select_suggestion(&mut self, index: usize, item: &InventoryItem) {
        let Some(line) = self.lines.get_mut(index) else {
            return;
        };
        line.medicine_name = item.medicine_name.clone();
        line.price = money::format_cents(item.price_cents);
        line.item_id = Some(item.id.clone());
        line.search = SearchState::Selected;
    }

    /// Running total over all rows, invalid input counted as 0. Saturates
    /// rather than overflowing.
    pub fn total_cents(&self) -> i64 {
        self.lines
            .iter()
            .map(LineDraft::subtotal_cents)
            .fold(0i64, i64::saturating_add)
    }

    /// Check the header fields that must be set before submission.
    pub fn validate_header(&self) -> Result<PaymentMethod, String> {
        if self.customer_name.trim().is_empty() {
            return Err("Customer name is required".into());
        }
        self.payment_method
            .ok_or_else(|| "Payment method is required".into())
    }

    /// Convert the draft rows into bill line items, rejecting any row that
    /// is not fully and validly filled in.
    pub fn line_items(&self) -> Result<Vec<BillLineItem>, String> {
        if self.lines.is_empty() {
            return Err("At least one line item is required".into());
        }
        let mut items = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let name = line.medicine_name.trim();
            if name.is_empty() {
                return Err("Medicine name is required".into());
            }
            let quantity = line
                .quantity
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|q| *q >= 1)
                .ok_or_else(|| format!("Invalid quantity for {}", name))?;
            let unit_price_cents = money::parse_price(&line.price)
                .ok_or_else(|| format!("Invalid price for {}", name))?;

            items.push(BillLineItem {
                item_id: line.item_id.clone(),
                medicine_name: name.to_string(),
                unit_price_cents,
                quantity,
            });
        }
        Ok(items)
    }
}
