//! Billing models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Debit,
    Credit,
}

impl PaymentMethod {
    /// Canonical string form (stored in the database).
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Debit => "Debit",
            PaymentMethod::Credit => "Credit",
        }
    }

    /// Parse from the canonical string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Cash" => Some(PaymentMethod::Cash),
            "Debit" => Some(PaymentMethod::Debit),
            "Credit" => Some(PaymentMethod::Credit),
            _ => None,
        }
    }
}

/// One medicine entry within a bill.
///
/// The price is a snapshot taken when the row was composed; later catalog
/// price changes never affect an existing bill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillLineItem {
    /// Inventory item id, when the row was filled from the catalog.
    /// Hand-typed rows carry `None` and link by exact name instead.
    pub item_id: Option<String>,
    /// Medicine name as billed
    pub medicine_name: String,
    /// Unit price in cents at time of sale
    pub unit_price_cents: i64,
    /// Units sold, >= 1
    pub quantity: i64,
}

impl BillLineItem {
    /// Line subtotal in cents. Saturates rather than overflowing.
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents.saturating_mul(self.quantity)
    }
}

/// A finalized customer bill.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Customer name, non-empty
    pub customer_name: String,
    /// Payment method
    pub payment_method: PaymentMethod,
    /// Bill date
    pub bill_date: NaiveDate,
    /// Ordered line items
    pub line_items: Vec<BillLineItem>,
    /// Grand total in cents; always recomputed from the line items
    pub total_cents: i64,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl Bill {
    /// Create a new bill with a fresh id; the total is derived from the
    /// line items, never supplied.
    pub fn new(
        customer_name: String,
        payment_method: PaymentMethod,
        bill_date: NaiveDate,
        line_items: Vec<BillLineItem>,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        let total_cents = Self::compute_total(&line_items);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            customer_name,
            payment_method,
            bill_date,
            line_items,
            total_cents,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Sum of line subtotals in cents. Saturates rather than overflowing.
    pub fn compute_total(line_items: &[BillLineItem]) -> i64 {
        line_items
            .iter()
            .map(BillLineItem::subtotal_cents)
            .fold(0i64, i64::saturating_add)
    }

    /// Re-derive the stored total from the current line items.
    pub fn recompute_total(&mut self) {
        self.total_cents = Self::compute_total(&self.line_items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, price_cents: i64, quantity: i64) -> BillLineItem {
        BillLineItem {
            item_id: None,
            medicine_name: name.into(),
            unit_price_cents: price_cents,
            quantity,
        }
    }

    #[test]
    fn test_subtotal() {
        assert_eq!(line("Panadol", 1000, 2).subtotal_cents(), 2000);
        assert_eq!(line("Panadol", 1050, 3).subtotal_cents(), 3150);
    }

    #[test]
    fn test_subtotal_saturates_at_bounds() {
        assert_eq!(line("X", i64::MAX, 2).subtotal_cents(), i64::MAX);

        let items = vec![line("X", i64::MAX, 1), line("Y", 100, 1)];
        assert_eq!(Bill::compute_total(&items), i64::MAX);
    }

    #[test]
    fn test_total_is_sum_of_subtotals() {
        // 2 x 10.00 + 3 x 5.00 = 35.00
        let items = vec![line("A", 1000, 2), line("B", 500, 3)];
        assert_eq!(Bill::compute_total(&items), 3500);

        let bill = Bill::new(
            "Nimal Perera".into(),
            PaymentMethod::Cash,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            items,
        );
        assert_eq!(bill.total_cents, 3500);
    }

    #[test]
    fn test_recompute_total_overrides_stale_value() {
        let mut bill = Bill::new(
            "Nimal Perera".into(),
            PaymentMethod::Credit,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            vec![line("A", 1000, 1)],
        );
        bill.total_cents = 999_999;
        bill.line_items.push(line("B", 250, 4));
        bill.recompute_total();
        assert_eq!(bill.total_cents, 2000);
    }

    #[test]
    fn test_payment_method_round_trip() {
        for pm in [PaymentMethod::Cash, PaymentMethod::Debit, PaymentMethod::Credit] {
            assert_eq!(PaymentMethod::parse(pm.as_str()), Some(pm));
        }
        assert_eq!(PaymentMethod::parse("Cheque"), None);
    }
}
