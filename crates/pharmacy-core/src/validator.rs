//! Stock validation for bill submission.
//!
//! Runs against a catalog snapshot read immediately before commit; the
//! commit itself re-checks stock inside the database transaction, so this
//! pass exists to give the user a precise, per-medicine rejection before
//! anything is written.

use log::debug;
use thiserror::Error;

use crate::models::{BillLineItem, InventoryItem};

/// Business-rule failures from stock validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StockError {
    #[error("Medicine {medicine_name} not found in inventory")]
    NotFound { medicine_name: String },

    #[error("Insufficient stock for {medicine_name}. Available: {available}")]
    InsufficientStock {
        medicine_name: String,
        requested: i64,
        available: i64,
    },
}

/// Find the catalog entry a bill line refers to.
///
/// Rows composed from autocomplete carry the inventory id and match on it;
/// hand-typed rows fall back to an exact, case-sensitive name match.
pub fn resolve_line<'a>(
    line: &BillLineItem,
    catalog: &'a [InventoryItem],
) -> Option<&'a InventoryItem> {
    if let Some(id) = &line.item_id {
        if let Some(entry) = catalog.iter().find(|item| &item.id == id) {
            return Some(entry);
        }
    }
    catalog
        .iter()
        .find(|item| item.medicine_name == line.medicine_name)
}

/// Validate every line against the catalog snapshot, failing fast on the
/// first offending line.
pub fn validate_stock(
    lines: &[BillLineItem],
    catalog: &[InventoryItem],
) -> Result<(), StockError> {
    for line in lines {
        let entry = resolve_line(line, catalog).ok_or_else(|| {
            debug!("stock validation: {} not in catalog", line.medicine_name);
            StockError::NotFound {
                medicine_name: line.medicine_name.clone(),
            }
        })?;

        if line.quantity > entry.quantity {
            debug!(
                "stock validation: {} requested {} > available {}",
                line.medicine_name, line.quantity, entry.quantity
            );
            return Err(StockError::InsufficientStock {
                medicine_name: line.medicine_name.clone(),
                requested: line.quantity,
                available: entry.quantity,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Supplier};
    use chrono::NaiveDate;

    fn catalog_item(name: &str, price_cents: i64, quantity: i64) -> InventoryItem {
        InventoryItem::new(
            name.into(),
            Category::Painkillers,
            price_cents,
            quantity,
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            Supplier::PharmaInc,
        )
    }

    fn line(name: &str, quantity: i64) -> BillLineItem {
        BillLineItem {
            item_id: None,
            medicine_name: name.into(),
            unit_price_cents: 1000,
            quantity,
        }
    }

    #[test]
    fn test_empty_catalog_is_not_found() {
        let err = validate_stock(&[line("Panadol", 1)], &[]).unwrap_err();
        assert_eq!(
            err,
            StockError::NotFound {
                medicine_name: "Panadol".into()
            }
        );
        assert_eq!(err.to_string(), "Medicine Panadol not found in inventory");
    }

    #[test]
    fn test_insufficient_stock_names_available() {
        let catalog = vec![catalog_item("Panadol", 1000, 5)];
        let err = validate_stock(&[line("Panadol", 6)], &catalog).unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                medicine_name: "Panadol".into(),
                requested: 6,
                available: 5,
            }
        );
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Panadol. Available: 5"
        );
    }

    #[test]
    fn test_exact_quantity_passes() {
        let catalog = vec![catalog_item("Panadol", 1000, 5)];
        assert!(validate_stock(&[line("Panadol", 5)], &catalog).is_ok());
    }

    #[test]
    fn test_name_match_is_exact() {
        let catalog = vec![catalog_item("Panadol", 1000, 5)];
        let err = validate_stock(&[line("panadol", 1)], &catalog).unwrap_err();
        assert!(matches!(err, StockError::NotFound { .. }));
    }

    #[test]
    fn test_fail_fast_reports_first_offender() {
        let catalog = vec![
            catalog_item("Panadol", 1000, 5),
            catalog_item("Amoxil", 500, 2),
        ];
        // Both lines are bad; the first one must be reported.
        let lines = vec![line("Amoxil", 3), line("Missing", 1)];
        let err = validate_stock(&lines, &catalog).unwrap_err();
        assert!(matches!(
            err,
            StockError::InsufficientStock { ref medicine_name, .. } if medicine_name == "Amoxil"
        ));
    }

    #[test]
    fn test_id_link_survives_rename() {
        let mut renamed = catalog_item("Panadol Extra", 1000, 5);
        renamed.medicine_name = "Panadol Extra".into();
        let id = renamed.id.clone();
        let catalog = vec![renamed];

        // Line still carries the old display name but links by id.
        let line = BillLineItem {
            item_id: Some(id),
            medicine_name: "Panadol".into(),
            unit_price_cents: 1000,
            quantity: 2,
        };
        assert!(validate_stock(&[line], &catalog).is_ok());
    }
}
