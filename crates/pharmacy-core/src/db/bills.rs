//! Billing database operations.

use chrono::NaiveDate;
use log::{debug, warn};
use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Bill, BillLineItem, PaymentMethod};

/// One conditional stock decrement within a bill-finalize transaction.
#[derive(Debug, Clone)]
pub struct StockDecrement {
    /// Inventory row to decrement
    pub item_id: String,
    /// Name carried for error reporting
    pub medicine_name: String,
    /// Units to deduct
    pub quantity: i64,
}

impl Database {
    /// Insert a bill record.
    pub fn insert_bill(&self, bill: &Bill) -> DbResult<()> {
        let line_items_json = serde_json::to_string(&bill.line_items)?;
        self.conn.execute(
            r#"
            INSERT INTO bills (
                id, customer_name, payment_method, bill_date,
                line_items, total_cents, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                bill.id,
                bill.customer_name,
                bill.payment_method.as_str(),
                bill.bill_date.to_string(),
                line_items_json,
                bill.total_cents,
                bill.created_at,
                bill.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Commit a validated bill and deduct its stock in one transaction.
    ///
    /// Each decrement is conditional (`quantity >= requested` re-checked at
    /// write time), so a submission racing another one cannot oversell; the
    /// losing transaction rolls back in full and the bill is not inserted.
    pub fn finalize_bill(&mut self, bill: &Bill, decrements: &[StockDecrement]) -> DbResult<()> {
        let line_items_json = serde_json::to_string(&bill.line_items)?;
        let tx = self.conn.transaction()?;

        for dec in decrements {
            let affected = tx.execute(
                r#"
                UPDATE inventory
                SET quantity = quantity - ?1, updated_at = datetime('now')
                WHERE id = ?2 AND quantity >= ?1
                "#,
                params![dec.quantity, dec.item_id],
            )?;
            if affected == 0 {
                let available: i64 = tx
                    .query_row(
                        "SELECT quantity FROM inventory WHERE id = ?",
                        [&dec.item_id],
                        |row| row.get(0),
                    )
                    .optional()?
                    .unwrap_or(0);
                warn!(
                    "stock conflict finalizing bill {}: {} requested {}, available {}",
                    bill.id, dec.medicine_name, dec.quantity, available
                );
                // Dropping the transaction rolls back prior decrements.
                return Err(DbError::StockConflict {
                    medicine_name: dec.medicine_name.clone(),
                    requested: dec.quantity,
                    available,
                });
            }
        }

        tx.execute(
            r#"
            INSERT INTO bills (
                id, customer_name, payment_method, bill_date,
                line_items, total_cents, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                bill.id,
                bill.customer_name,
                bill.payment_method.as_str(),
                bill.bill_date.to_string(),
                line_items_json,
                bill.total_cents,
                bill.created_at,
                bill.updated_at,
            ],
        )?;

        tx.commit()?;
        debug!("finalized bill {} ({} lines)", bill.id, bill.line_items.len());
        Ok(())
    }

    /// Replace an existing bill record (full-record update, no patch).
    pub fn update_bill(&self, id: &str, bill: &Bill) -> DbResult<bool> {
        let line_items_json = serde_json::to_string(&bill.line_items)?;
        let rows_affected = self.conn.execute(
            r#"
            UPDATE bills SET
                customer_name = ?2,
                payment_method = ?3,
                bill_date = ?4,
                line_items = ?5,
                total_cents = ?6,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                id,
                bill.customer_name,
                bill.payment_method.as_str(),
                bill.bill_date.to_string(),
                line_items_json,
                bill.total_cents,
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a bill by id.
    pub fn get_bill(&self, id: &str) -> DbResult<Option<Bill>> {
        self.conn
            .query_row(
                r#"
                SELECT id, customer_name, payment_method, bill_date,
                       line_items, total_cents, created_at, updated_at
                FROM bills
                WHERE id = ?
                "#,
                [id],
                map_bill_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all bills, newest first.
    pub fn list_bills(&self) -> DbResult<Vec<Bill>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, customer_name, payment_method, bill_date,
                   line_items, total_cents, created_at, updated_at
            FROM bills
            ORDER BY created_at DESC, id
            "#,
        )?;

        let rows = stmt.query_map([], map_bill_row)?;
        let mut bills = Vec::new();
        for row in rows {
            bills.push(row?.try_into()?);
        }
        Ok(bills)
    }

    /// Delete a bill.
    pub fn delete_bill(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute("DELETE FROM bills WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct BillRow {
    id: String,
    customer_name: String,
    payment_method: String,
    bill_date: String,
    line_items: String,
    total_cents: i64,
    created_at: String,
    updated_at: String,
}

fn map_bill_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BillRow> {
    Ok(BillRow {
        id: row.get(0)?,
        customer_name: row.get(1)?,
        payment_method: row.get(2)?,
        bill_date: row.get(3)?,
        line_items: row.get(4)?,
        total_cents: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl TryFrom<BillRow> for Bill {
    type Error = DbError;

    fn try_from(row: BillRow) -> Result<Self, Self::Error> {
        let payment_method = PaymentMethod::parse(&row.payment_method).ok_or_else(|| {
            DbError::Constraint(format!("Unknown payment method: {}", row.payment_method))
        })?;
        let bill_date = row
            .bill_date
            .parse::<NaiveDate>()
            .map_err(|_| DbError::Constraint(format!("Invalid bill date: {}", row.bill_date)))?;
        let line_items: Vec<BillLineItem> = serde_json::from_str(&row.line_items)?;

        Ok(Bill {
            id: row.id,
            customer_name: row.customer_name,
            payment_method,
            bill_date,
            line_items,
            total_cents: row.total_cents,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
