//! Inventory database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Category, InventoryItem, Supplier};

impl Database {
    /// Insert a new inventory item.
    pub fn insert_inventory_item(&self, item: &InventoryItem) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO inventory (
                id, medicine_name, category, price_cents, quantity,
                expiry_date, supplier, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                item.id,
                item.medicine_name,
                item.category.as_str(),
                item.price_cents,
                item.quantity,
                item.expiry_date.to_string(),
                item.supplier.as_str(),
                item.created_at,
                item.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Replace an existing inventory item (full-record update).
    pub fn update_inventory_item(&self, id: &str, item: &InventoryItem) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE inventory SET
                medicine_name = ?2,
                category = ?3,
                price_cents = ?4,
                quantity = ?5,
                expiry_date = ?6,
                supplier = ?7,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                id,
                item.medicine_name,
                item.category.as_str(),
                item.price_cents,
                item.quantity,
                item.expiry_date.to_string(),
                item.supplier.as_str(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get an inventory item by id.
    pub fn get_inventory_item(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        self.conn
            .query_row(
                r#"
                SELECT id, medicine_name, category, price_cents, quantity,
                       expiry_date, supplier, created_at, updated_at
                FROM inventory
                WHERE id = ?
                "#,
                [id],
                map_inventory_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List the full inventory, ordered by name.
    pub fn list_inventory(&self) -> DbResult<Vec<InventoryItem>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, medicine_name, category, price_cents, quantity,
                   expiry_date, supplier, created_at, updated_at
            FROM inventory
            ORDER BY medicine_name
            "#,
        )?;

        let rows = stmt.query_map([], map_inventory_row)?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row?.try_into()?);
        }
        Ok(items)
    }

    /// Case-insensitive substring search on medicine name. Returns all
    /// matches, no pagination.
    pub fn search_inventory(&self, query: &str) -> DbResult<Vec<InventoryItem>> {
        let pattern = format!("%{}%", escape_like(query));
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, medicine_name, category, price_cents, quantity,
                   expiry_date, supplier, created_at, updated_at
            FROM inventory
            WHERE medicine_name LIKE ?1 ESCAPE '\'
            ORDER BY medicine_name
            "#,
        )?;

        let rows = stmt.query_map([pattern], map_inventory_row)?;
        let mut items = Vec::new();
        for row in rows {
            items.push(row?.try_into()?);
        }
        Ok(items)
    }

    /// Duplicate probe: exact match on name (case-sensitive), price, and
    /// expiry date. Read-only.
    pub fn find_duplicate(
        &self,
        medicine_name: &str,
        price_cents: i64,
        expiry_date: NaiveDate,
    ) -> DbResult<Option<InventoryItem>> {
        self.conn
            .query_row(
                r#"
                SELECT id, medicine_name, category, price_cents, quantity,
                       expiry_date, supplier, created_at, updated_at
                FROM inventory
                WHERE medicine_name = ?1 AND price_cents = ?2 AND expiry_date = ?3
                "#,
                params![medicine_name, price_cents, expiry_date.to_string()],
                map_inventory_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Add to an existing item's quantity (the duplicate-merge path).
    pub fn add_inventory_quantity(&self, id: &str, delta: i64) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE inventory SET quantity = quantity + ?1, updated_at = datetime('now') WHERE id = ?2",
            params![delta, id],
        )?;
        Ok(rows_affected > 0)
    }

    /// Delete an inventory item.
    pub fn delete_inventory_item(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM inventory WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
pub(super) struct InventoryRow {
    id: String,
    medicine_name: String,
    category: String,
    price_cents: i64,
    quantity: i64,
    expiry_date: String,
    supplier: String,
    created_at: String,
    updated_at: String,
}

pub(super) fn map_inventory_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<InventoryRow> {
    Ok(InventoryRow {
        id: row.get(0)?,
        medicine_name: row.get(1)?,
        category: row.get(2)?,
        price_cents: row.get(3)?,
        quantity: row.get(4)?,
        expiry_date: row.get(5)?,
        supplier: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl TryFrom<InventoryRow> for InventoryItem {
    type Error = DbError;

    fn try_from(row: InventoryRow) -> Result<Self, Self::Error> {
        let category = Category::parse(&row.category)
            .ok_or_else(|| DbError::Constraint(format!("Unknown category: {}", row.category)))?;
        let supplier = Supplier::parse(&row.supplier)
            .ok_or_else(|| DbError::Constraint(format!("Unknown supplier: {}", row.supplier)))?;
        let expiry_date = row
            .expiry_date
            .parse::<NaiveDate>()
            .map_err(|_| DbError::Constraint(format!("Invalid expiry date: {}", row.expiry_date)))?;

        Ok(InventoryItem {
            id: row.id,
            medicine_name: row.medicine_name,
            category,
            price_cents: row.price_cents,
            quantity: row.quantity,
            expiry_date,
            supplier,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Escape LIKE wildcards in user input.
fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
