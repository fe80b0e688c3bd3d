//! SQLite schema definition.

/// Complete database schema for the pharmacy ledger.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Inventory
-- ============================================================================

CREATE TABLE IF NOT EXISTS inventory (
    id TEXT PRIMARY KEY,
    medicine_name TEXT NOT NULL CHECK (length(medicine_name) > 0),
    category TEXT NOT NULL,
    price_cents INTEGER NOT NULL CHECK (price_cents >= 0),
    quantity INTEGER NOT NULL CHECK (quantity >= 0),
    expiry_date TEXT NOT NULL,                    -- ISO 8601 date
    supplier TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_inventory_name ON inventory(medicine_name);

-- Supports the duplicate probe (exact name + price + expiry)
CREATE INDEX IF NOT EXISTS idx_inventory_dup
    ON inventory(medicine_name, price_cents, expiry_date);

-- ============================================================================
-- Bills
-- ============================================================================

CREATE TABLE IF NOT EXISTS bills (
    id TEXT PRIMARY KEY,
    customer_name TEXT NOT NULL CHECK (length(customer_name) > 0),
    payment_method TEXT NOT NULL CHECK (payment_method IN ('Cash', 'Debit', 'Credit')),
    bill_date TEXT NOT NULL,                      -- ISO 8601 date
    line_items TEXT NOT NULL DEFAULT '[]',        -- JSON array of BillLineItem
    total_cents INTEGER NOT NULL CHECK (total_cents >= 0),
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_bills_date ON bills(bill_date);
"#;
