//! Inventory catalog models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Items with quantity below this count are flagged low-stock.
pub const LOW_STOCK_THRESHOLD: i64 = 25;

/// Medicine category (fixed set from the inventory intake form).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    Antibiotics,
    Painkillers,
    Vitamins,
    Cardiovascular,
    Respiratory,
    Gastrointestinal,
}

impl Category {
    /// Canonical string form (stored in the database).
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Antibiotics => "Antibiotics",
            Category::Painkillers => "Painkillers",
            Category::Vitamins => "Vitamins",
            Category::Cardiovascular => "Cardiovascular",
            Category::Respiratory => "Respiratory",
            Category::Gastrointestinal => "Gastrointestinal",
        }
    }

    /// Parse from the canonical string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Antibiotics" => Some(Category::Antibiotics),
            "Painkillers" => Some(Category::Painkillers),
            "Vitamins" => Some(Category::Vitamins),
            "Cardiovascular" => Some(Category::Cardiovascular),
            "Respiratory" => Some(Category::Respiratory),
            "Gastrointestinal" => Some(Category::Gastrointestinal),
            _ => None,
        }
    }
}

/// Medicine supplier (fixed set from the inventory intake form).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Supplier {
    #[serde(rename = "Pharma Inc.")]
    PharmaInc,
    MediSupply,
    HealthLife,
    #[serde(rename = "Global Meds")]
    GlobalMeds,
    #[serde(rename = "Local Distributors")]
    LocalDistributors,
}

impl Supplier {
    /// Canonical string form (stored in the database).
    pub fn as_str(&self) -> &'static str {
        match self {
            Supplier::PharmaInc => "Pharma Inc.",
            Supplier::MediSupply => "MediSupply",
            Supplier::HealthLife => "HealthLife",
            Supplier::GlobalMeds => "Global Meds",
            Supplier::LocalDistributors => "Local Distributors",
        }
    }

    /// Parse from the canonical string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pharma Inc." => Some(Supplier::PharmaInc),
            "MediSupply" => Some(Supplier::MediSupply),
            "HealthLife" => Some(Supplier::HealthLife),
            "Global Meds" => Some(Supplier::GlobalMeds),
            "Local Distributors" => Some(Supplier::LocalDistributors),
            _ => None,
        }
    }
}

/// A single medicine entry in the pharmacy inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Medicine name, non-empty
    pub medicine_name: String,
    /// Category
    pub category: Category,
    /// Unit price in cents, >= 0
    pub price_cents: i64,
    /// Units in stock, >= 0
    pub quantity: i64,
    /// Expiry date; must not precede the creation date
    pub expiry_date: NaiveDate,
    /// Supplier
    pub supplier: Supplier,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl InventoryItem {
    /// Create a new inventory item with a fresh id and timestamps.
    pub fn new(
        medicine_name: String,
        category: Category,
        price_cents: i64,
        quantity: i64,
        expiry_date: NaiveDate,
        supplier: Supplier,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            medicine_name,
            category,
            price_cents,
            quantity,
            expiry_date,
            supplier,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Low-stock flag, derived and never stored.
    pub fn is_low_stock(&self) -> bool {
        self.quantity < LOW_STOCK_THRESHOLD
    }

    /// Check field-level invariants shared by insert and update.
    pub fn validate_fields(&self) -> Result<(), String> {
        if self.medicine_name.trim().is_empty() {
            return Err("Medicine name must not be empty".into());
        }
        if self.price_cents < 0 {
            return Err("Price must not be negative".into());
        }
        if self.quantity < 0 {
            return Err("Quantity must not be negative".into());
        }
        Ok(())
    }
}
