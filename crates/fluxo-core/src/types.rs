//! # Domain Types
//!
//! The canonical `AppState` document and every entity in it.
//!
//! ## Document Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           AppState                                      │
//! │                                                                         │
//! │  users:        Vec<User>           (mutable: profile edits, upserts)   │
//! │  products:     Vec<Product>        (mutable: upserts, stock deltas)    │
//! │  sales:        Vec<Sale>           (append-only)                       │
//! │  damages:      Vec<Damage>         (append-only)                       │
//! │  transactions: Vec<Transaction>    (append-only cash ledger)           │
//! │  movements:    Vec<StockMovement>  (append-only stock log)             │
//! │  current_user: Option<User>        (instance-local session pointer)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Append-only collections are plain `Vec`s that transitions only ever push
//! onto, so insertion order is the serialization order and survives any
//! round-trip.
//!
//! ## Snapshot Pattern
//! Sale items and damages carry frozen copies of the product name and the
//! prices in force at the moment of the event. They are history, not joins:
//! editing or deleting a product later must not rewrite them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

// =============================================================================
// Users
// =============================================================================

/// Role of an operator. Gates which transitions the guard admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Employee,
}

/// An operator account.
///
/// The credential secret is compared verbatim by the login collaborator;
/// hashing is a concern of whatever replaces that collaborator in a
/// hardened deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub login_name: String,
    pub credential_secret: String,
    pub role: UserRole,
}

impl User {
    /// True for the undeletable seed administrator.
    pub fn is_seed_admin(&self) -> bool {
        self.id == SEED_ADMIN_ID
    }
}

// =============================================================================
// Products
// =============================================================================

/// A product in the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    /// Business code shown on labels; auto-generated when left empty.
    pub code: String,

    pub name: String,
    pub category: String,

    /// Acquisition cost per unit. Admin-only in the presentation layer.
    pub cost_price: Money,

    /// Selling price per unit.
    pub sell_price: Money,

    /// Current stock level. Never negative after a committed transition.
    pub stock_qty: i64,

    /// Threshold below which the product counts as low-stock.
    pub min_stock_qty: i64,
}

// =============================================================================
// Stock Movements
// =============================================================================

/// Why a stock quantity changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    In,
    Out,
    Adjustment,
    Damage,
}

/// One entry in the append-only stock log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: String,
    pub product_id: String,
    pub kind: MovementKind,
    /// Magnitude of the change; the sign lives in `kind`.
    pub quantity: i64,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
}

// =============================================================================
// Sales
// =============================================================================

/// How a sale was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Physical cash; requires tendered >= total and may produce change.
    Cash,
    /// Bank transfer; settles exactly.
    Transfer,
    /// Card terminal; settles exactly.
    Card,
}

/// A line of a sale, frozen at sale time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Unit selling price at time of sale (frozen).
    pub unit_price: Money,
    /// Unit cost at time of sale (frozen; backs the profit figure).
    pub unit_cost: Money,
}

impl SaleItem {
    /// Line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    /// Line profit ((unit price − unit cost) × quantity).
    pub fn line_profit(&self) -> Money {
        (self.unit_price - self.unit_cost).times(self.quantity)
    }
}

/// A completed sale. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub items: Vec<SaleItem>,
    pub total: Money,
    pub profit: Money,
    pub timestamp: DateTime<Utc>,
    pub seller_id: String,
    /// Seller name at time of sale (frozen).
    pub seller_name: String,
    pub payment_method: PaymentMethod,
    pub amount_tendered: Money,
    pub change_due: Money,
}

// =============================================================================
// Damages
// =============================================================================

/// A recorded stock loss. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Damage {
    pub id: String,
    pub product_id: String,
    /// Product name at time of loss (frozen).
    pub product_name: String,
    pub quantity: i64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Transactions
// =============================================================================

/// Direction of a cash ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// What produced a cash ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionCategory {
    Sale,
    Damage,
    Purchase,
    Other,
}

/// One entry in the append-only cash ledger.
///
/// The ledger is the sole source of truth for cash-flow aggregates: every
/// sale appends exactly one Income/Sale entry and every damage exactly one
/// Expense/Damage entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: Money,
    pub category: TransactionCategory,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// The Document
// =============================================================================

/// Id of the seed administrator, protected from deletion.
pub const SEED_ADMIN_ID: &str = "1";

/// The whole shared document, replaced as a unit on every commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub users: Vec<User>,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub damages: Vec<Damage>,
    pub transactions: Vec<Transaction>,
    pub movements: Vec<StockMovement>,
    pub current_user: Option<User>,
}

impl AppState {
    /// The initial document written on first store access: two seed
    /// operators, empty collections, no session.
    pub fn seed() -> Self {
        AppState {
            users: vec![
                User {
                    id: SEED_ADMIN_ID.to_string(),
                    name: "Administrador".to_string(),
                    login_name: "admin".to_string(),
                    credential_secret: "123".to_string(),
                    role: UserRole::Admin,
                },
                User {
                    id: "2".to_string(),
                    name: "Vendedor".to_string(),
                    login_name: "venda".to_string(),
                    credential_secret: "123".to_string(),
                    role: UserRole::Employee,
                },
            ],
            products: Vec::new(),
            sales: Vec::new(),
            damages: Vec::new(),
            transactions: Vec::new(),
            movements: Vec::new(),
            current_user: None,
        }
    }

    /// Field-level merge rule for refreshes: every field of the freshly
    /// read remote document replaces the local one EXCEPT the session
    /// pointer, which is instance-local and survives untouched.
    pub fn adopt_remote(&self, remote: AppState) -> AppState {
        AppState {
            current_user: self.current_user.clone(),
            ..remote
        }
    }

    /// Looks up a product by id.
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks up a user by id.
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Role of the active session, if any.
    pub fn session_role(&self) -> Option<UserRole> {
        self.current_user.as_ref().map(|u| u.role)
    }
}

// =============================================================================
// Id Generation
// =============================================================================
// Prefixed UUIDs: globally unique without coordination, and the prefix makes
// ledger entries legible in logs and exports.

pub fn new_user_id() -> String {
    format!("USR-{}", Uuid::new_v4())
}

pub fn new_product_id() -> String {
    format!("PRD-{}", Uuid::new_v4())
}

pub fn new_sale_id() -> String {
    format!("SALE-{}", Uuid::new_v4())
}

pub fn new_damage_id() -> String {
    format!("DMG-{}", Uuid::new_v4())
}

pub fn new_transaction_id() -> String {
    format!("TRX-{}", Uuid::new_v4())
}

pub fn new_movement_id() -> String {
    format!("MOV-{}", Uuid::new_v4())
}

/// Generated product code for inserts that leave the code blank.
pub fn new_product_code() -> String {
    let tail: String = Uuid::new_v4().simple().to_string()[..6].to_string();
    format!("P-{}", tail.to_uppercase())
}

// =============================================================================
// Unit Tests
// =============================================================================
