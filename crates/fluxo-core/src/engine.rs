//! # Transition Engine
//!
//! Pure snapshot-to-snapshot business transitions.
//!
//! ## The Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Transition Engine Contract                           │
//! │                                                                         │
//! │   (snapshot, intent) ──────────► CoreResult<snapshot'>                 │
//! │                                                                         │
//! │   • The input snapshot is NEVER mutated                                │
//! │   • Ok(next): next reflects the WHOLE transition                       │
//! │   • Err(e):   nothing happened; the caller still holds the input       │
//! │                                                                         │
//! │   Composite transitions (sale, damage) bundle several entity           │
//! │   mutations into ONE returned snapshot. The store only ever sees       │
//! │   that one value, so a torn write of "stock decremented but no         │
//! │   transaction recorded" cannot be observed.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Composes What
//! ```text
//! record_sale   = n × stock OUT   + 1 Income/Sale transaction  + 1 Sale
//! record_damage = 1 × stock DAMAGE + 1 Expense/Damage transaction + 1 Damage
//! ```
//!
//! The engine provides atomicity of the VALUE it returns, not cross-instance
//! atomicity: the document store is last-writer-wins (see fluxo-store).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::guard::OperationKind;
use crate::money::Money;
use crate::types::{
    new_damage_id, new_movement_id, new_product_code, new_product_id, new_sale_id,
    new_transaction_id, new_user_id, AppState, Damage, MovementKind, PaymentMethod, Product, Sale,
    SaleItem, StockMovement, Transaction, TransactionCategory, TransactionKind, User,
};
use crate::validation::{
    validate_amount, validate_product, validate_quantity, validate_secret, validate_user,
};

// =============================================================================
// Intents
// =============================================================================

/// One line of a sale request: what to sell and how many.
///
/// Name, price and cost snapshots are taken from the product at apply time,
/// never supplied by the caller (a stale terminal must not freeze stale
/// prices into history).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i64,
}

/// A caller's request to perform one business operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    AdjustStock {
        product_id: String,
        delta: i64,
        movement: MovementKind,
        reason: String,
    },
    RecordTransaction {
        amount: Money,
        #[serde(rename = "transaction_kind")]
        kind: TransactionKind,
        category: TransactionCategory,
        description: String,
    },
    RecordSale {
        lines: Vec<SaleLine>,
        payment_method: PaymentMethod,
        amount_tendered: Money,
    },
    RecordDamage {
        product_id: String,
        quantity: i64,
        reason: String,
    },
    UpsertProduct {
        product: Product,
    },
    DeleteProduct {
        product_id: String,
    },
    UpsertUser {
        user: User,
    },
    DeleteUser {
        user_id: String,
    },
    UpdateProfile {
        name: String,
        secret: String,
    },
}

impl Intent {
    /// The guard key for this intent. The sync controller checks it exactly
    /// once before dispatching here.
    pub fn operation_kind(&self) -> OperationKind {
        match self {
            Intent::AdjustStock { .. } => OperationKind::AdjustStock,
            Intent::RecordTransaction { .. } => OperationKind::RecordTransaction,
            Intent::RecordSale { .. } => OperationKind::RecordSale,
            Intent::RecordDamage { .. } => OperationKind::RecordDamage,
            Intent::UpsertProduct { .. } => OperationKind::UpsertProduct,
            Intent::DeleteProduct { .. } => OperationKind::DeleteProduct,
            Intent::UpsertUser { .. } => OperationKind::UpsertUser,
            Intent::DeleteUser { .. } => OperationKind::DeleteUser,
            Intent::UpdateProfile { .. } => OperationKind::EditOwnProfile,
        }
    }

    /// Dispatches to the matching transition, with `actor` as the seller /
    /// profile owner where the operation needs one.
    pub fn apply(&self, state: &AppState, actor: &User) -> CoreResult<AppState> {
        match self {
            Intent::AdjustStock {
                product_id,
                delta,
                movement,
                reason,
            } => adjust_stock(state, product_id, *delta, *movement, reason),
            Intent::RecordTransaction {
                amount,
                kind,
                category,
                description,
            } => record_transaction(state, *amount, *kind, *category, description),
            Intent::RecordSale {
                lines,
                payment_method,
                amount_tendered,
            } => record_sale(state, lines, &actor.id, *payment_method, *amount_tendered),
            Intent::RecordDamage {
                product_id,
                quantity,
                reason,
            } => record_damage(state, product_id, *quantity, reason),
            Intent::UpsertProduct { product } => upsert_product(state, product.clone()),
            Intent::DeleteProduct { product_id } => delete_product(state, product_id),
            Intent::UpsertUser { user } => upsert_user(state, user.clone()),
            Intent::DeleteUser { user_id } => delete_user(state, user_id),
            Intent::UpdateProfile { name, secret } => {
                update_profile(state, &actor.id, name, secret)
            }
        }
    }
}

// =============================================================================
// Internal Helpers
// =============================================================================
// These mutate the WORKING COPY a public transition has already cloned.
// They are the only place stock quantities and ledger rows change.

/// Applies one signed stock delta and logs the movement.
fn apply_stock_delta(
    next: &mut AppState,
    product_id: &str,
    delta: i64,
    kind: MovementKind,
    reason: &str,
    now: DateTime<Utc>,
) -> CoreResult<()> {
    let product = next
        .products
        .iter_mut()
        .find(|p| p.id == product_id)
        .ok_or_else(|| CoreError::not_found("Product", product_id))?;

    let new_qty = product.stock_qty + delta;
    if new_qty < 0 {
        return Err(CoreError::InvalidState(format!(
            "stock for '{}' would drop to {} (available {}, delta {})",
            product.name, new_qty, product.stock_qty, delta
        )));
    }
    product.stock_qty = new_qty;

    next.movements.push(StockMovement {
        id: new_movement_id(),
        product_id: product_id.to_string(),
        kind,
        quantity: delta.abs(),
        timestamp: now,
        reason: reason.to_string(),
    });
    Ok(())
}

/// Appends a cash ledger row. Composite transitions come through here so a
/// zero-cost loss still leaves its ledger trace; the public
/// `record_transaction` validates positivity first.
fn append_transaction(
    next: &mut AppState,
    amount: Money,
    kind: TransactionKind,
    category: TransactionCategory,
    description: &str,
    now: DateTime<Utc>,
) {
    next.transactions.push(Transaction {
        id: new_transaction_id(),
        kind,
        amount,
        category,
        description: description.to_string(),
        timestamp: now,
    });
}

/// Short id suffix for human-readable reasons/descriptions.
fn short_ref(id: &str) -> &str {
    let n = id.len();
    &id[n.saturating_sub(6)..]
}

// =============================================================================
// Stock & Ledger Transitions
// =============================================================================

/// Adjusts a product's stock by `delta` and appends the matching movement.
///
/// ## Failure Modes
/// - `InvalidArgument`: zero delta (a movement must move something)
/// - `NotFound`: unknown product
/// - `InvalidState`: the delta would drive stock below zero
pub fn adjust_stock(
    state: &AppState,
    product_id: &str,
    delta: i64,
    kind: MovementKind,
    reason: &str,
) -> CoreResult<AppState> {
    if delta == 0 {
        return Err(CoreError::invalid_argument("delta", "must be non-zero"));
    }
    let mut next = state.clone();
    apply_stock_delta(&mut next, product_id, delta, kind, reason, Utc::now())?;
    Ok(next)
}

/// Appends one cash ledger entry with a fresh id and timestamp.
///
/// Amount must be strictly positive; direction is expressed by `kind`.
pub fn record_transaction(
    state: &AppState,
    amount: Money,
    kind: TransactionKind,
    category: TransactionCategory,
    description: &str,
) -> CoreResult<AppState> {
    validate_amount(amount)?;
    let mut next = state.clone();
    append_transaction(&mut next, amount, kind, category, description, Utc::now());
    Ok(next)
}

// =============================================================================
// Composite Transitions
// =============================================================================

/// Records a sale as one atomic unit:
/// one stock OUT per line, one Income/Sale ledger entry for the total, and
/// one appended `Sale` with frozen name/price/cost snapshots.
///
/// ## Stock Checking
/// Lines are applied in order against the working copy, so a product that
/// appears twice is checked against the stock remaining AFTER the earlier
/// line. Any shortfall fails the whole sale.
///
/// ## Settlement
/// Cash requires `amount_tendered >= total` and produces change; transfer
/// and card settle exactly (tendered = total, change = 0).
pub fn record_sale(
    state: &AppState,
    lines: &[SaleLine],
    seller_id: &str,
    payment_method: PaymentMethod,
    amount_tendered: Money,
) -> CoreResult<AppState> {
    if lines.is_empty() {
        return Err(CoreError::invalid_argument("lines", "must not be empty"));
    }
    let seller = state
        .user(seller_id)
        .ok_or_else(|| CoreError::not_found("User", seller_id))?
        .clone();

    let now = Utc::now();
    let sale_id = new_sale_id();
    let mut next = state.clone();
    let mut items = Vec::with_capacity(lines.len());

    for line in lines {
        validate_quantity(line.quantity)?;
        // Snapshot BEFORE the delta so the frozen price/cost are the ones
        // this sale was rung up at.
        let product = next
            .product(&line.product_id)
            .ok_or_else(|| CoreError::not_found("Product", &line.product_id))?;
        items.push(SaleItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity: line.quantity,
            unit_price: product.sell_price,
            unit_cost: product.cost_price,
        });
        apply_stock_delta(
            &mut next,
            &line.product_id,
            -line.quantity,
            MovementKind::Out,
            &format!("Sale #{}", short_ref(&sale_id)),
            now,
        )?;
    }

    let total: Money = items.iter().map(SaleItem::line_total).sum();
    let profit: Money = items.iter().map(SaleItem::line_profit).sum();

    let (tendered, change_due) = match payment_method {
        PaymentMethod::Cash => {
            if amount_tendered < total {
                return Err(CoreError::InsufficientPayment {
                    tendered: amount_tendered,
                    total,
                });
            }
            (amount_tendered, amount_tendered.sub_or_zero(total))
        }
        // Non-cash settles exactly.
        PaymentMethod::Transfer | PaymentMethod::Card => (total, Money::zero()),
    };

    append_transaction(
        &mut next,
        total,
        TransactionKind::Income,
        TransactionCategory::Sale,
        &format!("Sale revenue #{}", short_ref(&sale_id)),
        now,
    );
    next.sales.push(Sale {
        id: sale_id,
        items,
        total,
        profit,
        timestamp: now,
        seller_id: seller.id.clone(),
        seller_name: seller.name.clone(),
        payment_method,
        amount_tendered: tendered,
        change_due,
    });
    Ok(next)
}

/// Records a stock loss as one atomic unit:
/// one stock DAMAGE movement, one appended `Damage`, and one Expense/Damage
/// ledger entry valued at `quantity × cost_price` at the moment of loss.
pub fn record_damage(
    state: &AppState,
    product_id: &str,
    quantity: i64,
    reason: &str,
) -> CoreResult<AppState> {
    validate_quantity(quantity)?;
    let product = state
        .product(product_id)
        .ok_or_else(|| CoreError::not_found("Product", product_id))?;
    if quantity > product.stock_qty {
        return Err(CoreError::InvalidState(format!(
            "damage quantity {} exceeds stock {} for '{}'",
            quantity, product.stock_qty, product.name
        )));
    }

    let now = Utc::now();
    let product_name = product.name.clone();
    let loss = product.cost_price.times(quantity);

    let mut next = state.clone();
    apply_stock_delta(
        &mut next,
        product_id,
        -quantity,
        MovementKind::Damage,
        &format!("Damage: {reason}"),
        now,
    )?;
    next.damages.push(Damage {
        id: new_damage_id(),
        product_id: product_id.to_string(),
        product_name: product_name.clone(),
        quantity,
        reason: reason.to_string(),
        timestamp: now,
    });
    append_transaction(
        &mut next,
        loss,
        TransactionKind::Expense,
        TransactionCategory::Damage,
        &format!("Loss: {product_name} ({quantity} un)"),
        now,
    );
    Ok(next)
}

// =============================================================================
// Catalogue & Team CRUD
// =============================================================================

/// Inserts (empty id) or replaces (existing id) a product.
///
/// A blank code on insert is auto-generated. Frozen snapshots in past sales
/// and damages are untouched by edits, by construction.
pub fn upsert_product(state: &AppState, mut product: Product) -> CoreResult<AppState> {
    validate_product(&product)?;
    let mut next = state.clone();

    if product.id.is_empty() {
        product.id = new_product_id();
        if product.code.trim().is_empty() {
            product.code = new_product_code();
        }
        next.products.push(product);
    } else {
        let slot = next
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| CoreError::not_found("Product", &product.id))?;
        *slot = product;
    }
    Ok(next)
}

/// Removes a product from the catalogue. History (sales, damages,
/// movements) keeps its frozen references.
pub fn delete_product(state: &AppState, product_id: &str) -> CoreResult<AppState> {
    if state.product(product_id).is_none() {
        return Err(CoreError::not_found("Product", product_id));
    }
    let mut next = state.clone();
    next.products.retain(|p| p.id != product_id);
    Ok(next)
}

/// Inserts (empty id) or replaces (existing id) an operator account.
///
/// Login names are unique across the team. When the edited account is the
/// active session, the session pointer is refreshed too.
pub fn upsert_user(state: &AppState, mut user: User) -> CoreResult<AppState> {
    validate_user(&user)?;
    let duplicate = state
        .users
        .iter()
        .any(|u| u.login_name == user.login_name && u.id != user.id);
    if duplicate {
        return Err(CoreError::invalid_argument(
            "login_name",
            format!("'{}' already exists", user.login_name),
        ));
    }

    let mut next = state.clone();
    if user.id.is_empty() {
        user.id = new_user_id();
        next.users.push(user);
    } else {
        let slot = next
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| CoreError::not_found("User", &user.id))?;
        *slot = user.clone();
        if next.current_user.as_ref().is_some_and(|c| c.id == user.id) {
            next.current_user = Some(user);
        }
    }
    Ok(next)
}

/// Removes an operator account. The seed administrator (id "1") is
/// permanent.
pub fn delete_user(state: &AppState, user_id: &str) -> CoreResult<AppState> {
    let user = state
        .user(user_id)
        .ok_or_else(|| CoreError::not_found("User", user_id))?;
    if user.is_seed_admin() {
        return Err(CoreError::InvalidState(
            "the seed administrator cannot be deleted".to_string(),
        ));
    }
    let mut next = state.clone();
    next.users.retain(|u| u.id != user_id);
    Ok(next)
}

// =============================================================================
// Session & Profile
// =============================================================================

/// Points the document's session slot at a stored user.
pub fn sign_in(state: &AppState, user_id: &str) -> CoreResult<AppState> {
    let user = state
        .user(user_id)
        .ok_or_else(|| CoreError::not_found("User", user_id))?
        .clone();
    let mut next = state.clone();
    next.current_user = Some(user);
    Ok(next)
}

/// Clears the document's session slot.
pub fn sign_out(state: &AppState) -> AppState {
    let mut next = state.clone();
    next.current_user = None;
    next
}

/// Edits an operator's own display name and credential secret, keeping the
/// session pointer in step when it references the same account.
pub fn update_profile(
    state: &AppState,
    user_id: &str,
    name: &str,
    secret: &str,
) -> CoreResult<AppState> {
    if name.trim().is_empty() {
        return Err(CoreError::invalid_argument("name", "must not be empty"));
    }
    validate_secret(secret)?;

    let mut next = state.clone();
    let user = next
        .users
        .iter_mut()
        .find(|u| u.id == user_id)
        .ok_or_else(|| CoreError::not_found("User", user_id))?;
    user.name = name.to_string();
    user.credential_secret = secret.to_string();
    let updated = user.clone();

    if next.current_user.as_ref().is_some_and(|c| c.id == user_id) {
        next.current_user = Some(updated);
    }
    Ok(next)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserRole;

    /// Seed document plus the reference product used across the scenarios:
    /// p1 with stock 10, cost 100, sell 150.
    fn seeded() -> AppState {
        let mut state = AppState::seed();
        state.products.push(Product {
            id: "p1".into(),
            code: "C-1".into(),
            name: "Sabao Azul".into(),
            category: "Limpeza".into(),
            cost_price: Money::from_cents(100),
            sell_price: Money::from_cents(150),
            stock_qty: 10,
            min_stock_qty: 2,
        });
        state
    }

    fn seller(state: &AppState) -> User {
        state.users[1].clone()
    }

    // -------------------------------------------------------------------------
    // adjust_stock
    // -------------------------------------------------------------------------

    #[test]
    fn test_adjust_stock_applies_signed_deltas() {
        let state = seeded();
        let state = adjust_stock(&state, "p1", 5, MovementKind::In, "restock").unwrap();
        let state = adjust_stock(&state, "p1", -3, MovementKind::Out, "sold").unwrap();
        let state = adjust_stock(&state, "p1", -2, MovementKind::Adjustment, "count").unwrap();

        assert_eq!(state.product("p1").unwrap().stock_qty, 10 + 5 - 3 - 2);
        assert_eq!(state.movements.len(), 3);
        // Movement quantities are magnitudes; direction lives in the kind.
        assert_eq!(state.movements[1].quantity, 3);
        assert_eq!(state.movements[1].kind, MovementKind::Out);
    }

    #[test]
    fn test_adjust_stock_rejects_negative_result() {
        let state = seeded();
        let err = adjust_stock(&state, "p1", -11, MovementKind::Out, "oversell").unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        // Rejection leaves no trace.
        assert_eq!(state.product("p1").unwrap().stock_qty, 10);
        assert!(state.movements.is_empty());
    }

    #[test]
    fn test_adjust_stock_unknown_product() {
        let state = seeded();
        let err = adjust_stock(&state, "ghost", 1, MovementKind::In, "x").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn test_adjust_stock_zero_delta() {
        let state = seeded();
        let err = adjust_stock(&state, "p1", 0, MovementKind::Adjustment, "noop").unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    // -------------------------------------------------------------------------
    // record_transaction
    // -------------------------------------------------------------------------

    #[test]
    fn test_record_transaction_appends() {
        let state = seeded();
        let next = record_transaction(
            &state,
            Money::from_cents(9_000),
            TransactionKind::Expense,
            TransactionCategory::Purchase,
            "new crates",
        )
        .unwrap();
        assert_eq!(next.transactions.len(), 1);
        assert_eq!(next.transactions[0].amount, Money::from_cents(9_000));
        assert_eq!(next.transactions[0].category, TransactionCategory::Purchase);
    }

    #[test]
    fn test_record_transaction_rejects_non_positive() {
        let state = seeded();
        for amount in [Money::zero(), Money::from_cents(-500)] {
            let err = record_transaction(
                &state,
                amount,
                TransactionKind::Income,
                TransactionCategory::Other,
                "bad",
            )
            .unwrap_err();
            assert!(matches!(err, CoreError::InvalidArgument { .. }));
        }
    }

    // -------------------------------------------------------------------------
    // record_sale
    // -------------------------------------------------------------------------

    #[test]
    fn test_record_sale_reference_scenario() {
        // p1: stock 10, cost 100, sell 150. One line of 3, cash 500.
        let state = seeded();
        let seller = seller(&state);
        let lines = [SaleLine {
            product_id: "p1".into(),
            quantity: 3,
        }];
        let next = record_sale(
            &state,
            &lines,
            &seller.id,
            PaymentMethod::Cash,
            Money::from_cents(500),
        )
        .unwrap();

        assert_eq!(next.product("p1").unwrap().stock_qty, 7);

        let sale = &next.sales[0];
        assert_eq!(sale.total, Money::from_cents(450));
        assert_eq!(sale.profit, Money::from_cents(150));
        assert_eq!(sale.change_due, Money::from_cents(50));
        assert_eq!(sale.seller_id, seller.id);
        assert_eq!(sale.seller_name, seller.name);
        assert_eq!(sale.items[0].product_name, "Sabao Azul");
        assert_eq!(sale.items[0].unit_price, Money::from_cents(150));

        // Exactly one Income/Sale ledger row for the total.
        assert_eq!(next.transactions.len(), 1);
        assert_eq!(next.transactions[0].kind, TransactionKind::Income);
        assert_eq!(next.transactions[0].category, TransactionCategory::Sale);
        assert_eq!(next.transactions[0].amount, Money::from_cents(450));

        // Exactly one OUT movement of 3.
        assert_eq!(next.movements.len(), 1);
        assert_eq!(next.movements[0].kind, MovementKind::Out);
        assert_eq!(next.movements[0].quantity, 3);
    }

    #[test]
    fn test_record_sale_is_all_or_nothing() {
        let mut state = seeded();
        state.products.push(Product {
            id: "p2".into(),
            code: "C-2".into(),
            name: "Vinagre".into(),
            category: "Mercearia".into(),
            cost_price: Money::from_cents(50),
            sell_price: Money::from_cents(80),
            stock_qty: 1,
            min_stock_qty: 1,
        });
        let seller = seller(&state);

        // First line fits, second exceeds stock.
        let lines = [
            SaleLine {
                product_id: "p1".into(),
                quantity: 2,
            },
            SaleLine {
                product_id: "p2".into(),
                quantity: 5,
            },
        ];
        let err = record_sale(
            &state,
            &lines,
            &seller.id,
            PaymentMethod::Cash,
            Money::from_cents(100_000),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));

        // The returned error means NOTHING changed: the caller's snapshot is
        // bit-for-bit the input.
        assert_eq!(state.product("p1").unwrap().stock_qty, 10);
        assert_eq!(state.product("p2").unwrap().stock_qty, 1);
        assert!(state.sales.is_empty());
        assert!(state.transactions.is_empty());
        assert!(state.movements.is_empty());
    }

    #[test]
    fn test_record_sale_repeated_product_checks_cumulative_stock() {
        let state = seeded();
        let seller = seller(&state);
        let lines = [
            SaleLine {
                product_id: "p1".into(),
                quantity: 6,
            },
            SaleLine {
                product_id: "p1".into(),
                quantity: 6,
            },
        ];
        // 6 + 6 > 10: the second line must see the stock left by the first.
        let err = record_sale(
            &state,
            &lines,
            &seller.id,
            PaymentMethod::Card,
            Money::zero(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[test]
    fn test_record_sale_insufficient_cash() {
        let state = seeded();
        let seller = seller(&state);
        let lines = [SaleLine {
            product_id: "p1".into(),
            quantity: 3,
        }];
        let err = record_sale(
            &state,
            &lines,
            &seller.id,
            PaymentMethod::Cash,
            Money::from_cents(400),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientPayment { .. }));
        assert!(state.sales.is_empty());
    }

    #[test]
    fn test_record_sale_non_cash_settles_exactly() {
        let state = seeded();
        let seller = seller(&state);
        let lines = [SaleLine {
            product_id: "p1".into(),
            quantity: 2,
        }];
        // Tendered amount is ignored for transfers; settlement is exact.
        let next = record_sale(
            &state,
            &lines,
            &seller.id,
            PaymentMethod::Transfer,
            Money::zero(),
        )
        .unwrap();
        let sale = &next.sales[0];
        assert_eq!(sale.amount_tendered, Money::from_cents(300));
        assert_eq!(sale.change_due, Money::zero());
    }

    #[test]
    fn test_record_sale_unknown_seller() {
        let state = seeded();
        let lines = [SaleLine {
            product_id: "p1".into(),
            quantity: 1,
        }];
        let err = record_sale(
            &state,
            &lines,
            "ghost",
            PaymentMethod::Cash,
            Money::from_cents(150),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn test_record_sale_empty_lines() {
        let state = seeded();
        let seller = seller(&state);
        let err = record_sale(&state, &[], &seller.id, PaymentMethod::Cash, Money::zero())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    // -------------------------------------------------------------------------
    // record_damage
    // -------------------------------------------------------------------------

    #[test]
    fn test_record_damage_composes_three_mutations() {
        let state = seeded();
        let next = record_damage(&state, "p1", 2, "dropped crate").unwrap();

        assert_eq!(next.product("p1").unwrap().stock_qty, 8);

        assert_eq!(next.damages.len(), 1);
        assert_eq!(next.damages[0].product_name, "Sabao Azul");
        assert_eq!(next.damages[0].quantity, 2);

        // Expense valued at quantity × cost at the moment of loss.
        assert_eq!(next.transactions.len(), 1);
        assert_eq!(next.transactions[0].kind, TransactionKind::Expense);
        assert_eq!(next.transactions[0].category, TransactionCategory::Damage);
        assert_eq!(next.transactions[0].amount, Money::from_cents(200));

        assert_eq!(next.movements.len(), 1);
        assert_eq!(next.movements[0].kind, MovementKind::Damage);
    }

    #[test]
    fn test_record_damage_exceeding_stock_is_rejected_cleanly() {
        // Reference scenario: stock 10, damage 12 → InvalidState, no trace.
        let state = seeded();
        let err = record_damage(&state, "p1", 12, "broke").unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        assert_eq!(state.product("p1").unwrap().stock_qty, 10);
        assert!(state.damages.is_empty());
        assert!(state.transactions.is_empty());
        assert!(state.movements.is_empty());
    }

    #[test]
    fn test_record_damage_cost_frozen_at_loss_time() {
        let state = seeded();
        let next = record_damage(&state, "p1", 1, "wet").unwrap();

        // Raise the cost afterwards: the recorded expense must not move.
        let mut edited = next.product("p1").unwrap().clone();
        edited.cost_price = Money::from_cents(999);
        let next = upsert_product(&next, edited).unwrap();
        assert_eq!(next.transactions[0].amount, Money::from_cents(100));
    }

    // -------------------------------------------------------------------------
    // catalogue / team CRUD
    // -------------------------------------------------------------------------

    #[test]
    fn test_upsert_product_insert_assigns_id_and_code() {
        let state = seeded();
        let next = upsert_product(
            &state,
            Product {
                id: String::new(),
                code: "  ".into(),
                name: "Fuba".into(),
                category: "Mercearia".into(),
                cost_price: Money::from_cents(700),
                sell_price: Money::from_cents(1_000),
                stock_qty: 20,
                min_stock_qty: 5,
            },
        )
        .unwrap();
        let added = next.products.last().unwrap();
        assert!(added.id.starts_with("PRD-"));
        assert!(added.code.starts_with("P-"));
    }

    #[test]
    fn test_upsert_product_update_and_missing() {
        let state = seeded();
        let mut edited = state.product("p1").unwrap().clone();
        edited.sell_price = Money::from_cents(175);
        let next = upsert_product(&state, edited).unwrap();
        assert_eq!(next.product("p1").unwrap().sell_price, Money::from_cents(175));
        assert_eq!(next.products.len(), 1);

        let mut ghost = state.product("p1").unwrap().clone();
        ghost.id = "ghost".into();
        assert!(matches!(
            upsert_product(&state, ghost).unwrap_err(),
            CoreError::NotFound { .. }
        ));
    }

    #[test]
    fn test_delete_product() {
        let state = seeded();
        let next = delete_product(&state, "p1").unwrap();
        assert!(next.products.is_empty());
        assert!(matches!(
            delete_product(&state, "ghost").unwrap_err(),
            CoreError::NotFound { .. }
        ));
    }

    #[test]
    fn test_upsert_user_duplicate_login_rejected() {
        let state = seeded();
        let err = upsert_user(
            &state,
            User {
                id: String::new(),
                name: "Clone".into(),
                login_name: "admin".into(),
                credential_secret: "abc".into(),
                role: UserRole::Employee,
            },
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[test]
    fn test_upsert_user_refreshes_session_pointer() {
        let mut state = seeded();
        state.current_user = Some(state.users[1].clone());

        let mut edited = state.users[1].clone();
        edited.name = "Vendedora".into();
        let next = upsert_user(&state, edited).unwrap();
        assert_eq!(next.current_user.as_ref().unwrap().name, "Vendedora");
    }

    #[test]
    fn test_delete_user_protects_seed_admin() {
        let state = seeded();
        let err = delete_user(&state, "1").unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
        assert_eq!(state.users.len(), 2);

        let next = delete_user(&state, "2").unwrap();
        assert_eq!(next.users.len(), 1);
    }

    // -------------------------------------------------------------------------
    // session / profile
    // -------------------------------------------------------------------------

    #[test]
    fn test_sign_in_and_out() {
        let state = seeded();
        let next = sign_in(&state, "2").unwrap();
        assert_eq!(next.current_user.as_ref().unwrap().id, "2");

        let next = sign_out(&next);
        assert!(next.current_user.is_none());

        assert!(matches!(
            sign_in(&state, "ghost").unwrap_err(),
            CoreError::NotFound { .. }
        ));
    }

    #[test]
    fn test_update_profile() {
        let mut state = seeded();
        state.current_user = Some(state.users[1].clone());

        let next = update_profile(&state, "2", "Vendedora", "nova1").unwrap();
        let stored = next.user("2").unwrap();
        assert_eq!(stored.name, "Vendedora");
        assert_eq!(stored.credential_secret, "nova1");
        assert_eq!(next.current_user.as_ref().unwrap().name, "Vendedora");

        assert!(matches!(
            update_profile(&state, "2", "Vendedora", "ab").unwrap_err(),
            CoreError::InvalidArgument { .. }
        ));
    }

    // -------------------------------------------------------------------------
    // intents
    // -------------------------------------------------------------------------

    #[test]
    fn test_intent_operation_kinds() {
        let intent = Intent::RecordSale {
            lines: vec![],
            payment_method: PaymentMethod::Cash,
            amount_tendered: Money::zero(),
        };
        assert_eq!(intent.operation_kind(), OperationKind::RecordSale);

        let intent = Intent::DeleteUser {
            user_id: "2".into(),
        };
        assert_eq!(intent.operation_kind(), OperationKind::DeleteUser);
    }

    #[test]
    fn test_intent_apply_uses_actor_as_seller() {
        let state = seeded();
        let actor = seller(&state);
        let next = Intent::RecordSale {
            lines: vec![SaleLine {
                product_id: "p1".into(),
                quantity: 1,
            }],
            payment_method: PaymentMethod::Cash,
            amount_tendered: Money::from_cents(150),
        }
        .apply(&state, &actor)
        .unwrap();
        assert_eq!(next.sales[0].seller_id, actor.id);
    }
}
