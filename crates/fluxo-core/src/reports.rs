//! # Reporting Queries
//!
//! Pure read-only aggregates over a snapshot. Nothing here mutates or
//! clones the document; every query borrows.
//!
//! The cash ledger is the sole source of truth for money aggregates, so
//! `cash_totals` never looks at sales or damages directly.

use chrono::{DateTime, NaiveDate, Utc};

use crate::money::Money;
use crate::types::{AppState, Product, Sale, TransactionKind, User, UserRole};

// =============================================================================
// Aggregate Shapes
// =============================================================================

/// Running cash position derived from the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashTotals {
    pub income: Money,
    pub expense: Money,
    /// income − expense; negative when the till is in the red.
    pub balance: Money,
}

/// One day of selling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTakings {
    pub revenue: Money,
    pub profit: Money,
    pub sale_count: usize,
}

// =============================================================================
// Queries
// =============================================================================

/// Sums the cash ledger into income, expense and balance.
pub fn cash_totals(state: &AppState) -> CashTotals {
    let mut income = Money::zero();
    let mut expense = Money::zero();
    for t in &state.transactions {
        match t.kind {
            TransactionKind::Income => income += t.amount,
            TransactionKind::Expense => expense += t.amount,
        }
    }
    CashTotals {
        income,
        expense,
        balance: income - expense,
    }
}

/// Revenue, profit and sale count for one calendar day (UTC).
pub fn revenue_on(state: &AppState, date: NaiveDate) -> DailyTakings {
    let on_day = |ts: &DateTime<Utc>| ts.date_naive() == date;
    let mut takings = DailyTakings {
        revenue: Money::zero(),
        profit: Money::zero(),
        sale_count: 0,
    };
    for sale in state.sales.iter().filter(|s| on_day(&s.timestamp)) {
        takings.revenue += sale.total;
        takings.profit += sale.profit;
        takings.sale_count += 1;
    }
    takings
}

/// Products at or below their restock threshold, in catalogue order.
pub fn low_stock(state: &AppState) -> Vec<&Product> {
    state
        .products
        .iter()
        .filter(|p| p.stock_qty <= p.min_stock_qty)
        .collect()
}

/// Sales `viewer` is entitled to see: employees their own, admins all.
pub fn sales_visible_to<'a>(state: &'a AppState, viewer: &User) -> Vec<&'a Sale> {
    state
        .sales
        .iter()
        .filter(|s| viewer.role == UserRole::Admin || s.seller_id == viewer.id)
        .collect()
}

/// Revenue per product category, in first-seen order.
pub fn revenue_by_category(state: &AppState) -> Vec<(String, Money)> {
    let mut totals: Vec<(String, Money)> = Vec::new();
    for sale in &state.sales {
        for item in &sale.items {
            // The live catalogue names the category; items of a since-deleted
            // product land in a catch-all bucket.
            let category = state
                .product(&item.product_id)
                .map(|p| p.category.as_str())
                .unwrap_or("(removido)");
            match totals.iter().position(|(c, _)| c == category) {
                Some(i) => totals[i].1 += item.line_total(),
                None => totals.push((category.to_string(), item.line_total())),
            }
        }
    }
    totals
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{record_damage, record_sale, record_transaction, SaleLine};
    use crate::types::{PaymentMethod, TransactionCategory};

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
        state.products.push(Product {
            id: "p2".into(),
            code: "C-2".into(),
            name: "Arroz".into(),
            category: "Mercearia".into(),
            cost_price: Money::from_cents(500),
            sell_price: Money::from_cents(800),
            stock_qty: 3,
            min_stock_qty: 5,
        });
        state
    }

    fn sell(state: &AppState, seller_id: &str, product_id: &str, qty: i64) -> AppState {
        record_sale(
            state,
            &[SaleLine {
                product_id: product_id.into(),
                quantity: qty,
            }],
            seller_id,
            PaymentMethod::Card,
            Money::zero(),
        )
        .unwrap()
    }

    #[test]
    fn test_cash_totals_derive_from_ledger_only() {
        let state = seeded();
        let state = sell(&state, "2", "p1", 3); // +450
        let state = record_damage(&state, "p1", 2, "wet").unwrap(); // -200
        let state = record_transaction(
            &state,
            Money::from_cents(1_000),
            TransactionKind::Expense,
            TransactionCategory::Purchase,
            "stock buy",
        )
        .unwrap();

        let totals = cash_totals(&state);
        assert_eq!(totals.income, Money::from_cents(450));
        assert_eq!(totals.expense, Money::from_cents(1_200));
        assert_eq!(totals.balance, Money::from_cents(-750));
    }

    #[test]
    fn test_revenue_on_today() {
        let state = seeded();
        let state = sell(&state, "2", "p1", 3); // revenue 450, profit 150
        let state = sell(&state, "1", "p1", 1); // revenue 150, profit 50

        let today = Utc::now().date_naive();
        let takings = revenue_on(&state, today);
        assert_eq!(takings.revenue, Money::from_cents(600));
        assert_eq!(takings.profit, Money::from_cents(200));
        assert_eq!(takings.sale_count, 2);

        let yesterday = today.pred_opt().unwrap();
        assert_eq!(revenue_on(&state, yesterday).sale_count, 0);
    }

    #[test]
    fn test_low_stock_uses_inclusive_threshold() {
        let mut state = seeded();
        // p2 starts at 3 with threshold 5: already low.
        let low: Vec<_> = low_stock(&state).iter().map(|p| p.id.clone()).collect();
        assert_eq!(low, ["p2"]);

        // Drop p1 exactly to its threshold of 2.
        state.products[0].stock_qty = 2;
        assert_eq!(low_stock(&state).len(), 2);
    }

    #[test]
    fn test_sales_visibility_scoping() {
        let state = seeded();
        let state = sell(&state, "2", "p1", 1);
        let state = sell(&state, "1", "p1", 1);
        let state = sell(&state, "2", "p1", 1);

        let admin = state.user("1").unwrap().clone();
        let employee = state.user("2").unwrap().clone();

        assert_eq!(sales_visible_to(&state, &admin).len(), 3);
        let own = sales_visible_to(&state, &employee);
        assert_eq!(own.len(), 2);
        assert!(own.iter().all(|s| s.seller_id == "2"));
    }

    #[test]
    fn test_revenue_by_category() {
        let state = seeded();
        let state = sell(&state, "2", "p1", 2); // Limpeza 300
        let state = sell(&state, "2", "p2", 1); // Mercearia 800
        let state = sell(&state, "2", "p1", 1); // Limpeza +150

        let by_cat = revenue_by_category(&state);
        assert_eq!(
            by_cat,
            vec![
                ("Limpeza".to_string(), Money::from_cents(450)),
                ("Mercearia".to_string(), Money::from_cents(800)),
            ]
        );
    }
}
