//! # Validation Module
//!
//! Input validation used by the transition engine before any snapshot work.
//!
//! A transition fails fast on the first rule violation with
//! `CoreError::InvalidArgument`; the snapshot the caller holds is untouched.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, User};

/// Minimum credential secret length.
pub const MIN_SECRET_LEN: usize = 3;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Quantities on movements, sale lines and damages must be positive.
pub fn validate_quantity(qty: i64) -> CoreResult<()> {
    if qty <= 0 {
        return Err(CoreError::invalid_argument(
            "quantity",
            format!("must be positive, got {qty}"),
        ));
    }
    Ok(())
}

/// Ledger amounts must be strictly positive; the sign lives in the
/// transaction kind, never in the amount.
pub fn validate_amount(amount: Money) -> CoreResult<()> {
    if !amount.is_positive() {
        return Err(CoreError::invalid_argument(
            "amount",
            format!("must be positive, got {amount}"),
        ));
    }
    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Catalogue rules for inserts and edits.
///
/// ## Rules
/// - name must not be blank
/// - prices must not be negative (zero is allowed for giveaways)
/// - stock and threshold must not be negative
pub fn validate_product(product: &Product) -> CoreResult<()> {
    if product.name.trim().is_empty() {
        return Err(CoreError::invalid_argument("name", "must not be empty"));
    }
    if product.cost_price.is_negative() {
        return Err(CoreError::invalid_argument(
            "cost_price",
            "must not be negative",
        ));
    }
    if product.sell_price.is_negative() {
        return Err(CoreError::invalid_argument(
            "sell_price",
            "must not be negative",
        ));
    }
    if product.stock_qty < 0 {
        return Err(CoreError::invalid_argument(
            "stock_qty",
            "must not be negative",
        ));
    }
    if product.min_stock_qty < 0 {
        return Err(CoreError::invalid_argument(
            "min_stock_qty",
            "must not be negative",
        ));
    }
    Ok(())
}

/// Account rules for inserts and edits.
pub fn validate_user(user: &User) -> CoreResult<()> {
    if user.name.trim().is_empty() {
        return Err(CoreError::invalid_argument("name", "must not be empty"));
    }
    if user.login_name.trim().is_empty() {
        return Err(CoreError::invalid_argument(
            "login_name",
            "must not be empty",
        ));
    }
    validate_secret(&user.credential_secret)
}

/// Credential secrets have a minimum length of [`MIN_SECRET_LEN`].
pub fn validate_secret(secret: &str) -> CoreResult<()> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(CoreError::invalid_argument(
            "credential_secret",
            format!("must be at least {MIN_SECRET_LEN} characters"),
        ));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserRole;

    fn product() -> Product {
        Product {
            id: "p1".into(),
            code: "C-1".into(),
            name: "Arroz".into(),
            category: "Mercearia".into(),
            cost_price: Money::from_cents(10_000),
            sell_price: Money::from_cents(15_000),
            stock_qty: 10,
            min_stock_qty: 2,
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(Money::from_cents(1)).is_ok());
        assert!(validate_amount(Money::zero()).is_err());
        assert!(validate_amount(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_product() {
        assert!(validate_product(&product()).is_ok());

        let mut blank_name = product();
        blank_name.name = "   ".into();
        assert!(validate_product(&blank_name).is_err());

        let mut negative_price = product();
        negative_price.sell_price = Money::from_cents(-1);
        assert!(validate_product(&negative_price).is_err());

        let mut negative_stock = product();
        negative_stock.stock_qty = -1;
        assert!(validate_product(&negative_stock).is_err());
    }

    #[test]
    fn test_validate_user_and_secret() {
        let user = User {
            id: "u1".into(),
            name: "Maria".into(),
            login_name: "maria".into(),
            credential_secret: "abc".into(),
            role: UserRole::Employee,
        };
        assert!(validate_user(&user).is_ok());

        let mut short_secret = user.clone();
        short_secret.credential_secret = "ab".into();
        assert!(validate_user(&short_secret).is_err());

        let mut blank_login = user;
        blank_login.login_name = "".into();
        assert!(validate_user(&blank_login).is_err());
    }
}
