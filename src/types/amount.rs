//! Conversion between raw token units and human-readable decimals.
//!
//! ## Overview
//!
//! The reserve stores every amount as a raw integer in the asset's base
//! unit (wei for ETH, 10^-decimals for tokens). These helpers exist for
//! logs, the demo binary and tests; no reserve arithmetic goes through them.
//!
//! ## Examples
//!
//! ```
//! use orderbook_reserve::types::amount::{to_units, from_units};
//!
//! // 1.5 ETH in wei
//! let wei = to_units("1.5", 18).unwrap();
//! assert_eq!(wei, 1_500_000_000_000_000_000);
//!
//! assert_eq!(from_units(wei, 18).as_deref(), Some("1.5"));
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::config::{MAX_DECIMALS, PRECISION};
use crate::types::Qty;

/// Decimals used by rates (PRECISION = 10^18)
const RATE_DECIMALS: u32 = 18;

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to raw units
///
/// # Returns
///
/// * `Some(Qty)` - The raw representation, rounded to the nearest unit
/// * `None` - If parsing fails, the value is negative or out of range
///
/// # Example
///
/// ```
/// use orderbook_reserve::types::amount::to_units;
///
/// assert_eq!(to_units("1", 6), Some(1_000_000));
/// assert_eq!(to_units("0.000001", 6), Some(1));
/// assert_eq!(to_units("-1", 6), None);
/// ```
pub fn to_units(s: &str, decimals: u32) -> Option<Qty> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_units(decimal, decimals)
}

/// Convert a Decimal to raw units
pub fn decimal_to_units(d: Decimal, decimals: u32) -> Option<Qty> {
    if d.is_sign_negative() || decimals > MAX_DECIMALS {
        return None;
    }

    let scale = Decimal::from(10u64.pow(decimals));
    let scaled = d.checked_mul(scale)?;
    scaled.round_dp(0).to_u128()
}

/// Convert raw units to a Decimal
///
/// Returns `None` when the value does not fit Decimal's 96-bit mantissa.
pub fn units_to_decimal(value: Qty, decimals: u32) -> Option<Decimal> {
    let mantissa = i128::try_from(value).ok()?;
    Decimal::try_from_i128_with_scale(mantissa, decimals).ok()
}

/// Convert raw units to a trimmed decimal string
///
/// # Example
///
/// ```
/// use orderbook_reserve::types::amount::from_units;
///
/// assert_eq!(from_units(1_000_000, 6).as_deref(), Some("1"));
/// assert_eq!(from_units(1_500_000, 6).as_deref(), Some("1.5"));
/// ```
pub fn from_units(value: Qty, decimals: u32) -> Option<String> {
    units_to_decimal(value, decimals).map(|d| d.normalize().to_string())
}

/// Convert a PRECISION-scaled rate to a Decimal
///
/// # Example
///
/// ```
/// use orderbook_reserve::types::amount::rate_to_decimal;
/// use rust_decimal::Decimal;
///
/// let rate = rate_to_decimal(2_500_000_000_000_000_000).unwrap();
/// assert_eq!(rate, Decimal::new(25, 1));
/// ```
pub fn rate_to_decimal(rate: u128) -> Option<Decimal> {
    debug_assert_eq!(10u128.pow(RATE_DECIMALS), PRECISION);
    units_to_decimal(rate, RATE_DECIMALS).map(|d| d.normalize())
}

// ============================================================================
// Unit Tests
// ============================================================================
