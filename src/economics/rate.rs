//! Fixed-point rate arithmetic.
//!
//! ## Cross-Multiplication
//!
//! Two orders `(a_src, a_dst)` and `(b_src, b_dst)` are ranked by comparing
//! `a_src * b_dst` with `b_src * a_dst` instead of dividing. Both products
//! are formed in 256 bits, so no precision is lost and no rounding can flip
//! the result.
//!
//! ## Rates
//!
//! A rate is "destination units per source unit", scaled by `PRECISION`
//! and normalized for the decimals of both assets.

use std::cmp::Ordering;

use alloy_primitives::U256;

use crate::config::{MAX_QTY, MAX_RATE, PRECISION};
use crate::types::Qty;

/// Rank a candidate `(src, dst)` against an existing `(check_src, check_dst)`.
///
/// `Greater` means the candidate gives more per unit wanted, so it ranks
/// higher (closer to the head). `Equal` means identical rates.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use orderbook_reserve::economics::compare_rates;
///
/// // 10/100 is a better deal than 10/300
/// assert_eq!(compare_rates(10, 100, 10, 300), Ordering::Greater);
/// assert_eq!(compare_rates(20, 200, 10, 100), Ordering::Equal);
/// ```
#[inline]
pub fn compare_rates(src: Qty, dst: Qty, check_src: Qty, check_dst: Qty) -> Ordering {
    let k1 = U256::from(src) * U256::from(check_dst);
    let k2 = U256::from(check_src) * U256::from(dst);
    k1.cmp(&k2)
}

/// Rate obtained when paying `src` and receiving `dst`, scaled by PRECISION.
///
/// Returns 0 for `src == 0`. Results above `u128::MAX` saturate; any such
/// value is far above `MAX_RATE` and is rejected by callers.
///
/// # Example
///
/// ```
/// use orderbook_reserve::economics::calc_rate_from_qty;
///
/// // Pay 500 (18 decimals), receive 1000 (18 decimals): rate 2.0
/// assert_eq!(calc_rate_from_qty(500, 1000, 18, 18), 2_000_000_000_000_000_000);
///
/// // Pay 1 ETH, receive 2 units of a 6-decimal token
/// assert_eq!(
///     calc_rate_from_qty(1_000_000_000_000_000_000, 2_000_000, 18, 6),
///     2_000_000_000_000_000_000
/// );
/// ```
pub fn calc_rate_from_qty(src: Qty, dst: Qty, src_decimals: u32, dst_decimals: u32) -> u128 {
    if src == 0 {
        return 0;
    }

    let precision = U256::from(PRECISION);
    let rate = if dst_decimals >= src_decimals {
        let scale = pow10(dst_decimals - src_decimals);
        U256::from(dst) * precision / (scale * U256::from(src))
    } else {
        let scale = pow10(src_decimals - dst_decimals);
        U256::from(dst) * precision * scale / U256::from(src)
    };

    narrow(rate)
}

/// Check a rate against `MAX_RATE`
#[inline]
pub fn is_valid_rate(rate: u128) -> bool {
    rate <= MAX_RATE
}

/// Check a quantity against `MAX_QTY`
#[inline]
pub fn is_valid_qty(qty: Qty) -> bool {
    qty <= MAX_QTY
}

/// 10^exp as U256. Callers keep `exp <= MAX_DECIMALS`.
#[inline]
fn pow10(exp: u32) -> U256 {
    U256::from(10u8).pow(U256::from(exp))
}

/// Narrow a 256-bit intermediate back to 128 bits, saturating.
#[inline]
pub(crate) fn narrow(value: U256) -> u128 {
    u128::try_from(value).unwrap_or(u128::MAX)
}

// ============================================================================
// Unit Tests
// ============================================================================
