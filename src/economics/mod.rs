//! Pure arithmetic for the reserve.
//!
//! Nothing in this module touches reserve state. Every function is a pure
//! function of its arguments, so the engine can evaluate the same formula
//! before and after a mutation and get consistent answers.
//!
//! - [`rate`]: cross-multiplication comparison and fixed-point rates
//! - [`stake`]: burn amounts and stake requirements
//! - [`limits`]: minimum order sizes

pub mod limits;
pub mod rate;
pub mod stake;

pub use limits::OrderLimits;
pub use rate::{calc_rate_from_qty, compare_rates, is_valid_qty, is_valid_rate};
pub use stake::{burn_amount, required_stake, StakeModel};
