//! Fee estimation
//!
//! Two independent methods:
//! - **Top-down**: market fee as a percentage of each discipline's construction
//!   budget, from a diminishing-return curve
//! - **Bottom-up**: design hours × blended rate × markup × (1 - discount)
//!
//! The variance checker compares the two.

pub mod bottom_up;
pub mod top_down;

pub use bottom_up::{planned_hours, resolve_rates, BottomUpFeeEngine};
pub use top_down::{fee_curve_pct, TopDownFeeEngine};
