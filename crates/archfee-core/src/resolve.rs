//! Ordered resolution of overridable parameters
//!
//! Every overridable value follows the same precedence:
//! user override, then data-store value, then configured default.
//! Keeping the chain in one place makes the order testable on its own.

use serde::Serialize;

/// Layer that supplied a resolved value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Override,
    Data,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<T> {
    pub value: T,
    pub layer: Layer,
}

impl<T> Resolution<T> {
    pub fn is_override(&self) -> bool {
        self.layer == Layer::Override
    }
}

/// override ?? data ?? default
pub fn resolve_layered<T>(overridden: Option<T>, data: Option<T>, default: T) -> Resolution<T> {
    match (overridden, data) {
        (Some(value), _) => Resolution {
            value,
            layer: Layer::Override,
        },
        (None, Some(value)) => Resolution {
            value,
            layer: Layer::Data,
        },
        (None, None) => Resolution {
            value: default,
            layer: Layer::Default,
        },
    }
}

/// Clamp to [0, 1]; NaN becomes 0
pub fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// `numerator / denominator`, or 0 when the result would not be finite
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
