//! Analytics engines: derive presentation-ready metrics from a [`DataStore`].
//!
//! - [`emissions`]: per-user emissions summary, weekly trend, forecast
//! - [`comparison`]: cross-user rollup over every user
//! - [`energy`]: per-user appliance energy analytics and suggestions
//! - [`appliances`]: appliance inventory, tips and usage history
//! - [`rewards`]: achievement badges
//! - [`actions`]: micro-action catalog browsing
//! - [`events`]: best-effort JSONL log of analytics queries
//!
//! Every engine is a pure function of the store snapshot and its arguments.
//! Outputs are plain value objects recomputed on each call.
//!
//! [`DataStore`]: crate::data::DataStore

pub mod actions;
pub mod appliances;
pub mod comparison;
pub mod emissions;
pub mod energy;
pub mod events;
pub mod rewards;

pub use comparison::{ComparisonAnalytics, compute_comparison};
pub use emissions::{UserAnalytics, compute_user_analytics};
pub use energy::{EnergyAnalytics, compute_energy_analytics};

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------
//
// Half-up rounding on the scaled value: `floor(x * 10^d + 0.5) / 10^d`.
// Ties round toward positive infinity, for negative values too.

/// Round to `decimals` places, half-up.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

/// Round to 1 decimal place (energy and emissions totals).
pub fn round1(value: f64) -> f64 {
    round_to(value, 1)
}

/// Round to 2 decimal places (costs, CO2 savings).
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Round to the nearest whole number.
pub fn round_whole(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// `part / total` as a percentage, `0.0` when `total` is zero.
pub fn share_pct(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}

/// Mean of `values`, `0.0` for an empty slice.
pub(crate) fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let count = values.len();
    if count == 0 {
        0.0
    } else {
        values.sum::<f64>() / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_half_up_at_one_decimal() {
        assert_eq!(round1(2.25), 2.3);
        assert_eq!(round1(2.24), 2.2);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn round_half_up_at_two_decimals() {
        assert_eq!(round2(10.08), 10.08);
        assert_eq!(round2(0.288), 0.29);
        assert_eq!(round2(1.001), 1.0);
    }

    #[test]
    fn round_whole_ties_toward_positive_infinity() {
        assert_eq!(round_whole(61.67), 62);
        assert_eq!(round_whole(2.5), 3);
        assert_eq!(round_whole(-2.5), -2);
        assert_eq!(round_whole(-2.6), -3);
    }

    #[test]
    fn share_pct_guards_zero_total() {
        assert_eq!(share_pct(5.0, 0.0), 0.0);
        assert_eq!(share_pct(5.0, 20.0), 25.0);
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(Vec::<f64>::new().into_iter()), 0.0);
        assert_eq!(mean(vec![1.0, 2.0, 6.0].into_iter()), 3.0);
    }
}
