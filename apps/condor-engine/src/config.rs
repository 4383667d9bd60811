//! Search and lifecycle configuration parameters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Condor search configuration.
///
/// Bounds and ratios for the seven ordered checks of the tweak engine,
/// plus the structural parameters shared with the roll engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Distance between short and long strikes, fixed for all builds and rolls.
    pub spread_width: Decimal,
    /// Minimum combined two-leg credit.
    pub min_credit: Decimal,
    /// Maximum combined two-leg credit.
    pub max_credit: Decimal,
    /// Upper bound on the absolute short call delta.
    pub max_call_delta: Decimal,
    /// Upper bound on the absolute short put delta.
    pub max_put_delta: Decimal,
    /// Upper bound on the summed absolute short-leg deltas.
    pub max_total_delta: Decimal,
    /// Minimum smaller/larger credit ratio between the two sides.
    pub credit_balance_ratio: Decimal,
    /// Minimum smaller/larger delta ratio between the two sides.
    pub delta_ratio: Decimal,
    /// Hard cap on tweak iterations.
    pub max_tweak_attempts: u32,
    /// Strike points per tweak move.
    pub strike_step: Decimal,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            spread_width: Decimal::new(20, 0),
            min_credit: Decimal::new(105, 2),       // 1.05
            max_credit: Decimal::new(145, 2),       // 1.45
            max_call_delta: Decimal::new(8, 2),     // 0.08
            max_put_delta: Decimal::new(10, 2),     // 0.10
            max_total_delta: Decimal::new(18, 2),   // 0.18
            credit_balance_ratio: Decimal::new(5, 1),
            delta_ratio: Decimal::new(5, 1),
            max_tweak_attempts: 100,
            strike_step: Decimal::new(5, 0),
        }
    }
}

/// Position lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    // Exit thresholds (multiples of cumulative credit)
    /// Profit target as a fraction of cumulative credit (0.6 = 60%).
    pub profit_target_ratio: Decimal,
    /// Max loss as a multiple of cumulative credit (negative).
    pub max_loss_ratio: Decimal,

    // Expiry-day tactics
    /// Buy a side back when its net buyback cost drops to this or below.
    pub cheap_buyback_threshold: Decimal,
    /// Roll a side when its short-leg delta exceeds this.
    pub defensive_delta_threshold: Decimal,
    /// Skip expiry-day monitoring before this local hour.
    pub expiry_monitor_start_hour: u32,

    // Rolling
    /// Short-leg delta target when rebuilding the tested side of a roll.
    pub roll_target_delta: Decimal,
    /// Calendar-day horizon for roll candidate expirations.
    pub roll_horizon_days: i64,

    // Entry
    /// Failed condor searches allowed per entry window.
    pub max_search_attempts: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            profit_target_ratio: Decimal::new(6, 1),     // 0.6
            max_loss_ratio: Decimal::new(-35, 1),        // -3.5
            cheap_buyback_threshold: Decimal::new(20, 2),
            defensive_delta_threshold: Decimal::new(30, 2),
            expiry_monitor_start_hour: 9,
            roll_target_delta: Decimal::new(20, 2),
            roll_horizon_days: 7,
            max_search_attempts: 5,
        }
    }
}
