//! Analysis configuration.
//!
//! One flat value object drives every pipeline stage. All tunables arrive
//! pre-validated through [`Period`]/[`Factor`] newtypes; the only cross-field
//! rule (fast SMA shorter than slow SMA) is enforced by [`AnalysisConfig::validate`],
//! which [`crate::Analyzer::new`] calls for you.

use crate::{AnalysisError, Factor, Period, Result};

// ============================================================
// SNR STRATEGY
// ============================================================

/// How support/resistance levels are extracted from market structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnrStrategy {
    /// Recent labeled swing points, verbatim (one level per point)
    LabelBased,
    /// Swing prices bucketed by rounding; one level per price zone
    Clustered,
}

// ============================================================
// CONFIG
// ============================================================

/// Tunables for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisConfig {
    /// Fast SMA window for the crossover signal
    pub fast_length: Period,
    /// Slow SMA window for the crossover signal
    pub slow_length: Period,
    /// RSI lookback
    pub rsi_length: Period,
    /// ATR lookback
    pub atr_length: Period,
    /// Bollinger Band window
    pub bb_length: Period,
    /// Bollinger Band width in standard deviations
    pub bb_mult: Factor,
    /// Swing detection sensitivity: bars on each side a pivot must dominate
    pub structure_sensitivity: Period,
    /// Support/resistance extraction strategy
    pub snr_strategy: SnrStrategy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fast_length: Period::new_const(7),
            slow_length: Period::new_const(25),
            rsi_length: Period::new_const(14),
            atr_length: Period::new_const(14),
            bb_length: Period::new_const(20),
            bb_mult: Factor::new_const(2.0),
            structure_sensitivity: Period::new_const(2),
            snr_strategy: SnrStrategy::LabelBased,
        }
    }
}

impl AnalysisConfig {
    /// Check cross-field rules the newtypes cannot express on their own.
    pub fn validate(&self) -> Result<()> {
        if self.fast_length >= self.slow_length {
            return Err(AnalysisError::InvalidConfig(format!(
                "fast_length ({}) must be < slow_length ({})",
                self.fast_length.get(),
                self.slow_length.get()
            )));
        }
        Ok(())
    }

    /// Minimum series length before swing detection produces anything:
    /// a pivot needs `sensitivity` bars on each side plus a few in between.
    #[inline]
    pub fn min_structure_len(&self) -> usize {
        self.structure_sensitivity.get() * 2 + 5
    }
}
