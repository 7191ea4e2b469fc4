//! Trailing-window indicators over close/candle series.
//!
//! Every function here is pure, uses only trailing data (no look-ahead) and
//! returns `None` when the series is too short for the requested window.
//! Undefined never degrades to zero.

use crate::{config::AnalysisConfig, Ohlc};

// ============================================================
// CORE FUNCTIONS
// ============================================================

/// Simple moving average: mean of the last `length` values.
///
/// `None` if fewer than `length` values are available (or `length` is 0).
pub fn sma(values: &[f64], length: usize) -> Option<f64> {
    if length == 0 || values.len() < length {
        return None;
    }
    let window = &values[values.len() - length..];
    Some(window.iter().sum::<f64>() / length as f64)
}

/// Relative Strength Index over one-step deltas of the whole series.
///
/// Deltas `>= 0` feed the gains list (a zero delta counts as a gain),
/// deltas `< 0` feed the losses list as absolute values. The two lists are
/// windowed to their last `length` entries independently, and each average
/// divides by `length` even when fewer entries exist. A zero average loss
/// yields exactly `50.0` rather than pinning to 100.
///
/// `None` if fewer than `length + 1` values are available.
pub fn rsi(values: &[f64], length: usize) -> Option<f64> {
    if length == 0 || values.len() < length + 1 {
        return None;
    }

    let mut gains = Vec::with_capacity(values.len() - 1);
    let mut losses = Vec::with_capacity(values.len() - 1);
    for pair in values.windows(2) {
        let change = pair[1] - pair[0];
        if change >= 0.0 {
            gains.push(change);
        } else {
            losses.push(-change);
        }
    }

    let avg_gain = tail_sum(&gains, length) / length as f64;
    let avg_loss = tail_sum(&losses, length) / length as f64;

    if avg_loss == 0.0 {
        return Some(50.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Average True Range: mean of the last `length` true ranges, where each
/// true range is `max(high - low, |high - prev_close|, |low - prev_close|)`.
///
/// `None` if fewer than `length + 1` candles are available.
pub fn atr<C: Ohlc>(candles: &[C], length: usize) -> Option<f64> {
    if length == 0 || candles.len() < length + 1 {
        return None;
    }

    let mut true_ranges = Vec::with_capacity(candles.len() - 1);
    for pair in candles.windows(2) {
        let prev_close = pair[0].close();
        let high = pair[1].high();
        let low = pair[1].low();
        let tr = (high - low)
            .max((high - prev_close).abs())
            .max((low - prev_close).abs());
        true_ranges.push(tr);
    }

    Some(tail_sum(&true_ranges, length) / length as f64)
}

/// Bollinger Bands over the last `length` values.
///
/// `middle` is the window mean, the bands sit `mult` population standard
/// deviations away. `None` if fewer than `length` values are available;
/// a flat window collapses all three onto the mean.
pub fn bollinger(values: &[f64], length: usize, mult: f64) -> Option<Bollinger> {
    if length == 0 || values.len() < length {
        return None;
    }

    let window = &values[values.len() - length..];
    let mean = window.iter().sum::<f64>() / length as f64;
    let variance = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / length as f64;
    let sd = variance.sqrt();

    Some(Bollinger {
        middle: mean,
        upper: mean + mult * sd,
        lower: mean - mult * sd,
    })
}

/// Sum of at most the last `length` entries.
fn tail_sum(values: &[f64], length: usize) -> f64 {
    let start = values.len().saturating_sub(length);
    values[start..].iter().sum()
}

// ============================================================
// TYPES
// ============================================================

/// Bollinger Band triple
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Bollinger {
    pub middle: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Fast/slow SMA crossover read
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSignal {
    Buy,
    Sell,
    Wait,
}

impl TrendSignal {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendSignal::Buy => "buy",
            TrendSignal::Sell => "sell",
            TrendSignal::Wait => "wait",
        }
    }
}

/// `Buy` if fast > slow, `Sell` if fast < slow, `Wait` on equality or when
/// either average is undefined.
pub fn trend_signal(sma_fast: Option<f64>, sma_slow: Option<f64>) -> TrendSignal {
    match (sma_fast, sma_slow) {
        (Some(fast), Some(slow)) if fast > slow => TrendSignal::Buy,
        (Some(fast), Some(slow)) if fast < slow => TrendSignal::Sell,
        _ => TrendSignal::Wait,
    }
}

/// All indicator readings for one candle sequence
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct IndicatorSnapshot {
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub atr: Option<f64>,
    pub bollinger: Option<Bollinger>,
    pub last_price: Option<f64>,
}

impl IndicatorSnapshot {
    /// Run every indicator the pipeline consumes over one candle sequence.
    pub fn compute<C: Ohlc>(candles: &[C], config: &AnalysisConfig) -> Self {
        let closes: Vec<f64> = candles.iter().map(|c| c.close()).collect();
        Self {
            sma_fast: sma(&closes, config.fast_length.get()),
            sma_slow: sma(&closes, config.slow_length.get()),
            rsi: rsi(&closes, config.rsi_length.get()),
            atr: atr(candles, config.atr_length.get()),
            bollinger: bollinger(&closes, config.bb_length.get(), config.bb_mult.get()),
            last_price: closes.last().copied(),
        }
    }
}

// ============================================================
// TESTS
// ============================================================
