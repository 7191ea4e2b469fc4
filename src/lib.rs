//! # candlecoach
//!
//! Market-structure, indicator and confluence analysis for OHLC candle series.
//!
//! Feed an ordered (oldest → newest) candle sequence through [`Analyzer::analyze`]
//! and get back one [`MarketSnapshot`]: moving averages, RSI, ATR, Bollinger
//! Bands, swing-point market structure (HH/HL/LH/LL), support/resistance
//! levels, break-of-structure state, a candlestick pattern read and a weighted
//! confluence score. The pipeline is pure and request-scoped: no I/O, no
//! shared state, no caching between calls. Fetching candles, serving HTTP and
//! calling AI-commentary providers are the host's job.
//!
//! ## Quick Start
//!
//! ```rust
//! use candlecoach::prelude::*;
//!
//! // A steady climb: 60 one-minute candles.
//! let candles: Vec<Candle> = (0..60)
//!     .map(|i| {
//!         let base = 1.1000 + i as f64 * 0.0004;
//!         Candle::new(i as i64 * 60, base, base + 0.0006, base - 0.0006, base + 0.0004)
//!     })
//!     .collect();
//!
//! let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
//! let snapshot = analyzer.analyze(&candles);
//!
//! assert_eq!(snapshot.signal, TrendSignal::Buy);
//! assert!(snapshot.indicators.rsi.is_some());
//! ```

pub mod bos;
pub mod config;
pub mod confluence;
pub mod indicators;
pub mod levels;
pub mod patterns;
pub mod structure;
pub mod summary;

pub mod prelude {
    pub use crate::{
        // Break of structure
        bos::{BosDirection, BosEvent, BosStatus},
        // Configuration
        config::{AnalysisConfig, SnrStrategy},
        // Confluence
        confluence::{ConfluenceResult, Side},
        // Indicators
        indicators::{
            atr, bollinger, rsi, sma, trend_signal, Bollinger, IndicatorSnapshot, TrendSignal,
        },
        // Support/resistance
        levels::{extract_levels, LevelTag, SnrLevel},
        // Patterns
        patterns::{classify_pattern, PatternResult},
        // Market structure
        structure::{Bias, LabeledPoint, MarketStructure, SwingKind, SwingLabel, SwingPoint, Trend},
        // Prompt rendering
        summary::prompt_text,
        // Parallel
        analyze_parallel,
        // Engine
        Analyzer,
        // Errors
        AnalysisError,
        // Types
        validate_candles,
        Candle,
        Direction,
        Factor,
        InstrumentSnapshot,
        MarketSnapshot,
        Ohlc,
        OhlcExt,
        Period,
        Ratio,
        Result,
    };
}

use tracing::debug;

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while configuring or validating input for analysis.
///
/// Running the pipeline itself never fails: insufficient data is expressed
/// through the documented `None`/neutral output shapes, not through errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Window length or sensitivity (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(AnalysisError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    /// Create a Period from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

/// Positive finite multiplier (e.g. Bollinger band width)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Factor(f64);

impl Factor {
    /// Create a new Factor, validating the value is finite and > 0
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(AnalysisError::InvalidValue(
                "Factor cannot be NaN or infinite",
            ));
        }
        if value <= 0.0 {
            return Err(AnalysisError::InvalidValue("Factor must be > 0"));
        }
        Ok(Self(value))
    }

    /// Create a Factor from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Factor {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Factor {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Factor::new(value).map_err(serde::de::Error::custom)
    }
}

/// Normalized value in range 0.0..=1.0 (pattern confidence)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ratio(f64);

impl Ratio {
    /// Create a new Ratio, validating the value is in [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(AnalysisError::InvalidValue(
                "Ratio cannot be NaN or infinite",
            ));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(AnalysisError::OutOfRange {
                field: "Ratio",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a Ratio from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Ratio {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Ratio {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Ratio::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLC TRAITS
// ============================================================

/// Core OHLC data trait.
///
/// Implement this for whatever bar type your market-data source produces;
/// the pipeline never requires a specific struct. Timestamps are optional
/// epoch seconds. Levels and swing points carry them through when present.
pub trait Ohlc {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;

    fn timestamp(&self) -> Option<i64> {
        None
    }
}

/// Extension trait with computed properties for OHLC data
pub trait OhlcExt: Ohlc {
    #[inline]
    fn body(&self) -> f64 {
        (self.close() - self.open()).abs()
    }

    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    #[inline]
    fn upper_wick(&self) -> f64 {
        self.high() - self.open().max(self.close())
    }

    #[inline]
    fn lower_wick(&self) -> f64 {
        self.open().min(self.close()) - self.low()
    }

    #[inline]
    fn is_bullish(&self) -> bool {
        self.close() > self.open()
    }

    #[inline]
    fn is_bearish(&self) -> bool {
        self.close() < self.open()
    }

    /// Body as ratio of range. Returns None if range ≈ 0
    #[inline]
    fn body_ratio(&self) -> Option<f64> {
        let range = self.range();
        (range > f64::EPSILON).then(|| self.body() / range)
    }

    /// Validate OHLC data consistency.
    ///
    /// The pipeline never calls this itself; it is offered so hosts can
    /// sanitize feeds before invoking the analyzer.
    fn validate(&self) -> Result<()> {
        if self.high() < self.low() {
            return Err(AnalysisError::InvalidCandle {
                index: 0,
                reason: "high < low",
            });
        }
        if self.open().is_nan()
            || self.high().is_nan()
            || self.low().is_nan()
            || self.close().is_nan()
        {
            return Err(AnalysisError::InvalidCandle {
                index: 0,
                reason: "NaN in OHLC",
            });
        }
        if self.open().is_infinite()
            || self.high().is_infinite()
            || self.low().is_infinite()
            || self.close().is_infinite()
        {
            return Err(AnalysisError::InvalidCandle {
                index: 0,
                reason: "Infinite value in OHLC",
            });
        }
        Ok(())
    }
}

impl<T: Ohlc> OhlcExt for T {}

/// Validate a whole candle sequence, reporting the index of the first bad bar.
pub fn validate_candles<C: Ohlc>(candles: &[C]) -> Result<()> {
    for (i, candle) in candles.iter().enumerate() {
        candle.validate().map_err(|e| match e {
            AnalysisError::InvalidCandle { reason, .. } => {
                AnalysisError::InvalidCandle { index: i, reason }
            }
            other => other,
        })?;
    }
    Ok(())
}

// ============================================================
// CANDLE
// ============================================================

/// One OHLC price bar for a fixed time interval.
///
/// Convenience concrete type; any [`Ohlc`] implementor works with the
/// pipeline. `time` is epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }
}

impl Ohlc for Candle {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn timestamp(&self) -> Option<i64> {
        Some(self.time)
    }
}

// ============================================================
// DIRECTION
// ============================================================

/// Direction/bias of a candlestick pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Bullish,
    Neutral,
    Bearish,
}

impl Direction {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Direction::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Direction::Bearish)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Bullish => "bullish",
            Direction::Neutral => "neutral",
            Direction::Bearish => "bearish",
        }
    }
}

// ============================================================
// SNAPSHOT
// ============================================================

use bos::BosEvent;
use config::AnalysisConfig;
use confluence::{score_confluence, ConfluenceResult};
use indicators::{trend_signal, IndicatorSnapshot, TrendSignal};
use levels::SnrLevel;
use patterns::PatternResult;
use structure::MarketStructure;

/// Aggregate result of one pipeline invocation.
///
/// This is the exact shape the presentation layer serializes; everything in
/// it is derived from the input candle sequence alone.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MarketSnapshot {
    pub last_price: Option<f64>,
    pub last_time: Option<i64>,
    pub signal: TrendSignal,
    pub indicators: IndicatorSnapshot,
    pub structure: MarketStructure,
    pub levels: Vec<SnrLevel>,
    pub bos: BosEvent,
    pub pattern: PatternResult,
    pub confluence: ConfluenceResult,
}

impl MarketSnapshot {
    /// The canonical "not enough data" snapshot: Wait signal, undefined
    /// indicators, unknown structure, no levels, no BOS, no pattern, and the
    /// neutral confluence the scorer derives from those defaults.
    pub fn insufficient() -> Self {
        let signal = TrendSignal::Wait;
        let indicators = IndicatorSnapshot::default();
        let structure = MarketStructure::insufficient();
        let bos = BosEvent::insufficient();
        let pattern = PatternResult::insufficient();
        let confluence = score_confluence(signal, &structure, &bos, &indicators, &pattern);
        Self {
            last_price: None,
            last_time: None,
            signal,
            indicators,
            structure,
            levels: Vec::new(),
            bos,
            pattern,
            confluence,
        }
    }
}

// ============================================================
// ANALYZER
// ============================================================

/// Pipeline entry point: a validated configuration plus [`Analyzer::analyze`].
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Build an analyzer, rejecting configurations that violate cross-field
    /// rules (e.g. a fast SMA window at least as long as the slow one).
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the full pipeline over an ordered (oldest → newest) candle
    /// sequence.
    ///
    /// Never fails: an empty sequence short-circuits to
    /// [`MarketSnapshot::insufficient`], and every component degrades to its
    /// documented undefined/neutral shape when the window is too short.
    pub fn analyze<C: Ohlc>(&self, candles: &[C]) -> MarketSnapshot {
        if candles.is_empty() {
            debug!("empty candle sequence, returning insufficient snapshot");
            return MarketSnapshot::insufficient();
        }

        let indicators = IndicatorSnapshot::compute(candles, &self.config);
        let signal = trend_signal(indicators.sma_fast, indicators.sma_slow);
        let structure = MarketStructure::detect(candles, self.config.structure_sensitivity.get());
        let levels = levels::extract_levels(&structure, self.config.snr_strategy);
        let bos = BosEvent::detect(&structure);
        let pattern = patterns::classify_pattern(candles);
        let confluence = score_confluence(signal, &structure, &bos, &indicators, &pattern);

        debug!(
            candles = candles.len(),
            signal = ?signal,
            trend = ?structure.trend,
            score = confluence.score,
            "analysis complete"
        );

        MarketSnapshot {
            last_price: indicators.last_price,
            last_time: candles.last().and_then(|c| c.timestamp()),
            signal,
            indicators,
            structure,
            levels,
            bos,
            pattern,
            confluence,
        }
    }
}

// ============================================================
// PARALLEL ANALYSIS
// ============================================================

use rayon::prelude::*;

/// Snapshot of a single instrument, tagged with its symbol
#[derive(Debug, Clone, serde::Serialize)]
pub struct InstrumentSnapshot {
    pub symbol: String,
    pub snapshot: MarketSnapshot,
}

/// Analyze multiple instruments in parallel.
///
/// Each instrument's candle sequence runs through the pipeline independently;
/// there is no error channel because [`Analyzer::analyze`] is infallible.
pub fn analyze_parallel<'a, C, I>(analyzer: &Analyzer, instruments: I) -> Vec<InstrumentSnapshot>
where
    C: Ohlc + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [C])>,
{
    instruments
        .into_par_iter()
        .map(|(symbol, candles)| InstrumentSnapshot {
            symbol: symbol.to_string(),
            snapshot: analyzer.analyze(candles),
        })
        .collect()
}

// ============================================================
// TESTS
// ============================================================
