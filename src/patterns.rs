//! Candlestick pattern classification over the last three candles.
//!
//! Exactly one result per invocation: checks run in a fixed priority order
//! (doji, engulfing, pin bar) and the first match wins. Indecision is
//! deliberately ranked above reversal shapes, so a tiny-bodied candle reads
//! as a doji even when it technically engulfs its predecessor.

use crate::{Direction, Ohlc, OhlcExt, Ratio};

/// Doji: body must stay under this share of the candle range
const DOJI_MAX_BODY_RATIO: f64 = 0.15;
/// Engulfing: the engulfing body must be at least this multiple of the prior body
const ENGULF_MIN_BODY_FACTOR: f64 = 1.2;
/// Pin bar: the dominant wick must exceed this multiple of the body
const PIN_DOMINANT_WICK: f64 = 1.5;
/// Pin bar: the opposite wick must stay under this multiple of the body
const PIN_OPPOSITE_WICK: f64 = 0.5;

const CONF_DOJI: Ratio = Ratio::new_const(0.5);
const CONF_ENGULF_CONTEXT: Ratio = Ratio::new_const(0.85);
const CONF_ENGULF_BASE: Ratio = Ratio::new_const(0.65);
const CONF_PIN: Ratio = Ratio::new_const(0.6);
const CONF_DEFAULT: Ratio = Ratio::new_const(0.2);

const NOTE_DOJI: &str = "Open and close are nearly equal; the market is undecided.";
const NOTE_BULL_ENGULF: &str =
    "A bullish body swallowed the prior bearish body; buyers took control.";
const NOTE_BEAR_ENGULF: &str =
    "A bearish body swallowed the prior bullish body; sellers took control.";
const NOTE_BULL_PIN: &str = "Long lower wick with a small body; sellers were rejected.";
const NOTE_BEAR_PIN: &str = "Long upper wick with a small body; buyers were rejected.";
const NOTE_DEFAULT: &str = "No classic reversal shape on the last candle.";
const NOTE_INSUFFICIENT: &str =
    "Fewer than three candles; pattern classification needs more history.";

// ============================================================
// TYPES
// ============================================================

/// Result of one pattern classification
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PatternResult {
    pub name: &'static str,
    pub direction: Direction,
    pub confidence: Ratio,
    pub note: &'static str,
}

impl PatternResult {
    /// The short-history result: neutral, zero confidence.
    pub fn insufficient() -> Self {
        Self {
            name: "No strong pattern",
            direction: Direction::Neutral,
            confidence: Ratio::new_const(0.0),
            note: NOTE_INSUFFICIENT,
        }
    }
}

// ============================================================
// PREDICATES
// ============================================================

#[inline]
fn is_doji<C: Ohlc>(candle: &C) -> bool {
    // body_ratio is None on a zero-range candle, which is not a doji here
    match candle.body_ratio() {
        Some(ratio) => ratio < DOJI_MAX_BODY_RATIO,
        None => false,
    }
}

#[inline]
fn is_bullish_engulfing<C: Ohlc>(prev: &C, last: &C) -> bool {
    prev.is_bearish()
        && last.is_bullish()
        && last.open() <= prev.close()
        && last.close() >= prev.open()
        && last.body() >= ENGULF_MIN_BODY_FACTOR * prev.body()
}

#[inline]
fn is_bearish_engulfing<C: Ohlc>(prev: &C, last: &C) -> bool {
    prev.is_bullish()
        && last.is_bearish()
        && last.open() >= prev.close()
        && last.close() <= prev.open()
        && last.body() >= ENGULF_MIN_BODY_FACTOR * prev.body()
}

#[inline]
fn is_bullish_pin<C: Ohlc>(candle: &C) -> bool {
    candle.lower_wick() > PIN_DOMINANT_WICK * candle.body()
        && candle.upper_wick() < PIN_OPPOSITE_WICK * candle.body()
}

#[inline]
fn is_bearish_pin<C: Ohlc>(candle: &C) -> bool {
    candle.upper_wick() > PIN_DOMINANT_WICK * candle.body()
        && candle.lower_wick() < PIN_OPPOSITE_WICK * candle.body()
}

// ============================================================
// CLASSIFICATION
// ============================================================

/// Classify the last three candles of the sequence.
///
/// Fewer than three candles yields [`PatternResult::insufficient`]. The
/// engulfing confidence is raised when the candle before the pattern agrees
/// with the reversal context (a decline into a bullish engulfing, a rally
/// into a bearish one).
pub fn classify_pattern<C: Ohlc>(candles: &[C]) -> PatternResult {
    if candles.len() < 3 {
        return PatternResult::insufficient();
    }

    let n = candles.len();
    let first = &candles[n - 3];
    let prev = &candles[n - 2];
    let last = &candles[n - 1];

    if is_doji(last) {
        return PatternResult {
            name: "Doji",
            direction: Direction::Neutral,
            confidence: CONF_DOJI,
            note: NOTE_DOJI,
        };
    }

    if is_bullish_engulfing(prev, last) {
        let confidence = if prev.close() < first.close() {
            CONF_ENGULF_CONTEXT
        } else {
            CONF_ENGULF_BASE
        };
        return PatternResult {
            name: "Bullish Engulfing",
            direction: Direction::Bullish,
            confidence,
            note: NOTE_BULL_ENGULF,
        };
    }

    if is_bearish_engulfing(prev, last) {
        let confidence = if prev.close() > first.close() {
            CONF_ENGULF_CONTEXT
        } else {
            CONF_ENGULF_BASE
        };
        return PatternResult {
            name: "Bearish Engulfing",
            direction: Direction::Bearish,
            confidence,
            note: NOTE_BEAR_ENGULF,
        };
    }

    if is_bullish_pin(last) {
        return PatternResult {
            name: "Bullish Pin Bar (Hammer)",
            direction: Direction::Bullish,
            confidence: CONF_PIN,
            note: NOTE_BULL_PIN,
        };
    }

    if is_bearish_pin(last) {
        return PatternResult {
            name: "Bearish Pin Bar (Shooting Star)",
            direction: Direction::Bearish,
            confidence: CONF_PIN,
            note: NOTE_BEAR_PIN,
        };
    }

    PatternResult {
        name: "No strong pattern",
        direction: Direction::Neutral,
        confidence: CONF_DEFAULT,
        note: NOTE_DEFAULT,
    }
}

// ============================================================
// TESTS
// ============================================================
