//! Weighted confluence scoring.
//!
//! Starts from a neutral 50 and lets each component push the score its way:
//! signal ±8, structure ±10, BOS ±7, RSI ±4, Bollinger position ±2, pattern
//! ±(confidence × 10). Rules apply in that fixed order and each applied rule
//! appends one human-readable reason. The final score is clamped to [0, 100]
//! and rounded to one decimal before the side/label thresholds are read.

use crate::{
    bos::{BosEvent, BosStatus},
    indicators::{IndicatorSnapshot, TrendSignal},
    patterns::PatternResult,
    structure::{MarketStructure, Trend},
    Direction,
};

const BASE_SCORE: f64 = 50.0;
const WEIGHT_SIGNAL: f64 = 8.0;
const WEIGHT_STRUCTURE: f64 = 10.0;
const WEIGHT_BOS: f64 = 7.0;
const WEIGHT_RSI: f64 = 4.0;
const WEIGHT_BAND: f64 = 2.0;
const PATTERN_SCALE: f64 = 10.0;

const RSI_BULL: f64 = 55.0;
const RSI_BEAR: f64 = 45.0;

const STRONG_AT: f64 = 80.0;
const WEAK_AT: f64 = 60.0;
const NEUTRAL_ABOVE: f64 = 40.0;

// ============================================================
// TYPES
// ============================================================

/// Side of the market the score leans toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
    Neutral,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
            Side::Neutral => "neutral",
        }
    }
}

/// Aggregate confluence read
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConfluenceResult {
    pub score: f64,
    pub side: Side,
    pub label: &'static str,
    pub reasons: Vec<String>,
    pub coaching: &'static str,
}

// ============================================================
// SCORING
// ============================================================

/// Score one snapshot's worth of component outputs.
///
/// Undefined indicators never move the score; they are skipped with an
/// explicit "unavailable" reason so the reason list always explains what
/// was and was not considered.
pub fn score_confluence(
    signal: TrendSignal,
    structure: &MarketStructure,
    bos: &BosEvent,
    indicators: &IndicatorSnapshot,
    pattern: &PatternResult,
) -> ConfluenceResult {
    let mut score = BASE_SCORE;
    let mut reasons: Vec<String> = Vec::new();

    match signal {
        TrendSignal::Buy => {
            score += WEIGHT_SIGNAL;
            reasons.push("Fast MA above slow MA (bullish pressure).".to_string());
        }
        TrendSignal::Sell => {
            score -= WEIGHT_SIGNAL;
            reasons.push("Fast MA below slow MA (bearish pressure).".to_string());
        }
        TrendSignal::Wait => {
            reasons.push("Fast and slow MAs give no clear edge.".to_string());
        }
    }

    match structure.trend {
        Trend::Uptrend => {
            score += WEIGHT_STRUCTURE;
            reasons.push(
                "Market structure prints an uptrend (higher highs and higher lows).".to_string(),
            );
        }
        Trend::Downtrend => {
            score -= WEIGHT_STRUCTURE;
            reasons.push(
                "Market structure prints a downtrend (lower highs and lower lows).".to_string(),
            );
        }
        Trend::Sideways | Trend::Unknown => {
            reasons.push("Market structure is unclear; extra caution warranted.".to_string());
        }
    }

    match bos.status {
        BosStatus::BosUp => {
            score += WEIGHT_BOS;
            reasons.push("Break of structure to the upside.".to_string());
        }
        BosStatus::BosDown => {
            score -= WEIGHT_BOS;
            reasons.push("Break of structure to the downside.".to_string());
        }
        BosStatus::None => {}
    }

    match indicators.rsi {
        Some(rsi) if rsi > RSI_BULL => {
            score += WEIGHT_RSI;
            reasons.push(format!("RSI {rsi:.1} shows bullish momentum."));
        }
        Some(rsi) if rsi < RSI_BEAR => {
            score -= WEIGHT_RSI;
            reasons.push(format!("RSI {rsi:.1} shows bearish momentum."));
        }
        Some(rsi) => {
            reasons.push(format!("RSI {rsi:.1} is neutral."));
        }
        None => {
            reasons.push("RSI unavailable on this window.".to_string());
        }
    }

    match (indicators.bollinger, indicators.last_price) {
        (Some(bands), Some(price)) => {
            if price > bands.middle {
                score += WEIGHT_BAND;
                reasons.push("Price holding above the Bollinger mid-band.".to_string());
            } else if price < bands.middle {
                score -= WEIGHT_BAND;
                reasons.push("Price holding below the Bollinger mid-band.".to_string());
            }
            // exactly on the mid-band adjusts nothing
        }
        _ => {
            reasons.push("Bollinger Bands unavailable on this window.".to_string());
        }
    }

    match pattern.direction {
        Direction::Bullish => {
            score += pattern.confidence.get() * PATTERN_SCALE;
            reasons.push(format!("Bullish candlestick pattern: {}.", pattern.name));
        }
        Direction::Bearish => {
            score -= pattern.confidence.get() * PATTERN_SCALE;
            reasons.push(format!("Bearish candlestick pattern: {}.", pattern.name));
        }
        Direction::Neutral => {}
    }

    let score = (score.clamp(0.0, 100.0) * 10.0).round() / 10.0;

    let (side, label) = if score >= STRONG_AT {
        if signal == TrendSignal::Sell {
            (Side::Sell, "Strong Sell")
        } else {
            (Side::Buy, "Strong Buy")
        }
    } else if score >= WEAK_AT {
        if signal == TrendSignal::Sell {
            (Side::Sell, "Weak Sell")
        } else {
            (Side::Buy, "Weak Buy")
        }
    } else if score > NEUTRAL_ABOVE {
        (Side::Neutral, "Neutral / balanced")
    } else {
        // weak-setup fade: the emitted side opposes the raw signal
        let side = match signal {
            TrendSignal::Buy => Side::Sell,
            TrendSignal::Sell => Side::Buy,
            TrendSignal::Wait => Side::Sell,
        };
        (side, "Weak setup (avoid aggressive entries)")
    };

    let coaching = match side {
        Side::Buy => {
            "Look for long setups: pullbacks into support or bullish confirmation candles."
        }
        Side::Sell => {
            "Look for short setups: rallies into resistance or bearish confirmation candles."
        }
        Side::Neutral => "Stand aside or trade small; wait for the market to pick a side.",
    };

    ConfluenceResult {
        score,
        side,
        label,
        reasons,
        coaching,
    }
}

// ============================================================
// TESTS
// ============================================================
