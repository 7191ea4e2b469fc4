//! Swing-point market structure: pivot detection, HH/HL/LH/LL labeling and
//! the trend/bias vote.
//!
//! A swing is a bar whose high (low) strictly dominates the bars
//! `sensitivity` positions to each side. Labels compare each swing only to
//! the previous swing of the same polarity; the two chains never interact.

use tracing::trace;

use crate::Ohlc;

/// Labeled points considered by the trend vote
const TREND_VOTE_WINDOW: usize = 8;
/// Directional labels required before a side can win the vote
const TREND_VOTE_MIN: usize = 4;

// ============================================================
// TYPES
// ============================================================

/// Pivot polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SwingKind {
    #[serde(rename = "swing_high")]
    High,
    #[serde(rename = "swing_low")]
    Low,
}

/// One detected pivot
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SwingPoint {
    pub kind: SwingKind,
    pub index: usize,
    pub time: Option<i64>,
    pub price: f64,
}

/// Structural label relative to the previous same-polarity swing.
///
/// `H`/`L` mark the first swing of a polarity; ties are not "higher", so an
/// equal high labels `LH` and an equal low labels `LL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SwingLabel {
    H,
    L,
    HH,
    HL,
    LH,
    LL,
}

impl SwingLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SwingLabel::H => "H",
            SwingLabel::L => "L",
            SwingLabel::HH => "HH",
            SwingLabel::HL => "HL",
            SwingLabel::LH => "LH",
            SwingLabel::LL => "LL",
        }
    }
}

impl std::fmt::Display for SwingLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A swing point plus its structural label
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LabeledPoint {
    pub kind: SwingKind,
    pub index: usize,
    pub time: Option<i64>,
    pub price: f64,
    pub label: SwingLabel,
}

/// Trend read from the recent label sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Uptrend,
    Downtrend,
    Sideways,
    Unknown,
}

/// Directional bias implied by the trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    BuyBias,
    SellBias,
    Neutral,
}

impl Bias {
    pub fn as_str(self) -> &'static str {
        match self {
            Bias::BuyBias => "buy_bias",
            Bias::SellBias => "sell_bias",
            Bias::Neutral => "neutral",
        }
    }
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Uptrend => "uptrend",
            Trend::Downtrend => "downtrend",
            Trend::Sideways => "sideways",
            Trend::Unknown => "unknown",
        }
    }

    pub fn bias(self) -> Bias {
        match self {
            Trend::Uptrend => Bias::BuyBias,
            Trend::Downtrend => Bias::SellBias,
            Trend::Sideways | Trend::Unknown => Bias::Neutral,
        }
    }

    pub fn comment(self) -> &'static str {
        match self {
            Trend::Uptrend => {
                "Structure prints higher highs and higher lows; pullbacks toward support are the higher-probability entries."
            }
            Trend::Downtrend => {
                "Structure prints lower highs and lower lows; rallies toward resistance are the higher-probability entries."
            }
            Trend::Sideways => {
                "Swings are mixed with no dominant sequence; expect range behavior until one side breaks structure."
            }
            Trend::Unknown => "Not enough candles to map swing structure; wait for more data.",
        }
    }
}

/// Full market-structure read for one candle sequence
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MarketStructure {
    pub trend: Trend,
    pub bias: Bias,
    pub points: Vec<LabeledPoint>,
    pub swings: Vec<SwingPoint>,
    pub comment: &'static str,
}

// ============================================================
// DETECTION
// ============================================================

impl MarketStructure {
    /// The guard result: unknown trend, neutral bias, nothing detected.
    pub fn insufficient() -> Self {
        Self {
            trend: Trend::Unknown,
            bias: Bias::Neutral,
            points: Vec::new(),
            swings: Vec::new(),
            comment: Trend::Unknown.comment(),
        }
    }

    /// Detect swings, label them, and vote the trend.
    ///
    /// Needs at least `sensitivity * 2 + 5` candles; shorter sequences (and
    /// a zero sensitivity) return [`MarketStructure::insufficient`].
    pub fn detect<C: Ohlc>(candles: &[C], sensitivity: usize) -> Self {
        if sensitivity == 0 || candles.len() < sensitivity * 2 + 5 {
            return Self::insufficient();
        }

        let swings = scan_swings(candles, sensitivity);
        trace!(
            candles = candles.len(),
            swings = swings.len(),
            "swing scan complete"
        );

        let points = label_swings(&swings);
        let trend = vote_trend(&points);

        Self {
            trend,
            bias: trend.bias(),
            points,
            swings,
            comment: trend.comment(),
        }
    }
}

/// Strict bookend pivot scan. Only the bars exactly `sensitivity` positions
/// away participate in the comparison; the bars between them do not. A bar
/// can be both a swing high and a swing low (the high entry comes first).
fn scan_swings<C: Ohlc>(candles: &[C], sensitivity: usize) -> Vec<SwingPoint> {
    let s = sensitivity;
    let mut swings = Vec::new();

    for i in s..candles.len() - s {
        let candle = &candles[i];

        if candle.high() > candles[i - s].high() && candle.high() > candles[i + s].high() {
            swings.push(SwingPoint {
                kind: SwingKind::High,
                index: i,
                time: candle.timestamp(),
                price: candle.high(),
            });
        }
        if candle.low() < candles[i - s].low() && candle.low() < candles[i + s].low() {
            swings.push(SwingPoint {
                kind: SwingKind::Low,
                index: i,
                time: candle.timestamp(),
                price: candle.low(),
            });
        }
    }

    swings
}

/// Label each swing against the previous swing of the same polarity.
fn label_swings(swings: &[SwingPoint]) -> Vec<LabeledPoint> {
    let mut points = Vec::with_capacity(swings.len());
    let mut last_high: Option<f64> = None;
    let mut last_low: Option<f64> = None;

    for swing in swings {
        let label = match swing.kind {
            SwingKind::High => {
                let label = match last_high {
                    None => SwingLabel::H,
                    Some(prev) if swing.price > prev => SwingLabel::HH,
                    Some(_) => SwingLabel::LH,
                };
                last_high = Some(swing.price);
                label
            }
            SwingKind::Low => {
                let label = match last_low {
                    None => SwingLabel::L,
                    Some(prev) if swing.price > prev => SwingLabel::HL,
                    Some(_) => SwingLabel::LL,
                };
                last_low = Some(swing.price);
                label
            }
        };

        points.push(LabeledPoint {
            kind: swing.kind,
            index: swing.index,
            time: swing.time,
            price: swing.price,
            label,
        });
    }

    points
}

/// Majority vote over the labels of the most recent points. Bare `H`/`L`
/// count toward neither side.
fn vote_trend(points: &[LabeledPoint]) -> Trend {
    let start = points.len().saturating_sub(TREND_VOTE_WINDOW);
    let recent = &points[start..];

    let up = recent
        .iter()
        .filter(|p| matches!(p.label, SwingLabel::HH | SwingLabel::HL))
        .count();
    let down = recent
        .iter()
        .filter(|p| matches!(p.label, SwingLabel::LH | SwingLabel::LL))
        .count();

    if up >= TREND_VOTE_MIN && up > down {
        Trend::Uptrend
    } else if down >= TREND_VOTE_MIN && down > up {
        Trend::Downtrend
    } else {
        Trend::Sideways
    }
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Candle;

    /// Triangle wave (period 4, amplitude 2) with a linear drift. With
    /// sensitivity 2 and |slope| < 1 every crest is a swing high, every
    /// trough a swing low, and the edge bars never qualify.
    fn make_zigzag(n: usize, slope: f64) -> Vec<Candle> {
        const TRI: [f64; 4] = [0.0, 1.0, 2.0, 1.0];
        (0..n)
            .map(|i| {
                let close = 100.0 + TRI[i % 4] + slope * i as f64;
                Candle::new(i as i64 * 60, close, close + 0.3, close - 0.3, close)
            })
            .collect()
    }

    fn point(kind: SwingKind, index: usize, price: f64) -> SwingPoint {
        SwingPoint {
            kind,
            index,
            time: Some(index as i64 * 60),
            price,
        }
    }

    #[test]
    fn test_guard_too_short() {
        let candles = make_zigzag(8, 0.4); // needs 2*2 + 5 = 9
        let structure = MarketStructure::detect(&candles, 2);
        assert_eq!(structure.trend, Trend::Unknown);
        assert_eq!(structure.bias, Bias::Neutral);
        assert!(structure.points.is_empty());
        assert!(structure.swings.is_empty());
        assert!(!structure.comment.is_empty());
    }

    #[test]
    fn test_guard_zero_sensitivity() {
        let candles = make_zigzag(50, 0.4);
        let structure = MarketStructure::detect(&candles, 0);
        assert_eq!(structure.trend, Trend::Unknown);
    }

    #[test]
    fn test_scan_finds_single_peak() {
        // Single hump: highs rise to index 3 then fall away.
        let highs = [1.0, 2.0, 3.0, 5.0, 3.0, 2.0, 1.0, 1.0, 1.0];
        let candles: Vec<Candle> = highs
            .iter()
            .enumerate()
            .map(|(i, &h)| Candle::new(i as i64 * 60, h - 0.5, h, h - 1.0, h - 0.5))
            .collect();

        let structure = MarketStructure::detect(&candles, 2);
        let high_swings: Vec<_> = structure
            .swings
            .iter()
            .filter(|s| s.kind == SwingKind::High)
            .collect();
        assert_eq!(high_swings.len(), 1);
        assert_eq!(high_swings[0].index, 3);
        assert_eq!(high_swings[0].price, 5.0);
        assert_eq!(high_swings[0].time, Some(180));
    }

    #[test]
    fn test_scan_strict_comparison_rejects_plateau() {
        // Bars 3 and 5 share the top; neither strictly beats the other at
        // distance 2 from index 3 or 5... index 4 dips so check index 3 vs 5.
        let highs = [1.0, 2.0, 5.0, 4.0, 5.0, 4.0, 5.0, 2.0, 1.0];
        let candles: Vec<Candle> = highs
            .iter()
            .enumerate()
            .map(|(i, &h)| Candle::new(i as i64 * 60, h - 0.5, h, h - 1.0, h - 0.5))
            .collect();

        let structure = MarketStructure::detect(&candles, 2);
        // Indexes 2, 4 and 6 all carry high 5.0: each sees an equal high at
        // bookend distance, so none qualifies.
        assert!(structure
            .swings
            .iter()
            .all(|s| s.kind != SwingKind::High || s.price < 5.0));
    }

    #[test]
    fn test_scan_bookends_only() {
        // Index 4 beats indexes 2 and 6 but NOT its immediate neighbors;
        // the in-between bars are not consulted.
        let highs = [1.0, 1.0, 2.0, 9.0, 3.0, 9.0, 2.0, 1.0, 1.0];
        let candles: Vec<Candle> = highs
            .iter()
            .enumerate()
            .map(|(i, &h)| Candle::new(i as i64 * 60, h - 0.5, h, h - 1.0, h - 0.5))
            .collect();

        let structure = MarketStructure::detect(&candles, 2);
        assert!(structure
            .swings
            .iter()
            .any(|s| s.kind == SwingKind::High && s.index == 4 && s.price == 3.0));
    }

    #[test]
    fn test_scan_same_bar_both_kinds_high_first() {
        // One wide-range bar dominating both directions at distance 1.
        let candles = vec![
            Candle::new(0, 5.0, 5.5, 4.5, 5.0),
            Candle::new(60, 5.0, 9.0, 1.0, 5.0),
            Candle::new(120, 5.0, 5.5, 4.5, 5.0),
            Candle::new(180, 5.0, 5.5, 4.5, 5.0),
            Candle::new(240, 5.0, 5.5, 4.5, 5.0),
            Candle::new(300, 5.0, 5.5, 4.5, 5.0),
            Candle::new(360, 5.0, 5.5, 4.5, 5.0),
        ];
        let structure = MarketStructure::detect(&candles, 1);
        assert_eq!(structure.swings.len(), 2);
        assert_eq!(structure.swings[0].kind, SwingKind::High);
        assert_eq!(structure.swings[0].index, 1);
        assert_eq!(structure.swings[1].kind, SwingKind::Low);
        assert_eq!(structure.swings[1].index, 1);
    }

    #[test]
    fn test_labels_first_swings_bare() {
        let swings = vec![
            point(SwingKind::High, 3, 10.0),
            point(SwingKind::Low, 6, 5.0),
        ];
        let points = label_swings(&swings);
        assert_eq!(points[0].label, SwingLabel::H);
        assert_eq!(points[1].label, SwingLabel::L);
    }

    #[test]
    fn test_labels_high_chain() {
        let swings = vec![
            point(SwingKind::High, 3, 10.0),
            point(SwingKind::High, 9, 12.0),  // higher -> HH
            point(SwingKind::High, 15, 11.0), // lower  -> LH
            point(SwingKind::High, 21, 11.0), // equal  -> LH
        ];
        let labels: Vec<_> = label_swings(&swings).iter().map(|p| p.label).collect();
        assert_eq!(
            labels,
            vec![SwingLabel::H, SwingLabel::HH, SwingLabel::LH, SwingLabel::LH]
        );
    }

    #[test]
    fn test_labels_low_chain() {
        let swings = vec![
            point(SwingKind::Low, 3, 10.0),
            point(SwingKind::Low, 9, 12.0),  // higher -> HL
            point(SwingKind::Low, 15, 9.0),  // lower  -> LL
            point(SwingKind::Low, 21, 9.0),  // equal  -> LL
        ];
        let labels: Vec<_> = label_swings(&swings).iter().map(|p| p.label).collect();
        assert_eq!(
            labels,
            vec![SwingLabel::L, SwingLabel::HL, SwingLabel::LL, SwingLabel::LL]
        );
    }

    #[test]
    fn test_labels_polarities_independent() {
        // A low between two highs never affects the high chain.
        let swings = vec![
            point(SwingKind::High, 3, 10.0),
            point(SwingKind::Low, 6, 2.0),
            point(SwingKind::High, 9, 12.0),
        ];
        let points = label_swings(&swings);
        assert_eq!(points[2].label, SwingLabel::HH);
    }

    #[test]
    fn test_vote_needs_minimum() {
        // 3 up labels is below the minimum even unopposed.
        let swings = vec![
            point(SwingKind::High, 1, 10.0),
            point(SwingKind::High, 4, 11.0),
            point(SwingKind::High, 7, 12.0),
            point(SwingKind::High, 10, 13.0),
        ];
        let points = label_swings(&swings); // H, HH, HH, HH -> up = 3
        assert_eq!(vote_trend(&points), Trend::Sideways);
    }

    #[test]
    fn test_vote_tie_is_sideways() {
        let swings = vec![
            point(SwingKind::High, 1, 10.0),
            point(SwingKind::Low, 2, 1.0),
            point(SwingKind::High, 4, 11.0), // HH
            point(SwingKind::High, 6, 12.0), // HH
            point(SwingKind::High, 8, 13.0), // HH
            point(SwingKind::High, 10, 14.0), // HH
            point(SwingKind::Low, 12, 0.9),  // LL
            point(SwingKind::Low, 14, 0.8),  // LL
            point(SwingKind::Low, 16, 0.7),  // LL
            point(SwingKind::Low, 18, 0.6),  // LL
        ];
        let points = label_swings(&swings);
        // Last 8 points: 4 HH vs 4 LL.
        assert_eq!(vote_trend(&points), Trend::Sideways);
    }

    #[test]
    fn test_vote_window_ignores_old_labels() {
        // 8 early down labels pushed out of the window by 8 later up labels.
        let mut swings = Vec::new();
        for i in 0..9 {
            swings.push(point(SwingKind::High, i * 2, 100.0 - i as f64));
        }
        for i in 0..8 {
            swings.push(point(SwingKind::High, 100 + i * 2, 110.0 + i as f64));
        }
        let points = label_swings(&swings);
        assert_eq!(vote_trend(&points), Trend::Uptrend);
    }

    #[test]
    fn test_detect_uptrend_end_to_end() {
        let candles = make_zigzag(40, 0.4);
        let structure = MarketStructure::detect(&candles, 2);
        assert_eq!(structure.trend, Trend::Uptrend);
        assert_eq!(structure.bias, Bias::BuyBias);
        assert!(!structure.points.is_empty());
        assert_eq!(structure.points.len(), structure.swings.len());
    }

    #[test]
    fn test_detect_downtrend_end_to_end() {
        let candles = make_zigzag(40, -0.4);
        let structure = MarketStructure::detect(&candles, 2);
        assert_eq!(structure.trend, Trend::Downtrend);
        assert_eq!(structure.bias, Bias::SellBias);
    }

    #[test]
    fn test_detect_flat_series_is_sideways() {
        let candles: Vec<Candle> = (0..30)
            .map(|i| Candle::new(i as i64 * 60, 5.0, 5.0, 5.0, 5.0))
            .collect();
        let structure = MarketStructure::detect(&candles, 2);
        assert_eq!(structure.trend, Trend::Sideways);
        assert!(structure.swings.is_empty());
    }
}
