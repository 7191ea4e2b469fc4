//! Support/resistance levels derived from market structure.
//!
//! Two extraction strategies, selected explicitly through
//! [`SnrStrategy`](crate::config::SnrStrategy) and never blended: the
//! label-based strategy republishes recent labeled swings as-is, the
//! clustered strategy buckets swing prices into zones and ranks the zones
//! by how often price touched them.

use std::collections::BTreeMap;

use crate::{
    config::SnrStrategy,
    structure::{MarketStructure, SwingKind, SwingLabel, SwingPoint},
};

/// Labeled points republished by the label-based strategy
const LABEL_LEVELS: usize = 6;
/// Zones kept per side by the clustered strategy
const CLUSTER_LEVELS_PER_SIDE: usize = 5;
/// Cluster bucket width: prices are rounded to 4 decimal places
const CLUSTER_SCALE: f64 = 10_000.0;

// ============================================================
// TYPES
// ============================================================

/// What a level represents: a ranked zone side, or the swing label the
/// level was lifted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LevelTag {
    #[serde(rename = "support")]
    Support,
    #[serde(rename = "resistance")]
    Resistance,
    H,
    L,
    HH,
    HL,
    LH,
    LL,
}

impl From<SwingLabel> for LevelTag {
    fn from(label: SwingLabel) -> Self {
        match label {
            SwingLabel::H => LevelTag::H,
            SwingLabel::L => LevelTag::L,
            SwingLabel::HH => LevelTag::HH,
            SwingLabel::HL => LevelTag::HL,
            SwingLabel::LH => LevelTag::LH,
            SwingLabel::LL => LevelTag::LL,
        }
    }
}

/// One support/resistance level
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SnrLevel {
    pub tag: LevelTag,
    pub price: f64,
    pub time: Option<i64>,
}

// ============================================================
// EXTRACTION
// ============================================================

/// Extract levels from a detected market structure. An empty structure
/// yields an empty list, never an error.
pub fn extract_levels(structure: &MarketStructure, strategy: SnrStrategy) -> Vec<SnrLevel> {
    match strategy {
        SnrStrategy::LabelBased => {
            let start = structure.points.len().saturating_sub(LABEL_LEVELS);
            structure.points[start..]
                .iter()
                .map(|p| SnrLevel {
                    tag: p.label.into(),
                    price: p.price,
                    time: p.time,
                })
                .collect()
        }
        SnrStrategy::Clustered => {
            let mut levels =
                cluster_side(&structure.swings, SwingKind::High, LevelTag::Resistance);
            levels.extend(cluster_side(
                &structure.swings,
                SwingKind::Low,
                LevelTag::Support,
            ));
            levels
        }
    }
}

struct Cluster {
    price: f64,
    count: usize,
    last_index: usize,
    last_time: Option<i64>,
}

/// Bucket one polarity's swing prices into rounded zones and rank them:
/// touch count descending, then most recent touch descending. The emitted
/// price and time are the bucket's rounded price and its latest touch.
fn cluster_side(swings: &[SwingPoint], kind: SwingKind, tag: LevelTag) -> Vec<SnrLevel> {
    let mut clusters: BTreeMap<i64, Cluster> = BTreeMap::new();

    for swing in swings.iter().filter(|s| s.kind == kind) {
        let key = (swing.price * CLUSTER_SCALE).round() as i64;
        let cluster = clusters.entry(key).or_insert(Cluster {
            price: key as f64 / CLUSTER_SCALE,
            count: 0,
            last_index: swing.index,
            last_time: swing.time,
        });
        cluster.count += 1;
        if swing.index >= cluster.last_index {
            cluster.last_index = swing.index;
            cluster.last_time = swing.time;
        }
    }

    let mut ranked: Vec<Cluster> = clusters.into_values().collect();
    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(b.last_index.cmp(&a.last_index))
    });
    ranked.truncate(CLUSTER_LEVELS_PER_SIDE);

    ranked
        .into_iter()
        .map(|c| SnrLevel {
            tag,
            price: c.price,
            time: c.last_time,
        })
        .collect()
}

// ============================================================
// TESTS
// ============================================================
