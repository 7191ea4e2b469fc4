//! Plain-text snapshot summary for AI-commentary prompts.
//!
//! Renders one [`MarketSnapshot`] into the multi-section text block a host
//! feeds to its commentary provider. Pure string assembly; the outbound
//! call and any prompt framing around this block belong to the transport
//! layer.

use std::fmt::Write as _;

use crate::MarketSnapshot;

fn opt_price(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.5}"),
        None => "n/a".to_string(),
    }
}

fn opt_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

/// Render the snapshot as a prompt-ready text block.
pub fn prompt_text(pair: &str, timeframe: &str, snapshot: &MarketSnapshot) -> String {
    let mut out = String::with_capacity(1024);

    let _ = writeln!(out, "=== {pair} {timeframe} market snapshot ===");
    let _ = match snapshot.last_time {
        Some(time) => writeln!(
            out,
            "Last price: {} (time {time})",
            opt_price(snapshot.last_price)
        ),
        None => writeln!(out, "Last price: {}", opt_price(snapshot.last_price)),
    };

    let ind = &snapshot.indicators;
    let _ = writeln!(out, "\nIndicators:");
    let _ = writeln!(
        out,
        "- SMA fast: {} | SMA slow: {}",
        opt_price(ind.sma_fast),
        opt_price(ind.sma_slow)
    );
    let _ = writeln!(out, "- RSI: {}", opt_value(ind.rsi));
    let _ = writeln!(out, "- ATR: {}", opt_price(ind.atr));
    let _ = match ind.bollinger {
        Some(bands) => writeln!(
            out,
            "- Bollinger: mid {:.5}, upper {:.5}, lower {:.5}",
            bands.middle, bands.upper, bands.lower
        ),
        None => writeln!(out, "- Bollinger: n/a"),
    };
    let _ = writeln!(out, "- MA crossover signal: {}", snapshot.signal.as_str());

    let structure = &snapshot.structure;
    let _ = writeln!(
        out,
        "\nMarket structure: {} ({})",
        structure.trend.as_str(),
        structure.bias.as_str()
    );
    let _ = writeln!(out, "- {}", structure.comment);

    let bos = &snapshot.bos;
    let _ = writeln!(
        out,
        "\nBreak of structure: {} (direction {})",
        bos.status.as_str(),
        bos.direction.as_str()
    );
    let _ = writeln!(out, "- {}", bos.note);

    let pattern = &snapshot.pattern;
    let _ = writeln!(
        out,
        "\nPattern: {} ({}, confidence {:.2})",
        pattern.name,
        pattern.direction.as_str(),
        pattern.confidence.get()
    );
    let _ = writeln!(out, "- {}", pattern.note);

    let confluence = &snapshot.confluence;
    let _ = writeln!(
        out,
        "\nConfluence: {:.1} -> {} (side {})",
        confluence.score,
        confluence.label,
        confluence.side.as_str()
    );
    for reason in &confluence.reasons {
        let _ = writeln!(out, "- {reason}");
    }
    let _ = writeln!(out, "Coaching: {}", confluence.coaching);

    out
}
