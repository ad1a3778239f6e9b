//! Human-readable alert text for a signal.

use chrono::DateTime;

use crate::config::QuoteCurrency;
use crate::types::{Confirmation, RuleTag, Signal};

/// Render a price with thousands separators in the quote currency,
/// e.g. `$1,234.56` or `1,234 IDR`.
pub fn format_price(value: f64, currency: &QuoteCurrency) -> String {
    let negative = value < 0.0;
    let fixed = format!("{:.*}", currency.decimals, value.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    let sign = if negative { "-" } else { "" };
    match &currency.prefix {
        Some(prefix) => format!("{}{}{}", sign, prefix, grouped),
        None => format!("{}{} {}", sign, grouped, currency.code),
    }
}

fn optional_price(value: Option<f64>, currency: &QuoteCurrency) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format_price(v, currency))
}

fn rsi_zone(signal: &Signal) -> &'static str {
    if signal.breakdown.contains(RuleTag::Overbought) {
        "OVERBOUGHT"
    } else if signal.breakdown.contains(RuleTag::Oversold) {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    }
}

/// Alert message for a signal, optionally with the confirmation summary.
pub fn format_signal_message(
    signal: &Signal,
    confirmation: Option<&Confirmation>,
    currency: &QuoteCurrency,
) -> String {
    let ind = &signal.indicators;
    let when = DateTime::from_timestamp_millis(signal.timestamp)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_default();

    let rsi = ind
        .rsi
        .map_or_else(|| "n/a".to_string(), |r| format!("{:.0} ({})", r, rsi_zone(signal)));
    let volume_ratio = ind
        .volume_ratio
        .map_or_else(|| "n/a".to_string(), |r| format!("{:.1}x", r));

    let mut lines = vec![
        format!("{} Signal | {} | {}", signal.symbol, signal.profile.name(), when),
        String::new(),
        format!("{} {} | {}", signal.direction, signal.strength, signal.reason),
        format!(
            "Price: {} ({:+.2}%)",
            format_price(signal.price, currency),
            ind.price_change_pct.unwrap_or(0.0)
        ),
        format!("Vol: {} | RSI: {}", volume_ratio, rsi),
        format!(
            "SMA: {} / {}",
            optional_price(ind.sma_short, currency),
            optional_price(ind.sma_long, currency)
        ),
    ];

    if signal.direction.is_directional() {
        lines.push(format!(
            "SL: {} | TP: {} | R/R: {:.2}",
            format_price(signal.stop_loss(), currency),
            format_price(signal.take_profit(), currency),
            signal.risk_reward()
        ));
    }

    let patterns = signal.patterns.detected();
    if !patterns.is_empty() {
        lines.push(format!("Patterns: {}", patterns.join(", ")));
    }

    lines.push(format!(
        "Valid: {} | Confidence: {}% | {}",
        if signal.valid { "Yes" } else { "No" },
        signal.confidence,
        signal.strength
    ));

    if let Some(c) = confirmation {
        lines.push(format!(
            "AI Summary: {} | {:.0}% | risk {}",
            c.recommendation.label(),
            c.confidence * 100.0,
            c.risk_assessment.label()
        ));
    }

    lines.push(String::new());
    lines.push("Educational purposes only. DYOR!".to_string());

    lines.join("\n")
}
