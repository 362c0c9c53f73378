//! Plain-text analysis report.
//!
//! Layout is fixed: a boxed header with the symbol and generation time, the
//! caller's analysis text verbatim, then a static recommendation and
//! disclaimer. Downstream consumers pattern-match on the static lines, so
//! they must not change.

use chrono::NaiveDateTime;
use std::fmt::Write;

use crate::domain::error::AnalysisError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BOX_TOP: &str = "╔════════════════════════════════════════════════════════════╗";
const BOX_TITLE: &str = "║           STOCK MARKET ANALYSIS REPORT                     ║";
const SYMBOL_PREFIX: &str = "║           Symbol: ";
const SYMBOL_SUFFIX: &str = "                                    ║";
const GENERATED_PREFIX: &str = "║           Generated: ";
const GENERATED_SUFFIX: &str = "                  ║";
const BOX_BOTTOM: &str = "╚════════════════════════════════════════════════════════════╝";

const FOOTER: &str = "\
RECOMMENDATION:
Based on the time series analysis, technical indicators, and trend
forecasting, this report provides actionable insights for trading
decisions. Always consult with a financial advisor before trading.

DISCLAIMER:
This analysis is for educational purposes only and should not be
considered as financial advice. Past performance does not guarantee
future results.
";

/// Build the full text report around `body`.
///
/// A blank `symbol` is rejected as a `FormattingFault` rather than printed
/// as an empty header line.
pub fn assemble(
    symbol: &str,
    body: &str,
    generated_at: NaiveDateTime,
) -> Result<String, AnalysisError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(AnalysisError::FormattingFault {
            reason: "symbol is empty".to_string(),
        });
    }

    let mut out = String::with_capacity(FOOTER.len() + body.len() + 512);
    writeln!(out)?;
    writeln!(out, "{}", BOX_TOP)?;
    writeln!(out, "{}", BOX_TITLE)?;
    writeln!(out, "{}{}{}", SYMBOL_PREFIX, symbol.to_uppercase(), SYMBOL_SUFFIX)?;
    writeln!(
        out,
        "{}{}{}",
        GENERATED_PREFIX,
        generated_at.format(TIMESTAMP_FORMAT),
        GENERATED_SUFFIX
    )?;
    writeln!(out, "{}", BOX_BOTTOM)?;
    writeln!(out)?;
    writeln!(out, "ANALYSIS SUMMARY:")?;
    writeln!(out, "{}", body)?;
    writeln!(out)?;
    out.push_str(FOOTER);
    Ok(out)
}

/// Like [`assemble`], but reports a failure as text instead of an error.
pub fn render(symbol: &str, body: &str, generated_at: NaiveDateTime) -> String {
    assemble(symbol, body, generated_at)
        .unwrap_or_else(|e| format!("Error generating report: {}", e))
}
