use crate::lines::{DATE_RE, DECIMAL_RE};
use crate::schema::{Transaction, TransactionKind};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Conventional negative notation: an opening parenthesis directly followed
/// by a figure, e.g. `(4,000.00)`.
static PAREN_NEG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*\d").unwrap());

/// Why a transaction-labeled line was dropped. Skips are diagnostics, not
/// failures: the document parse carries on without the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseSkip {
    MissingDate,
    InvalidDate,
    InsufficientNumerics,
    ZeroUnits,
}

fn month_from_abbrev(abbrev: &str) -> Option<u32> {
    match abbrev.to_ascii_lowercase().as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

/// Extracts every decimal-formatted numeric token in order of appearance,
/// stripping thousands separators. Magnitudes only; sign is never encoded
/// numerically in these statements.
pub fn extract_numeric_tokens(text: &str) -> Vec<f64> {
    DECIMAL_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok())
        .map(f64::abs)
        .collect()
}

/// The field-ordering policy for positionally ambiguous numeric columns.
///
/// Statements carry no column headers, so assignment is by arity:
/// - 2 tokens: `(amount, units)`, price derived as `amount / units`
/// - 3+ tokens: first is `amount`, second is `price`, and the *last* is
///   `units` (trailing columns are running balances/units in practice)
///
/// New statement-format variants should add arity branches here rather than
/// inline conditionals at call sites.
pub fn assign_fields(tokens: &[f64]) -> Result<(f64, f64, f64), ParseSkip> {
    match tokens.len() {
        0 | 1 => Err(ParseSkip::InsufficientNumerics),
        2 => {
            let (amount, units) = (tokens[0], tokens[1]);
            if units == 0.0 {
                return Err(ParseSkip::ZeroUnits);
            }
            Ok((amount, units, amount / units))
        }
        _ => {
            let amount = tokens[0];
            let price = tokens[1];
            let units = tokens[tokens.len() - 1];
            Ok((amount, units, price))
        }
    }
}

/// Assigns a transaction kind from the surrounding prose by keyword
/// precedence. Total: every line maps to exactly one kind, with `Purchase`
/// as the fallback (SIP and other systematic-investment language included).
pub fn classify_kind(line: &str) -> TransactionKind {
    let lower = line.to_lowercase();

    if lower.contains("redemption") || PAREN_NEG_RE.is_match(line) {
        TransactionKind::Redemption
    } else if lower.contains("switch out") || lower.contains("switch-out") {
        TransactionKind::SwitchOut
    } else if lower.contains("switch in") || lower.contains("switch-in") {
        TransactionKind::SwitchIn
    } else if lower.contains("dividend") {
        TransactionKind::DividendReinvestment
    } else {
        TransactionKind::Purchase
    }
}

/// Parses a line already labeled as transaction data into a [`Transaction`].
///
/// The leading date is required (defensively re-checked even though the
/// classifier guarantees it); numeric fields go through [`assign_fields`].
pub fn parse_transaction_line(line: &str) -> Result<Transaction, ParseSkip> {
    let caps = DATE_RE.captures(line).ok_or(ParseSkip::MissingDate)?;

    let day: u32 = caps[1].parse().map_err(|_| ParseSkip::InvalidDate)?;
    let month = month_from_abbrev(&caps[2]).ok_or(ParseSkip::InvalidDate)?;
    let year: i32 = caps[3].parse().map_err(|_| ParseSkip::InvalidDate)?;
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(ParseSkip::InvalidDate)?;

    let remainder = &line[caps.get(0).map(|m| m.end()).unwrap_or(0)..];
    let tokens = extract_numeric_tokens(remainder);
    let (amount, units, price) = assign_fields(&tokens)?;

    Ok(Transaction {
        date,
        kind: classify_kind(line),
        amount,
        units,
        price,
        source_line: line.trim().to_string(),
    })
}
