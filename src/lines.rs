use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A transaction row starts with a DD-Mon-YYYY date token.
pub(crate) static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{1,2})-([A-Za-z]{3})-(\d{4})\b").unwrap());

/// Decimal-formatted numeric token, with or without thousands separators.
/// Plain integers (years, folio digits) deliberately do not match.
pub(crate) static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\d{1,3}(?:,\d{3})+|\d+)\.\d+").unwrap());

/// ISIN shape used by Indian mutual fund schemes.
pub(crate) static ISIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bINF[0-9A-Z]{9,}\b").unwrap());

/// A line of source text with its zero-based position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawLine {
    pub index: usize,
    pub text: String,
}

/// Role assigned to each statement line. The roles drive which downstream
/// stage (if any) consumes the line; `Noise` is dropped without complaint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LineRole {
    SchemeHeader,
    FolioMarker,
    TransactionData,
    Noise,
}

/// Classifies a single line. Rules are checked in priority order and the
/// first match wins:
///
/// 1. scheme marker (`Fund`) plus an identifier marker (`ISIN` literal or an
///    ISIN-shaped token) -> scheme header
/// 2. leading `Folio` label -> folio marker
/// 3. leading date token plus at least one decimal numeric token -> transaction
/// 4. anything else -> noise
pub fn classify_line(line: &str) -> LineRole {
    let trimmed = line.trim_start();

    if line.contains("Fund") && (line.contains("ISIN") || ISIN_RE.is_match(line)) {
        return LineRole::SchemeHeader;
    }

    if trimmed.starts_with("Folio") {
        return LineRole::FolioMarker;
    }

    if DATE_RE.is_match(line) && DECIMAL_RE.is_match(line) {
        return LineRole::TransactionData;
    }

    LineRole::Noise
}

/// Labels every line of the document in source order. Pure: re-invoking on
/// the same text yields the same stream.
pub fn classify_lines(text: &str) -> impl Iterator<Item = (RawLine, LineRole)> + '_ {
    text.lines().enumerate().map(|(index, line)| {
        let role = classify_line(line);
        (
            RawLine {
                index,
                text: line.to_string(),
            },
            role,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_header_needs_both_markers() {
        assert_eq!(
            classify_line("INF903K01BW2-SBI Bluechip Fund - Direct Growth"),
            LineRole::SchemeHeader
        );
        assert_eq!(
            classify_line("HDFC Top 100 Fund (ISIN: INF179K01830)"),
            LineRole::SchemeHeader
        );
        // "Fund" alone is not enough: transaction rows mention the scheme too.
        assert_eq!(
            classify_line("05-Jun-2023  SBI Bluechip Fund  8,000.00  78.50  101.91"),
            LineRole::TransactionData
        );
    }

    #[test]
    fn test_folio_marker() {
        assert_eq!(classify_line("Folio No: 12345/0"), LineRole::FolioMarker);
        assert_eq!(classify_line("  Folio No: 98765/12"), LineRole::FolioMarker);
    }

    #[test]
    fn test_transaction_requires_date_and_decimal() {
        assert_eq!(
            classify_line("05-Jun-2023  Purchase  5,000.00  45.20  110.62"),
            LineRole::TransactionData
        );
        // Date but no decimal token.
        assert_eq!(classify_line("05-Jun-2023 opening balance"), LineRole::Noise);
        // Decimal but no leading date.
        assert_eq!(classify_line("NAV as on date: 45.20"), LineRole::Noise);
    }

    #[test]
    fn test_noise() {
        assert_eq!(classify_line(""), LineRole::Noise);
        assert_eq!(classify_line("Page 1 of 3"), LineRole::Noise);
        assert_eq!(
            classify_line("This statement is for information purposes only."),
            LineRole::Noise
        );
    }

    #[test]
    fn test_classify_lines_preserves_order() {
        let text = "noise\nFolio No: 1/0\nmore noise";
        let labeled: Vec<_> = classify_lines(text).collect();
        assert_eq!(labeled.len(), 3);
        assert_eq!(labeled[0].0.index, 0);
        assert_eq!(labeled[1].1, LineRole::FolioMarker);
        assert_eq!(labeled[2].0.text, "more noise");
    }
}
