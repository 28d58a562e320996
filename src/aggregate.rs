use crate::lines::{LineRole, RawLine};
use crate::schema::{Diagnostics, SchemeHolding, Transaction};
use crate::transaction::parse_transaction_line;
use log::debug;
use std::collections::BTreeMap;

/// Scheme context recorded from the most recent scheme-header line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SchemeContext {
    name: String,
    fund_house: String,
}

/// Result of folding the labeled line stream: retained holdings in
/// deterministic key order, plus line-level fault counts.
#[derive(Debug, Clone)]
pub struct AggregationOutcome {
    pub holdings: Vec<SchemeHolding>,
    pub diagnostics: Diagnostics,
}

/// Explicit accumulator threaded through the fold. Owns all running context
/// (current scheme, current folio, open holdings); nothing is ambient, so
/// independent documents can be aggregated concurrently.
#[derive(Debug, Default)]
pub struct AggregationState {
    current_scheme: Option<SchemeContext>,
    current_folio: Option<String>,
    holdings: BTreeMap<(String, String), SchemeHolding>,
    diagnostics: Diagnostics,
}

impl AggregationState {
    fn observe(&mut self, raw: &RawLine, role: LineRole) {
        self.diagnostics.total_lines += 1;

        match role {
            LineRole::SchemeHeader => {
                self.current_scheme = Some(parse_scheme_header(&raw.text));
            }
            LineRole::FolioMarker => {
                self.current_folio = Some(normalize_folio(&raw.text));
            }
            LineRole::TransactionData => match parse_transaction_line(&raw.text) {
                Ok(txn) => self.apply(txn, raw.index),
                Err(skip) => {
                    debug!("Skipping line {}: {:?}", raw.index, skip);
                    self.diagnostics.skipped_lines += 1;
                }
            },
            LineRole::Noise => {}
        }
    }

    /// Attaches a parsed transaction to the holding keyed by
    /// `(current scheme, current folio)`, creating it on first use.
    ///
    /// `invested_amount` accumulates on unit-adding kinds only; redemptions
    /// and switch-outs reduce the unit balance but leave invested capital
    /// untouched (cumulative-capital-deployed semantics, see DESIGN.md).
    fn apply(&mut self, txn: Transaction, line_index: usize) {
        let Some(scheme) = &self.current_scheme else {
            debug!(
                "Dropping orphaned transaction at line {} (no scheme context)",
                line_index
            );
            self.diagnostics.orphaned_transactions += 1;
            return;
        };

        let folio = self.current_folio.clone().unwrap_or_default();
        let key = (scheme.name.clone(), folio.clone());
        let holding = self.holdings.entry(key).or_insert_with(|| {
            SchemeHolding::new(scheme.name.clone(), folio, scheme.fund_house.clone())
        });

        if txn.kind.adds_units() {
            holding.unit_balance += txn.units;
            holding.invested_amount += txn.amount;
        } else {
            holding.unit_balance -= txn.units;
        }
        holding.transactions.push(txn);
        self.diagnostics.transaction_count += 1;
    }

    fn finish(mut self) -> AggregationOutcome {
        let mut holdings = Vec::with_capacity(self.holdings.len());
        for (_, holding) in self.holdings {
            // Fully exited or data-artifact positions carry no value.
            if holding.unit_balance > 0.0 {
                holdings.push(holding);
            } else {
                debug!(
                    "Excluding holding '{}' (folio '{}') with non-positive balance {}",
                    holding.scheme_name, holding.folio_number, holding.unit_balance
                );
                self.diagnostics.exited_holdings += 1;
            }
        }

        AggregationOutcome {
            holdings,
            diagnostics: self.diagnostics,
        }
    }
}

/// Folds the labeled line stream into per-`(scheme, folio)` holdings.
pub fn aggregate(labeled: impl IntoIterator<Item = (RawLine, LineRole)>) -> AggregationOutcome {
    let mut state = AggregationState::default();
    for (raw, role) in labeled {
        state.observe(&raw, role);
    }
    state.finish()
}

/// The display name is the post-delimiter segment of the header: scheme
/// headers lead with an identifier (`INF...-Scheme Name - Plan`), so
/// everything after the first `-` is the name. Headers without a delimiter
/// fall back to the whole trimmed line.
fn parse_scheme_header(line: &str) -> SchemeContext {
    let name = line
        .splitn(2, '-')
        .nth(1)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| line.trim())
        .to_string();

    SchemeContext {
        fund_house: fund_house_for(&name),
        name,
    }
}

/// The statement carries no explicit fund-house column; the scheme name's
/// leading token identifies the AMC (e.g. "SBI Bluechip Fund" -> "SBI").
fn fund_house_for(scheme_name: &str) -> String {
    match scheme_name.split_whitespace().next() {
        Some(first) => format!("{} Mutual Fund", first),
        None => String::new(),
    }
}

/// `Folio No: 12345/0` -> `12345`. The `/N` suffix is a check digit, not part
/// of the folio identity.
fn normalize_folio(line: &str) -> String {
    let value = line.splitn(2, ':').nth(1).unwrap_or(line);
    value.split('/').next().unwrap_or("").trim().to_string()
}
