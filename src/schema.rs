use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Transaction kinds recovered from statement text.
///
/// Direction is carried here, never by a signed magnitude: redemptions and
/// switch-outs reduce the unit balance, everything else increases it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum TransactionKind {
    Purchase,
    Redemption,
    SwitchIn,
    SwitchOut,
    DividendReinvestment,
}

impl TransactionKind {
    /// Whether this kind adds units to (and deploys capital into) a holding.
    pub fn adds_units(&self) -> bool {
        matches!(
            self,
            TransactionKind::Purchase
                | TransactionKind::SwitchIn
                | TransactionKind::DividendReinvestment
        )
    }
}

/// A single normalized transaction. `amount` and `units` are always
/// non-negative; see [`TransactionKind`] for direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount: f64,
    pub units: f64,
    pub price: f64,
    /// The raw statement line this was recovered from, kept for auditing
    /// misclassifications.
    pub source_line: String,
}

/// Investor identity fields scanned from the statement header region.
/// Every field is optional: statements routinely omit some or all of them,
/// and nothing downstream depends on identity data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct InvestorInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub pan: Option<String>,
    pub address: Option<String>,
}

/// Running position for one `(scheme_name, folio_number)` key.
///
/// `invested_amount` is cumulative capital deployed: it grows on purchases,
/// switch-ins and dividend reinvestments and is deliberately left untouched
/// by redemptions and switch-outs (see DESIGN.md).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemeHolding {
    pub scheme_name: String,
    pub folio_number: String,
    pub fund_house: String,
    pub unit_balance: f64,
    pub invested_amount: f64,
    pub transactions: Vec<Transaction>,
}

impl SchemeHolding {
    pub fn new(scheme_name: String, folio_number: String, fund_house: String) -> Self {
        Self {
            scheme_name,
            folio_number,
            fund_house,
            unit_balance: 0.0,
            invested_amount: 0.0,
            transactions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct HoldingRecord {
    #[schemars(description = "Scheme display name, e.g. 'SBI Bluechip Fund - Direct Growth'")]
    pub scheme_name: String,

    #[schemars(description = "Folio number normalized by truncating at the first '/'")]
    pub folio_number: String,

    #[schemars(description = "Fund house derived from the scheme name, e.g. 'SBI Mutual Fund'")]
    pub fund_house: String,

    #[schemars(description = "Final unit balance after applying every transaction; always > 0 for retained holdings")]
    pub units: f64,

    #[schemars(description = "invested_amount / units")]
    pub avg_purchase_price: f64,

    #[schemars(description = "Simulated (or externally supplied) current unit price")]
    pub current_price: f64,

    #[schemars(description = "units * current_price")]
    pub current_value: f64,

    #[schemars(description = "Cumulative capital deployed into this holding")]
    pub investment_amount: f64,

    #[schemars(description = "current_value - investment_amount")]
    pub gain_loss: f64,

    #[schemars(description = "gain_loss as a percentage of investment_amount")]
    pub gain_loss_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct AllocationSlice {
    pub asset_class: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PortfolioSummary {
    pub total_invested: f64,
    pub total_current_value: f64,
    pub total_gain_loss: f64,
    pub total_gain_loss_percentage: f64,
    /// Single-class table: this pipeline handles one instrument family per
    /// document, so a non-empty portfolio is 100% one class.
    pub allocation: Vec<AllocationSlice>,
}

/// The output contract handed to the account-creation collaborator.
/// Built once per parsed document; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Portfolio {
    pub investor: InvestorInfo,
    pub holdings: Vec<HoldingRecord>,
    pub summary: PortfolioSummary,
}

impl Portfolio {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Portfolio)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// Line-level fault accounting for one parse invocation. Skips never abort
/// the parse; the caller decides whether a high skip ratio deserves a warning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Diagnostics {
    pub total_lines: usize,
    pub skipped_lines: usize,
    pub orphaned_transactions: usize,
    pub transaction_count: usize,
    pub exited_holdings: usize,
}

impl Diagnostics {
    /// Fraction of lines that looked like transactions but could not be
    /// parsed or keyed. Zero for an empty document.
    pub fn skip_ratio(&self) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        (self.skipped_lines + self.orphaned_transactions) as f64 / self.total_lines as f64
    }
}
