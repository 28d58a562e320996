use crate::schema::{
    AllocationSlice, HoldingRecord, InvestorInfo, Portfolio, PortfolioSummary, SchemeHolding,
};
use crate::valuation::ValuationSource;
use log::debug;

/// The single instrument family this pipeline handles per document.
const ASSET_CLASS: &str = "Mutual Funds";

/// Rolls retained holdings into the output portfolio: derives per-holding
/// valuation fields, then portfolio totals and the single-class allocation
/// table. A portfolio with zero holdings is valid and yields all-zero totals.
pub fn summarize(
    holdings: &[SchemeHolding],
    valuation: &mut dyn ValuationSource,
    investor: InvestorInfo,
) -> Portfolio {
    let records: Vec<HoldingRecord> = holdings
        .iter()
        .map(|holding| valuate_holding(holding, valuation))
        .collect();

    let total_invested: f64 = records.iter().map(|r| r.investment_amount).sum();
    let total_current_value: f64 = records.iter().map(|r| r.current_value).sum();
    let total_gain_loss = total_current_value - total_invested;
    let total_gain_loss_percentage = if total_invested > 0.0 {
        total_gain_loss / total_invested * 100.0
    } else {
        0.0
    };

    let allocation = if records.is_empty() {
        Vec::new()
    } else {
        vec![AllocationSlice {
            asset_class: ASSET_CLASS.to_string(),
            percentage: 100.0,
        }]
    };

    debug!(
        "Summarized {} holdings: invested {:.2}, current {:.2}",
        records.len(),
        total_invested,
        total_current_value
    );

    Portfolio {
        investor,
        holdings: records,
        summary: PortfolioSummary {
            total_invested,
            total_current_value,
            total_gain_loss,
            total_gain_loss_percentage,
            allocation,
        },
    }
}

fn valuate_holding(holding: &SchemeHolding, valuation: &mut dyn ValuationSource) -> HoldingRecord {
    // Retained holdings always have unit_balance > 0, enforced upstream.
    let avg_purchase_price = holding.invested_amount / holding.unit_balance;
    let current_price = valuation.current_price(avg_purchase_price);
    let current_value = holding.unit_balance * current_price;
    let gain_loss = current_value - holding.invested_amount;
    let gain_loss_percentage = if holding.invested_amount > 0.0 {
        gain_loss / holding.invested_amount * 100.0
    } else {
        0.0
    };

    HoldingRecord {
        scheme_name: holding.scheme_name.clone(),
        folio_number: holding.folio_number.clone(),
        fund_house: holding.fund_house.clone(),
        units: holding.unit_balance,
        avg_purchase_price,
        current_price,
        current_value,
        investment_amount: holding.invested_amount,
        gain_loss,
        gain_loss_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed multiplier over average cost, for assertable arithmetic.
    struct FixedGrowth(f64);

    impl ValuationSource for FixedGrowth {
        fn current_price(&mut self, avg_unit_cost: f64) -> f64 {
            avg_unit_cost * self.0
        }
    }

    fn holding(scheme: &str, folio: &str, units: f64, invested: f64) -> SchemeHolding {
        let mut h = SchemeHolding::new(
            scheme.to_string(),
            folio.to_string(),
            "Test Mutual Fund".to_string(),
        );
        h.unit_balance = units;
        h.invested_amount = invested;
        h
    }

    #[test]
    fn test_holding_valuation_arithmetic() {
        let holdings = vec![holding("Scheme A", "1", 100.0, 8000.0)];
        let portfolio = summarize(&holdings, &mut FixedGrowth(1.25), InvestorInfo::default());

        let record = &portfolio.holdings[0];
        assert!((record.avg_purchase_price - 80.0).abs() < 1e-9);
        assert!((record.current_price - 100.0).abs() < 1e-9);
        assert!((record.current_value - 10_000.0).abs() < 1e-9);
        assert!((record.gain_loss - 2000.0).abs() < 1e-9);
        assert!((record.gain_loss_percentage - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_totals_are_sums_over_holdings() {
        let holdings = vec![
            holding("Scheme A", "1", 100.0, 8000.0),
            holding("Scheme B", "2", 50.0, 2000.0),
        ];
        let portfolio = summarize(&holdings, &mut FixedGrowth(1.10), InvestorInfo::default());

        let summary = &portfolio.summary;
        assert!((summary.total_invested - 10_000.0).abs() < 1e-9);
        assert!((summary.total_current_value - 11_000.0).abs() < 1e-6);
        assert!((summary.total_gain_loss - 1000.0).abs() < 1e-6);
        assert!((summary.total_gain_loss_percentage - 10.0).abs() < 1e-6);
        assert_eq!(summary.allocation.len(), 1);
        assert_eq!(summary.allocation[0].asset_class, "Mutual Funds");
        assert_eq!(summary.allocation[0].percentage, 100.0);
    }

    #[test]
    fn test_empty_portfolio_is_all_zero() {
        let portfolio = summarize(&[], &mut FixedGrowth(1.5), InvestorInfo::default());

        assert!(portfolio.holdings.is_empty());
        assert_eq!(portfolio.summary.total_invested, 0.0);
        assert_eq!(portfolio.summary.total_current_value, 0.0);
        assert_eq!(portfolio.summary.total_gain_loss, 0.0);
        assert_eq!(portfolio.summary.total_gain_loss_percentage, 0.0);
        assert!(portfolio.summary.allocation.is_empty());
    }
}
