use crate::core::calculator::calculate_results;
use crate::domain::model::{ChartPoint, CostSlice, Inputs};
use crate::utils::error::{CalcError, Result};

pub const DEFAULT_CURVE_STEPS: usize = 20;

/// Pie-chart slices, one per non-zero cost field.
pub fn cost_breakdown(inputs: &Inputs) -> Vec<CostSlice> {
    let total = calculate_results(inputs).total_costs;

    let costs = [
        ("Product cost", inputs.product_cost),
        ("Referral fee", inputs.referral_fee),
        ("FBA fee", inputs.fba_fee),
        ("Shipping", inputs.shipping_cost),
        ("PPC", inputs.ppc_budget),
        ("Other fees", inputs.other_fees),
    ];

    costs
        .into_iter()
        .filter(|(_, amount)| *amount != 0.0)
        .map(|(label, amount)| CostSlice {
            label: label.to_string(),
            amount,
            share_percent: if total != 0.0 {
                amount / total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

/// 在 [from, to] 區間以等距售價重新取樣，共 steps + 1 個點
pub fn profit_curve(inputs: &Inputs, from: f64, to: f64, steps: usize) -> Result<Vec<ChartPoint>> {
    if steps == 0 {
        return Err(CalcError::ChartRangeError {
            reason: "at least one step is required".to_string(),
        });
    }
    if !from.is_finite() || !to.is_finite() {
        return Err(CalcError::ChartRangeError {
            reason: format!("bounds must be finite (got {} to {})", from, to),
        });
    }
    if from > to {
        return Err(CalcError::ChartRangeError {
            reason: format!("start {} is above end {}", from, to),
        });
    }

    let step = (to - from) / steps as f64;
    let points = (0..=steps)
        .map(|i| {
            // 最後一點直接使用 to，避免累積誤差
            let price = if i == steps { to } else { from + step * i as f64 };
            let results = calculate_results(&inputs.with_selling_price(price));
            ChartPoint {
                selling_price: price,
                net_profit: results.net_profit,
                profit_margin: results.profit_margin,
            }
        })
        .collect();

    Ok(points)
}

/// 50% 到 150% 的目前售價
pub fn default_price_range(inputs: &Inputs) -> (f64, f64) {
    (inputs.selling_price * 0.5, inputs.selling_price * 1.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Inputs {
        Inputs {
            product_cost: 5.0,
            selling_price: 20.0,
            referral_fee: 3.0,
            fba_fee: 4.0,
            shipping_cost: 1.0,
            ppc_budget: 1.0,
            other_fees: 1.0,
        }
    }

    #[test]
    fn test_cost_breakdown_shares() {
        let slices = cost_breakdown(&sample());
        assert_eq!(slices.len(), 6);
        assert_eq!(slices[0].label, "Product cost");
        assert_eq!(slices[0].amount, 5.0);

        let total_share: f64 = slices.iter().map(|s| s.share_percent).sum();
        assert!((total_share - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_cost_breakdown_skips_zero_and_handles_empty() {
        let inputs = Inputs {
            selling_price: 10.0,
            fba_fee: 2.0,
            ..Default::default()
        };
        let slices = cost_breakdown(&inputs);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].share_percent, 100.0);

        assert!(cost_breakdown(&Inputs::default()).is_empty());
    }

    #[test]
    fn test_profit_curve_endpoints() {
        let points = profit_curve(&sample(), 10.0, 30.0, 4).unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].selling_price, 10.0);
        assert_eq!(points[0].net_profit, -5.0);
        assert_eq!(points[2].selling_price, 20.0);
        assert_eq!(points[2].profit_margin, 25.0);
        assert_eq!(points[4].selling_price, 30.0);
        assert_eq!(points[4].net_profit, 15.0);
    }

    #[test]
    fn test_profit_curve_rejects_bad_ranges() {
        assert!(profit_curve(&sample(), 10.0, 30.0, 0).is_err());
        assert!(profit_curve(&sample(), 30.0, 10.0, 5).is_err());
        assert!(profit_curve(&sample(), 0.0, f64::INFINITY, 5).is_err());
    }

    #[test]
    fn test_default_curve_is_monotonic_in_profit() {
        let (from, to) = default_price_range(&sample());
        assert_eq!((from, to), (10.0, 30.0));

        let points = profit_curve(&sample(), from, to, DEFAULT_CURVE_STEPS).unwrap();
        assert_eq!(points.len(), DEFAULT_CURVE_STEPS + 1);
        assert!(points
            .windows(2)
            .all(|pair| pair[1].net_profit >= pair[0].net_profit));
    }
}
