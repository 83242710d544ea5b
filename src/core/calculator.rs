use crate::domain::model::{Inputs, Results};

pub const SELLING_PRICE_MESSAGE: &str = "Selling price must be greater than 0";
pub const NEGATIVE_COST_MESSAGE: &str = "Product cost cannot be negative";

/// 計算單件淨利、利潤率與保本件數。
///
/// Break-even divides total costs by `selling_price - product_cost`; that
/// denominator is not guarded, so equal price and product cost with any other
/// non-zero cost yields an infinite unit count. Check
/// [`Results::has_finite_break_even`] before displaying it.
pub fn calculate_results(inputs: &Inputs) -> Results {
    let total_costs = inputs.product_cost
        + inputs.referral_fee
        + inputs.fba_fee
        + inputs.shipping_cost
        + inputs.ppc_budget
        + inputs.other_fees;

    let net_profit = inputs.selling_price - total_costs;

    let profit_margin = if inputs.selling_price > 0.0 {
        net_profit / inputs.selling_price * 100.0
    } else {
        0.0
    };

    let break_even_units = if net_profit != 0.0 {
        (total_costs / (inputs.selling_price - inputs.product_cost))
            .abs()
            .ceil()
    } else {
        0.0
    };

    Results {
        net_profit,
        profit_margin,
        break_even_units,
        total_costs,
    }
}

/// Returns every violated rule in order; callers show the first one.
pub fn validate_inputs(inputs: &Inputs) -> Vec<String> {
    let mut errors = Vec::new();

    if inputs.selling_price.is_nan() || inputs.selling_price <= 0.0 {
        errors.push(SELLING_PRICE_MESSAGE.to_string());
    }

    if inputs.product_cost < 0.0 {
        errors.push(NEGATIVE_COST_MESSAGE.to_string());
    }

    errors
}
