use crate::domain::model::{Advice, AdviceLevel, Inputs, Results};

pub const THIN_MARGIN_PERCENT: f64 = 10.0;
pub const HEALTHY_MARGIN_PERCENT: f64 = 25.0;
/// 平台抽成超過售價此比例時提醒
pub const HIGH_REFERRAL_RATIO: f64 = 0.15;

pub const LOSS_MESSAGE: &str =
    "You are losing money on every sale. Raise your price or cut costs before scaling.";
pub const THIN_MARGIN_MESSAGE: &str =
    "Your margin is thin. A small fee increase or price drop could wipe out your profit.";
pub const HEALTHY_MARGIN_MESSAGE: &str =
    "Your margin is healthy. Look for savings in fees and shipping to push it further.";
pub const EXCELLENT_MARGIN_MESSAGE: &str =
    "Excellent margin! This product has room for more advertising or price competition.";
pub const HIGH_REFERRAL_MESSAGE: &str =
    "Referral fees take more than 15% of your selling price. Check the category fee schedule.";
pub const PPC_EXCEEDS_PROFIT_MESSAGE: &str =
    "Advertising spend per unit is at or above your net profit. Tighten your PPC campaigns.";
pub const UNBOUNDED_BREAK_EVEN_MESSAGE: &str =
    "Selling price equals product cost, so no sales volume can ever cover the other costs.";

/// Margin and profit rules run first and yield exactly one message; the
/// input-based rules after them add zero or more.
pub fn contextual_advice(results: &Results, inputs: &Inputs) -> Vec<Advice> {
    let mut advice = Vec::new();

    if results.net_profit < 0.0 {
        advice.push(Advice::new(AdviceLevel::Danger, LOSS_MESSAGE));
    } else if results.profit_margin < THIN_MARGIN_PERCENT {
        advice.push(Advice::new(AdviceLevel::Warning, THIN_MARGIN_MESSAGE));
    } else if results.profit_margin < HEALTHY_MARGIN_PERCENT {
        advice.push(Advice::new(AdviceLevel::Info, HEALTHY_MARGIN_MESSAGE));
    } else {
        advice.push(Advice::new(AdviceLevel::Success, EXCELLENT_MARGIN_MESSAGE));
    }

    if inputs.selling_price > 0.0
        && inputs.referral_fee > inputs.selling_price * HIGH_REFERRAL_RATIO
    {
        advice.push(Advice::new(AdviceLevel::Warning, HIGH_REFERRAL_MESSAGE));
    }

    if results.net_profit > 0.0 && inputs.ppc_budget > 0.0 && inputs.ppc_budget >= results.net_profit
    {
        advice.push(Advice::new(AdviceLevel::Warning, PPC_EXCEEDS_PROFIT_MESSAGE));
    }

    if !results.has_finite_break_even() {
        advice.push(Advice::new(AdviceLevel::Danger, UNBOUNDED_BREAK_EVEN_MESSAGE));
    }

    advice
}
