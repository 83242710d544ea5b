use serde::{Deserialize, Serialize};

/// 每件商品的成本與售價輸入，所有金額以同一幣別計
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Inputs {
    pub product_cost: f64,
    pub selling_price: f64,
    pub referral_fee: f64,
    pub fba_fee: f64,
    pub shipping_cost: f64,
    pub ppc_budget: f64,
    pub other_fees: f64,
}

impl Inputs {
    /// Fields in their canonical order, paired with their camelCase names.
    pub fn fields(&self) -> [(&'static str, f64); 7] {
        [
            ("productCost", self.product_cost),
            ("sellingPrice", self.selling_price),
            ("referralFee", self.referral_fee),
            ("fbaFee", self.fba_fee),
            ("shippingCost", self.shipping_cost),
            ("ppcBudget", self.ppc_budget),
            ("otherFees", self.other_fees),
        ]
    }

    /// Looks up a field by camelCase or snake_case name.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "productCost" | "product_cost" => Some(&mut self.product_cost),
            "sellingPrice" | "selling_price" => Some(&mut self.selling_price),
            "referralFee" | "referral_fee" => Some(&mut self.referral_fee),
            "fbaFee" | "fba_fee" => Some(&mut self.fba_fee),
            "shippingCost" | "shipping_cost" => Some(&mut self.shipping_cost),
            "ppcBudget" | "ppc_budget" => Some(&mut self.ppc_budget),
            "otherFees" | "other_fees" => Some(&mut self.other_fees),
            _ => None,
        }
    }

    pub fn with_selling_price(mut self, selling_price: f64) -> Self {
        self.selling_price = selling_price;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Results {
    pub net_profit: f64,
    pub profit_margin: f64,
    pub break_even_units: f64,
    pub total_costs: f64,
}

impl Results {
    /// 售價等於商品成本時分母為零，保本件數會變成無限大
    pub fn has_finite_break_even(&self) -> bool {
        self.break_even_units.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceLevel {
    Danger,
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub level: AdviceLevel,
    pub message: String,
}

impl Advice {
    pub fn new(level: AdviceLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub selling_price: f64,
    pub net_profit: f64,
    pub profit_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSlice {
    pub label: String,
    pub amount: f64,
    pub share_percent: f64,
}

/// 寫入遠端紀錄表的一列，非有限數值以 null 儲存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationLog {
    pub product_cost: f64,
    pub selling_price: f64,
    pub referral_fee: f64,
    pub fba_fee: f64,
    pub shipping_cost: f64,
    pub ppc_budget: f64,
    pub other_fees: f64,
    pub net_profit: Option<f64>,
    pub profit_margin: Option<f64>,
    pub break_even_units: Option<f64>,
    pub total_costs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CalculationLog {
    pub fn new(inputs: &Inputs, results: &Results, email: Option<String>) -> Self {
        let finite = |v: f64| v.is_finite().then_some(v);
        Self {
            product_cost: inputs.product_cost,
            selling_price: inputs.selling_price,
            referral_fee: inputs.referral_fee,
            fba_fee: inputs.fba_fee,
            shipping_cost: inputs.shipping_cost,
            ppc_budget: inputs.ppc_budget,
            other_fees: inputs.other_fees,
            net_profit: finite(results.net_profit),
            profit_margin: finite(results.profit_margin),
            break_even_units: finite(results.break_even_units),
            total_costs: finite(results.total_costs),
            email: email.filter(|e| !e.trim().is_empty()),
        }
    }
}

/// 匯出與 CLI 顯示用的完整報告
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub inputs: Inputs,
    /// serde_json 會把 inf 寫成 null
    pub results: Results,
    pub advice: Vec<Advice>,
    pub share_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_deserialize_missing_fields_as_zero() {
        let inputs: Inputs =
            serde_json::from_str(r#"{"sellingPrice": 19.99, "fbaFee": 3.22}"#).unwrap();
        assert_eq!(inputs.selling_price, 19.99);
        assert_eq!(inputs.fba_fee, 3.22);
        assert_eq!(inputs.product_cost, 0.0);
    }

    #[test]
    fn test_field_mut_accepts_both_spellings() {
        let mut inputs = Inputs::default();
        *inputs.field_mut("ppcBudget").unwrap() = 2.0;
        *inputs.field_mut("other_fees").unwrap() = 0.5;
        assert_eq!(inputs.ppc_budget, 2.0);
        assert_eq!(inputs.other_fees, 0.5);
        assert!(inputs.field_mut("vat").is_none());
    }

    #[test]
    fn test_calculation_log_nulls_non_finite_values() {
        let inputs = Inputs {
            product_cost: 10.0,
            selling_price: 10.0,
            fba_fee: 2.0,
            ..Default::default()
        };
        let results = Results {
            net_profit: -2.0,
            profit_margin: -20.0,
            break_even_units: f64::INFINITY,
            total_costs: 12.0,
        };

        let row = CalculationLog::new(&inputs, &results, Some("  ".to_string()));
        let json = serde_json::to_value(&row).unwrap();

        assert!(json["break_even_units"].is_null());
        assert_eq!(json["net_profit"], -2.0);
        assert!(json.get("email").is_none());
    }
}
