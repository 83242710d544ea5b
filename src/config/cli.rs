use crate::domain::model::Inputs;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "fba-calc")]
#[command(about = "Estimate per-unit profit, margin and break-even volume for FBA products")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compute profit, margin and break-even units
    Calc {
        #[command(flatten)]
        inputs: InputArgs,

        /// Email stored alongside the logged calculation
        #[arg(long)]
        email: Option<String>,

        /// Skip the remote logging sink for this run
        #[arg(long)]
        no_log: bool,
    },

    /// Print a shareable link for the given inputs
    Share {
        #[command(flatten)]
        inputs: InputArgs,

        /// Overrides share.base_url from the config file
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Decode a shared link (or bare query string) and compute it
    Open {
        link: String,

        #[arg(long)]
        email: Option<String>,
    },

    /// Print chart data as JSON
    Chart {
        #[command(flatten)]
        inputs: InputArgs,

        /// Lowest selling price to sample (default: 50% of the current price)
        #[arg(long, allow_negative_numbers = true)]
        from: Option<f64>,

        /// Highest selling price to sample (default: 150% of the current price)
        #[arg(long, allow_negative_numbers = true)]
        to: Option<f64>,

        #[arg(long, default_value = "20")]
        steps: usize,

        /// Print the cost breakdown instead of the profit curve
        #[arg(long)]
        breakdown: bool,
    },

    /// Write a report file (json, csv or zip bundle)
    Export {
        #[command(flatten)]
        inputs: InputArgs,

        #[arg(long, default_value = "json")]
        format: String,

        /// Overrides export.output_path from the config file
        #[arg(long)]
        output: Option<String>,
    },

    /// Read `field=value` lines from stdin and recompute after each pause
    Watch {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub product_cost: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub selling_price: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub referral_fee: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub fba_fee: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub shipping_cost: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub ppc_budget: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub other_fees: f64,
}

impl InputArgs {
    pub fn to_inputs(&self) -> Inputs {
        Inputs {
            product_cost: self.product_cost,
            selling_price: self.selling_price,
            referral_fee: self.referral_fee,
            fba_fee: self.fba_fee,
            shipping_cost: self.shipping_cost,
            ppc_budget: self.ppc_budget,
            other_fees: self.other_fees,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validation::validate_path("--config", path)?;
        }

        match &self.command {
            Command::Share {
                base_url: Some(base_url),
                ..
            } => validation::validate_url("--base-url", base_url),
            Command::Chart { steps, .. } => validation::validate_range("--steps", *steps, 1, 1000),
            Command::Export {
                format,
                output: Some(output),
                ..
            } => {
                validation::validate_path("--output", output)?;
                format.parse::<crate::core::export::ExportFormat>().map(|_| ())
            }
            Command::Export { format, .. } => {
                format.parse::<crate::core::export::ExportFormat>().map(|_| ())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calc_command() {
        let config = CliConfig::try_parse_from([
            "fba-calc",
            "calc",
            "--product-cost",
            "5",
            "--selling-price",
            "20",
            "--fba-fee",
            "4",
            "--email",
            "seller@example.com",
        ])
        .unwrap();

        match config.command {
            Command::Calc { inputs, email, no_log } => {
                let inputs = inputs.to_inputs();
                assert_eq!(inputs.product_cost, 5.0);
                assert_eq!(inputs.selling_price, 20.0);
                assert_eq!(inputs.fba_fee, 4.0);
                assert_eq!(inputs.other_fees, 0.0);
                assert_eq!(email.as_deref(), Some("seller@example.com"));
                assert!(!no_log);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_negative_values_are_parsed_for_validation() {
        let config = CliConfig::try_parse_from([
            "fba-calc",
            "calc",
            "--selling-price",
            "10",
            "--product-cost",
            "-1",
        ])
        .unwrap();

        match config.command {
            Command::Calc { inputs, .. } => assert_eq!(inputs.product_cost, -1.0),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_bad_export_format_and_steps() {
        let export = CliConfig::try_parse_from(["fba-calc", "export", "--format", "pdf"]).unwrap();
        assert!(export.validate().is_err());

        let chart = CliConfig::try_parse_from(["fba-calc", "chart", "--steps", "0"]).unwrap();
        assert!(chart.validate().is_err());

        let share = CliConfig::try_parse_from([
            "fba-calc",
            "share",
            "--selling-price",
            "12",
            "--base-url",
            "https://calc.example.com",
        ])
        .unwrap();
        assert!(share.validate().is_ok());
    }
}
