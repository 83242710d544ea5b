pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::AppConfig;

pub use adapters::{LocalStorage, RestLogSink};
pub use crate::core::calculator::{calculate_results, validate_inputs};
pub use crate::core::advice::contextual_advice;
pub use crate::core::engine::{Evaluation, ProfitEngine};
pub use crate::core::share::{decode_state_from_url, encode_state_to_url};
pub use domain::model::{Advice, AdviceLevel, Inputs, Report, Results};
pub use utils::error::{CalcError, Result};
