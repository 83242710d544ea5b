pub mod advice;
pub mod calculator;
pub mod chart;
pub mod engine;
pub mod export;
pub mod session;
pub mod share;

pub use crate::domain::model::{Advice, AdviceLevel, Inputs, Report, Results};
pub use crate::domain::ports::{CalculationSink, Storage};
pub use crate::utils::error::Result;
