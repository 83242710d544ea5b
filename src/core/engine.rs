use crate::adapters::rest_sink::RestLogSink;
use crate::config::toml_config::AppConfig;
use crate::core::advice::contextual_advice;
use crate::core::calculator::{calculate_results, validate_inputs};
use crate::core::share::encode_state_to_url;
use crate::domain::model::{CalculationLog, Inputs, Report};
use crate::domain::ports::CalculationSink;
use crate::utils::error::{CalcError, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use url::Url;

pub struct Evaluation {
    pub report: Report,
    /// 紀錄寫入在背景執行，短生命週期的程式可選擇等待它
    pub log_task: Option<JoinHandle<()>>,
}

pub struct ProfitEngine {
    sink: Option<Arc<dyn CalculationSink>>,
    share_base: Option<Url>,
}

impl ProfitEngine {
    pub fn new() -> Self {
        Self {
            sink: None,
            share_base: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn CalculationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_share_base(mut self, base: Url) -> Self {
        self.share_base = Some(base);
        self
    }

    /// 紀錄端建立失敗不影響計算，只記警告並以無紀錄模式繼續
    pub fn with_sink_or_skip<S>(self, sink: Result<S>) -> Self
    where
        S: CalculationSink + 'static,
    {
        match sink {
            Ok(sink) => self.with_sink(Arc::new(sink)),
            Err(e) => {
                tracing::warn!("⚠️ Logging sink disabled: {}", e);
                self
            }
        }
    }

    /// Builds an engine from a validated config. `with_sink = false` skips the
    /// logging sink even when the config enables it.
    pub fn from_config(config: &AppConfig, with_sink: bool) -> Result<Self> {
        let mut engine = Self::new();

        if let Some(base) = config.share_base_url() {
            engine = engine.with_share_base(Url::parse(base)?);
        }

        if with_sink && config.sink_enabled() {
            // validate_config 已確認 endpoint 與 api_key 存在
            let endpoint = config.sink.endpoint.as_deref().unwrap_or_default();
            let api_key = config.sink.api_key.as_deref().unwrap_or_default();
            let sink = RestLogSink::new(endpoint, config.sink_table(), api_key, config.sink_timeout());
            if let Ok(sink) = &sink {
                tracing::debug!("Logging sink enabled: {}", sink.insert_url());
            }
            engine = engine.with_sink_or_skip(sink);
        }

        Ok(engine)
    }

    /// Validates, computes and advises, then hands the log write to a
    /// background task. Sink failures are logged and never reach the caller.
    pub fn run(&self, inputs: Inputs, email: Option<String>) -> Result<Evaluation> {
        let errors = validate_inputs(&inputs);
        if !errors.is_empty() {
            tracing::debug!("Rejected inputs: {:?}", errors);
            return Err(CalcError::validation(errors));
        }

        let results = calculate_results(&inputs);
        let advice = contextual_advice(&results, &inputs);
        tracing::debug!(
            "Computed net profit {:.2}, margin {:.2}%",
            results.net_profit,
            results.profit_margin
        );

        if !results.has_finite_break_even() {
            tracing::warn!("Break-even is unbounded: selling price equals product cost");
        }

        let share_link = self
            .share_base
            .as_ref()
            .map(|base| encode_state_to_url(base, &inputs).to_string());

        let log_task = self.sink.as_ref().and_then(|sink| {
            // 沒有 tokio runtime 時略過紀錄，計算結果照常回傳
            let handle = match tokio::runtime::Handle::try_current() {
                Ok(handle) => handle,
                Err(e) => {
                    tracing::warn!("⚠️ Skipping calculation log, no async runtime: {}", e);
                    return None;
                }
            };
            let sink = Arc::clone(sink);
            let entry = CalculationLog::new(&inputs, &results, email);
            Some(handle.spawn(async move {
                match sink.record(&entry).await {
                    Ok(()) => tracing::debug!("Calculation logged"),
                    Err(e) => tracing::warn!("⚠️ Failed to log calculation: {}", e),
                }
            }))
        });

        Ok(Evaluation {
            report: Report {
                generated_at: chrono::Utc::now(),
                inputs,
                results,
                advice,
                share_link,
            },
            log_task,
        })
    }
}

impl Default for ProfitEngine {
    fn default() -> Self {
        Self::new()
    }
}
