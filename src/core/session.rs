use crate::core::advice::contextual_advice;
use crate::core::calculator::{calculate_results, validate_inputs};
use crate::domain::model::{Advice, Inputs, Results};
use crate::utils::error::{CalcError, Result};
use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Computed { results: Results, advice: Vec<Advice> },
    Rejected { message: String },
}

/// 驗證後計算；驗證失敗只回報第一條訊息
pub fn evaluate(inputs: &Inputs) -> Outcome {
    if let Some(message) = validate_inputs(inputs).into_iter().next() {
        return Outcome::Rejected { message };
    }

    let results = calculate_results(inputs);
    let advice = contextual_advice(&results, inputs);
    Outcome::Computed { results, advice }
}

/// The current input record and the outcome of its last evaluation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inputs: Inputs,
    outcome: Option<Outcome>,
}

impl Session {
    pub fn new(inputs: Inputs) -> Self {
        Self {
            inputs,
            outcome: None,
        }
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn set_field(&mut self, name: &str, value: f64) -> Result<()> {
        let slot = self
            .inputs
            .field_mut(name)
            .ok_or_else(|| CalcError::UnknownFieldError {
                name: name.to_string(),
            })?;
        *slot = value;
        // 舊結果已失效，等待下一次重算
        self.outcome = None;
        Ok(())
    }

    pub fn recompute(&mut self) -> &Outcome {
        self.outcome.insert(evaluate(&self.inputs))
    }
}

/// Emits one outcome per quiet period: each snapshot restarts the timer and
/// only the latest one is evaluated. A snapshot still pending when the input
/// channel closes is flushed before returning.
pub async fn run_debounced(
    mut rx: mpsc::Receiver<Inputs>,
    delay: Duration,
    tx: mpsc::Sender<Outcome>,
) {
    let mut pending: Option<Inputs> = None;

    loop {
        let Some(latest) = pending else {
            match rx.recv().await {
                Some(inputs) => {
                    pending = Some(inputs);
                    continue;
                }
                None => break,
            }
        };

        tokio::select! {
            next = rx.recv() => match next {
                Some(inputs) => pending = Some(inputs),
                None => {
                    let _ = tx.send(evaluate(&latest)).await;
                    break;
                }
            },
            _ = tokio::time::sleep(delay) => {
                pending = None;
                tracing::debug!("Recomputing after {:?} of inactivity", delay);
                if tx.send(evaluate(&latest)).await.is_err() {
                    tracing::debug!("Outcome receiver dropped, stopping debounce loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(selling_price: f64) -> Inputs {
        Inputs {
            product_cost: 5.0,
            selling_price,
            ..Default::default()
        }
    }

    #[test]
    fn test_evaluate_rejects_with_first_message() {
        let outcome = evaluate(&Inputs {
            product_cost: -1.0,
            ..Default::default()
        });
        assert_eq!(
            outcome,
            Outcome::Rejected {
                message: "Selling price must be greater than 0".to_string()
            }
        );
    }

    #[test]
    fn test_session_set_field_and_recompute() {
        let mut session = Session::default();
        session.set_field("sellingPrice", 20.0).unwrap();
        session.set_field("product_cost", 5.0).unwrap();

        match session.recompute() {
            Outcome::Computed { results, .. } => assert_eq!(results.net_profit, 15.0),
            other => panic!("unexpected outcome: {:?}", other),
        }

        session.set_field("fbaFee", 1.0).unwrap();
        assert!(session.outcome().is_none());

        let err = session.set_field("vat", 1.0).unwrap_err();
        assert!(matches!(err, CalcError::UnknownFieldError { .. }));
    }

    #[test]
    fn test_nan_price_from_watch_input_is_rejected() {
        let mut session = Session::default();
        session.set_field("sellingPrice", f64::NAN).unwrap();

        assert!(matches!(session.recompute(), Outcome::Rejected { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_produces_single_outcome() {
        let (in_tx, in_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::channel(8);
        let driver = tokio::spawn(run_debounced(in_rx, DEFAULT_DEBOUNCE, out_tx));

        for price in [10.0, 11.0, 12.0] {
            in_tx.send(priced(price)).await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        let outcome = out_rx.recv().await.unwrap();
        match outcome {
            Outcome::Computed { results, .. } => assert_eq!(results.net_profit, 7.0),
            other => panic!("unexpected outcome: {:?}", other),
        }

        drop(in_tx);
        driver.await.unwrap();
        assert!(out_rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_snapshot_flushed_on_close() {
        let (in_tx, in_rx) = mpsc::channel(8);
        let (out_tx, mut out_rx) = mpsc::channel(8);
        let driver = tokio::spawn(run_debounced(in_rx, Duration::from_secs(5), out_tx));

        in_tx.send(priced(0.0)).await.unwrap();
        drop(in_tx);
        driver.await.unwrap();

        assert!(matches!(
            out_rx.recv().await,
            Some(Outcome::Rejected { .. })
        ));
        assert!(out_rx.recv().await.is_none());
    }
}
