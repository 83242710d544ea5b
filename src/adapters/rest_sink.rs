use crate::domain::model::CalculationLog;
use crate::domain::ports::CalculationSink;
use crate::utils::error::{CalcError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// PostgREST 風格的單表寫入，例如 Supabase 的 `/rest/v1/<table>`
#[derive(Debug, Clone)]
pub struct RestLogSink {
    client: Client,
    insert_url: String,
    api_key: String,
}

impl RestLogSink {
    pub fn new(endpoint: &str, table: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let insert_url = format!("{}/rest/v1/{}", endpoint.trim_end_matches('/'), table);

        Ok(Self {
            client,
            insert_url,
            api_key: api_key.to_string(),
        })
    }

    pub fn insert_url(&self) -> &str {
        &self.insert_url
    }
}

#[async_trait]
impl CalculationSink for RestLogSink {
    async fn record(&self, entry: &CalculationLog) -> Result<()> {
        tracing::debug!("Posting calculation log to: {}", self.insert_url);

        let response = self
            .client
            .post(&self.insert_url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(entry)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Logging sink response status: {}", status);

        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(CalcError::SinkError {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Inputs, Results};
    use httpmock::prelude::*;

    fn entry() -> CalculationLog {
        let inputs = Inputs {
            product_cost: 5.0,
            selling_price: 20.0,
            ..Default::default()
        };
        let results = Results {
            net_profit: 15.0,
            profit_margin: 75.0,
            break_even_units: 1.0,
            total_costs: 5.0,
        };
        CalculationLog::new(&inputs, &results, Some("seller@example.com".to_string()))
    }

    #[tokio::test]
    async fn test_record_posts_row_with_auth_headers() {
        let server = MockServer::start();
        let insert_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/calculations")
                .header("apikey", "anon-key")
                .header("authorization", "Bearer anon-key")
                .header("prefer", "return=minimal")
                .json_body_partial(r#"{"selling_price": 20.0, "email": "seller@example.com"}"#);
            then.status(201);
        });

        let sink = RestLogSink::new(
            &format!("{}/", server.base_url()),
            "calculations",
            "anon-key",
            Duration::from_secs(5),
        )
        .unwrap();

        sink.record(&entry()).await.unwrap();
        insert_mock.assert();
    }

    #[tokio::test]
    async fn test_record_surfaces_rejections() {
        let server = MockServer::start();
        let insert_mock = server.mock(|when, then| {
            when.method(POST).path("/rest/v1/calculations");
            then.status(401).body("invalid api key");
        });

        let sink = RestLogSink::new(
            &server.base_url(),
            "calculations",
            "wrong",
            Duration::from_secs(5),
        )
        .unwrap();

        let err = sink.record(&entry()).await.unwrap_err();
        insert_mock.assert();
        match err {
            CalcError::SinkError { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
