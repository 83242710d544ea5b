use crate::domain::model::CalculationLog;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 只寫不讀的計算紀錄接收端
#[async_trait]
pub trait CalculationSink: Send + Sync {
    async fn record(&self, entry: &CalculationLog) -> Result<()>;
}
