use crate::domain::model::RequestSpec;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Performs a single outbound request and reports its HTTP status.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    async fn fetch(&self, spec: &RequestSpec) -> Result<u16>;
}
