use crate::domain::model::RequestSpec;
use crate::domain::ports::Fetcher;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

/// Production `Fetcher` backed by `reqwest`.
///
/// No request timeout is set; a request ends when the server answers, the
/// connection fails, or the OS gives up on connecting. Proxy environment
/// variables are ignored so the batch always goes straight to its target.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder().no_proxy().build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, spec: &RequestSpec) -> Result<u16> {
        tracing::debug!("GET {}", spec.url());
        let response = self.client.get(spec.url().clone()).send().await?;
        let status = response.status().as_u16();

        if spec.discard_body() {
            // 讀完整個 body 再丟掉，與 `curl -o /dev/null` 相同
            let body = response.bytes().await?;
            tracing::trace!("{} -> {} ({} bytes discarded)", spec.url(), status, body.len());
        } else {
            let body = response.text().await?;
            tracing::trace!("{} -> {}: {}", spec.url(), status, body);
        }

        Ok(status)
    }
}
