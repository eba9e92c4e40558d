use crate::utils::error::Result;
use url::Url;

/// 一個對外請求：目標 URL 與是否丟棄回應內容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    url: Url,
    discard_body: bool,
}

impl RequestSpec {
    /// GET `path` on `base`, discarding the response body.
    pub fn get(base: &Url, path: &str) -> Result<Self> {
        Ok(Self {
            url: base.join(path)?,
            discard_body: true,
        })
    }

    /// Keep the body around for trace logging instead of dropping it unread.
    pub fn keep_body(mut self) -> Self {
        self.discard_body = false;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn discard_body(&self) -> bool {
        self.discard_body
    }
}

/// Terminal state of one launched unit. Only ever logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Completed { status: u16 },
    Failed { reason: String },
    Aborted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub launched: usize,
    pub settled: usize,
}
