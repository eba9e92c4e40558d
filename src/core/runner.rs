use crate::core::dispatcher::Dispatcher;
use crate::domain::model::{DispatchSummary, RequestSpec};
use crate::domain::ports::Fetcher;
use std::io::Write;

pub const START_LINE: &str = "Starting parallel curl requests...";
pub const FINISH_LINE: &str = "All curl requests have finished.";

/// Wraps a dispatch with the two status lines.
pub struct BatchRunner<F: Fetcher> {
    dispatcher: Dispatcher<F>,
}

impl<F: Fetcher> BatchRunner<F> {
    pub fn new(dispatcher: Dispatcher<F>) -> Self {
        Self { dispatcher }
    }

    pub async fn run<W: Write>(&self, specs: &[RequestSpec], out: &mut W) -> DispatchSummary {
        announce(out, START_LINE);
        let summary = self.dispatcher.dispatch(specs).await;
        announce(out, FINISH_LINE);
        summary
    }
}

fn announce<W: Write>(out: &mut W, line: &str) {
    // 輸出失敗（例如 stdout 已關閉）不影響結束碼
    if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
        tracing::warn!("Failed to write status line: {}", e);
    }
}
