use crate::domain::model::{DispatchSummary, RequestOutcome, RequestSpec};
use crate::domain::ports::Fetcher;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Launches one task per request, then waits for every task to finish.
///
/// Outcomes are logged at debug level and dropped. A request that fails,
/// answers 404, or panics counts the same as one that succeeded.
pub struct Dispatcher<F: Fetcher> {
    fetcher: Arc<F>,
}

impl<F: Fetcher> Dispatcher<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }

    pub async fn dispatch(&self, specs: &[RequestSpec]) -> DispatchSummary {
        let mut join_set = JoinSet::new();

        // 全部先送出，不等待前一個完成
        for spec in specs {
            let fetcher = Arc::clone(&self.fetcher);
            let spec = spec.clone();
            join_set.spawn(async move {
                let outcome = match fetcher.fetch(&spec).await {
                    Ok(status) => RequestOutcome::Completed { status },
                    Err(e) => RequestOutcome::Failed {
                        reason: e.to_string(),
                    },
                };
                (spec, outcome)
            });
        }

        let launched = join_set.len();
        tracing::debug!("Launched {} requests", launched);

        // 唯一的等待點：所有請求都結束後才返回
        let mut settled = 0;
        while let Some(joined) = join_set.join_next().await {
            settled += 1;
            match joined {
                Ok((spec, outcome)) => {
                    tracing::debug!("{} settled: {:?}", spec.url(), outcome);
                }
                Err(e) => {
                    tracing::debug!("Request task {:?}: {}", RequestOutcome::Aborted, e);
                }
            }
        }

        tracing::debug!("{}/{} requests settled", settled, launched);
        DispatchSummary { launched, settled }
    }
}
