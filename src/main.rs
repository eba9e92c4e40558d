use parallel_curl::utils::logger;
use parallel_curl::core::runner::{FINISH_LINE, START_LINE};
use parallel_curl::{BatchRunner, DispatchConfig, Dispatcher, ReqwestFetcher};

#[tokio::main]
async fn main() {
    // 初始化日誌（stderr）
    logger::init_cli_logger(false);

    let config = DispatchConfig::default();
    tracing::debug!("Dispatch config: {:?}", config);

    // 批次建立失敗也照樣印出兩行訊息並以 0 結束
    let specs = config.request_specs().unwrap_or_else(|e| {
        tracing::error!("Failed to build request batch: {}", e);
        Vec::new()
    });

    let fetcher = match ReqwestFetcher::new() {
        Ok(fetcher) => fetcher,
        Err(e) => {
            tracing::error!("Failed to build HTTP client: {}", e);
            println!("{}", START_LINE);
            println!("{}", FINISH_LINE);
            return;
        }
    };

    let runner = BatchRunner::new(Dispatcher::new(fetcher));
    let summary = runner.run(&specs, &mut std::io::stdout()).await;

    tracing::debug!(
        "{} launched, {} settled",
        summary.launched,
        summary.settled
    );
}
