pub mod dispatcher;
pub mod http;
pub mod runner;

pub use crate::domain::model::{DispatchSummary, RequestOutcome, RequestSpec};
pub use crate::domain::ports::Fetcher;
pub use crate::utils::error::Result;
