// Application errors
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("monitoring session already started")]
    AlreadyStarted,

    #[error("monitoring session has ended")]
    SessionClosed,

    #[error("vitals source failed for path '{path}': {source}")]
    Source {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}
