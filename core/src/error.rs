use thiserror::Error;

/// The order collection could not be read. The dashboard shows nothing
/// rather than stale or partial metrics.
#[derive(Error, Debug)]
#[error("Failed to fetch completed orders: {source}")]
pub struct FetchError {
    #[source]
    pub source: anyhow::Error,
}

impl FetchError {
    pub fn new(source: anyhow::Error) -> Self {
        Self { source }
    }
}

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Order {0} not found")]
    NotFound(String),

    #[error("Order {0} is already completed")]
    AlreadyCompleted(String),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("{channel} delivery failed: {reason}")]
    Delivery { channel: String, reason: String },

    #[error("{channel} has no recipient for order {order_id}")]
    NoRecipient { channel: String, order_id: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
