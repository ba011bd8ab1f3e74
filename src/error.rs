use thiserror::Error;

/// Boxed error coming out of a data collaborator
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum RecommendError {
    /// Rejected argument (zero limit, non-positive smoothing constant, ...)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Failure reported by the underlying data store.
    /// Every operation is read-only, so retrying the whole call is safe.
    #[error("data store error: {0}")]
    Store(#[source] StoreError),

    #[error("config error: {0}")]
    Config(String),
}

impl RecommendError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        RecommendError::InvalidInput(msg.into())
    }

    /// Wrap any collaborator error
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RecommendError::Store(Box::new(err))
    }
}

impl From<serde_json::Error> for RecommendError {
    fn from(err: serde_json::Error) -> Self {
        RecommendError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;

/// Reject a zero result limit
#[inline]
pub(crate) fn ensure_limit(name: &str, limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(RecommendError::invalid(format!("{name} must be positive")));
    }
    Ok(())
}
