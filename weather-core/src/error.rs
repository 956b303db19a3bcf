use thiserror::Error;

/// Every way a query can end without a result.
///
/// `Display` carries diagnostic detail for logs. Use [`QueryError::user_message`]
/// for anything shown to a person.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("place query is empty")]
    Validation,

    #[error("no place matches '{0}'")]
    NotFound(String),

    #[error("weather fetch failed: {0:#}")]
    Fetch(#[from] anyhow::Error),

    #[error("query was superseded by a newer one")]
    Cancelled,
}

impl QueryError {
    /// Message for the end user. `None` for cancellation, which is never shown.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            QueryError::Validation => Some("Please enter a city or village."),
            QueryError::NotFound(_) => Some("City not found. Try another name."),
            QueryError::Fetch(_) => Some("Failed to fetch weather. Try again later."),
            QueryError::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, QueryError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_message_does_not_leak_provider_text() {
        let err = QueryError::from(anyhow::anyhow!("401 Unauthorized: invalid api key"));
        assert!(err.to_string().contains("invalid api key"));
        let shown = err.user_message().unwrap();
        assert_eq!(shown, "Failed to fetch weather. Try again later.");
    }

    #[test]
    fn cancellation_is_silent() {
        assert!(QueryError::Cancelled.user_message().is_none());
        assert!(QueryError::Cancelled.is_cancelled());
        assert!(!QueryError::Validation.is_cancelled());
    }
}
