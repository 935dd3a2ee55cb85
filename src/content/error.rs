use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContentError>;

/// Failures surfaced by the content API client.
///
/// Transport failures, non-success statuses and unexpected response shapes
/// all collapse into `Fetch`.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content service unreachable: {0}")]
    Fetch(String),

    #[error("Post not found: {0}")]
    NotFound(String),
}

impl ContentError {
    /// Heading shown to visitors
    pub fn title(&self) -> &'static str {
        match self {
            ContentError::Fetch(_) => "Unable to Load Blog Post",
            ContentError::NotFound(_) => "Blog Post Not Found",
        }
    }

    /// Explanation shown to visitors
    pub fn user_message(&self) -> &'static str {
        match self {
            ContentError::Fetch(_) => "There was an error loading this content. Please try again.",
            ContentError::NotFound(_) => "The post you are looking for does not exist or has moved.",
        }
    }

    /// Whether re-issuing the same request may help
    pub fn is_retryable(&self) -> bool {
        matches!(self, ContentError::Fetch(_))
    }
}

impl From<reqwest::Error> for ContentError {
    fn from(err: reqwest::Error) -> Self {
        ContentError::Fetch(err.to_string())
    }
}

impl From<serde_json::Error> for ContentError {
    fn from(err: serde_json::Error) -> Self {
        ContentError::Fetch(format!("unexpected response shape: {}", err))
    }
}
