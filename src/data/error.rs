//! Errors a single résumé item can run into.
//!
//! They never escape the item: the fetcher and the thumbnail pipeline
//! store them in their state and the UI shows them inline.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResumeError {
    /// The listing has no usable résumé path.
    #[error("invalid résumé reference: {0}")]
    InvalidInput(String),
    /// Network error or non-success status from the document service.
    #[error("couldn't fetch résumé: {0}")]
    FetchFailure(String),
    /// The payload isn't a readable PDF document.
    #[error("couldn't read résumé document: {0}")]
    DecodeFailure(String),
    /// The PDF engine failed to produce a thumbnail.
    #[error("couldn't render résumé thumbnail: {0}")]
    RenderFailure(String),
}

impl ResumeError {
    /// Short text shown in place of the thumbnail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "This listing has no résumé attached",
            Self::FetchFailure(_) => "Couldn't download the résumé",
            Self::DecodeFailure(_) => "The résumé isn't a readable PDF",
            Self::RenderFailure(_) => "Couldn't preview the résumé",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_error_with_detail() {
        let err = ResumeError::FetchFailure("status 404".to_string());
        assert_eq!(err.to_string(), "couldn't fetch résumé: status 404");
        assert_eq!(err.user_message(), "Couldn't download the résumé");
    }
}
