/*!
 * Error types for the llbp application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with completion provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider did not answer within the configured time
    #[error("Completion timed out after {0} seconds")]
    Timeout(u64),
}

impl ProviderError {
    /// Map a non-success HTTP status and its body onto the matching variant
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur while pulling plain text out of an uploaded report
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The upload is neither a Word document nor plain text
    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),

    /// The zip container could not be read
    #[error("Malformed document package: {0}")]
    MalformedPackage(String),

    /// The package has no main document part
    #[error("Document package has no word/document.xml part")]
    MissingDocumentPart,

    /// Plain-text upload is not valid UTF-8
    #[error("Report is not valid UTF-8 text")]
    InvalidEncoding,

    /// Nothing but whitespace was extracted
    #[error("Report contains no text")]
    EmptyDocument,

    /// Reading the staged upload failed
    #[error("Failed to read report: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for ExtractionError {
    fn from(error: zip::result::ZipError) -> Self {
        match error {
            zip::result::ZipError::FileNotFound => Self::MissingDocumentPart,
            zip::result::ZipError::Io(e) => Self::Io(e),
            other => Self::MalformedPackage(other.to_string()),
        }
    }
}

/// Errors that can occur while packing a document into a .docx buffer
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Writing a part into the zip container failed
    #[error("Failed to write document part {part}: {message}")]
    Part {
        /// Name of the part inside the package
        part: &'static str,
        /// Underlying failure
        message: String,
    },

    /// Finalizing the zip container failed
    #[error("Failed to finish document package: {0}")]
    Finish(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// The incoming request was malformed
    #[error("{0}")]
    BadRequest(String),

    /// The upload exceeded the configured size limit
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from text extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from document encoding
    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
