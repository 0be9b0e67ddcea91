/*!
 * Tests for error types and conversions
 */

use llbp::errors::{AppError, EncodeError, ExtractionError, ProviderError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "Overloaded".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("503"));
    assert!(display.contains("Overloaded"));
}

#[test]
fn test_providerError_fromStatus_shouldMapAuthAndRateLimit() {
    assert!(matches!(
        ProviderError::from_status(401, "bad key".to_string()),
        ProviderError::AuthenticationError(_)
    ));
    assert!(matches!(
        ProviderError::from_status(403, "forbidden".to_string()),
        ProviderError::AuthenticationError(_)
    ));
    assert!(matches!(
        ProviderError::from_status(429, "slow down".to_string()),
        ProviderError::RateLimitExceeded(_)
    ));
    assert!(matches!(
        ProviderError::from_status(500, "boom".to_string()),
        ProviderError::ApiError { status_code: 500, .. }
    ));
}

#[test]
fn test_providerError_timeout_shouldMentionSeconds() {
    let display = ProviderError::Timeout(120).to_string();
    assert!(display.contains("120 seconds"));
}

#[test]
fn test_extractionError_fromZipFileNotFound_shouldBeMissingPart() {
    let error = ExtractionError::from(zip::result::ZipError::FileNotFound);
    assert!(matches!(error, ExtractionError::MissingDocumentPart));
}

#[test]
fn test_extractionError_fromInvalidArchive_shouldBeMalformed() {
    let error = ExtractionError::from(zip::result::ZipError::InvalidArchive("bad header"));
    assert!(matches!(error, ExtractionError::MalformedPackage(_)));
}

#[test]
fn test_appError_fromExtractionError_shouldWrapMessage() {
    let error: AppError = ExtractionError::EmptyDocument.into();
    let display = error.to_string();
    assert!(display.starts_with("Extraction error"));
    assert!(display.contains("no text"));
}

#[test]
fn test_appError_badRequest_shouldDisplayMessageVerbatim() {
    let error = AppError::BadRequest("No 'report' file uploaded".to_string());
    assert_eq!(error.to_string(), "No 'report' file uploaded");
}

#[test]
fn test_appError_payloadTooLarge_shouldDisplayMessageVerbatim() {
    let error = AppError::PayloadTooLarge("Failed to read uploaded report: length limit exceeded".to_string());
    assert_eq!(error.to_string(), "Failed to read uploaded report: length limit exceeded");
}

#[test]
fn test_appError_fromEncodeError_shouldNamePart() {
    let error: AppError = EncodeError::Part {
        part: "word/document.xml",
        message: "disk full".to_string(),
    }
    .into();
    assert!(error.to_string().contains("word/document.xml"));
}

#[test]
fn test_appError_fromAnyhow_shouldBeUnknown() {
    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(_)));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(_)));
}
