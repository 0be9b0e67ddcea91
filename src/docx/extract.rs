/*!
 * Plain-text extraction from uploaded reports.
 *
 * Word documents are read straight from `word/document.xml`: run text is
 * concatenated per paragraph, tabs and line breaks are kept, and paragraphs
 * are separated by a blank line. Formatting, tables structure, headers and
 * footers are ignored. Plain-text reports are passed through as UTF-8.
 */

use std::io::{Cursor, Read};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::xml::unescape;
use crate::errors::ExtractionError;
use crate::file_utils::ReportKind;

/// Tokens of interest inside `word/document.xml`
static DOCUMENT_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|(<w:tab/>)|(<w:br(?:\s[^>]*)?/>|<w:cr/>)|(</w:p>|<w:p(?:\s[^>]*)?/>)")
        .expect("Invalid document token regex")
});

/// Main document part inside a .docx package
const DOCUMENT_PART: &str = "word/document.xml";

/// Turns uploaded report bytes into plain text
pub trait TextExtractor: Send + Sync + std::fmt::Debug {
    /// Extract the report text for an upload of the given kind
    fn extract(&self, data: &[u8], kind: ReportKind) -> Result<String, ExtractionError>;
}

/// Extractor for .docx and plain-text reports
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportExtractor;

impl TextExtractor for ReportExtractor {
    fn extract(&self, data: &[u8], kind: ReportKind) -> Result<String, ExtractionError> {
        extract_text(data, kind)
    }
}

/// Extract the report text from raw upload bytes.
pub fn extract_text(data: &[u8], kind: ReportKind) -> Result<String, ExtractionError> {
    let text = match kind {
        ReportKind::Docx => extract_docx_text(data)?,
        ReportKind::Text => extract_plain_text(data)?,
        ReportKind::Unknown => {
            return Err(ExtractionError::UnsupportedFormat(
                "expected a .docx or .txt report".to_string(),
            ))
        }
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }

    debug!("Extracted {} characters of report text", text.chars().count());
    Ok(text)
}

/// Extract raw text from a .docx package.
pub fn extract_docx_text(data: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut part = archive.by_name(DOCUMENT_PART)?;

    let mut xml = String::new();
    part.read_to_string(&mut xml).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            ExtractionError::MalformedPackage(format!("{} is not valid UTF-8", DOCUMENT_PART))
        } else {
            ExtractionError::Io(e)
        }
    })?;

    Ok(document_xml_to_text(&xml))
}

/// Convert the body of `word/document.xml` into plain text.
pub fn document_xml_to_text(xml: &str) -> String {
    let mut text = String::new();
    let mut paragraph = String::new();

    for captures in DOCUMENT_TOKEN_REGEX.captures_iter(xml) {
        if let Some(run_text) = captures.get(1) {
            paragraph.push_str(&unescape(run_text.as_str()));
        } else if captures.get(2).is_some() {
            paragraph.push('\t');
        } else if captures.get(3).is_some() {
            paragraph.push('\n');
        } else if captures.get(4).is_some() {
            text.push_str(&paragraph);
            text.push_str("\n\n");
            paragraph.clear();
        }
    }
    // Trailing runs outside a closed paragraph
    text.push_str(&paragraph);

    text.trim_end().to_string()
}

/// Decode a plain-text report, dropping a UTF-8 byte order mark.
pub fn extract_plain_text(data: &[u8]) -> Result<String, ExtractionError> {
    let text = std::str::from_utf8(data).map_err(|_| ExtractionError::InvalidEncoding)?;
    Ok(text.strip_prefix('\u{FEFF}').unwrap_or(text).to_string())
}
