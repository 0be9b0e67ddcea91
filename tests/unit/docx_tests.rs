/*!
 * Tests for .docx encoding and report text extraction
 */

use llbp::document::{convert, ConversionOptions, DocumentMetadata};
use llbp::docx::{extract_text, DocxEncoder, ReportExtractor, TextExtractor};
use llbp::errors::ExtractionError;
use llbp::file_utils::ReportKind;
use crate::common;

const BRIEFING: &str = "**Title:**\n\nLockout Missed on Conveyor\n\n**Discussion:**\nA technician reached into a conveyor that was still energized.\n\n**Actions to Prevent Recurrence:**\n- Verify zero energy before work\n- Add a tryout step";

fn encode(text: &str) -> Vec<u8> {
    let model = convert(text, DocumentMetadata::default(), ConversionOptions::default());
    DocxEncoder::new().encode(&model).unwrap()
}

#[test]
fn test_encode_sameModelTwice_shouldBeByteIdentical() {
    assert_eq!(encode(BRIEFING), encode(BRIEFING));
}

#[test]
fn test_encode_shouldWriteOneParagraphPerRecord() {
    let model = convert(BRIEFING, DocumentMetadata::default(), ConversionOptions::default());
    let docx = DocxEncoder::new().encode(&model).unwrap();
    let document = common::read_part(&docx, "word/document.xml");

    assert_eq!(document.matches("<w:p>").count(), model.len());
    assert_eq!(document.matches("<w:numPr>").count(), 2);
    assert_eq!(document.matches("<w:b/>").count(), 3);
}

#[test]
fn test_encode_shouldWriteMetadataIntoCoreProperties() {
    let metadata = DocumentMetadata {
        creator: "Safety Office".to_string(),
        title: "Conveyor <Lockout>".to_string(),
        description: "Quarterly lessons".to_string(),
    };
    let model = convert("Body", metadata, ConversionOptions::default());
    let docx = DocxEncoder::new().encode(&model).unwrap();
    let core = common::read_part(&docx, "docProps/core.xml");

    assert!(core.contains("<dc:creator>Safety Office</dc:creator>"));
    assert!(core.contains("<dc:title>Conveyor &lt;Lockout&gt;</dc:title>"));
    assert!(!core.contains("dcterms:created"));
}

#[test]
fn test_extract_encodedBriefing_shouldRecoverParagraphText() {
    let docx = encode(BRIEFING);

    let text = extract_text(&docx, ReportKind::Docx).unwrap();

    assert!(text.starts_with("Title:"));
    assert!(text.contains("Lockout Missed on Conveyor"));
    assert!(text.contains("Verify zero energy before work\n\nAdd a tryout step"));
}

#[test]
fn test_extract_reportPackage_shouldSeparateParagraphsWithBlankLine() {
    let docx = common::docx_report(&["Incident summary", "Pump &amp; valve failed"]);
    let text = ReportExtractor.extract(&docx, ReportKind::Docx).unwrap();
    assert_eq!(text, "Incident summary\n\nPump & valve failed");
}

#[test]
fn test_extract_withGarbageDocx_shouldBeMalformed() {
    let result = extract_text(b"PK\x03\x04 definitely not a zip", ReportKind::Docx);
    assert!(matches!(result, Err(ExtractionError::MalformedPackage(_)) | Err(ExtractionError::Io(_))));
}

#[test]
fn test_extract_withEmptyReport_shouldFail() {
    let docx = common::docx_report(&["   "]);
    assert!(matches!(
        extract_text(&docx, ReportKind::Docx),
        Err(ExtractionError::EmptyDocument)
    ));
}

#[test]
fn test_extract_withInvalidUtf8Text_shouldFail() {
    assert!(matches!(
        extract_text(&[0xC3, 0x28], ReportKind::Text),
        Err(ExtractionError::InvalidEncoding)
    ));
}

#[test]
fn test_extract_withUnknownKind_shouldBeUnsupported() {
    assert!(matches!(
        extract_text(b"%PDF-1.7", ReportKind::Unknown),
        Err(ExtractionError::UnsupportedFormat(_))
    ));
}
