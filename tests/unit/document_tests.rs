/*!
 * Tests for text to document conversion
 */

use llbp::document::{
    classify_line, convert, ConversionOptions, DocumentMetadata, LineKind, ParagraphRecord,
    SPACING_MEDIUM, SPACING_SMALL,
};

fn convert_default(text: &str) -> Vec<ParagraphRecord> {
    convert(text, DocumentMetadata::default(), ConversionOptions::default())
        .paragraphs()
        .to_vec()
}

#[test]
fn test_classifyLine_shouldRecognizeEachKind() {
    assert_eq!(classify_line("   ").kind, LineKind::Blank);
    assert_eq!(classify_line("**Analysis:**").kind, LineKind::Header);
    assert_eq!(classify_line("  - item  ").kind, LineKind::Bullet);
    assert_eq!(classify_line("plain text").kind, LineKind::Body);
}

#[test]
fn test_classifyLine_withInlineBold_shouldBeBody() {
    let line = classify_line("**Note** this is not a header");
    assert_eq!(line.kind, LineKind::Body);
}

#[test]
fn test_classifyLine_withDashNoSpace_shouldBeBody() {
    let line = classify_line("-Do not list any causes");
    assert_eq!(line.kind, LineKind::Body);
    assert_eq!(line.content, "-Do not list any causes");
}

#[test]
fn test_convert_withBriefingSample_shouldMatchExpectedRecords() {
    let records = convert_default("**Title:**\n\nSome text\n- point one\n- point two\n");

    assert_eq!(records, vec![
        ParagraphRecord::header("Title:"),
        ParagraphRecord::body("Some text"),
        ParagraphRecord::bullet("point one", 0),
        ParagraphRecord::bullet("point two", 0),
    ]);
}

#[test]
fn test_convert_headerThenBlank_shouldCollapseBlank() {
    let records = convert_default("**Discussion:**\n\n\nBody");
    assert_eq!(records.len(), 3);
    assert!(records[0].bold);
    assert!(records[1].is_spacer());
    assert_eq!(records[2].text, "Body");
}

#[test]
fn test_convert_blankBetweenBodies_shouldKeepSpacer() {
    let records = convert_default("First\n\nSecond");
    assert_eq!(records.len(), 3);
    assert!(records[1].is_spacer());
}

#[test]
fn test_convert_shouldApplySpacing() {
    let records = convert_default("**H**\nBody\n- bullet");
    assert_eq!(records[0].spacing_after, SPACING_MEDIUM);
    assert_eq!(records[1].spacing_after, SPACING_SMALL);
    assert_eq!(records[2].spacing_after, SPACING_SMALL);
}

#[test]
fn test_convert_withEmptyHeader_shouldEmitEmptyBoldByDefault() {
    let records = convert_default("****\nBody");
    assert_eq!(records.len(), 2);
    assert!(records[0].bold);
    assert!(records[0].text.is_empty());
}

#[test]
fn test_convert_withSuppressedEmptyHeader_shouldAlsoSwallowFollowingBlank() {
    let options = ConversionOptions { suppress_empty_headers: true };
    let model = convert("****\n\nBody", DocumentMetadata::default(), options);
    assert_eq!(model.paragraphs(), &[ParagraphRecord::body("Body")]);
}

#[test]
fn test_convert_withEmptyText_shouldBeEmptyDocument() {
    let model = convert("", DocumentMetadata::default(), ConversionOptions::default());
    assert!(model.is_empty());
}

#[test]
fn test_sectionTitles_shouldListHeadersInOrder() {
    let model = convert(
        "**Title:**\nX\n**Discussion:**\nY\n**Analysis:**",
        DocumentMetadata::default(),
        ConversionOptions::default(),
    );
    assert_eq!(model.section_titles(), vec!["Title:", "Discussion:", "Analysis:"]);
}
