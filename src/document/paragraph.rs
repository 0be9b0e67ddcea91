/*!
 * Paragraph building from classified lines.
 */

use super::classify::{strip_bold_markers, ClassifiedLine, LineKind};

/// Space after body text, bullets and blank lines, in twentieths of a point
pub const SPACING_SMALL: u32 = 40;

/// Space after section headers, in twentieths of a point
pub const SPACING_MEDIUM: u32 = 100;

/// One output paragraph with its formatting attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphRecord {
    /// Text with formatting markers stripped (empty for spacer paragraphs)
    pub text: String,

    /// Whole paragraph rendered bold
    pub bold: bool,

    /// Bullet indent level when the paragraph is a list item
    pub bullet_level: Option<u8>,

    /// Space after the paragraph, in twentieths of a point
    pub spacing_after: u32,
}

impl ParagraphRecord {
    /// Bold section title
    pub fn header(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            bullet_level: None,
            spacing_after: SPACING_MEDIUM,
        }
    }

    /// List item at the given indent level
    pub fn bullet(text: impl Into<String>, level: u8) -> Self {
        Self {
            text: text.into(),
            bold: false,
            bullet_level: Some(level),
            spacing_after: SPACING_SMALL,
        }
    }

    /// Plain paragraph
    pub fn body(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            bullet_level: None,
            spacing_after: SPACING_SMALL,
        }
    }

    /// Empty spacer paragraph produced by a blank line
    pub fn spacer() -> Self {
        Self::body(String::new())
    }

    /// Whether this is a spacer paragraph
    pub fn is_spacer(&self) -> bool {
        self.text.is_empty() && !self.bold && self.bullet_level.is_none()
    }

    /// The line kind this record was built from
    pub fn kind(&self) -> LineKind {
        if self.bold {
            LineKind::Header
        } else if self.bullet_level.is_some() {
            LineKind::Bullet
        } else if self.text.is_empty() {
            LineKind::Blank
        } else {
            LineKind::Body
        }
    }
}

/// Options that change how lines become paragraphs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Drop headers whose text is empty after stripping markers (`****`)
    pub suppress_empty_headers: bool,
}

/// Turns classified lines into paragraph records, one line at a time.
///
/// The only state is whether the previous line was a header, which
/// collapses the blank line the model tends to put after a section title.
#[derive(Debug, Default)]
pub struct ParagraphBuilder {
    options: ConversionOptions,
    last_was_header: bool,
}

impl ParagraphBuilder {
    /// Create a builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given options
    pub fn with_options(options: ConversionOptions) -> Self {
        Self {
            options,
            last_was_header: false,
        }
    }

    /// Feed one classified line, returning the record it produces, if any
    pub fn push(&mut self, line: &ClassifiedLine<'_>) -> Option<ParagraphRecord> {
        match line.kind {
            LineKind::Blank => {
                let record = (!self.last_was_header).then(ParagraphRecord::spacer);
                self.last_was_header = false;
                record
            }
            LineKind::Header => {
                self.last_was_header = true;
                let text = strip_bold_markers(line.content);
                if text.is_empty() && self.options.suppress_empty_headers {
                    return None;
                }
                Some(ParagraphRecord::header(text))
            }
            LineKind::Bullet => {
                self.last_was_header = false;
                Some(ParagraphRecord::bullet(strip_bold_markers(line.content), 0))
            }
            LineKind::Body => {
                self.last_was_header = false;
                Some(ParagraphRecord::body(strip_bold_markers(line.content)))
            }
        }
    }
}
