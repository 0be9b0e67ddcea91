/*!
 * Conversion of model output into a structured briefing document.
 *
 * This module provides the text-to-document pipeline:
 * - `classify`: one line of raw text to a `LineKind`
 * - `paragraph`: classified lines to `ParagraphRecord`s
 * - `model`: records plus metadata to a `DocumentModel`
 *
 * Encoding the model into a .docx buffer lives in `crate::docx`.
 */

pub mod classify;
pub mod model;
pub mod paragraph;

pub use classify::{classify_line, ClassifiedLine, LineKind};
pub use model::{DocumentMetadata, DocumentModel};
pub use paragraph::{ConversionOptions, ParagraphBuilder, ParagraphRecord, SPACING_MEDIUM, SPACING_SMALL};

/// Convert raw model output into a document model.
///
/// Lines are split with `str::lines`, so `\r\n` endings are handled and a
/// trailing newline does not add an extra blank paragraph.
pub fn convert(text: &str, metadata: DocumentMetadata, options: ConversionOptions) -> DocumentModel {
    let mut builder = ParagraphBuilder::with_options(options);
    let paragraphs = text
        .lines()
        .filter_map(|line| builder.push(&classify_line(line)))
        .collect();

    DocumentModel::assemble(paragraphs, metadata)
}
