/*!
 * Word document (.docx) support.
 *
 * - `encoder`: `DocumentModel` to a .docx buffer
 * - `extract`: uploaded report to plain text
 * - `xml`: escaping helpers shared by both
 */

pub mod encoder;
pub mod extract;
pub mod xml;

pub use encoder::{DocxEncoder, DOCX_CONTENT_TYPE};
pub use extract::{extract_text, ReportExtractor, TextExtractor};
