/*!
 * WordprocessingML (.docx) encoder for briefing documents.
 *
 * A .docx file is a zip package of XML parts. The encoder writes the
 * smallest set of parts Word needs to open the file with paragraph spacing,
 * bold runs and bulleted lists intact.
 *
 * Output is deterministic: every zip entry carries the DOS epoch timestamp
 * and the core properties carry no creation time, so encoding the same
 * model twice yields the same bytes.
 */

use std::io::{Cursor, Write};

use log::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::xml::escape;
use crate::document::{DocumentModel, ParagraphRecord};
use crate::errors::EncodeError;

/// MIME type of a .docx package
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Numbering instance used for every bulleted paragraph
const BULLET_NUM_ID: u32 = 1;

/// Deepest indent level WordprocessingML numbering supports
const MAX_BULLET_LEVEL: u8 = 8;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const CONTENT_TYPES_XML: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/></Relationships>"#;

const APP_XML: &str = r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>llbp</Application></Properties>"#;

const STYLES_XML: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="en-US"/></w:rPr></w:rPrDefault><w:pPrDefault/></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/><w:basedOn w:val="Normal"/><w:qFormat/><w:pPr><w:ind w:left="720"/><w:contextualSpacing/></w:pPr></w:style></w:styles>"#;

const SECTION_PROPERTIES_XML: &str = r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#;

/// Encodes a `DocumentModel` into .docx bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxEncoder;

impl DocxEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self
    }

    /// Pack the document into a complete .docx buffer.
    pub fn encode(&self, document: &DocumentModel) -> Result<Vec<u8>, EncodeError> {
        let parts: [(&'static str, String); 8] = [
            ("[Content_Types].xml", with_declaration(CONTENT_TYPES_XML)),
            ("_rels/.rels", with_declaration(PACKAGE_RELS_XML)),
            ("docProps/core.xml", Self::core_properties_xml(document)),
            ("docProps/app.xml", with_declaration(APP_XML)),
            ("word/_rels/document.xml.rels", with_declaration(DOCUMENT_RELS_XML)),
            ("word/styles.xml", with_declaration(STYLES_XML)),
            ("word/numbering.xml", Self::numbering_xml()),
            ("word/document.xml", Self::document_xml(document)),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        for (part, content) in parts {
            zip.start_file(part, options)
                .map_err(|e| EncodeError::Part { part, message: e.to_string() })?;
            zip.write_all(content.as_bytes())
                .map_err(|e| EncodeError::Part { part, message: e.to_string() })?;
        }

        let buffer = zip.finish()
            .map_err(|e| EncodeError::Finish(e.to_string()))?
            .into_inner();

        debug!(
            "Encoded {} paragraphs into {} bytes of .docx",
            document.len(),
            buffer.len()
        );

        Ok(buffer)
    }

    /// The `word/document.xml` part.
    pub fn document_xml(document: &DocumentModel) -> String {
        let mut xml = String::with_capacity(256 + document.len() * 160);
        xml.push_str(XML_DECLARATION);
        xml.push_str(r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>"#);
        for paragraph in document.paragraphs() {
            Self::write_paragraph(&mut xml, paragraph);
        }
        xml.push_str(SECTION_PROPERTIES_XML);
        xml.push_str("</w:body></w:document>");
        xml
    }

    fn write_paragraph(xml: &mut String, paragraph: &ParagraphRecord) {
        xml.push_str("<w:p><w:pPr>");
        if let Some(level) = paragraph.bullet_level {
            xml.push_str(&format!(
                r#"<w:pStyle w:val="ListParagraph"/><w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{}"/></w:numPr>"#,
                level.min(MAX_BULLET_LEVEL),
                BULLET_NUM_ID
            ));
        }
        xml.push_str(&format!(r#"<w:spacing w:after="{}"/>"#, paragraph.spacing_after));
        xml.push_str("</w:pPr>");

        if !paragraph.text.is_empty() {
            xml.push_str("<w:r>");
            if paragraph.bold {
                xml.push_str("<w:rPr><w:b/><w:bCs/></w:rPr>");
            }
            xml.push_str(r#"<w:t xml:space="preserve">"#);
            xml.push_str(&escape(&paragraph.text));
            xml.push_str("</w:t></w:r>");
        }
        xml.push_str("</w:p>");
    }

    /// The `docProps/core.xml` part carrying creator, title and description.
    pub fn core_properties_xml(document: &DocumentModel) -> String {
        let metadata = &document.metadata;
        format!(
            concat!(
                "{}",
                r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
                "<dc:title>{}</dc:title><dc:creator>{}</dc:creator><dc:description>{}</dc:description><cp:lastModifiedBy>{}</cp:lastModifiedBy>",
                "</cp:coreProperties>"
            ),
            XML_DECLARATION,
            escape(&metadata.title),
            escape(&metadata.creator),
            escape(&metadata.description),
            escape(&metadata.creator),
        )
    }

    /// The `word/numbering.xml` part: one bullet definition for all levels.
    pub fn numbering_xml() -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="hybridMultilevel"/>"#);
        for level in 0..=MAX_BULLET_LEVEL {
            let glyph = match level % 3 {
                0 => "\u{2022}",
                1 => "o",
                _ => "\u{25AA}",
            };
            xml.push_str(&format!(
                r#"<w:lvl w:ilvl="{level}"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="{glyph}"/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="{left}" w:hanging="360"/></w:pPr></w:lvl>"#,
                level = level,
                glyph = glyph,
                left = 720 * (u32::from(level) + 1),
            ));
        }
        xml.push_str(&format!(
            r#"</w:abstractNum><w:num w:numId="{}"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#,
            BULLET_NUM_ID
        ));
        xml
    }
}

fn with_declaration(body: &str) -> String {
    let mut xml = String::with_capacity(XML_DECLARATION.len() + body.len());
    xml.push_str(XML_DECLARATION);
    xml.push_str(body);
    xml
}
