/*!
 * Common test utilities for the llbp test suite
 */

use anyhow::Result;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use zip::write::FileOptions;

use llbp::app_config::Config;

static INIT_LOGGER: Once = Once::new();

/// Route library logs through env_logger (RUST_LOG) for debugging tests
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Config that passes validation without touching the environment
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.completion.available_providers.iter_mut()
        .filter(|p| p.provider_type == "openai")
        .for_each(|p| p.api_key = "sk-test".to_string());
    config
}

/// Builds a minimal .docx package whose body holds one paragraph per entry
pub fn docx_report(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs.iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", p))
        .collect();
    let document = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        body
    );

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(b"<Types/>").unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

/// Reads one part of a .docx package as a string
pub fn read_part(docx: &[u8], part: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut file = archive.by_name(part).unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}
