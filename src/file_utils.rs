use anyhow::{Result, Context};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

// @module: File and directory utilities

/// Extensions accepted as Word reports
const DOCX_EXTENSIONS: [&str; 1] = ["docx"];

/// Extensions accepted as plain-text reports
const TEXT_EXTENSIONS: [&str; 3] = ["txt", "text", "md"];

/// Zip local file header magic, the first bytes of every .docx
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Enum representing the kinds of report the service can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Word document (.docx)
    Docx,
    /// Plain UTF-8 text
    Text,
    /// Anything else
    Unknown,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for a generated briefing
    // @params: input_file, output_dir
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
    ) -> PathBuf {
        let stem = input_file.as_ref().file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push_str(".llbp.docx");

        output_dir.as_ref().join(output_filename)
    }

    /// Find report files (.docx and plain text) below a directory
    pub fn find_reports<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            // Skip briefings generated by a previous run
            if path.is_file()
                && !path.to_string_lossy().ends_with(".llbp.docx")
                && Self::kind_from_extension(path) != ReportKind::Unknown
            {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file to bytes
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write bytes to a file, creating the parent directory if needed
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Stage an uploaded report in the upload directory.
    ///
    /// The returned guard deletes the file when dropped, whichever way the
    /// request ends.
    pub fn stage_upload<P: AsRef<Path>>(upload_dir: P, data: &[u8]) -> Result<NamedTempFile> {
        let upload_dir = upload_dir.as_ref();
        Self::ensure_dir(upload_dir)?;

        let mut staged = tempfile::Builder::new()
            .prefix("report-")
            .tempfile_in(upload_dir)
            .with_context(|| format!("Failed to create upload file in {:?}", upload_dir))?;

        staged.write_all(data).context("Failed to write uploaded report")?;
        staged.flush().context("Failed to flush uploaded report")?;

        Ok(staged)
    }

    /// Report kind from the file extension alone
    pub fn kind_from_extension<P: AsRef<Path>>(path: P) -> ReportKind {
        let Some(ext) = path.as_ref().extension() else {
            return ReportKind::Unknown;
        };
        let ext = ext.to_string_lossy().to_lowercase();

        if DOCX_EXTENSIONS.contains(&ext.as_str()) {
            ReportKind::Docx
        } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            ReportKind::Text
        } else {
            ReportKind::Unknown
        }
    }

    /// Detect the kind of an uploaded report.
    ///
    /// The file name decides when it has a known extension; otherwise the
    /// content is examined (zip magic for .docx, NUL-free UTF-8 for text).
    pub fn detect_report_kind(file_name: Option<&str>, data: &[u8]) -> ReportKind {
        if let Some(name) = file_name {
            let kind = Self::kind_from_extension(name);
            if kind != ReportKind::Unknown {
                return kind;
            }
        }

        if data.starts_with(&ZIP_MAGIC) {
            return ReportKind::Docx;
        }

        match std::str::from_utf8(data) {
            Ok(text) if !text.contains('\0') => ReportKind::Text,
            _ => ReportKind::Unknown,
        }
    }
}
