use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::document::{self, ConversionOptions, DocumentMetadata, DocumentModel};
use crate::docx::{DocxEncoder, ReportExtractor, TextExtractor};
use crate::errors::{AppError, ExtractionError, ProviderError};
use crate::file_utils::ReportKind;
use crate::prompts::BriefingPrompt;
use crate::providers::Provider;

// @module: Briefing pipeline from uploaded report to .docx bytes

// @const: Stand-in text when the model answers with nothing
pub const EMPTY_COMPLETION_TEXT: &str = "GPT did not return a response.";

// @struct: Report-to-briefing pipeline shared by every request
#[derive(Debug)]
pub struct BriefingService {
    // @field: Completion client
    provider: Arc<dyn Provider>,

    // @field: Report text extractor
    extractor: Arc<dyn TextExtractor>,

    // @field: System and user prompts
    prompt: BriefingPrompt,

    // @field: Core properties written into every document
    metadata: DocumentMetadata,

    // @field: Converter options
    options: ConversionOptions,

    // @field: Upper bound on one completion call
    timeout: Duration,

    // @field: Package writer
    encoder: DocxEncoder,
}

impl BriefingService {
    // @creates: Service configured from the app config around an injected provider
    pub fn new(config: &Config, provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            extractor: Arc::new(ReportExtractor),
            prompt: config.completion.briefing_prompt(),
            metadata: config.document.metadata(),
            options: config.document.conversion_options(),
            timeout: Duration::from_secs(config.completion.get_timeout_secs()),
            encoder: DocxEncoder::new(),
        }
    }

    // @updates: Replace the completion timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    // @updates: Replace the text extractor
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    // @returns: Name of the active provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    // @returns: Ok when the provider answers its connection check within the timeout
    pub async fn check_provider(&self) -> Result<(), ProviderError> {
        tokio::time::timeout(self.timeout, self.provider.test_connection())
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout.as_secs()))??;
        debug!("{} connection check passed", self.provider.name());
        Ok(())
    }

    // @returns: Report text pulled from upload bytes, off the async workers
    pub async fn extract_report(&self, data: Vec<u8>, kind: ReportKind) -> Result<String, ExtractionError> {
        let extractor = Arc::clone(&self.extractor);
        tokio::task::spawn_blocking(move || extractor.extract(&data, kind))
            .await
            .map_err(|e| ExtractionError::Io(std::io::Error::other(e)))?
    }

    // @returns: Report text read from a staged file
    pub async fn extract_report_file(&self, path: &Path, kind: ReportKind) -> Result<String, ExtractionError> {
        let data = tokio::fs::read(path).await?;
        self.extract_report(data, kind).await
    }

    // @returns: Model output for one report, bounded by the timeout
    pub async fn complete(&self, report_text: &str) -> Result<String, ProviderError> {
        let prompt = self.prompt.render(report_text);
        debug!(
            "Sending {} prompt: {} system chars, {} user chars",
            self.provider.name(),
            prompt.system.len(),
            prompt.user.len()
        );

        let start = Instant::now();
        let text = tokio::time::timeout(self.timeout, self.provider.complete(&prompt))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout.as_secs()))??;
        debug!("{} answered in {:?}", self.provider.name(), start.elapsed());

        if text.trim().is_empty() {
            warn!("{} returned an empty completion", self.provider.name());
            return Ok(EMPTY_COMPLETION_TEXT.to_string());
        }
        Ok(text)
    }

    // @returns: Document model for generated briefing text
    pub fn generate_document(&self, briefing_text: &str) -> DocumentModel {
        let model = document::convert(briefing_text, self.metadata.clone(), self.options);
        debug!("Converted briefing into {} paragraphs", model.len());
        model
    }

    // @returns: .docx bytes for generated briefing text
    pub fn render_text(&self, briefing_text: &str) -> Result<Vec<u8>, AppError> {
        let model = self.generate_document(briefing_text);
        Ok(self.encoder.encode(&model)?)
    }

    // @returns: .docx briefing for extracted report text
    pub async fn brief(&self, report_text: &str) -> Result<Vec<u8>, AppError> {
        let briefing_text = self.complete(report_text).await?;
        self.render_text(&briefing_text)
    }

    // @returns: .docx briefing for raw upload bytes
    pub async fn render_docx(&self, data: Vec<u8>, kind: ReportKind) -> Result<Vec<u8>, AppError> {
        let report_text = self.extract_report(data, kind).await?;
        info!("Extracted {} characters of report text", report_text.len());
        self.brief(&report_text).await
    }

    // @returns: .docx briefing for a report file on disk
    pub async fn render_file(&self, path: &Path, kind: ReportKind) -> Result<Vec<u8>, AppError> {
        let report_text = self.extract_report_file(path, kind).await?;
        info!("Extracted {} characters of report text", report_text.len());
        self.brief(&report_text).await
    }
}
