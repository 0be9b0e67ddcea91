use anyhow::{anyhow, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::briefing_service::BriefingService;
use crate::file_utils::FileManager;
use crate::providers::Provider;

// @module: Application controller for local report processing

/// Counts from a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    /// Briefings written
    pub processed: usize,
    /// Reports skipped because a briefing already exists
    pub skipped: usize,
    /// Reports that failed
    pub errors: usize,
}

/// Drives the briefing pipeline over files on disk
pub struct Controller {
    // @field: Briefing pipeline
    service: Arc<BriefingService>,
}

impl Controller {
    // @method: Create a controller around an existing service
    pub fn new(service: Arc<BriefingService>) -> Self {
        Self { service }
    }

    // @method: Create a controller from configuration and a provider
    pub fn with_config(config: &Config, provider: Arc<dyn Provider>) -> Self {
        Self::new(Arc::new(BriefingService::new(config, provider)))
    }

    /// Verify the provider is reachable before any report is sent
    pub async fn check_connection(&self) -> Result<()> {
        self.service.check_provider().await
            .with_context(|| format!("Connection check against {} failed", self.service.provider_name()))?;
        info!("Connected to {}", self.service.provider_name());
        Ok(())
    }

    /// Generate a briefing for one report.
    ///
    /// Returns the written path, or `None` when a briefing already exists
    /// and `force_overwrite` is off.
    pub async fn run(&self, input_file: &Path, output_dir: Option<&Path>, force_overwrite: bool) -> Result<Option<PathBuf>> {
        self.run_with_progress(input_file, output_dir, &MultiProgress::new(), force_overwrite).await
    }

    async fn run_with_progress(
        &self,
        input_file: &Path,
        output_dir: Option<&Path>,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_dir = Self::output_dir_for(input_file, output_dir);
        let output_path = FileManager::generate_output_path(input_file, &output_dir);
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, briefing already exists (use -f to force overwrite)", input_file);
            return Ok(None);
        }

        let start_time = Instant::now();
        let data = FileManager::read_bytes(input_file)?;
        let file_name = input_file.file_name().map(|f| f.to_string_lossy().to_string());
        let kind = FileManager::detect_report_kind(file_name.as_deref(), &data);

        let spinner = multi_progress.add(ProgressBar::new_spinner());
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(format!(
            "Waiting for {} on {}",
            self.service.provider_name(),
            file_name.as_deref().unwrap_or("report")
        ));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let result = self.service.render_docx(data, kind).await;
        spinner.finish_and_clear();

        let docx = result.with_context(|| format!("Failed to generate briefing for {:?}", input_file))?;
        FileManager::write_bytes(&output_path, &docx)?;

        info!(
            "Briefing written to {:?} in {}",
            output_path,
            Self::format_duration(start_time.elapsed())
        );
        Ok(Some(output_path))
    }

    /// Generate briefings for every report below a directory.
    ///
    /// A failing report is logged and counted; the run carries on.
    pub async fn run_folder(&self, input_dir: &Path, output_dir: Option<&Path>, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let reports = FileManager::find_reports(input_dir)?;
        if reports.is_empty() {
            return Err(anyhow!("No report files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(reports.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} reports ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();

        for report in &reports {
            let file_name = report.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            match self.run_with_progress(report, output_dir, &multi_progress, force_overwrite).await {
                Ok(Some(_)) => summary.processed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.errors += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed in {}: {} processed, {} skipped, {} errors",
            Self::format_duration(start_time.elapsed()),
            summary.processed,
            summary.skipped,
            summary.errors
        );

        Ok(summary)
    }

    /// Convert already-generated briefing text into a .docx without calling the model
    pub fn render(&self, text_file: &Path, output_file: Option<&Path>) -> Result<PathBuf> {
        let text = FileManager::read_to_string(text_file)?;
        let docx = self.service.render_text(&text)
            .with_context(|| format!("Failed to render {:?}", text_file))?;

        let output_path = match output_file {
            Some(path) => path.to_path_buf(),
            None => FileManager::generate_output_path(text_file, Self::output_dir_for(text_file, None)),
        };
        FileManager::write_bytes(&output_path, &docx)?;

        info!("Document written to {:?}", output_path);
        Ok(output_path)
    }

    fn output_dir_for(input_file: &Path, output_dir: Option<&Path>) -> PathBuf {
        match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => input_file.parent().map(Path::to_path_buf).unwrap_or_default(),
        }
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
