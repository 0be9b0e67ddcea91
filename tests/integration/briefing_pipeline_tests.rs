/*!
 * End-to-end tests of the report to briefing pipeline
 */

use std::sync::Arc;
use std::time::Duration;

use llbp::app_controller::Controller;
use llbp::briefing_service::BriefingService;
use llbp::docx::extract_text;
use llbp::errors::{AppError, ExtractionError, ProviderError};
use llbp::file_utils::ReportKind;
use llbp::providers::mock::MockProvider;
use llbp::providers::ChatPrompt;
use crate::common;

fn echo_report(prompt: &ChatPrompt) -> String {
    let report = prompt.user.rsplit("Report:\n").next().unwrap_or_default();
    format!("**Title:**\n\n{}\n\n**Actions to Prevent Recurrence:**\n- Review the checklist", report)
}

#[tokio::test]
async fn test_renderDocx_shouldCarryReportThroughModelIntoDocument() {
    common::init_logger();
    let provider = MockProvider::working().with_custom_response(echo_report);
    let service = BriefingService::new(&common::test_config(), Arc::new(provider));
    let report = common::docx_report(&["Crane load swung into scaffold."]);

    let docx = service.render_docx(report, ReportKind::Docx).await.unwrap();

    let model = service.generate_document(&echo_report(&ChatPrompt::new("", "Report:\nCrane load swung into scaffold.")));
    assert_eq!(model.section_titles(), vec!["Title:", "Actions to Prevent Recurrence:"]);

    let text = extract_text(&docx, ReportKind::Docx).unwrap();
    assert!(text.contains("Crane load swung into scaffold."));
    assert!(text.contains("Review the checklist"));
}

#[tokio::test]
async fn test_renderDocx_sameReportTwice_shouldBeByteIdentical() {
    let service = BriefingService::new(&common::test_config(), Arc::new(MockProvider::working()));

    let first = service.render_docx(b"Pump tripped.".to_vec(), ReportKind::Text).await.unwrap();
    let second = service.render_docx(b"Pump tripped.".to_vec(), ReportKind::Text).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_renderDocx_withSlowProvider_shouldFailWithTimeout() {
    let service = BriefingService::new(&common::test_config(), Arc::new(MockProvider::slow(1_000)))
        .with_timeout(Duration::from_millis(50));

    let result = service.render_docx(b"Pump tripped.".to_vec(), ReportKind::Text).await;

    assert!(matches!(result, Err(AppError::Provider(ProviderError::Timeout(_)))));
}

#[tokio::test]
async fn test_renderFile_withMissingFile_shouldBeExtractionError() {
    let dir = common::create_temp_dir().unwrap();
    let service = BriefingService::new(&common::test_config(), Arc::new(MockProvider::working()));

    let result = service.render_file(&dir.path().join("gone.docx"), ReportKind::Docx).await;

    assert!(matches!(result, Err(AppError::Extraction(ExtractionError::Io(_)))));
}

#[tokio::test]
async fn test_controller_runFolder_shouldWriteBriefingsToOutputDir() {
    let dir = common::create_temp_dir().unwrap();
    let reports = dir.path().join("reports");
    let out = dir.path().join("out");
    std::fs::create_dir_all(&reports).unwrap();
    common::create_test_file(&reports, "a.txt", b"First incident").unwrap();
    common::create_test_file(&reports, "b.docx", &common::docx_report(&["Second incident"])).unwrap();

    let controller = Controller::with_config(&common::test_config(), Arc::new(MockProvider::working()));
    let summary = controller.run_folder(&reports, Some(&out), false).await.unwrap();

    assert_eq!(summary.processed, 2);
    assert!(out.join("a.llbp.docx").exists());
    assert!(out.join("b.llbp.docx").exists());

    let again = controller.run_folder(&reports, Some(&out), false).await.unwrap();
    assert_eq!(again.skipped, 2);
}
