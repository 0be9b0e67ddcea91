/*!
 * # LLBP - Lessons Learned and Best Practices briefing generator
 *
 * A Rust library and HTTP service that turns incident or investigation
 * reports into LLBP briefings using AI.
 *
 * ## Features
 *
 * - Extract text from uploaded .docx or plain-text reports
 * - Generate the briefing using various AI providers:
 *   - OpenAI API (also LM Studio)
 *   - Anthropic API
 *   - Ollama (local LLM)
 * - Convert the model's markdown subset (bold titles, `- ` bullets) into a
 *   Word document with deterministic output
 * - Serve the pipeline over HTTP or run it on local files
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `prompts`: Prompt templates sent with every report
 * - `providers`: Client implementations for various LLM providers:
 *   - `providers::openai`: OpenAI API client
 *   - `providers::anthropic`: Anthropic API client
 *   - `providers::ollama`: Ollama API client
 *   - `providers::mock`: Scripted provider for tests
 * - `document`: Text to structured document conversion:
 *   - `document::classify`: Line classification
 *   - `document::paragraph`: Paragraph records and spacing
 *   - `document::model`: Assembled document and metadata
 * - `docx`: Word package writing and report text extraction
 * - `briefing_service`: Report to briefing pipeline
 * - `server`: HTTP endpoints
 * - `app_controller`: Local file and folder processing
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod briefing_service;
pub mod document;
pub mod docx;
pub mod errors;
pub mod file_utils;
pub mod prompts;
pub mod providers;
pub mod server;

// Re-exports for convenience
pub use app_config::Config;
pub use briefing_service::BriefingService;
pub use document::{convert, DocumentModel, ParagraphRecord};
pub use docx::DocxEncoder;
pub use errors::{AppError, EncodeError, ExtractionError, ProviderError};
pub use providers::{ChatPrompt, Provider};
