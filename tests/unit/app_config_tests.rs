/*!
 * Tests for app configuration loading, overrides and validation
 */

use std::sync::Arc;

use llbp::app_config::{CompletionProvider, Config, LogLevel};
use llbp::briefing_service::BriefingService;
use llbp::providers::mock::MockProvider;
use llbp::server::{self, AppState};
use crate::common;

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let (config, created) = Config::load_or_create(&path).unwrap();

    assert!(created);
    assert!(path.exists());
    assert_eq!(config.server.port, 5000);

    let (reloaded, created_again) = Config::load_or_create(&path).unwrap();
    assert!(!created_again);
    assert_eq!(reloaded.completion.get_model(), "gpt-4");
}

#[test]
fn test_save_thenFromFile_shouldKeepEdits() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = common::test_config();
    config.completion.provider = CompletionProvider::Anthropic;
    config.document.suppress_empty_headers = true;
    config.log_level = LogLevel::Debug;
    config.save(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.completion.provider, CompletionProvider::Anthropic);
    assert!(loaded.document.suppress_empty_headers);
    assert_eq!(loaded.log_level, LogLevel::Debug);
}

#[test]
fn test_fromFile_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", b"{ not json").unwrap();

    let err = Config::from_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config file"));
}

#[test]
fn test_validate_withTestConfig_shouldPass() {
    assert!(common::test_config().validate().is_ok());
}

#[test]
fn test_validate_withZeroTimeout_shouldFail() {
    let mut config = common::test_config();
    config.completion.available_providers.iter_mut()
        .for_each(|p| p.timeout_secs = 0);
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withUnparseableEndpoint_shouldFail() {
    let mut config = common::test_config();
    config.completion.available_providers.iter_mut()
        .filter(|p| p.provider_type == "openai")
        .for_each(|p| p.endpoint = "not a url".to_string());
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroPort_shouldFail() {
    let mut config = common::test_config();
    config.server.port = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withWildcardOriginFromEnv_shouldFail() {
    let mut config = Config::default();
    config.apply_env_overrides_from(|name| match name {
        "OPENAI_API_KEY" => Some("sk".to_string()),
        "LLBP_ALLOWED_ORIGIN" => Some("*".to_string()),
        _ => None,
    });

    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("Allowed origin"));
}

#[test]
fn test_router_withWildcardOrigin_shouldReturnError() {
    let mut config = common::test_config();
    config.server.allowed_origin = "*".to_string();

    let service = Arc::new(BriefingService::new(&config, Arc::new(MockProvider::working())));
    let state = AppState::new(service, &config.server, &config.document);

    assert!(server::router(state, &config.server).is_err());
}

#[test]
fn test_documentConfig_shouldFeedMetadataAndOptions() {
    let mut config = Config::default();
    config.document.title = "Pump Trip Briefing".to_string();
    config.document.suppress_empty_headers = true;

    assert_eq!(config.document.metadata().title, "Pump Trip Briefing");
    assert!(config.document.conversion_options().suppress_empty_headers);
}

#[test]
fn test_bindAddress_shouldJoinHostAndPort() {
    let config = Config::default();
    assert_eq!(config.server.bind_address(), "0.0.0.0:5000");
}
