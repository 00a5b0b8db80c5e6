/*!
 * Tests for application configuration loading and validation
 */

use marktwai::app_config::{Config, LogLevel, TranslationProvider};

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_fromFile_withFullConfig_shouldLoadAllSections() {
    let dir = create_temp_dir().unwrap();
    let config_json = r#"{
        "source_language": "en",
        "target_language": "es",
        "translation": {
            "provider": "ollama",
            "ollama": {
                "model": "mistral",
                "fallback_model": "llama3.2",
                "endpoint": "http://localhost:11434",
                "timeout_secs": 90
            }
        },
        "splitting": {
            "max_bytes_per_chunk": 4096,
            "concurrent_chunks": 4,
            "header_split_level": 2
        },
        "log_level": "debug"
    }"#;
    let path = create_test_file(dir.path(), "conf.json", config_json).unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.target_language, "es");
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.ollama.model, "mistral");
    assert_eq!(config.translation.get_fallback_model(), "llama3.2");
    assert_eq!(config.splitting.max_bytes_per_chunk, 4096);
    assert_eq!(config.splitting.header_split_level, 2);
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_fromFile_withMinimalConfig_shouldApplyDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        dir.path(),
        "conf.json",
        r#"{"source_language": "en", "target_language": "fr"}"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();

    assert_eq!(config.splitting.max_bytes_per_chunk, 20_000);
    assert_eq!(config.splitting.concurrent_chunks, 8);
    assert_eq!(config.translation.ollama.model, "llama3.2");
    assert!(config.translation.common.cache_enabled);
}

#[test]
fn test_fromFile_withInvalidValues_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        dir.path(),
        "conf.json",
        r#"{
            "source_language": "en",
            "target_language": "fr",
            "splitting": {"header_split_level": 9}
        }"#,
    )
    .unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_fromFile_withMissingFile_shouldFail() {
    assert!(Config::from_file("/nonexistent/conf.json").is_err());
}

#[test]
fn test_saveToFile_thenFromFile_shouldRoundTrip() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("saved.json");

    let mut config = Config::default();
    config.target_language = "de".to_string();
    config.splitting.concurrent_chunks = 3;
    config.save_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();

    assert_eq!(loaded.target_language, "de");
    assert_eq!(loaded.splitting.concurrent_chunks, 3);
}

#[test]
fn test_validate_withEmptyTargetLanguage_shouldFail() {
    let config = Config {
        target_language: "  ".to_string(),
        ..Default::default()
    };

    assert!(config.validate().is_err());
}

#[test]
fn test_getModel_shouldFollowActiveProvider() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;
    config.translation.anthropic.api_key = "key".to_string();

    assert_eq!(config.translation.get_model(), "claude-3-haiku-20240307");
    assert_eq!(
        config.translation.get_fallback_model(),
        "claude-3-5-sonnet-20240620"
    );
}

#[test]
fn test_systemPrompt_shouldMentionAnchorTokens() {
    let config = Config::default();
    assert!(config
        .translation
        .common
        .system_prompt
        .contains("<<CODE_N>>"));
}
