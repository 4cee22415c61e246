/*!
 * Unit tests for configuration loading and validation
 */

use std::str::FromStr;

use sublingo::app_config::{Config, LogLevel, TranslationProvider};

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_default_config_shouldValidate() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.provider, TranslationProvider::GoogleFree);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_validate_withEmptyTargetLanguage_shouldFail() {
    let mut config = Config::default();
    config.target_language = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withBadCodeWidth_shouldFail() {
    let mut config = Config::default();
    config.target_language = "espa".to_string();
    assert!(config.validate().is_err());

    config.target_language = "e".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withThreeLetterTarget_shouldPass() {
    let mut config = Config::default();
    config.target_language = "fre".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withOpenAiAndNoApiKey_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::OpenAi;
    config.translation.api_key = String::new();
    assert!(config.validate().is_err());

    config.translation.api_key = "sk-test".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_file_withPartialJson_shouldFillDefaults() {
    let temp_dir = create_temp_dir().unwrap();
    let path = create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        r#"{ "target_language": "es" }"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.target_language, "es");
    assert_eq!(config.translation.provider, TranslationProvider::GoogleFree);
    assert!(!config.sources.opensubtitles_endpoint.is_empty());
}

#[test]
fn test_from_file_withInvalidJson_shouldFail() {
    let temp_dir = create_temp_dir().unwrap();
    let path = create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        "not json at all",
    )
    .unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_from_file_or_default_withMissingFile_shouldCreateDefaultFile() {
    let temp_dir = create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let config = Config::from_file_or_default(&path).unwrap();
    assert!(path.exists());
    assert_eq!(config.target_language, "en");

    // The written file loads back to the same config
    let reloaded = Config::from_file(&path).unwrap();
    assert_eq!(reloaded.target_language, config.target_language);
}

#[test]
fn test_save_and_reload_shouldPreserveSettings() {
    let temp_dir = create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.target_language = "fre".to_string();
    config.translation.provider = TranslationProvider::OpenAi;
    config.translation.api_key = "sk-test".to_string();
    config.translation.model = "gpt-4o".to_string();
    config.save_to_file(&path).unwrap();

    let reloaded = Config::from_file(&path).unwrap();
    assert_eq!(reloaded.target_language, "fre");
    assert_eq!(reloaded.translation.provider, TranslationProvider::OpenAi);
    assert_eq!(reloaded.translation.model, "gpt-4o");
}

#[test]
fn test_provider_batch_size_shouldDependOnProvider() {
    assert_eq!(TranslationProvider::GoogleFree.batch_size(), 60);
    assert_eq!(TranslationProvider::OpenAi.batch_size(), 200);
}

#[test]
fn test_provider_from_str_withKnownNames_shouldParse() {
    assert_eq!(
        TranslationProvider::from_str("googlefree").unwrap(),
        TranslationProvider::GoogleFree
    );
    assert_eq!(
        TranslationProvider::from_str("google").unwrap(),
        TranslationProvider::GoogleFree
    );
    assert_eq!(
        TranslationProvider::from_str("OpenAI").unwrap(),
        TranslationProvider::OpenAi
    );
    assert!(TranslationProvider::from_str("deepl").is_err());
}

#[test]
fn test_provider_to_lowercase_string_shouldMatchPathSegments() {
    assert_eq!(
        TranslationProvider::GoogleFree.to_lowercase_string(),
        "googlefree"
    );
    assert_eq!(TranslationProvider::OpenAi.to_lowercase_string(), "openai");
}
