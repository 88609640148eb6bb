//! Loading configuration from disk and building adapters from it

use advisor_pipeline::{AdvisorConfig, ConfigError, LeadPipeline};
use std::io::Write;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"
[completion]
endpoint = "https://api.groq.com/openai/v1/chat/completions"
model = "mixtral-8x7b-32768"
api_key_env = "LEAD_ADVISOR_TEST_KEY"
timeout_secs = 60

[sheets]
spreadsheet_id = "1AbCdEf"
access_token_env = "LEAD_ADVISOR_TEST_SHEETS"

[smtp]
username = "advisor@example.com"
password_env = "LEAD_ADVISOR_TEST_SMTP"

[cache]
max_capacity = 500
ttl_secs = 3600

[report]
file_name = "inquiry.pdf"
"#;

fn write_config(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn loads_file_from_disk() {
    let file = write_config(CONFIG);

    let config = AdvisorConfig::load(file.path()).unwrap();

    assert_eq!(config.sheets.spreadsheet_id, "1AbCdEf");
    assert_eq!(config.smtp.port, 465);
    assert_eq!(config.cache.ttl_secs, Some(3600));
    assert_eq!(config.report.file_name, "inquiry.pdf");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = AdvisorConfig::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Io { path: ref p, .. } if *p == path));
}

#[test]
fn empty_spreadsheet_id_is_rejected_on_load() {
    let file = write_config(&CONFIG.replace("\"1AbCdEf\"", "\"\""));

    let err = AdvisorConfig::load(file.path()).unwrap_err();

    assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
}

#[test]
fn pipeline_builds_when_secrets_resolve() {
    let config = AdvisorConfig::load(write_config(CONFIG).path()).unwrap();

    let built = LeadPipeline::from_config_with(&config, |var| match var {
        "LEAD_ADVISOR_TEST_KEY" | "LEAD_ADVISOR_TEST_SHEETS" | "LEAD_ADVISOR_TEST_SMTP" => {
            Some("secret".to_string())
        }
        _ => None,
    });

    assert!(built.is_ok());
}

#[test]
fn pipeline_reports_first_missing_secret() {
    let config = AdvisorConfig::load(write_config(CONFIG).path()).unwrap();

    let err = LeadPipeline::from_config_with(&config, |_| None).unwrap_err();

    assert!(matches!(
        err,
        ConfigError::MissingSecret { ref var } if var == "LEAD_ADVISOR_TEST_KEY"
    ));
}
