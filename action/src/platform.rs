//! GitHub Actions platform implementations
//!
//! Implements core platform traits on top of the runner:
//! - Inputs: `INPUT_<NAME>` environment variables
//! - EnvironmentSink: `GITHUB_ENV` file + `::add-mask::` workflow command
//! - CommandRunner: tokio child processes with inherited stdio
//! - Clock: std::time::SystemTime

use async_trait::async_trait;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use aio_action_core::error::{ActionError, Result};
use aio_action_core::platform::{Clock, CommandRunner, EnvironmentSink, Inputs};

/// Inputs passed to the action by the runner
pub struct GithubInputs;

impl GithubInputs {
    fn env_name(name: &str) -> String {
        format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
    }
}

impl Inputs for GithubInputs {
    fn get_input(&self, name: &str) -> Option<String> {
        std::env::var(Self::env_name(name))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Exports variables to later steps of the job
pub struct GithubEnvSink {
    env_file: Option<PathBuf>,
}

impl GithubEnvSink {
    pub fn new(env_file: Option<PathBuf>) -> Self {
        Self { env_file }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var_os("GITHUB_ENV")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        )
    }

    fn append(&self, path: &PathBuf, key: &str, value: &str) -> Result<()> {
        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ActionError::publish(key, format!("cannot open {}: {}", path.display(), e)))?;

        write!(file, "{}<<{}\n{}\n{}\n", key, delimiter, value, delimiter)
            .map_err(|e| ActionError::publish(key, format!("cannot write {}: {}", path.display(), e)))
    }
}

impl EnvironmentSink for GithubEnvSink {
    fn set(&self, key: &str, value: &str, secret: bool) -> Result<()> {
        if secret {
            println!("::add-mask::{}", escape_data(value));
        }

        std::env::set_var(key, value);

        match &self.env_file {
            Some(path) => self.append(path, key, value),
            None => {
                println!("::set-env name={}::{}", escape_property(key), escape_data(value));
                Ok(())
            }
        }
    }
}

/// Runs command lines as child processes, without a shell
pub struct ShellRunner;

#[async_trait(?Send)]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<()> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| ActionError::command_failed("empty command line"))?;

        let status = tokio::process::Command::new(program)
            .args(parts)
            .status()
            .await
            .map_err(|e| {
                ActionError::command_failed(format!("Unable to locate executable file: {} ({})", program, e))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ActionError::command_failed(format!(
                "The process '{}' failed with exit code {}",
                program,
                status.code().unwrap_or(-1)
            )))
        }
    }
}

/// System clock using std::time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64
    }
}

/// Report the action as failed with `message`
pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Escape a workflow command message
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow command property value
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_env_file() -> PathBuf {
        std::env::temp_dir().join(format!("github-env-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_input_env_name() {
        assert_eq!(GithubInputs::env_name("clientId"), "INPUT_CLIENTID");
        assert_eq!(GithubInputs::env_name("my input"), "INPUT_MY_INPUT");
    }

    #[test]
    fn test_get_input_trims_and_drops_empty() {
        std::env::set_var("INPUT_TESTTRIMMED", "  value  ");
        std::env::set_var("INPUT_TESTBLANK", "   ");

        assert_eq!(GithubInputs.get_input("testTrimmed").as_deref(), Some("value"));
        assert_eq!(GithubInputs.get_input("testBlank"), None);
        assert_eq!(GithubInputs.get_input("testMissing"), None);
    }

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("50%\nnext\r"), "50%25%0Anext%0D");
        assert_eq!(escape_property("a:b,c"), "a%3Ab%2Cc");
    }

    #[test]
    fn test_sink_appends_heredoc_to_env_file() {
        let path = temp_env_file();
        let sink = GithubEnvSink::new(Some(path.clone()));

        sink.set("AIO_TEST_TOKEN", "abc-123", true).unwrap();
        sink.set("AIO_TEST_EXPIRY", "1706901800000", false).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("AIO_TEST_TOKEN<<ghadelimiter_"));
        assert_eq!(lines[1], "abc-123");
        assert_eq!(lines[2], lines[0].trim_start_matches("AIO_TEST_TOKEN<<"));
        assert!(lines[3].starts_with("AIO_TEST_EXPIRY<<ghadelimiter_"));
        assert_eq!(lines[4], "1706901800000");

        assert_eq!(std::env::var("AIO_TEST_TOKEN").unwrap(), "abc-123");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_sink_reports_unwritable_file() {
        let path = std::env::temp_dir()
            .join(format!("missing-{}", uuid::Uuid::new_v4()))
            .join("env");
        let sink = GithubEnvSink::new(Some(path));

        let err = sink.set("AIO_TEST_UNWRITABLE", "value", false).unwrap_err();
        assert_eq!(err.error_key(), "publish_error");
    }

    #[test]
    fn test_system_clock_is_after_2024() {
        assert!(SystemClock.now_millis() > 1_704_067_200_000);
    }

    #[tokio::test]
    async fn test_shell_runner_reports_exit_code() {
        let err = ShellRunner.run("false").await.unwrap_err();
        assert_eq!(err.to_string(), "The process 'false' failed with exit code 1");
    }

    #[tokio::test]
    async fn test_shell_runner_success() {
        ShellRunner.run("true").await.unwrap();
    }

    #[tokio::test]
    async fn test_shell_runner_rejects_empty_command() {
        let err = ShellRunner.run("   ").await.unwrap_err();
        assert_eq!(err.error_key(), "command_failed");
    }
}
