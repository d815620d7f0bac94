//! aio-action: App Builder GitHub action
//!
//! Reads the action inputs from the runner, then either runs the `aio` CLI
//! (build, deploy, test) or mints an IMS access token and exports it to the
//! following steps. Uses a single-threaded tokio runtime (compatible with
//! core's !Send async traits).

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aio_action_core::config::ActionInputs;
use aio_action_core::dispatch;

mod ims;
mod platform;

use ims::ImsClient;
use platform::{GithubEnvSink, GithubInputs, ShellRunner, SystemClock};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // stdout carries workflow commands, logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(false),
        )
        .init();

    let inputs = ActionInputs::from_inputs(&GithubInputs);
    let tokens = ImsClient::from_env();
    let sink = GithubEnvSink::from_env();

    match dispatch::handle(&inputs, &tokens, &sink, &ShellRunner, &SystemClock).await {
        Ok(()) => {
            tracing::info!("action completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(kind = e.error_key(), "action failed");
            platform::set_failed(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
