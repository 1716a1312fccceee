use std::time::Duration;

use jns_api::JenkinsClient;
use jns_api::model::CheckConnectionResult;
use jns_runner::{AnsiTerminal, CommandParameters, CommandRunner, Spinner};

use crate::error::CliError;
use crate::{context, prompts, style};

pub fn run() -> Result<(), CliError> {
    let dir = jns_config::config_dir()?;
    let mut settings = jns_config::load(&dir)?;

    let server = prompts::input(
        "Server URL (http:// or https://)",
        non_empty(&settings.server),
    )?;
    if !context::is_url(&server) {
        return Err(CliError::usage(format!("invalid URL: {server}")));
    }
    let username = prompts::input("Username", non_empty(&settings.username))?;
    let token = prompts::password("API token")?;

    settings.server = server.trim_end_matches('/').to_string();
    settings.username = username.trim().to_string();
    settings.token = token.trim().to_string();
    jns_config::save(&dir, &settings)?;

    let client = JenkinsClient::new(&settings.server, &settings.username, &settings.token)?;
    let server_name = settings.server.clone();

    let mut runner = CommandRunner::new(Box::new(AnsiTerminal::stdout()));
    runner.show_progress(
        CommandParameters::new(
            Spinner::new(format!("Connecting to Jenkins server {server_name}")),
            move || Ok(client.check_connection()),
        )
        .success_when(CheckConnectionResult::is_success)
        .failure_when(CheckConnectionResult::is_failure)
        .on_success(|_| format!("{} Connection established successfully", style::check_mark()))
        .on_failure(|result| {
            format!(
                "{} Connection failed: {}",
                style::cross_mark(),
                result.message()
            )
        })
        .timeout(Duration::from_secs(30)),
    )?;
    Ok(())
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}
