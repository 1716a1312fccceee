use std::time::Duration;

use jns_api::model::{BuildInfo, Status};
use jns_api::{JenkinsClient, PipelineClient};
use jns_config::Settings;
use jns_runner::{AnsiTerminal, CommandParameters, CommandRunner, Spinner};

use crate::commands::require_client;
use crate::error::CliError;
use crate::{context, style};

const ERROR_TAIL_LINES: usize = 50;
const RECENT_BUILDS: usize = 5;
const AI_TIMEOUT: Duration = Duration::from_secs(120);

pub fn run(
    job_reference: &str,
    build: Option<u32>,
    mine: bool,
    use_ai: bool,
) -> Result<(), CliError> {
    let dir = jns_config::config_dir()?;
    let settings = jns_config::load(&dir)?;
    let client = require_client(&settings)?;

    let job = context::resolve_job(&dir, &settings, &client, job_reference)?;
    let info = match build {
        Some(number) => {
            let info = client.build_info(&job.url, number)?;
            if info.status() == Status::Success {
                println!("Build {number} was successful.");
                return Ok(());
            }
            Some(info)
        }
        None => find_failed_build(&client, &settings, &job.url, mine)?,
    };

    let Some(info) = info else {
        println!("No build found for the given criteria.");
        return Ok(());
    };

    println!("{}{}", style::label("Build Number: "), info.number);
    println!(
        "{}{}",
        style::label("Started By: "),
        info.started_by().unwrap_or("Unknown")
    );
    println!(
        "{}{}",
        style::label("Status: "),
        style::colored_status(info.status())
    );

    print_error_tail(&client, &settings, &job.url, info.number, use_ai)
}

/// Latest non-successful build among the recent ones, optionally only
/// those started by the configured user.
fn find_failed_build(
    client: &JenkinsClient,
    settings: &Settings,
    job_url: &str,
    mine: bool,
) -> Result<Option<BuildInfo>, CliError> {
    let pipeline = PipelineClient::new(client);
    let mut numbers: Vec<u32> = match pipeline.runs(job_url) {
        Ok(runs) => runs.iter().map(|run| run.number()).collect(),
        // Not a pipeline job; fall back to the REST build list.
        Err(_) => client
            .workflow_job(job_url)?
            .builds
            .iter()
            .map(|b| b.number)
            .collect(),
    };
    numbers.sort_unstable_by(|a, b| b.cmp(a));

    for number in numbers.into_iter().take(RECENT_BUILDS) {
        let info = client.build_info(job_url, number)?;
        if info.status() == Status::Success {
            continue;
        }
        if mine && info.started_by() != Some(settings.username.as_str()) {
            continue;
        }
        return Ok(Some(info));
    }
    Ok(None)
}

/// Print the tail of the console log, or its AI summary.
pub fn print_error_tail(
    client: &JenkinsClient,
    settings: &Settings,
    job_url: &str,
    build_number: u32,
    use_ai: bool,
) -> Result<(), CliError> {
    let errors = error_tail(&client.console_text(job_url, build_number)?);
    if errors.is_empty() {
        println!("No errors found.");
        return Ok(());
    }
    if use_ai {
        let analysis = analyze_with_spinner(&errors, settings)?;
        println!("{}{analysis}", style::label("AI analysis: "));
    } else {
        println!("{}", style::label("Errors:"));
        println!("{errors}");
    }
    Ok(())
}

/// The last lines of the console log, where the failure talks.
fn error_tail(console_text: &str) -> String {
    let lines: Vec<&str> = console_text.lines().collect();
    let skip = lines.len().saturating_sub(ERROR_TAIL_LINES);
    lines[skip..].join("\n").trim().to_string()
}

/// Run the LLM call as a runner action so the spinner stays alive for
/// the duration; the reply is captured through the closure.
fn analyze_with_spinner(log: &str, settings: &Settings) -> Result<String, CliError> {
    let ai_settings = settings.ai.as_ref().ok_or(jns_ai::AiError::NotConfigured)?;
    let llm = jns_ai::LlmClient::from_settings(ai_settings)?;
    let prompt = jns_ai::analyze_log_prompt(log);

    let mut analysis = None;
    let mut runner = CommandRunner::new(Box::new(AnsiTerminal::stdout()));
    runner.run(
        || {
            analysis = Some(llm.generate(&prompt)?);
            Ok(())
        },
        CommandParameters::new(
            Spinner::new("Analyzing log").error_message("Log analysis failed"),
            || Ok(()),
        )
        .timeout(AI_TIMEOUT),
    )?;
    analysis.ok_or_else(|| CliError::Prompt("log analysis produced no reply".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_tail_keeps_the_last_lines() {
        let log: String = (1..=60).map(|i| format!("line {i}\n")).collect();
        let tail = error_tail(&log);
        assert!(tail.starts_with("line 11"));
        assert!(tail.ends_with("line 60"));
    }

    #[test]
    fn short_logs_are_kept_whole() {
        assert_eq!(error_tail("only line\n"), "only line");
    }
}
