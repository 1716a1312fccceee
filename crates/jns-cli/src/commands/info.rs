use chrono::{Local, TimeZone};

use jns_api::model::{BuildInfo, JobKind, Status, WorkflowJob};
use jns_api::{JenkinsClient, PipelineClient};

use crate::commands::require_client;
use crate::context::{self, ResolvedJob};
use crate::error::CliError;
use crate::style;

pub struct BuildFilter {
    pub success: bool,
    pub failed: bool,
    pub running: bool,
    pub limit: usize,
    pub mine: bool,
}

impl BuildFilter {
    /// No flags means every status.
    fn matches(&self, status: Status) -> bool {
        if !self.success && !self.failed && !self.running {
            return true;
        }
        (self.success && status == Status::Success)
            || (self.failed && status.is_terminal_failure())
            || (self.running && status == Status::InProgress)
    }
}

pub fn run(job_reference: &str, build: Option<u32>, filter: BuildFilter) -> Result<(), CliError> {
    let dir = jns_config::config_dir()?;
    let settings = jns_config::load(&dir)?;
    let client = require_client(&settings)?;

    let job = context::resolve_job(&dir, &settings, &client, job_reference)?;
    match build {
        Some(number) => print_full_build_info(&client, &job, number),
        None => {
            let workflow_job = client.workflow_job(&job.url)?;
            print_general_job_info(&job, &workflow_job);
            print_builds(&client, &settings, &job, &workflow_job, &filter)
        }
    }
}

fn print_general_job_info(job: &ResolvedJob, workflow_job: &WorkflowJob) {
    println!("{}", style::heading("Job Information:"));
    println!("{}{}", style::label("  Name: "), workflow_job.name);
    println!("{}{}", style::label("  URL:  "), workflow_job.url);
    if let Some(alias) = &job.alias {
        println!("{}{}", style::label("  Alias: "), alias);
    }
    if let Some(description) = &workflow_job.description
        && !description.trim().is_empty()
    {
        println!("{}{}", style::label("  Description: "), description);
    }
    let parameters: Vec<_> = workflow_job.parameter_definitions().collect();
    if !parameters.is_empty() {
        println!("{}", style::label("  Parameters:"));
        for parameter in parameters {
            println!(
                "    {}{}",
                style::label(&format!("{}: ", parameter.name)),
                parameter.default_value().unwrap_or_default()
            );
        }
    }
    println!();
}

fn print_full_build_info(
    client: &JenkinsClient,
    job: &ResolvedJob,
    build_number: u32,
) -> Result<(), CliError> {
    let info = client.build_info(&job.url, build_number)?;
    print!("{}", build_summary(&info));

    let pipeline = PipelineClient::new(client);
    if let Ok(run) = pipeline.build_description(&job.url, build_number)
        && !run.stages.is_empty()
    {
        println!("{}", style::label("  Stages:"));
        for stage in &run.stages {
            println!("   {}: {}", stage.name, style::colored_status(stage.status));
        }
    }
    Ok(())
}

fn print_builds(
    client: &JenkinsClient,
    settings: &jns_config::Settings,
    job: &ResolvedJob,
    workflow_job: &WorkflowJob,
    filter: &BuildFilter,
) -> Result<(), CliError> {
    println!("{}", style::label("Last builds:"));

    let mut numbers: Vec<u32> = if job.kind == JobKind::Workflow {
        PipelineClient::new(client)
            .runs(&job.url)?
            .iter()
            .map(|run| run.number())
            .collect()
    } else {
        workflow_job.builds.iter().map(|b| b.number).collect()
    };
    numbers.sort_unstable_by(|a, b| b.cmp(a));

    let mut shown = 0;
    for number in numbers {
        if shown >= filter.limit {
            break;
        }
        let info = client.build_info(&job.url, number)?;
        if !filter.matches(info.status()) {
            continue;
        }
        if filter.mine && info.started_by() != Some(settings.username.as_str()) {
            continue;
        }
        println!("----------------------------------------");
        print!("{}", build_summary(&info));
        shown += 1;
    }
    if shown == 0 {
        println!("  No builds found.");
    }
    Ok(())
}

fn build_summary(info: &BuildInfo) -> String {
    let mut summary = String::new();
    let display_name = info
        .display_name
        .clone()
        .unwrap_or_else(|| format!("#{}", info.number));
    summary.push_str(&format!(
        "{}\n",
        style::heading(&format!("Build {display_name}"))
    ));
    summary.push_str(&format!(
        "{}{}\n",
        style::label("  Status:    "),
        style::colored_status(info.status())
    ));
    summary.push_str(&format!(
        "{}{}\n",
        style::label("  StartedAt: "),
        format_timestamp(info.timestamp)
    ));
    summary.push_str(&format!(
        "{}{}\n",
        style::label("  Duration:  "),
        format_duration(info.duration)
    ));
    if let Some(started_by) = info.started_by() {
        summary.push_str(&format!("{}{}\n", style::label("  StartedBy: "), started_by));
    }
    for parameter in info.parameters() {
        summary.push_str(&format!(
            "{}{}\n",
            style::label(&format!("  {}: ", parameter.name)),
            parameter.display_value()
        ));
    }
    if let Some(description) = &info.description {
        summary.push_str(&format!(
            "{}{}\n",
            style::label("  Description: "),
            description
        ));
    }
    summary
}

fn format_timestamp(timestamp_millis: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_millis)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_duration(duration_millis: i64) -> String {
    let seconds = duration_millis.max(0) / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formats_as_hours_minutes_seconds() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(61_000), "00:01:01");
        assert_eq!(format_duration(3_661_000), "01:01:01");
    }

    #[test]
    fn no_filter_flags_match_everything() {
        let filter = BuildFilter {
            success: false,
            failed: false,
            running: false,
            limit: 10,
            mine: false,
        };
        assert!(filter.matches(Status::Success));
        assert!(filter.matches(Status::Failed));
        assert!(filter.matches(Status::InProgress));
    }

    #[test]
    fn failed_flag_covers_both_spellings_and_aborts() {
        let filter = BuildFilter {
            success: false,
            failed: true,
            running: false,
            limit: 10,
            mine: false,
        };
        assert!(filter.matches(Status::Failed));
        assert!(filter.matches(Status::Failure));
        assert!(filter.matches(Status::Aborted));
        assert!(!filter.matches(Status::Success));
    }
}
