use std::time::Duration;

use jns_api::model::{
    BuildInfo, JobKind, PipelineRun, QueueItemKind, Status, WorkflowJob,
};
use jns_api::{JenkinsClient, PipelineClient};
use jns_runner::{AnsiTerminal, CommandParameters, CommandRunner, Outcome, Spinner};

use crate::commands::{errors, require_client};
use crate::context::{self, ResolvedJob};
use crate::error::CliError;
use crate::progress::BuildProgressBar;
use crate::{prompts, style};

const QUEUE_TIMEOUT: Duration = Duration::from_secs(90);
const CONSOLE_POLL: Duration = Duration::from_secs(3);

const CANCEL_BUILD: &str = "Cancel new build";
const KEEP_RUNNING: &str = "Do not abort. Start new build";
const ABORT_ALL: &str = "Abort all. Start new build";

pub struct BuildOptions {
    pub follow: bool,
    pub show_log: bool,
    pub params: Vec<String>,
    pub use_ai: bool,
}

pub fn run(job_reference: &str, options: BuildOptions) -> Result<(), CliError> {
    let dir = jns_config::config_dir()?;
    let settings = jns_config::load(&dir)?;
    let client = require_client(&settings)?;
    let pipeline = PipelineClient::new(&client);

    let job = context::resolve_job(&dir, &settings, &client, job_reference)?;
    let workflow_job = client.workflow_job(&job.url)?;
    if !workflow_job.buildable {
        return Err(CliError::usage(format!("job {} is not buildable", job.name)));
    }
    let kind = effective_kind(&job, &workflow_job);

    if kind == JobKind::Workflow
        && !confirm_despite_running_builds(&client, &pipeline, &job)?
    {
        println!("Build cancelled");
        return Ok(());
    }

    let parameters = if options.params.is_empty() {
        prompts::prompt_parameters(&workflow_job)?
    } else {
        options.params.clone()
    };
    let build_number = workflow_job.next_build_number;

    let location = if parameters.is_empty() {
        client.run_job(&job.url)?
    } else {
        client.run_job_with_parameters(&job.url, &parameters)?
    };

    let mut runner = CommandRunner::new(Box::new(AnsiTerminal::stdout()));
    let started = wait_for_queue(&mut runner, &client, &job, &location.url)?;
    if started.is_failure() {
        return Ok(());
    }

    if options.show_log {
        return stream_console(&client, &job.url, build_number);
    }
    if !options.follow {
        return Ok(());
    }

    match kind {
        JobKind::Workflow => follow_workflow(
            &mut runner,
            &client,
            &pipeline,
            &settings,
            &job,
            build_number,
            options.use_ai,
        ),
        _ => follow_freestyle(&mut runner, &client, &job),
    }
}

/// Mapping entries know the job kind; aliases and raw URLs do not, so
/// fall back to the `_class` of the fetched job.
fn effective_kind(job: &ResolvedJob, workflow_job: &WorkflowJob) -> JobKind {
    if job.kind == JobKind::Unknown {
        workflow_job.kind()
    } else {
        job.kind
    }
}

/// When builds of the job are already running, let the user abort them,
/// keep them, or give up. Returns false when the new build is off.
fn confirm_despite_running_builds(
    client: &JenkinsClient,
    pipeline: &PipelineClient,
    job: &ResolvedJob,
) -> Result<bool, CliError> {
    let running: Vec<PipelineRun> = pipeline
        .runs(&job.url)?
        .into_iter()
        .filter(|run| run.status == Status::InProgress)
        .collect();
    if running.is_empty() {
        return Ok(true);
    }

    println!("Job {} is already running. Builds:", job.name);
    for run in &running {
        let current_stage = run
            .stages
            .iter()
            .find(|stage| stage.status == Status::InProgress)
            .map(|stage| stage.name.as_str())
            .unwrap_or("Unknown");
        let started_by = client
            .build_info(&job.url, run.number())
            .ok()
            .and_then(|info| info.started_by().map(str::to_string))
            .unwrap_or_else(|| "Unknown".to_string());
        println!(
            "  {}\n  {}{}\n  {}{}",
            style::heading(&format!("#{}", run.number())),
            style::label("Started by: "),
            started_by,
            style::label("Current stage: "),
            current_stage,
        );
    }

    let mut choices = vec![
        CANCEL_BUILD.to_string(),
        KEEP_RUNNING.to_string(),
        ABORT_ALL.to_string(),
    ];
    for run in &running {
        choices.push(format!("Abort build {}. Start new build", run.number()));
    }
    let chosen = choices[prompts::select("Choose an option", &choices)?].as_str();

    if chosen == CANCEL_BUILD {
        return Ok(false);
    }
    if chosen == ABORT_ALL {
        for run in &running {
            client.abort_build(&job.url, run.number())?;
        }
    } else if let Some(rest) = chosen.strip_prefix("Abort build ")
        && let Some(number) = rest.split('.').next().and_then(|n| n.parse().ok())
    {
        client.abort_build(&job.url, number)?;
    }
    Ok(true)
}

/// Spin until the queue item has left the queue, i.e. the build runs.
fn wait_for_queue(
    runner: &mut CommandRunner,
    client: &JenkinsClient,
    job: &ResolvedJob,
    queue_url: &str,
) -> Result<Outcome<jns_api::model::QueueItem>, CliError> {
    let checker_client = client.clone();
    let queue_url = queue_url.to_string();
    let job_name = job.name.clone();
    let outcome = runner.show_progress(
        CommandParameters::new(
            Spinner::new(format!("Starting job {}", job.name))
                .complete_message(format!("Job {} started", job.name)),
            move || checker_client.queue_item(&queue_url).map_err(Into::into),
        )
        .success_when(|item| item.kind() == QueueItemKind::Left)
        .timeout(QUEUE_TIMEOUT)
        .timeout_message(move || {
            format!("{} Job {job_name} failed to start", style::cross_mark())
        }),
    )?;
    Ok(outcome)
}

fn follow_workflow(
    runner: &mut CommandRunner,
    client: &JenkinsClient,
    pipeline: &PipelineClient,
    settings: &jns_config::Settings,
    job: &ResolvedJob,
    build_number: u32,
    use_ai: bool,
) -> Result<(), CliError> {
    let stages_client = pipeline.clone();
    let stages_url = job.url.clone();
    let bar = BuildProgressBar::new(build_number, move |number: u32| {
        stages_client
            .build_description(&stages_url, number)
            .map(|run| run.stages)
    });

    let checker_client = client.clone();
    let checker_url = job.url.clone();
    let outcome = runner.show_progress(
        CommandParameters::new(bar, move || {
            checker_client
                .build_info(&checker_url, build_number)
                .map_err(Into::into)
        })
        .success_when(|info: &BuildInfo| info.status() == Status::Success)
        .failure_when(|info: &BuildInfo| info.status().is_terminal_failure())
        .on_success(|_| format!("Finished: {}", style::colored_status(Status::Success)))
        .on_failure(|info| format!("Finished: {}", style::colored_status(info.status()))),
    )?;

    if outcome.is_failure() {
        errors::print_error_tail(client, settings, &job.url, build_number, use_ai)?;
    }
    Ok(())
}

/// Freestyle jobs have no stage data; watch the ball color instead.
fn follow_freestyle(
    runner: &mut CommandRunner,
    client: &JenkinsClient,
    job: &ResolvedJob,
) -> Result<(), CliError> {
    let checker_client = client.clone();
    let checker_url = job.url.clone();
    runner.show_progress(
        CommandParameters::new(
            Spinner::new(format!("Job {} is running", job.name))
                .complete_message(format!(
                    "Finished: {}",
                    style::colored_status(Status::Success)
                ))
                .error_message(format!(
                    "Finished: {}",
                    style::colored_status(Status::Failed)
                )),
            move || checker_client.workflow_job(&checker_url).map_err(Into::into),
        )
        .success_when(|wj: &WorkflowJob| wj.color.as_deref() == Some("blue"))
        .failure_when(|wj: &WorkflowJob| {
            matches!(wj.color.as_deref(), Some("red") | Some("aborted"))
        }),
    )?;
    Ok(())
}

/// Print the console log as it grows, three seconds per page.
fn stream_console(
    client: &JenkinsClient,
    job_url: &str,
    build_number: u32,
) -> Result<(), CliError> {
    let mut start = 0;
    loop {
        let chunk = client.progressive_console_text(job_url, build_number, start)?;
        print!("{}", chunk.text);
        start = chunk.next_start;
        if !chunk.has_more {
            return Ok(());
        }
        std::thread::sleep(CONSOLE_POLL);
    }
}
