use std::time::Duration;

use jns_api::PipelineClient;
use jns_api::model::{PipelineRun, Status};
use jns_runner::{AnsiTerminal, CommandParameters, CommandRunner, Spinner};

use crate::commands::require_client;
use crate::error::CliError;
use crate::{context, style};

pub fn run(job_reference: &str, build: Option<u32>) -> Result<(), CliError> {
    let dir = jns_config::config_dir()?;
    let settings = jns_config::load(&dir)?;
    let client = require_client(&settings)?;

    let job = context::resolve_job(&dir, &settings, &client, job_reference)?;
    let workflow_job = client.workflow_job(&job.url)?;
    if !workflow_job.is_running() {
        println!("Job {} is not running", job.name);
        return Ok(());
    }
    let build_number = build
        .or(workflow_job.last_build.map(|b| b.number))
        .ok_or_else(|| CliError::usage(format!("job {} has no builds", job.name)))?;

    let pipeline = PipelineClient::new(&client);
    let job_url = job.url.clone();
    let job_name = job.name.clone();

    let mut runner = CommandRunner::new(Box::new(AnsiTerminal::stdout()));
    runner.run(
        || {
            client.abort_build(&job.url, build_number)?;
            Ok(())
        },
        CommandParameters::new(Spinner::new(format!("Aborting job {job_name}")), move || {
            pipeline
                .build_description(&job_url, build_number)
                .map_err(Into::into)
        })
        .success_when(|run: &PipelineRun| run.status == Status::Aborted)
        .on_success(move |_| format!("{} Job {job_name} aborted", style::check_mark()))
        .timeout(Duration::from_secs(60))
        .timeout_message(|| "Abort was requested but the build has not stopped yet".to_string()),
    )?;
    Ok(())
}
