use jns_api::model::JobKind;

use crate::commands::require_client;
use crate::context;
use crate::error::CliError;
use crate::table::{JobRow, job_table};

pub fn run(folder: Option<&str>) -> Result<(), CliError> {
    let dir = jns_config::config_dir()?;
    let settings = jns_config::load(&dir)?;
    let client = require_client(&settings)?;

    let (jobs, append) = match folder {
        None => (client.jobs()?, false),
        Some(reference) => {
            let resolved = context::resolve_job(&dir, &settings, &client, reference)?;
            if resolved.kind != JobKind::Folder {
                return Err(CliError::usage(format!("{reference} is not a folder")));
            }
            let jobs = client
                .folder_jobs(&resolved.url)?
                .into_iter()
                .map(|mut job| {
                    job.name = format!("{}/{}", resolved.name, job.name);
                    job
                })
                .collect();
            (jobs, true)
        }
    };

    let entries = context::write_mapping(&dir, &jobs, append)?;
    let rows: Vec<JobRow> = entries
        .iter()
        .zip(&jobs)
        .map(|(entry, job)| JobRow::new(entry.id, job))
        .collect();
    for line in job_table(&rows) {
        println!("{line}");
    }
    Ok(())
}
