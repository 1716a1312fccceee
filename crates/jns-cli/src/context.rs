//! The job mapping file and job reference resolution.
//!
//! `jns list` numbers the jobs it prints and records `id;name;url;kind`
//! lines beside the config, so later commands can use `%N` references
//! without another round-trip.

use std::path::Path;

use jns_api::JenkinsClient;
use jns_api::model::{Job, JobKind};
use jns_config::{Settings, mapping_path};

use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEntry {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub kind: JobKind,
}

/// A job reference resolved to something the API can work with.
#[derive(Debug, Clone)]
pub struct ResolvedJob {
    pub name: String,
    pub url: String,
    pub kind: JobKind,
    pub alias: Option<String>,
}

/// Rewrite (or extend, for folder listings) the mapping file and hand
/// back the numbered entries.
pub fn write_mapping(dir: &Path, jobs: &[Job], append: bool) -> Result<Vec<JobEntry>, CliError> {
    let path = mapping_path(dir);
    let mut existing = if append { read_mapping(dir)? } else { Vec::new() };
    let next_id = existing.iter().map(|e| e.id).max().unwrap_or(0) + 1;

    let entries: Vec<JobEntry> = jobs
        .iter()
        .enumerate()
        .map(|(i, job)| JobEntry {
            id: next_id + i as u32,
            name: job.name.clone(),
            url: job.url.clone(),
            kind: job.kind(),
        })
        .collect();
    existing.extend(entries.iter().cloned());

    let content: String = existing
        .iter()
        .map(|e| format!("{};{};{};{}\n", e.id, e.name, e.url, e.kind.as_str()))
        .collect();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CliError::Io {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    std::fs::write(&path, content).map_err(|e| CliError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(entries)
}

pub fn read_mapping(dir: &Path) -> Result<Vec<JobEntry>, CliError> {
    let path = mapping_path(dir);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(&path).map_err(|e| CliError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(content.lines().filter_map(parse_line).collect())
}

fn parse_line(line: &str) -> Option<JobEntry> {
    let mut parts = line.splitn(4, ';');
    let id = parts.next()?.parse().ok()?;
    let name = parts.next()?.to_string();
    let url = parts.next()?.to_string();
    let kind = JobKind::from_name(parts.next()?);
    Some(JobEntry {
        id,
        name,
        url,
        kind,
    })
}

/// `%N` for a mapping id, otherwise None.
fn job_number(reference: &str) -> Option<u32> {
    reference.strip_prefix('%')?.parse().ok()
}

/// Resolution order: `%N` mapping id, alias, mapping name, live job
/// list, URL passthrough.
pub fn resolve_job(
    dir: &Path,
    settings: &Settings,
    client: &JenkinsClient,
    reference: &str,
) -> Result<ResolvedJob, CliError> {
    if let Some(id) = job_number(reference) {
        return read_mapping(dir)?
            .into_iter()
            .find(|entry| entry.id == id)
            .map(|entry| ResolvedJob {
                name: entry.name,
                url: entry.url,
                kind: entry.kind,
                alias: None,
            })
            .ok_or_else(|| {
                CliError::usage(format!("job {reference} not found; run `jns list` first"))
            });
    }

    if let Some(url) = settings.aliases.get(reference) {
        return Ok(ResolvedJob {
            name: reference.to_string(),
            url: url.clone(),
            kind: JobKind::Unknown,
            alias: Some(reference.to_string()),
        });
    }

    if let Some(entry) = read_mapping(dir)?
        .into_iter()
        .find(|entry| entry.name == reference)
    {
        return Ok(ResolvedJob {
            name: entry.name,
            url: entry.url,
            kind: entry.kind,
            alias: None,
        });
    }

    if let Some(job) = client.jobs()?.into_iter().find(|job| job.name == reference) {
        let kind = job.kind();
        return Ok(ResolvedJob {
            name: job.name,
            url: job.url,
            kind,
            alias: None,
        });
    }

    if is_url(reference) {
        return Ok(ResolvedJob {
            name: reference.to_string(),
            url: reference.trim_end_matches('/').to_string(),
            kind: JobKind::Unknown,
            alias: None,
        });
    }

    Err(CliError::usage(format!("job {reference} not found")))
}

pub fn is_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(name: &str, class_name: &str) -> Job {
        Job {
            name: name.to_string(),
            url: format!("http://j/job/{name}/"),
            color: Some("blue".to_string()),
            class_name: Some(class_name.to_string()),
        }
    }

    #[test]
    fn mapping_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let jobs = vec![
            job("deploy", "org.jenkinsci.plugins.workflow.job.WorkflowJob"),
            job("nightly", "hudson.model.FreeStyleProject"),
        ];
        let entries = write_mapping(tmp.path(), &jobs, false).unwrap();
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[1].id, 2);

        let read = read_mapping(tmp.path()).unwrap();
        assert_eq!(read, entries);
        assert_eq!(read[0].kind, JobKind::Workflow);
    }

    #[test]
    fn append_continues_the_numbering() {
        let tmp = tempfile::tempdir().unwrap();
        write_mapping(
            tmp.path(),
            &[job("a", "hudson.model.FreeStyleProject")],
            false,
        )
        .unwrap();
        let appended = write_mapping(
            tmp.path(),
            &[job("b", "hudson.model.FreeStyleProject")],
            true,
        )
        .unwrap();
        assert_eq!(appended[0].id, 2);
        assert_eq!(read_mapping(tmp.path()).unwrap().len(), 2);
    }

    #[test]
    fn rewrite_restarts_the_numbering() {
        let tmp = tempfile::tempdir().unwrap();
        write_mapping(
            tmp.path(),
            &[job("a", "hudson.model.FreeStyleProject")],
            false,
        )
        .unwrap();
        let rewritten = write_mapping(
            tmp.path(),
            &[job("b", "hudson.model.FreeStyleProject")],
            false,
        )
        .unwrap();
        assert_eq!(rewritten[0].id, 1);
        assert_eq!(read_mapping(tmp.path()).unwrap().len(), 1);
    }

    #[test]
    fn job_numbers_use_the_percent_prefix() {
        assert_eq!(job_number("%12"), Some(12));
        assert_eq!(job_number("12"), None);
        assert_eq!(job_number("%x"), None);
    }

    #[test]
    fn names_with_semicolons_do_not_break_parsing() {
        // The kind is the last field, so semicolons never ambiguate it;
        // a malformed line is skipped rather than propagated.
        assert!(parse_line("not a mapping line").is_none());
        assert!(parse_line("1;name;http://j/job/name;WORKFLOW").is_some());
    }
}
