use crate::context;
use crate::error::CliError;

/// Map an alias to a job URL, a `%N` id from the last listing, or a
/// URL given directly.
pub fn add(alias: &str, job_reference: &str) -> Result<(), CliError> {
    let dir = jns_config::config_dir()?;

    let url = if let Some(id) = job_reference.strip_prefix('%') {
        let id: u32 = id
            .parse()
            .map_err(|_| CliError::usage(format!("invalid job id: {job_reference}")))?;
        context::read_mapping(&dir)?
            .into_iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.url)
            .ok_or_else(|| {
                CliError::usage(format!("job {job_reference} not found; run `jns list` first"))
            })?
    } else if context::is_url(job_reference) {
        job_reference.trim_end_matches('/').to_string()
    } else {
        return Err(CliError::usage(format!(
            "expected a job URL or %N id, got: {job_reference}"
        )));
    };

    let (mut doc, path) = jns_config::edit::load_document(&dir)?;
    jns_config::edit::add_alias(&mut doc, alias, &url);
    jns_config::edit::save_document(&doc, &path)?;
    Ok(())
}

pub fn remove(alias: &str) -> Result<(), CliError> {
    let dir = jns_config::config_dir()?;
    let (mut doc, path) = jns_config::edit::load_document(&dir)?;
    if !jns_config::edit::remove_alias(&mut doc, alias) {
        return Err(CliError::usage(format!("alias {alias} not found")));
    }
    jns_config::edit::save_document(&doc, &path)?;
    Ok(())
}

pub fn list() -> Result<(), CliError> {
    let dir = jns_config::config_dir()?;
    let settings = jns_config::load(&dir)?;
    for (alias, url) in &settings.aliases {
        println!("{alias} -> {url}");
    }
    Ok(())
}
