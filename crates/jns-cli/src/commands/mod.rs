pub mod abort;
pub mod ai;
pub mod alias;
pub mod build;
pub mod connect;
pub mod errors;
pub mod info;
pub mod list;

use jns_api::JenkinsClient;
use jns_config::Settings;

use crate::error::CliError;

/// Build an API client from saved settings, refusing politely when
/// `jns connect` has not run yet.
pub(crate) fn require_client(settings: &Settings) -> Result<JenkinsClient, CliError> {
    if !settings.is_connected() {
        return Err(CliError::usage(
            "no server configured; run `jns connect` first",
        ));
    }
    Ok(JenkinsClient::new(
        &settings.server,
        &settings.username,
        &settings.token,
    )?)
}
