use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::model::{
    BuildInfo, CheckConnectionResult, Job, QueueItem, ViewAll, WorkflowJob,
};
use crate::{ApiError, join};

const API_JSON: &str = "api/json";

/// Where a triggered build waits before it starts, taken from the
/// `Location` header of the trigger response.
#[derive(Debug, Clone)]
pub struct QueueItemLocation {
    pub url: String,
}

/// One chunk of a progressively fetched console log.
#[derive(Debug, Clone)]
pub struct ProgressiveConsoleText {
    pub text: String,
    pub next_start: u64,
    pub has_more: bool,
}

/// Blocking client for the Jenkins remote access API.
///
/// Every request authenticates with the username + API token pair;
/// job URLs are absolute, as Jenkins reports them.
#[derive(Clone)]
pub struct JenkinsClient {
    http: Client,
    server: String,
    username: String,
    token: String,
}

impl JenkinsClient {
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            server: server.into().trim_end_matches('/').to_string(),
            username: username.into(),
            token: token.into(),
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    /// Probe the server root. Failures are data, not errors, so the
    /// connect command can poll this.
    pub fn check_connection(&self) -> CheckConnectionResult {
        match self.get_json::<serde_json::Value>(&join(&self.server, API_JSON)) {
            Ok(_) => CheckConnectionResult::success(format!(
                "Connection to Jenkins server {} was successful",
                self.server
            )),
            Err(err) => CheckConnectionResult::failure(err.to_string()),
        }
    }

    pub fn jobs(&self) -> Result<Vec<Job>, ApiError> {
        let view: ViewAll = self.get_json(&join(&self.server, "view/all/api/json"))?;
        Ok(view.jobs)
    }

    pub fn folder_jobs(&self, folder_url: &str) -> Result<Vec<Job>, ApiError> {
        let folder: crate::model::Folder = self.get_json(&join(folder_url, API_JSON))?;
        Ok(folder.jobs)
    }

    pub fn workflow_job(&self, job_url: &str) -> Result<WorkflowJob, ApiError> {
        self.get_json(&join(job_url, API_JSON))
    }

    pub fn build_info(&self, job_url: &str, build_number: u32) -> Result<BuildInfo, ApiError> {
        self.get_json(&join(job_url, &format!("{build_number}/{API_JSON}")))
    }

    /// Trigger a build without parameters.
    pub fn run_job(&self, job_url: &str) -> Result<QueueItemLocation, ApiError> {
        self.post_for_location(&join(job_url, "build"))
    }

    /// Trigger a parameterized build; `parameters` are `name=value`
    /// pairs passed through as the query string.
    pub fn run_job_with_parameters(
        &self,
        job_url: &str,
        parameters: &[String],
    ) -> Result<QueueItemLocation, ApiError> {
        let mut url = join(job_url, "buildWithParameters");
        if !parameters.is_empty() {
            url = format!("{url}?{}", parameters.join("&"));
        }
        self.post_for_location(&url)
    }

    pub fn abort_build(&self, job_url: &str, build_number: u32) -> Result<(), ApiError> {
        let url = join(job_url, &format!("{build_number}/stop"));
        self.send(self.http.post(&url), "POST", &url)?;
        Ok(())
    }

    pub fn queue_item(&self, queue_url: &str) -> Result<QueueItem, ApiError> {
        self.get_json(&join(queue_url, API_JSON))
    }

    pub fn console_text(&self, job_url: &str, build_number: u32) -> Result<String, ApiError> {
        let url = join(job_url, &format!("{build_number}/consoleText"));
        let response = self.send(self.http.get(&url), "GET", &url)?;
        response
            .text()
            .map_err(|e| ApiError::Http(format!("GET {url}: {e}")))
    }

    /// Fetch the console log incrementally. `X-Text-Size` is the offset
    /// for the next call; `X-More-Data` says whether the build is still
    /// producing output.
    pub fn progressive_console_text(
        &self,
        job_url: &str,
        build_number: u32,
        start: u64,
    ) -> Result<ProgressiveConsoleText, ApiError> {
        let url = join(
            job_url,
            &format!("{build_number}/logText/progressiveText?start={start}"),
        );
        let response = self.send(self.http.get(&url), "GET", &url)?;
        let next_start = response
            .headers()
            .get("X-Text-Size")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(start);
        let has_more = response
            .headers()
            .get("X-More-Data")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));
        let text = response
            .text()
            .map_err(|e| ApiError::Http(format!("GET {url}: {e}")))?;
        Ok(ProgressiveConsoleText {
            text,
            next_start,
            has_more,
        })
    }

    pub(crate) fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.send(self.http.get(url), "GET", url)?;
        response
            .json::<T>()
            .map_err(|e| ApiError::Parse(format!("GET {url}: {e}")))
    }

    fn post_for_location(&self, url: &str) -> Result<QueueItemLocation, ApiError> {
        let response = self.send(self.http.post(url), "POST", url)?;
        response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|location| QueueItemLocation {
                url: location.trim_end_matches('/').to_string(),
            })
            .ok_or(ApiError::MissingQueueLocation)
    }

    fn send(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &str,
    ) -> Result<Response, ApiError> {
        let response = request
            .basic_auth(&self.username, Some(&self.token))
            .send()
            .map_err(|e| ApiError::Http(format!("{method} {url}: {e}")))?;
        if !response.status().is_success() {
            return Err(ApiError::Http(format!(
                "{method} {url}: status {}",
                response.status()
            )));
        }
        Ok(response)
    }
}
