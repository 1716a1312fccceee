//! Serde models for the Jenkins remote access API and the wfapi
//! endpoints of the Pipeline Stage View plugin.

use std::fmt;

use serde::Deserialize;

/// Build or stage state as reported by Jenkins. The REST API and the
/// wfapi use different spellings for failure; both are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    Failure,
    Failed,
    Unstable,
    Aborted,
    InProgress,
    NotExecuted,
    PausedPendingInput,
    Queued,
    #[serde(other)]
    Unknown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::Failure => "FAILURE",
            Status::Failed => "FAILED",
            Status::Unstable => "UNSTABLE",
            Status::Aborted => "ABORTED",
            Status::InProgress => "IN_PROGRESS",
            Status::NotExecuted => "NOT_EXECUTED",
            Status::PausedPendingInput => "PAUSED_PENDING_INPUT",
            Status::Queued => "QUEUED",
            Status::Unknown => "UNKNOWN",
        }
    }

    /// The build ran and will not recover: failed or was aborted.
    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, Status::Failure | Status::Failed | Status::Aborted)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse job classification derived from the `_class` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Workflow,
    Freestyle,
    Folder,
    Unknown,
}

impl JobKind {
    pub fn from_class(class_name: &str) -> Self {
        match class_name {
            "org.jenkinsci.plugins.workflow.job.WorkflowJob" => JobKind::Workflow,
            "hudson.model.FreeStyleProject" => JobKind::Freestyle,
            "com.cloudbees.hudson.plugins.folder.Folder"
            | "jenkins.branch.OrganizationFolder"
            | "org.jenkinsci.plugins.workflow.multibranch.WorkflowMultiBranchProject" => {
                JobKind::Folder
            }
            _ => JobKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Workflow => "WORKFLOW",
            JobKind::Freestyle => "FREESTYLE",
            JobKind::Folder => "FOLDER",
            JobKind::Unknown => "UNKNOWN",
        }
    }

    /// Inverse of `as_str`, for the job mapping file.
    pub fn from_name(name: &str) -> Self {
        match name {
            "WORKFLOW" => JobKind::Workflow,
            "FREESTYLE" => JobKind::Freestyle,
            "FOLDER" => JobKind::Folder,
            _ => JobKind::Unknown,
        }
    }
}

/// One entry of the server-wide job list.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(rename = "_class", default)]
    pub class_name: Option<String>,
}

impl Job {
    pub fn kind(&self) -> JobKind {
        JobKind::from_class(self.class_name.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewAll {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Folder {
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowJob {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub buildable: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub last_build: Option<BuildRef>,
    #[serde(default)]
    pub builds: Vec<BuildRef>,
    #[serde(default)]
    pub property: Vec<Property>,
    #[serde(default)]
    pub next_build_number: u32,
    #[serde(rename = "_class", default)]
    pub class_name: Option<String>,
}

impl WorkflowJob {
    /// Jenkins appends `_anime` to the ball color while a build runs.
    pub fn is_running(&self) -> bool {
        self.color.as_deref().is_some_and(|c| c.ends_with("_anime"))
    }

    pub fn parameter_definitions(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.property
            .iter()
            .flat_map(|p| p.parameter_definitions.iter())
    }

    pub fn kind(&self) -> JobKind {
        JobKind::from_class(self.class_name.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BuildRef {
    pub number: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    #[serde(default)]
    pub parameter_definitions: Vec<ParameterDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub default_parameter_value: Option<DefaultParameterValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultParameterValue {
    #[serde(default)]
    pub value: serde_json::Value,
}

impl ParameterDefinition {
    /// Default value rendered as plain text (strings unquoted).
    pub fn default_value(&self) -> Option<String> {
        let value = &self.default_parameter_value.as_ref()?.value;
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Detailed build record from `{job}/{number}/api/json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub number: u32,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub result: Option<Status>,
}

impl BuildInfo {
    /// `result` is null while the build is still running.
    pub fn status(&self) -> Status {
        self.result.unwrap_or(Status::InProgress)
    }

    pub fn started_by(&self) -> Option<&str> {
        self.actions
            .iter()
            .find_map(|a| a.causes.first())
            .and_then(|c| c.user_id.as_deref())
    }

    pub fn parameters(&self) -> &[BuildParameter] {
        self.actions
            .iter()
            .find(|a| !a.parameters.is_empty())
            .map(|a| a.parameters.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Action {
    #[serde(default)]
    pub parameters: Vec<BuildParameter>,
    #[serde(default)]
    pub causes: Vec<Cause>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildParameter {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl BuildParameter {
    pub fn display_value(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cause {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
}

/// Queue entry a triggered build goes through before it starts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub buildable: bool,
    #[serde(default)]
    pub stuck: bool,
    #[serde(default)]
    pub why: Option<String>,
    #[serde(rename = "_class", default)]
    pub class_name: String,
    #[serde(default)]
    pub executable: Option<Executable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Executable {
    pub number: u32,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueItemKind {
    Blocked,
    Buildable,
    /// The item left the queue: the build has started.
    Left,
    Waiting,
    Unknown,
}

impl QueueItem {
    pub fn kind(&self) -> QueueItemKind {
        match self.class_name.as_str() {
            "hudson.model.Queue$BlockedItem" => QueueItemKind::Blocked,
            "hudson.model.Queue$BuildableItem" => QueueItemKind::Buildable,
            "hudson.model.Queue$LeftItem" => QueueItemKind::Left,
            "hudson.model.Queue$WaitingItem" => QueueItemKind::Waiting,
            _ => QueueItemKind::Unknown,
        }
    }
}

/// Outcome of probing the server root, kept as data so the connect
/// command can poll it.
#[derive(Debug, Clone)]
pub struct CheckConnectionResult {
    success: bool,
    message: String,
}

impl CheckConnectionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failure(&self) -> bool {
        !self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One run of a pipeline job as described by `wfapi`. Ids come back as
/// strings there.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRun {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub status: Status,
    #[serde(default)]
    pub start_time_millis: i64,
    #[serde(default)]
    pub duration_millis: i64,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl PipelineRun {
    pub fn number(&self) -> u32 {
        self.id.parse().unwrap_or(0)
    }
}

/// One named phase of a pipeline run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub status: Status,
    #[serde(default)]
    pub start_time_millis: i64,
    #[serde(default)]
    pub duration_millis: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_wfapi_spellings() {
        let status: Status = serde_json::from_str("\"IN_PROGRESS\"").unwrap();
        assert_eq!(status, Status::InProgress);
        let status: Status = serde_json::from_str("\"PAUSED_PENDING_INPUT\"").unwrap();
        assert_eq!(status, Status::PausedPendingInput);
    }

    #[test]
    fn unknown_status_does_not_fail_deserialization() {
        let status: Status = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(status, Status::Unknown);
    }

    #[test]
    fn terminal_failure_covers_both_spellings_and_aborts() {
        assert!(Status::Failed.is_terminal_failure());
        assert!(Status::Failure.is_terminal_failure());
        assert!(Status::Aborted.is_terminal_failure());
        assert!(!Status::Success.is_terminal_failure());
        assert!(!Status::InProgress.is_terminal_failure());
    }

    #[test]
    fn build_info_without_result_counts_as_in_progress() {
        let info: BuildInfo = serde_json::from_str(r#"{"number": 3, "result": null}"#).unwrap();
        assert_eq!(info.status(), Status::InProgress);
    }

    #[test]
    fn started_by_reads_the_first_cause() {
        let info: BuildInfo = serde_json::from_str(
            r#"{
                "number": 3,
                "actions": [
                    {},
                    {"causes": [{"userId": "kim", "userName": "Kim"}]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(info.started_by(), Some("kim"));
    }

    #[test]
    fn queue_item_kind_maps_the_class_discriminator() {
        let item: QueueItem =
            serde_json::from_str(r#"{"_class": "hudson.model.Queue$LeftItem"}"#).unwrap();
        assert_eq!(item.kind(), QueueItemKind::Left);
        let item: QueueItem = serde_json::from_str(r#"{"_class": "whatever"}"#).unwrap();
        assert_eq!(item.kind(), QueueItemKind::Unknown);
    }

    #[test]
    fn workflow_job_running_is_derived_from_the_color() {
        let job: WorkflowJob = serde_json::from_str(r#"{"color": "blue_anime"}"#).unwrap();
        assert!(job.is_running());
        let job: WorkflowJob = serde_json::from_str(r#"{"color": "blue"}"#).unwrap();
        assert!(!job.is_running());
    }

    #[test]
    fn pipeline_run_id_is_a_string_in_wfapi() {
        let run: PipelineRun =
            serde_json::from_str(r#"{"id": "17", "status": "SUCCESS"}"#).unwrap();
        assert_eq!(run.number(), 17);
    }

    #[test]
    fn job_kind_round_trips_through_the_mapping_spelling() {
        for kind in [
            JobKind::Workflow,
            JobKind::Freestyle,
            JobKind::Folder,
            JobKind::Unknown,
        ] {
            assert_eq!(JobKind::from_name(kind.as_str()), kind);
        }
    }

    #[test]
    fn parameter_default_value_unquotes_strings() {
        let def: ParameterDefinition = serde_json::from_str(
            r#"{"name": "BRANCH", "type": "StringParameterDefinition",
                "defaultParameterValue": {"name": "BRANCH", "value": "main"}}"#,
        )
        .unwrap();
        assert_eq!(def.default_value(), Some("main".to_string()));
    }
}
