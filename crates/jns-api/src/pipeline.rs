use crate::model::PipelineRun;
use crate::{ApiError, JenkinsClient, join};

/// Client for the `wfapi` endpoints contributed by the Pipeline Stage
/// View plugin: per-run stage lists with timings, which the REST API
/// does not expose.
#[derive(Clone)]
pub struct PipelineClient {
    inner: JenkinsClient,
}

impl PipelineClient {
    pub fn new(client: &JenkinsClient) -> Self {
        Self {
            inner: client.clone(),
        }
    }

    pub fn runs(&self, job_url: &str) -> Result<Vec<PipelineRun>, ApiError> {
        self.inner.get_json(&join(job_url, "wfapi/runs"))
    }

    pub fn build_description(
        &self,
        job_url: &str,
        build_number: u32,
    ) -> Result<PipelineRun, ApiError> {
        self.inner
            .get_json(&join(job_url, &format!("{build_number}/wfapi/describe")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;

    #[test]
    fn build_description_parses_stages() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/job/deploy/8/wfapi/describe")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r##"{
                    "id": "8",
                    "name": "#8",
                    "status": "IN_PROGRESS",
                    "startTimeMillis": 1700000000000,
                    "durationMillis": 4000,
                    "stages": [
                        {"id": "6", "name": "Build", "status": "SUCCESS",
                         "startTimeMillis": 1700000000000, "durationMillis": 2000},
                        {"id": "9", "name": "Test", "status": "IN_PROGRESS",
                         "startTimeMillis": 1700000002000, "durationMillis": 0}
                    ]
                }"##,
            )
            .create();

        let client = JenkinsClient::new(server.url(), "kim", "token").unwrap();
        let url = format!("{}/job/deploy", server.url());
        let run = PipelineClient::new(&client)
            .build_description(&url, 8)
            .unwrap();

        assert_eq!(run.number(), 8);
        assert_eq!(run.stages.len(), 2);
        assert_eq!(run.stages[0].status, Status::Success);
        assert_eq!(run.stages[1].name, "Test");
    }

    #[test]
    fn runs_handles_a_trailing_slash_in_the_job_url() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/job/deploy/wfapi/runs")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": "3", "status": "SUCCESS"}]"#)
            .create();

        let client = JenkinsClient::new(server.url(), "kim", "token").unwrap();
        let url = format!("{}/job/deploy/", server.url());
        let runs = PipelineClient::new(&client).runs(&url).unwrap();

        assert_eq!(runs.len(), 1);
        mock.assert();
    }
}
