//! Polling test client: submits a query, polls until the job reaches a
//! terminal state or a timeout, then prints the result.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::time::{Duration, Instant};
use uuid::Uuid;

const POLL_INTERVAL: Duration = Duration::from_secs(2);
const MAX_WAIT: Duration = Duration::from_secs(60);
const DEFAULT_QUERY: &str = "What is this document about?";

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    job_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct JobStatusResponse {
    status: String,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultResponse {
    status: String,
    result: Option<String>,
}

struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    async fn health(&self) -> anyhow::Result<HealthResponse> {
        let response = self
            .http
            .get(format!("{}/", self.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("Cannot connect to API server. Is it running?")?;
        Ok(response.error_for_status()?.json().await?)
    }

    async fn submit_query(&self, query: &str) -> anyhow::Result<Uuid> {
        let response = self
            .http
            .post(format!("{}/chat", self.base_url))
            .query(&[("query", query)])
            .timeout(Duration::from_secs(10))
            .send()
            .await?
            .error_for_status()?;

        let chat: ChatResponse = response.json().await?;
        Ok(chat.job_id)
    }

    async fn job_status(&self, job_id: Uuid) -> anyhow::Result<JobStatusResponse> {
        let response = self
            .http
            .get(format!("{}/job-status/{}", self.base_url, job_id))
            .timeout(Duration::from_secs(10))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn result(&self, job_id: Uuid) -> anyhow::Result<String> {
        let response = self
            .http
            .get(format!("{}/result/{}", self.base_url, job_id))
            .timeout(Duration::from_secs(10))
            .send()
            .await?
            .error_for_status()?;

        let body: ResultResponse = response.json().await?;
        if body.status != "completed" {
            bail!("Job is not completed (status: {})", body.status);
        }
        body.result.context("Completed job returned no result")
    }

    async fn wait_for_result(&self, job_id: Uuid) -> anyhow::Result<String> {
        println!("Waiting for result (max {}s)...", MAX_WAIT.as_secs());
        let start = Instant::now();

        while start.elapsed() < MAX_WAIT {
            let status = self.job_status(job_id).await?;

            match status.status.as_str() {
                "finished" => {
                    println!("Job completed.");
                    return self.result(job_id).await;
                }
                "failed" => {
                    let error = status.error.unwrap_or_else(|| "Unknown error".to_string());
                    bail!("Job failed: {error}");
                }
                other => {
                    println!("  status: {other}");
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }

        bail!(
            "Timeout: job {} did not complete within {}s; check /job-status/{} later",
            job_id,
            MAX_WAIT.as_secs(),
            job_id
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url =
        std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let client = ApiClient::new(base_url);

    let health = client.health().await?;
    println!("Server is running: {}", health.status);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let query = if args.is_empty() {
        println!("No query given, using default: '{DEFAULT_QUERY}'");
        DEFAULT_QUERY.to_string()
    } else {
        args.join(" ")
    };

    println!("Submitting query: '{query}'");
    let job_id = client.submit_query(&query).await?;
    println!("Job ID: {job_id}");

    let result = client.wait_for_result(job_id).await?;

    println!("\nAI Response:\n{result}");
    println!("\nDone. Job ID: {job_id}");

    Ok(())
}
