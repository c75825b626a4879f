use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::time::{Instant, sleep};

use crate::LogLevel;
use crate::auth::credentials::fetch_client_credentials_token;
use crate::powerbi::config::SetupConfig;
use crate::powerbi::dataset::{DATASET_NAME_MARKER, Dataset, finansehub_dataset_definition};
use crate::powerbi::parse::{
    created_dataset_id_from_response, datasets_from_list_response, find_dataset_by_marker,
    parse_refreshes_from_response,
};
use crate::powerbi::refresh::{REFRESH_STATUS_COMPLETED, Refresh};
use crate::powerbi::workspace::Workspace;

const POWERBI_API_BASE: &str = "https://api.powerbi.com/v1.0/myorg";
const POWERBI_SCOPE: &str = "https://analysis.windows.net/powerbi/api/.default";
const REFRESH_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// HTTP client orchestrating authentication, dataset discovery and
/// conditional creation for one workspace.
///
/// Authentication failures are hard errors; listing, creation and refresh
/// failures are soft and surface as empty or absent results after printing
/// the response diagnostics.
pub struct SetupClient {
    client: Client,
    config: SetupConfig,
    token: Option<String>,
    log_level: LogLevel,
}

impl SetupClient {
    /// Create a new client for the given configuration.
    pub fn new(config: SetupConfig, log_level: LogLevel) -> Self {
        Self {
            client: Client::new(),
            config,
            token: None,
            log_level,
        }
    }

    /// Workspace (group) id this client operates on.
    pub fn group_id(&self) -> &str {
        &self.config.group_id
    }

    /// Acquire and store an access token for the Power BI API.
    ///
    /// On failure the stored token stays unset.
    pub async fn get_access_token(&mut self) -> Result<String, String> {
        let token = fetch_client_credentials_token(
            &self.config.client_id,
            &self.config.client_secret,
            &self.config.tenant_id,
            POWERBI_SCOPE,
        )
        .await?;

        self.token = Some(token.clone());
        Ok(token)
    }

    /// Return the stored token, fetching it once when absent.
    async fn ensure_token(&mut self) -> Result<String, String> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }
        self.get_access_token().await
    }

    /// List all datasets in the workspace.
    ///
    /// Non-success responses are printed and yield an empty listing.
    pub async fn list_datasets(&mut self) -> Result<Vec<Dataset>, String> {
        let token = self.ensure_token().await?;
        let url = format!("{}/groups/{}/datasets", POWERBI_API_BASE, self.config.group_id);

        if matches!(self.log_level, LogLevel::Debug) {
            println!("Url: {:?}", url);
        }

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| format!("Request failed: {e}"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {e}"))?;

        datasets_from_list_response(status, &body)
    }

    /// Create the FinanseHub dataset with its fixed two-table schema.
    ///
    /// Returns the new dataset id on 201; any other status is printed and
    /// yields `None`.
    pub async fn create_dataset(&mut self) -> Result<Option<String>, String> {
        let token = self.ensure_token().await?;
        let definition = finansehub_dataset_definition();
        let url = format!("{}/groups/{}/datasets", POWERBI_API_BASE, self.config.group_id);

        if matches!(self.log_level, LogLevel::Debug) {
            println!("Url: {:?}", url);
            println!(
                "Dataset definition: {}",
                serde_json::to_string(&definition).unwrap_or_default()
            );
        }

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .header("Content-Type", "application/json")
            .json(&definition)
            .send()
            .await
            .map_err(|e| format!("Request failed: {e}"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {e}"))?;

        created_dataset_id_from_response(status, &body)
    }

    /// Find an existing FinanseHub dataset or create a new one.
    ///
    /// The first listed dataset whose name contains the marker wins.
    pub async fn find_or_create_dataset(&mut self) -> Result<Option<String>, String> {
        let datasets = self.list_datasets().await?;

        if let Some(existing) = find_dataset_by_marker(&datasets, DATASET_NAME_MARKER) {
            println!(
                "✅ Found existing dataset: {} (ID: {})",
                existing.name, existing.id
            );
            return Ok(Some(existing.id.clone()));
        }

        println!("📊 Creating new FinanseHub dataset...");
        self.create_dataset().await
    }

    /// Smoke test: acquire a token and list datasets.
    ///
    /// Any failure is printed and reported as `false`, never propagated.
    pub async fn test_connection(&mut self) -> bool {
        if let Err(e) = self.get_access_token().await {
            println!("❌ Failed to connect to Power BI: {}", e);
            return false;
        }

        match self.list_datasets().await {
            Ok(datasets) => {
                println!(
                    "✅ Successfully connected to Power BI. Found {} datasets.",
                    datasets.len()
                );
                true
            }
            Err(e) => {
                println!("❌ Failed to connect to Power BI: {}", e);
                false
            }
        }
    }

    /// Fetch metadata for the configured workspace.
    pub async fn workspace_info(&mut self) -> Result<Option<Workspace>, String> {
        let url = format!("{}/groups/{}", POWERBI_API_BASE, self.config.group_id);
        let json = match self.get_json(&url, "workspace info").await? {
            Some(json) => json,
            None => return Ok(None),
        };

        let workspace = serde_json::from_value(json)
            .map_err(|e| format!("Failed to parse workspace info: {e}"))?;
        Ok(Some(workspace))
    }

    /// Fetch metadata for a single dataset.
    pub async fn dataset_info(&mut self, dataset_id: &str) -> Result<Option<Dataset>, String> {
        let url = format!(
            "{}/groups/{}/datasets/{}",
            POWERBI_API_BASE, self.config.group_id, dataset_id
        );
        let json = match self.get_json(&url, "dataset info").await? {
            Some(json) => json,
            None => return Ok(None),
        };

        let dataset = serde_json::from_value(json)
            .map_err(|e| format!("Failed to parse dataset info: {e}"))?;
        Ok(Some(dataset))
    }

    /// Fetch the most recent refresh history entries for a dataset.
    pub async fn refresh_history(
        &mut self,
        dataset_id: &str,
        top: usize,
    ) -> Result<Vec<Refresh>, String> {
        let url = format!(
            "{}/groups/{}/datasets/{}/refreshes?$top={}",
            POWERBI_API_BASE, self.config.group_id, dataset_id, top
        );
        let json = match self.get_json(&url, "refresh history").await? {
            Some(json) => json,
            None => return Ok(vec![]),
        };

        parse_refreshes_from_response(&json)
    }

    /// Trigger an asynchronous dataset refresh.
    ///
    /// Service principals may not send notification options, so the body is
    /// an empty JSON object. The service answers 202 when the refresh is
    /// queued.
    pub async fn trigger_refresh(&mut self, dataset_id: &str) -> Result<bool, String> {
        let token = self.ensure_token().await?;
        let url = format!(
            "{}/groups/{}/datasets/{}/refreshes",
            POWERBI_API_BASE, self.config.group_id, dataset_id
        );

        if matches!(self.log_level, LogLevel::Debug) {
            println!("Url: {:?}", url);
        }

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| format!("Request failed: {e}"))?;

        let status = resp.status();

        if status != StatusCode::ACCEPTED {
            let body = resp.text().await.unwrap_or_default();
            println!("❌ Failed to trigger refresh ({}): {}", status, body);
            return Ok(false);
        }

        println!("✅ Refresh triggered successfully!");
        Ok(true)
    }

    /// Poll refresh history until the newest entry completes or fails,
    /// or until `max_wait` elapses.
    pub async fn wait_for_refresh(&mut self, dataset_id: &str, max_wait: Duration) -> bool {
        println!(
            "⏳ Waiting for refresh to complete (max {} minutes)...",
            max_wait.as_secs() / 60
        );

        let deadline = Instant::now() + max_wait;

        loop {
            match self.refresh_history(dataset_id, 1).await {
                Ok(refreshes) => {
                    if let Some(latest) = refreshes.first() {
                        if latest.is_in_progress() {
                            println!("⏳ Status: {}... (waiting)", latest.status);
                        } else if latest.status == REFRESH_STATUS_COMPLETED {
                            match latest.duration_secs() {
                                Some(secs) => println!(
                                    "🎉 Refresh completed successfully! ({} seconds)",
                                    secs
                                ),
                                None => println!("🎉 Refresh completed successfully!"),
                            }
                            return true;
                        } else {
                            println!(
                                "❌ Refresh failed: {}",
                                latest
                                    .service_exception_json
                                    .as_deref()
                                    .unwrap_or("Unknown error")
                            );
                            return false;
                        }
                    }
                }
                Err(e) => {
                    println!("⚠️  Error checking refresh status, retrying... ({e})");
                }
            }

            if Instant::now() >= deadline {
                println!("⏰ Refresh timeout - check Power BI Service for status");
                return false;
            }

            sleep(REFRESH_POLL_INTERVAL).await;
        }
    }

    /// Authorized GET returning the JSON body, or `None` on a non-success
    /// status after printing the diagnostic.
    async fn get_json(&mut self, url: &str, what: &str) -> Result<Option<Value>, String> {
        let token = self.ensure_token().await?;

        if matches!(self.log_level, LogLevel::Debug) {
            println!("Url: {:?}", url);
        }

        let resp = self
            .client
            .get(url)
            .bearer_auth(&token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| format!("Request failed: {e}"))?;

        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            println!("❌ Failed to get {} ({}): {}", what, status, body);
            return Ok(None);
        }

        let json = resp
            .json()
            .await
            .map_err(|e| format!("Failed to parse JSON: {e}"))?;

        Ok(Some(json))
    }
}
