use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::{BackendError, Result};
use crate::model::{CreateInstance, Image, Instance, Invoice, Organisation, Project, Tenant};

/// Default timeout for a single backend call. Calls are never retried; a
/// failed call surfaces as a user-visible error on that turn.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin client for the cloud-management REST API.
///
/// Every operation issues exactly one call through [`CloudClient::query`];
/// the typed helpers below only decode the slices the bot reads.
#[derive(Debug, Clone)]
pub struct CloudClient {
    http: reqwest::Client,
    base_url: String,
}

impl CloudClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { http, base_url })
    }

    /// One API call. `token` is the caller's credential; its absence fails
    /// before any request goes out.
    pub async fn query<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        token: Option<&str>,
        parameters: &[(&str, &str)],
    ) -> Result<T> {
        let token = token.ok_or(BackendError::InvalidToken)?;
        let url = format!("{}/{}/", self.base_url, endpoint.trim_matches('/'));
        log::debug!("{method} {url} with {} parameter(s)", parameters.len());

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header("Authorization", format!("Token {token}"));
        request = if method == reqwest::Method::GET {
            request.query(parameters)
        } else {
            let body: serde_json::Map<String, serde_json::Value> = parameters
                .iter()
                .map(|(k, v)| ((*k).to_string(), serde_json::Value::from(*v)))
                .collect();
            request.json(&body)
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(BackendError::InvalidToken);
        }
        if !status.is_success() {
            return Err(BackendError::Api {
                status: status.as_u16(),
                message: api_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Organisations the caller belongs to, with their embedded projects.
    pub async fn customers(&self, token: Option<&str>) -> Result<Vec<Organisation>> {
        self.query(reqwest::Method::GET, "customers", token, &[]).await
    }

    /// All projects visible to the caller, optionally narrowed to one
    /// organisation.
    pub async fn projects(
        &self,
        token: Option<&str>,
        customer_uuid: Option<&str>,
    ) -> Result<Vec<Project>> {
        let mut parameters = Vec::new();
        if let Some(uuid) = customer_uuid {
            parameters.push(("customer", uuid));
        }
        self.query(reqwest::Method::GET, "projects", token, &parameters)
            .await
    }

    /// Virtual machines, optionally narrowed to one project.
    pub async fn instances(
        &self,
        token: Option<&str>,
        project_uuid: Option<&str>,
    ) -> Result<Vec<Instance>> {
        let mut parameters = Vec::new();
        if let Some(uuid) = project_uuid {
            parameters.push(("project_uuid", uuid));
        }
        self.query(
            reqwest::Method::GET,
            "openstacktenant-instances",
            token,
            &parameters,
        )
        .await
    }

    /// Private cloud tenants of one organisation.
    pub async fn tenants(&self, token: Option<&str>, customer_uuid: &str) -> Result<Vec<Tenant>> {
        self.query(
            reqwest::Method::GET,
            "openstack-tenants",
            token,
            &[("customer", customer_uuid)],
        )
        .await
    }

    /// Operating system images, optionally narrowed to what one project
    /// may use.
    pub async fn images(&self, token: Option<&str>, project: Option<&str>) -> Result<Vec<Image>> {
        let mut parameters = Vec::new();
        if let Some(project) = project {
            parameters.push(("project", project));
        }
        self.query(
            reqwest::Method::GET,
            "openstacktenant-images",
            token,
            &parameters,
        )
        .await
    }

    /// Monthly invoices, newest first (API order).
    pub async fn invoices(&self, token: Option<&str>) -> Result<Vec<Invoice>> {
        self.query(reqwest::Method::GET, "invoices", token, &[]).await
    }

    /// Submit a VM creation request.
    pub async fn create_instance(
        &self,
        token: Option<&str>,
        request: &CreateInstance,
    ) -> Result<serde_json::Value> {
        self.query(
            reqwest::Method::POST,
            "openstacktenant-instances",
            token,
            &[
                ("name", request.name.as_str()),
                ("project", request.project.as_str()),
                ("image", request.image.as_str()),
            ],
        )
        .await
    }
}

/// User-facing message for a failed call: the API's `detail` field when the
/// body carries one, the raw body otherwise.
fn api_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
    }
    body.to_string()
}
