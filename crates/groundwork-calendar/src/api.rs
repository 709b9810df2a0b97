//! Calendar events API client
//!
//! Direct REST implementation for calendar event management, Google
//! Calendar v3 shape. Uses Bearer token authentication resolved from the
//! environment.

use crate::error::{CalendarError, Result};
use crate::event::{EventBody, EventInfo};
use serde::Deserialize;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar events API client
pub struct CalendarApi {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    calendar_id: String,
}

/// Configuration for the calendar client
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    pub access_token: String,
    pub calendar_id: String,
}

impl CalendarConfig {
    /// Create CalendarConfig from environment variables
    pub fn from_env() -> Result<Self> {
        let access_token = std::env::var("GROUNDWORK_CALENDAR_TOKEN")
            .map_err(|_| CalendarError::MissingEnvVar("GROUNDWORK_CALENDAR_TOKEN".to_string()))?;
        let calendar_id =
            std::env::var("GROUNDWORK_CALENDAR_ID").unwrap_or_else(|_| "primary".to_string());

        Ok(Self {
            access_token,
            calendar_id,
        })
    }
}

impl CalendarApi {
    /// Create a new calendar client
    pub fn new(config: CalendarConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token: config.access_token,
            base_url: CALENDAR_API_BASE.to_string(),
            calendar_id: config.calendar_id,
        }
    }

    /// Point the client at a different endpoint, e.g. a local test server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), event_id)
    }

    /// Insert a new event and return the remote view of it.
    pub async fn insert_event(&self, body: &EventBody) -> Result<EventInfo> {
        tracing::info!("Creating calendar event: {}", body.summary);

        let response = self
            .client
            .post(self.events_url())
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        decode_event(response).await
    }

    /// Replace an existing event.
    pub async fn update_event(&self, event_id: &str, body: &EventBody) -> Result<EventInfo> {
        tracing::info!("Updating calendar event {}: {}", event_id, body.summary);

        let response = self
            .client
            .put(self.event_url(event_id))
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        decode_event(response).await
    }

    /// Delete an event; an already-deleted event is success.
    pub async fn delete_event(&self, event_id: &str) -> Result<()> {
        tracing::info!("Deleting calendar event {}", event_id);

        let response = self
            .client
            .delete(self.event_url(event_id))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = response.status();
        if is_gone(status.as_u16()) {
            tracing::debug!("Calendar event {} already absent", event_id);
            return Ok(());
        }
        if !status.is_success() {
            return Err(CalendarError::ApiError(read_error(response).await));
        }
        Ok(())
    }
}

/// Status codes the remote returns for an already-deleted event.
pub fn is_gone(status: u16) -> bool {
    status == 404 || status == 410
}

async fn decode_event(response: reqwest::Response) -> Result<EventInfo> {
    let status = response.status();
    if !status.is_success() {
        return Err(CalendarError::ApiError(read_error(response).await));
    }

    let event: EventInfo = response.json().await?;
    Ok(event)
}

/// Pull the remote error message out of a failed response body.
async fn read_error(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<ApiErrorResponse>().await {
        Ok(body) => format!("{} ({})", body.error.message, status),
        Err(_) => status.to_string(),
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[allow(dead_code)]
    code: i32,
    message: String,
}
