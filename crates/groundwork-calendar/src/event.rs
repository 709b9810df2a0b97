//! Calendar events managed as lifecycle resources

use crate::api::CalendarApi;
use crate::error::CalendarError;
use async_trait::async_trait;
use chrono::DateTime;
use groundwork_resource::{
    CheckOutcome, FieldError, LifecycleRecord, PropertyBag, ResourceProvider, Result,
    optional_str, require_str, validate_required,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

const REQUIRED_FIELDS: &[&str] = &["summary", "start", "end"];

/// Wire model of a calendar event.
#[derive(Debug, Clone, Serialize)]
pub struct EventBody {
    pub summary: String,
    pub start: EventDateTime,
    pub end: EventDateTime,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
}

/// Remote view of an event after an insert or update.
#[derive(Debug, Clone, Deserialize)]
pub struct EventInfo {
    pub id: Option<String>,

    pub summary: Option<String>,

    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
}

impl EventInfo {
    /// The remote-assigned identifier; absence is an operation failure.
    pub fn require_id(&self) -> crate::error::Result<&str> {
        self.id.as_deref().ok_or(CalendarError::MissingEventId)
    }
}

/// Build the wire body from a resolved property bag.
pub fn event_from_properties(inputs: &PropertyBag) -> Result<EventBody> {
    Ok(EventBody {
        summary: require_str(inputs, "summary")?.to_string(),
        start: EventDateTime {
            date_time: require_str(inputs, "start")?.to_string(),
        },
        end: EventDateTime {
            date_time: require_str(inputs, "end")?.to_string(),
        },
        description: optional_str(inputs, "description").map(str::to_string),
        location: optional_str(inputs, "location").map(str::to_string),
    })
}

/// Calendar events managed through the four-verb lifecycle.
///
/// The remote service assigns the event id on insert; that id becomes the
/// lifecycle id and is grafted into the outputs as `event_id`.
pub struct CalendarEventProvider {
    api: CalendarApi,
}

impl CalendarEventProvider {
    pub fn new(api: CalendarApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ResourceProvider for CalendarEventProvider {
    fn resource_type(&self) -> &str {
        "calendar:Event"
    }

    fn required_fields(&self) -> &[&str] {
        REQUIRED_FIELDS
    }

    /// Required fields plus RFC 3339 validation of the event window.
    async fn check(&self, _previous: Option<&PropertyBag>, proposed: &PropertyBag) -> CheckOutcome {
        let mut failures = validate_required(proposed, REQUIRED_FIELDS);

        for field in ["start", "end"] {
            if let Some(value) = optional_str(proposed, field) {
                if DateTime::parse_from_rfc3339(value).is_err() {
                    failures.push(FieldError::new(
                        field,
                        format!("property '{}' must be an RFC 3339 timestamp", field),
                    ));
                }
            }
        }

        CheckOutcome::new(proposed.clone(), failures)
    }

    async fn create(&self, inputs: &PropertyBag) -> Result<LifecycleRecord> {
        let body = event_from_properties(inputs)?;
        let event = self.api.insert_event(&body).await?;
        let id = event.require_id()?.to_string();

        Ok(LifecycleRecord::new(id.clone(), inputs.clone()).with_output("event_id", json!(id)))
    }

    async fn update(
        &self,
        id: &str,
        _previous: &PropertyBag,
        proposed: &PropertyBag,
    ) -> Result<LifecycleRecord> {
        let body = event_from_properties(proposed)?;
        let event = self.api.update_event(id, &body).await?;
        let confirmed = event.require_id()?.to_string();

        Ok(LifecycleRecord::new(id, proposed.clone()).with_output("event_id", json!(confirmed)))
    }

    async fn delete(&self, id: &str, _last_inputs: &PropertyBag) -> Result<()> {
        self.api.delete_event(id).await?;
        Ok(())
    }
}
