//! Groundwork calendar adapter
//!
//! Presents events on a remote calendar service as managed resources: the
//! orchestration engine sees check/create/update/delete, while underneath a
//! REST call runs against the calendar API. The remote service assigns the
//! event identifier, which becomes the lifecycle id.
//!
//! Credentials are ambient: [`CalendarConfig::from_env`] resolves a bearer
//! token from the environment, and the resolved config is passed explicitly
//! into the client constructor.

pub mod api;
pub mod error;
pub mod event;

// Re-exports
pub use api::{CalendarApi, CalendarConfig};
pub use error::{CalendarError, Result};
pub use event::{
    CalendarEventProvider, EventBody, EventDateTime, EventInfo, event_from_properties,
};
