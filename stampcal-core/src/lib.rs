//! Core library for stampcal.
//!
//! - `calendar`, `event`, `stamp`: the rows kept in the remote store
//! - `remote`: the [`RemoteStore`] contract every backend implements
//! - `mirror`: in-memory caches of the signed-in user's rows
//! - `session`: sign-in lifecycle owning one [`Mirror`]

pub mod calendar;
pub mod config;
pub mod error;
pub mod event;
pub mod grouping;
pub mod mirror;
pub mod remote;
pub mod session;
pub mod stamp;
pub mod theme;
pub mod validation;

pub use calendar::{CalendarDetails, CalendarSummary};
pub use error::{StampcalError, StampcalResult, StoreError, ValidationError};
pub use event::{CalendarEvent, StampedEvent};
pub use mirror::Mirror;
pub use remote::RemoteStore;
pub use session::Session;
pub use stamp::EventStamp;
pub use theme::Theme;
