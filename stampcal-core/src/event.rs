//! Stamp attachments to calendar days.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::stamp::EventStamp;

/// One stamp placed on one day of one calendar.
///
/// `date` is kept exactly as the store returned it. Only its date portion
/// carries meaning; use [`CalendarEvent::day`] to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(rename = "$id")]
    pub id: String,
    pub date: String,
    #[serde(rename = "user_id", default)]
    pub owner_id: String,
    #[serde(rename = "cal_id")]
    pub calendar_id: String,
    pub stamp_id: String,
}

impl CalendarEvent {
    /// The calendar day, with any time-of-day discarded.
    pub fn day(&self) -> Option<NaiveDate> {
        let date = self
            .date
            .split_once('T')
            .map_or(self.date.as_str(), |(date, _)| date);
        NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
    }
}

/// Fields sent when creating an event.
#[derive(Debug, Serialize)]
pub(crate) struct NewEvent<'a> {
    pub date: String,
    pub user_id: &'a str,
    pub cal_id: &'a str,
    pub stamp_id: &'a str,
}

/// Encode a calendar day the way the store keeps datetimes (midnight UTC).
pub fn encode_day(day: NaiveDate) -> String {
    format!("{}T00:00:00.000+00:00", day.format("%Y-%m-%d"))
}

/// An event together with the stamp it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampedEvent {
    #[serde(flatten)]
    pub event: CalendarEvent,
    pub stamp: EventStamp,
}
