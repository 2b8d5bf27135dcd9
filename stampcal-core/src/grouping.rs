//! Joining events to stamps for display.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::debug;

use crate::event::CalendarEvent;
use crate::stamp::EventStamp;

/// Stamps placed on each day, keyed by the date portion of the event.
///
/// Events whose stamp is not in `stamps`, or whose date cannot be read,
/// are left out. Within a day, stamps keep the order of `events`.
pub fn stamps_by_day<'a>(
    events: &[CalendarEvent],
    stamps: &'a [EventStamp],
) -> BTreeMap<NaiveDate, Vec<&'a EventStamp>> {
    let by_id: HashMap<&str, &EventStamp> = stamps.iter().map(|s| (s.id.as_str(), s)).collect();

    let mut days: BTreeMap<NaiveDate, Vec<&EventStamp>> = BTreeMap::new();
    for event in events {
        let Some(stamp) = by_id.get(event.stamp_id.as_str()) else {
            debug!(event = %event.id, stamp = %event.stamp_id, "skipping event with unknown stamp");
            continue;
        };
        let Some(day) = event.day() else {
            debug!(event = %event.id, date = %event.date, "skipping event with unreadable date");
            continue;
        };
        days.entry(day).or_default().push(stamp);
    }
    days
}
