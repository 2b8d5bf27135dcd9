//! Calendars and the details of the one that is currently open.

use serde::{Deserialize, Serialize};

use crate::event::CalendarEvent;

/// A calendar row as listed for its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSummary {
    #[serde(rename = "$id")]
    pub id: String,
    pub title: String,
    /// Color token, see [`Theme`](crate::theme::Theme).
    pub theme: String,
    #[serde(rename = "user_id", default)]
    pub owner_id: String,
}

/// Fields sent when creating a calendar.
#[derive(Debug, Serialize)]
pub(crate) struct NewCalendar<'a> {
    pub title: &'a str,
    pub theme: &'a str,
    pub user_id: &'a str,
}

/// A calendar plus all of its events, in the order they were fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDetails {
    #[serde(flatten)]
    pub summary: CalendarSummary,
    pub events: Vec<CalendarEvent>,
}

impl CalendarDetails {
    pub fn id(&self) -> &str {
        &self.summary.id
    }

    pub fn contains_event(&self, event_id: &str) -> bool {
        self.events.iter().any(|e| e.id == event_id)
    }

    /// A new value with `event` appended; `self` is left as it was.
    pub fn with_event(&self, event: CalendarEvent) -> Self {
        let mut events = Vec::with_capacity(self.events.len() + 1);
        events.extend_from_slice(&self.events);
        events.push(event);

        CalendarDetails {
            summary: self.summary.clone(),
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reads_store_field_names() {
        let summary: CalendarSummary = serde_json::from_value(serde_json::json!({
            "$id": "c1",
            "$createdAt": "2024-05-01T10:00:00.000+00:00",
            "title": "Habits",
            "theme": "#3CB371",
            "user_id": "u1",
        }))
        .unwrap();

        assert_eq!(summary.id, "c1");
        assert_eq!(summary.owner_id, "u1");
    }

    #[test]
    fn missing_owner_defaults_to_empty() {
        let summary: CalendarSummary = serde_json::from_value(serde_json::json!({
            "$id": "c1",
            "title": "Habits",
            "theme": "#3CB371",
        }))
        .unwrap();

        assert_eq!(summary.owner_id, "");
    }

    #[test]
    fn with_event_leaves_original_untouched() {
        let details = CalendarDetails {
            summary: CalendarSummary {
                id: "c1".into(),
                title: "Habits".into(),
                theme: "#3CB371".into(),
                owner_id: "u1".into(),
            },
            events: vec![],
        };
        let event = CalendarEvent {
            id: "e1".into(),
            date: "2024-05-01T00:00:00.000+00:00".into(),
            owner_id: "u1".into(),
            calendar_id: "c1".into(),
            stamp_id: "s1".into(),
        };

        let updated = details.with_event(event);

        assert!(details.events.is_empty());
        assert_eq!(updated.events.len(), 1);
        assert!(updated.contains_event("e1"));
        assert_eq!(updated.summary, details.summary);
    }
}
