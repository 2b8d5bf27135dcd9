use serde::{Deserialize, Serialize};

/// A reusable emoji + label that can be placed on many days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStamp {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "event_emoji")]
    pub emoji: String,
    #[serde(rename = "user_id", default)]
    pub owner_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewStamp<'a> {
    pub name: &'a str,
    pub event_emoji: &'a str,
    pub user_id: &'a str,
}
