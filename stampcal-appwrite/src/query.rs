//! Query strings understood by the documents list endpoint.

use serde_json::json;
use stampcal_core::remote::Filter;

/// Upper bound on documents per list call. Lists are never paginated.
pub const LIST_LIMIT: u32 = 5000;

pub fn equal(filter: &Filter) -> String {
    json!({
        "method": "equal",
        "attribute": filter.attribute,
        "values": [filter.value],
    })
    .to_string()
}

pub fn limit(count: u32) -> String {
    json!({
        "method": "limit",
        "values": [count],
    })
    .to_string()
}

/// `queries[]` pairs for a list request.
pub fn list_params(filters: &[Filter]) -> Vec<(&'static str, String)> {
    filters
        .iter()
        .map(equal)
        .chain(std::iter::once(limit(LIST_LIMIT)))
        .map(|query| ("queries[]", query))
        .collect()
}
