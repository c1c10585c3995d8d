//! JSON fixtures in the API's wire format

use serde_json::{Value, json};

pub fn user(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "providerNames": ["infra"],
        "created": "2022-08-01T10:00:00Z",
        "updated": "2022-08-01T10:00:00Z",
        "lastSeenAt": "2022-08-02T09:30:00Z"
    })
}

pub fn group(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "created": "2022-08-01T10:00:00Z"
    })
}

pub fn user_grant(id: &str, user: &str, resource: &str, privilege: &str) -> Value {
    json!({
        "id": id,
        "user": user,
        "resource": resource,
        "privilege": privilege,
        "created": "2022-08-01T10:00:00Z",
        "createdBy": "admin"
    })
}

pub fn group_grant(id: &str, group: &str, resource: &str, privilege: &str) -> Value {
    json!({
        "id": id,
        "group": group,
        "resource": resource,
        "privilege": privilege
    })
}

/// Paginated list envelope
pub fn list(items: Vec<Value>) -> Value {
    let count = items.len();
    json!({ "items": items, "count": count })
}
