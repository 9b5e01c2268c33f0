//! Request shapes for the remote event API.
//!
//! The exact endpoint contract varies by deployment, so each mutating
//! operation carries an ordered list of candidate shapes. Shapes are
//! plain data (method + path + optional body); the client tries them in
//! sequence and stops at the first that succeeds.

use chrono::NaiveDate;
use reqwest::Method;
use serde_json::{Map, Value};

/// One candidate request in a fallback chain.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestShape {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl RequestShape {
    fn new(method: Method, path: impl Into<String>) -> RequestShape {
        RequestShape {
            method,
            path: path.into(),
            body: None,
        }
    }

    fn with_body(method: Method, path: impl Into<String>, body: Value) -> RequestShape {
        RequestShape {
            method,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// `GET /api/calendar/week?offset=N`, where offset 0 is the current week.
pub fn week_shape(offset: i64) -> RequestShape {
    RequestShape::new(Method::GET, format!("/api/calendar/week?offset={offset}"))
}

/// `GET /api/events?from=YYYY-MM-DD&to=YYYY-MM-DD`.
pub fn events_shape(from: NaiveDate, to: NaiveDate) -> RequestShape {
    RequestShape::new(Method::GET, format!("/api/events?from={from}&to={to}"))
}

/// `POST /api/calendar/create` -- the one create shape the store commits to.
pub fn create_shape(payload: Value) -> RequestShape {
    RequestShape::with_body(Method::POST, "/api/calendar/create", payload)
}

/// Ordered update shapes. Id-in-path forms come first; body-addressed
/// forms follow for deployments without per-event routes.
pub fn update_shapes(id: &str, payload: &Map<String, Value>) -> Vec<RequestShape> {
    let body = Value::Object(payload.clone());

    let mut with_id = payload.clone();
    with_id.insert("id".to_string(), Value::String(id.to_string()));

    let mut with_action = with_id.clone();
    with_action.insert("action".to_string(), Value::String("update".to_string()));

    vec![
        RequestShape::with_body(Method::PUT, format!("/events/{id}"), body.clone()),
        RequestShape::with_body(Method::PATCH, format!("/events/{id}"), body.clone()),
        RequestShape::with_body(Method::POST, format!("/events/{id}"), body),
        RequestShape::with_body(Method::POST, "/events/update", Value::Object(with_id)),
        RequestShape::with_body(Method::POST, "/events", Value::Object(with_action)),
    ]
}

/// Ordered delete shapes.
pub fn delete_shapes(id: &str) -> Vec<RequestShape> {
    vec![
        RequestShape::new(Method::DELETE, format!("/events/{id}")),
        RequestShape::new(Method::POST, format!("/events/{id}/delete")),
        RequestShape::with_body(
            Method::POST,
            "/events/delete",
            serde_json::json!({ "id": id }),
        ),
        RequestShape::with_body(
            Method::POST,
            "/events",
            serde_json::json!({ "action": "delete", "id": id }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("title".to_string(), Value::String("Moved".to_string()));
        map
    }

    // --- update_shapes ---

    #[test]
    fn update_chain_order() {
        let shapes = update_shapes("evt_1", &payload());
        let summary: Vec<(&Method, &str)> =
            shapes.iter().map(|s| (&s.method, s.path.as_str())).collect();
        assert_eq!(
            summary,
            vec![
                (&Method::PUT, "/events/evt_1"),
                (&Method::PATCH, "/events/evt_1"),
                (&Method::POST, "/events/evt_1"),
                (&Method::POST, "/events/update"),
                (&Method::POST, "/events"),
            ]
        );
    }

    #[test]
    fn body_addressed_updates_carry_id_and_action() {
        let shapes = update_shapes("evt_1", &payload());

        let by_id = shapes[3].body.as_ref().unwrap();
        assert_eq!(by_id["id"], "evt_1");
        assert_eq!(by_id["title"], "Moved");
        assert!(by_id.get("action").is_none());

        let tagged = shapes[4].body.as_ref().unwrap();
        assert_eq!(tagged["action"], "update");
        assert_eq!(tagged["id"], "evt_1");
        assert_eq!(tagged["title"], "Moved");
    }

    // --- delete_shapes ---

    #[test]
    fn delete_chain_order() {
        let shapes = delete_shapes("evt_1");
        let summary: Vec<(&Method, &str)> =
            shapes.iter().map(|s| (&s.method, s.path.as_str())).collect();
        assert_eq!(
            summary,
            vec![
                (&Method::DELETE, "/events/evt_1"),
                (&Method::POST, "/events/evt_1/delete"),
                (&Method::POST, "/events/delete"),
                (&Method::POST, "/events"),
            ]
        );
        assert_eq!(shapes[2].body.as_ref().unwrap()["id"], "evt_1");
        assert_eq!(shapes[3].body.as_ref().unwrap()["action"], "delete");
    }

    // --- reads ---

    #[test]
    fn read_shapes_have_no_body() {
        assert_eq!(week_shape(-2).path, "/api/calendar/week?offset=-2");
        assert!(week_shape(0).body.is_none());

        let from = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let shape = events_shape(from, from);
        assert_eq!(shape.path, "/api/events?from=2026-08-05&to=2026-08-05");
    }
}
