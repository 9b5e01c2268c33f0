//! Error types for the sync client.

use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by remote event operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// HTTP 409: the requested time is already booked.
    #[error("Time slot conflict")]
    Conflict,

    /// A non-2xx response after the fallback chain is exhausted. The
    /// message is the server's own `{error}` body when it sent one,
    /// otherwise `"<action> failed (<status>)"`.
    #[error("{message}")]
    Api {
        action: &'static str,
        status: u16,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl SyncError {
    /// Map a non-success response to the user-facing error for `action`.
    pub fn from_status(action: &'static str, status: u16, body: &str) -> SyncError {
        if status == 409 {
            return SyncError::Conflict;
        }
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("{action} failed ({status})"));
        SyncError::Api {
            action,
            status,
            message,
        }
    }
}

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_maps_to_dedicated_variant() {
        assert!(matches!(
            SyncError::from_status("update", 409, ""),
            SyncError::Conflict
        ));
    }

    #[test]
    fn server_message_is_shown_verbatim() {
        let err = SyncError::from_status("update", 422, r#"{"error":"end before start"}"#);
        assert_eq!(err.to_string(), "end before start");
    }

    #[test]
    fn generic_message_names_action_and_status() {
        let err = SyncError::from_status("delete", 500, "oops, not json");
        assert_eq!(err.to_string(), "delete failed (500)");
    }
}
