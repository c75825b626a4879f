use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Refresh status reported for completed refreshes.
pub const REFRESH_STATUS_COMPLETED: &str = "Completed";
/// Refresh status reported for failed refreshes.
pub const REFRESH_STATUS_FAILED: &str = "Failed";

/// Refresh history entry returned by the refreshes endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refresh {
    /// Request id assigned by the service.
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Kind of refresh, e.g. `ViaApi`.
    #[serde(rename = "refreshType", skip_serializing_if = "Option::is_none")]
    pub refresh_type: Option<String>,
    /// Refresh start time.
    #[serde(rename = "startTime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Refresh end time; absent while the refresh is running.
    #[serde(rename = "endTime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Refresh status; `Unknown` while the refresh is running.
    pub status: String,
    /// Serialized service error for failed refreshes.
    #[serde(
        rename = "serviceExceptionJson",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_exception_json: Option<String>,
    /// Additional fields returned by the API.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Refresh {
    /// Wall-clock duration in seconds, when both timestamps are present.
    pub fn duration_secs(&self) -> Option<i64> {
        Some((self.end_time? - self.start_time?).num_seconds())
    }

    /// True while the service still reports the refresh as running.
    pub fn is_in_progress(&self) -> bool {
        self.status != REFRESH_STATUS_COMPLETED && self.status != REFRESH_STATUS_FAILED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn completed_refresh_reports_duration() {
        let refresh: Refresh = serde_json::from_value(json!({
            "requestId": "9399bb89-25d1-44f8-8576-136d7e9014b1",
            "refreshType": "ViaApi",
            "startTime": "2025-08-19T06:00:00Z",
            "endTime": "2025-08-19T06:01:30Z",
            "status": "Completed"
        }))
        .unwrap();

        assert_eq!(refresh.duration_secs(), Some(90));
        assert!(!refresh.is_in_progress());
    }

    #[test]
    fn running_refresh_has_no_end_time() {
        let refresh: Refresh = serde_json::from_value(json!({
            "refreshType": "ViaApi",
            "startTime": "2025-08-19T06:00:00Z",
            "status": "Unknown"
        }))
        .unwrap();

        assert!(refresh.end_time.is_none());
        assert_eq!(refresh.duration_secs(), None);
        assert!(refresh.is_in_progress());
    }

    #[test]
    fn failed_refresh_carries_service_exception() {
        let refresh: Refresh = serde_json::from_value(json!({
            "startTime": "2025-08-19T06:00:00Z",
            "endTime": "2025-08-19T06:00:05Z",
            "status": "Failed",
            "serviceExceptionJson": "{\"errorCode\":\"ModelRefreshFailed\"}"
        }))
        .unwrap();

        assert!(!refresh.is_in_progress());
        assert!(
            refresh
                .service_exception_json
                .as_deref()
                .unwrap()
                .contains("ModelRefreshFailed")
        );
    }
}
