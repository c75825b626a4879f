use reqwest::StatusCode;
use serde_json::Value;

use crate::powerbi::dataset::Dataset;
use crate::powerbi::refresh::Refresh;

/// Turn a dataset listing response into datasets.
///
/// Listing failures are soft: any non-success status is printed with the
/// response body and yields an empty listing instead of an error.
pub(crate) fn datasets_from_list_response(
    status: StatusCode,
    body: &str,
) -> Result<Vec<Dataset>, String> {
    if !status.is_success() {
        println!("❌ Failed to list datasets ({}): {}", status, body);
        return Ok(vec![]);
    }

    let json: Value =
        serde_json::from_str(body).map_err(|e| format!("Failed to parse JSON: {e}"))?;
    parse_datasets_from_response(&json)
}

/// Turn a dataset creation response into the new dataset id.
///
/// Creation failures are soft: any status other than 201 is printed with
/// the response body and yields `None`. A 201 without an id is an error.
pub(crate) fn created_dataset_id_from_response(
    status: StatusCode,
    body: &str,
) -> Result<Option<String>, String> {
    if status != StatusCode::CREATED {
        println!("❌ Failed to create dataset ({}): {}", status, body);
        return Ok(None);
    }

    let json: Value =
        serde_json::from_str(body).map_err(|e| format!("Failed to parse JSON: {e}"))?;

    let id = parse_dataset_id(&json)
        .ok_or_else(|| "Dataset creation response had no id".to_string())?;

    println!("✅ Created dataset: {}", id);
    Ok(Some(id))
}

/// Parse datasets from a workspace listing response.
///
/// A body without a `value` key is treated as an empty listing, not an
/// error; the service omits the key for empty workspaces.
pub(crate) fn parse_datasets_from_response(json: &Value) -> Result<Vec<Dataset>, String> {
    let Some(records) = json.get("value") else {
        return Ok(vec![]);
    };

    serde_json::from_value(records.clone())
        .map_err(|e| format!("Failed to parse dataset list: {e}"))
}

/// Parse refresh history entries from a refreshes response.
pub(crate) fn parse_refreshes_from_response(json: &Value) -> Result<Vec<Refresh>, String> {
    let Some(records) = json.get("value") else {
        return Ok(vec![]);
    };

    serde_json::from_value(records.clone())
        .map_err(|e| format!("Failed to parse refresh history: {e}"))
}

/// Extract the dataset id from a creation response body.
pub(crate) fn parse_dataset_id(json: &Value) -> Option<String> {
    json.get("id")
        .and_then(|v| v.as_str())
        .map(|id| id.to_string())
}

/// Find the first dataset whose name contains the marker substring.
///
/// The match is case sensitive and listing order decides ties.
pub fn find_dataset_by_marker<'a>(datasets: &'a [Dataset], marker: &str) -> Option<&'a Dataset> {
    datasets.iter().find(|dataset| dataset.name.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::powerbi::dataset::DATASET_NAME_MARKER;
    use serde_json::json;

    fn listing(names_and_ids: &[(&str, &str)]) -> Vec<Dataset> {
        let records: Vec<Value> = names_and_ids
            .iter()
            .map(|(name, id)| json!({ "id": id, "name": name }))
            .collect();
        parse_datasets_from_response(&json!({ "value": records })).unwrap()
    }

    #[test]
    fn listing_parses_value_array() {
        let datasets = listing(&[
            ("FinanseHub Currency & Interest Rates", "abc-123"),
            ("Sales Report", "def-456"),
        ]);

        assert_eq!(datasets.len(), 2);
        assert_eq!(datasets[0].id, "abc-123");
        assert_eq!(datasets[1].name, "Sales Report");
    }

    #[test]
    fn listing_without_value_key_is_empty() {
        let datasets = parse_datasets_from_response(&json!({ "odata.context": "..." })).unwrap();
        assert!(datasets.is_empty());
    }

    #[test]
    fn marker_matches_first_dataset_in_listing_order() {
        let datasets = listing(&[
            ("Sales Report", "def-456"),
            ("FinanseHub Currency & Interest Rates", "abc-123"),
            ("FinanseHub Archive", "ghi-789"),
        ]);

        let found = find_dataset_by_marker(&datasets, DATASET_NAME_MARKER).unwrap();
        assert_eq!(found.id, "abc-123");
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        let datasets = listing(&[("finansehub currency rates", "abc-123")]);
        assert!(find_dataset_by_marker(&datasets, DATASET_NAME_MARKER).is_none());
    }

    #[test]
    fn marker_without_match_returns_none() {
        let datasets = listing(&[("Sales Report", "def-456")]);
        assert!(find_dataset_by_marker(&datasets, DATASET_NAME_MARKER).is_none());
    }

    #[test]
    fn created_dataset_id_is_extracted() {
        let id = parse_dataset_id(&json!({ "id": "new-456", "name": "whatever" }));
        assert_eq!(id.as_deref(), Some("new-456"));
    }

    #[test]
    fn create_response_without_id_yields_none() {
        assert!(parse_dataset_id(&json!({ "name": "whatever" })).is_none());
        assert!(parse_dataset_id(&json!({ "id": 42 })).is_none());
    }

    #[test]
    fn refresh_history_parses_value_array() {
        let refreshes = parse_refreshes_from_response(&json!({
            "value": [
                {
                    "refreshType": "ViaApi",
                    "startTime": "2025-08-19T06:00:00Z",
                    "endTime": "2025-08-19T06:02:00Z",
                    "status": "Completed"
                }
            ]
        }))
        .unwrap();

        assert_eq!(refreshes.len(), 1);
        assert_eq!(refreshes[0].status, "Completed");
        assert_eq!(refreshes[0].duration_secs(), Some(120));
    }

    #[test]
    fn refresh_history_without_value_key_is_empty() {
        assert!(parse_refreshes_from_response(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn non_success_listing_is_soft_and_empty() {
        let body = r#"{"error":{"code":"PowerBINotAuthorizedException"}}"#;
        let datasets = datasets_from_list_response(StatusCode::FORBIDDEN, body).unwrap();
        assert!(datasets.is_empty());
    }

    #[test]
    fn successful_listing_passes_through_datasets() {
        let body = r#"{"value":[{"id":"abc-123","name":"FinanseHub Currency & Interest Rates"}]}"#;
        let datasets = datasets_from_list_response(StatusCode::OK, body).unwrap();
        assert_eq!(datasets.len(), 1);
        assert_eq!(datasets[0].id, "abc-123");
    }

    #[test]
    fn successful_listing_without_value_key_is_empty() {
        let datasets = datasets_from_list_response(StatusCode::OK, "{}").unwrap();
        assert!(datasets.is_empty());
    }

    #[test]
    fn created_dataset_yields_id_on_201() {
        let body = r#"{"id":"new-456","name":"FinanseHub Currency & Interest Rates"}"#;
        let id = created_dataset_id_from_response(StatusCode::CREATED, body).unwrap();
        assert_eq!(id.as_deref(), Some("new-456"));
    }

    #[test]
    fn failed_creation_is_soft_and_absent() {
        let body = r#"{"error":{"code":"InvalidRequest"}}"#;
        let id = created_dataset_id_from_response(StatusCode::BAD_REQUEST, body).unwrap();
        assert!(id.is_none());

        // A 200 is not a creation either; only 201 carries the new id.
        let id = created_dataset_id_from_response(StatusCode::OK, "{}").unwrap();
        assert!(id.is_none());
    }

    #[test]
    fn creation_response_missing_id_is_an_error() {
        let err = created_dataset_id_from_response(StatusCode::CREATED, "{}").unwrap_err();
        assert_eq!(err, "Dataset creation response had no id");
    }
}
