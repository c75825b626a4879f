use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the dataset created for FinanseHub.
pub const DATASET_NAME: &str = "FinanseHub Currency & Interest Rates";

/// Substring identifying FinanseHub datasets among the workspace listing.
pub const DATASET_NAME_MARKER: &str = "FinanseHub";

/// Power BI column data type, serialized as its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnDataType {
    /// Signed 64-bit integer.
    Int64,
    /// Text value.
    String,
    /// Date and time value.
    DateTime,
    /// Double-precision floating point value.
    Double,
}

/// Column of a push-dataset table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Column data type.
    #[serde(rename = "dataType")]
    pub data_type: ColumnDataType,
}

impl Column {
    /// Create a column with the given name and data type.
    pub fn new(name: &str, data_type: ColumnDataType) -> Self {
        Column {
            name: name.to_string(),
            data_type,
        }
    }
}

/// Table of a push-dataset definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Table columns.
    pub columns: Vec<Column>,
}

/// Dataset definition submitted to the datasets endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetDefinition {
    /// Dataset display name.
    pub name: String,
    /// Dataset tables.
    pub tables: Vec<Table>,
}

/// Dataset record as returned by the workspace listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset id.
    pub id: String,
    /// Dataset display name.
    pub name: String,
    /// Web URL of the dataset, when present.
    #[serde(rename = "webUrl", skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    /// Principal that configured the dataset, when present.
    #[serde(rename = "configuredBy", skip_serializing_if = "Option::is_none")]
    pub configured_by: Option<String>,
    /// Additional fields returned by the API.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Build the fixed two-table FinanseHub dataset definition.
///
/// The schema mirrors the currency and interest rate rows produced by the
/// sync pipeline and is constructed once per run.
pub fn finansehub_dataset_definition() -> DatasetDefinition {
    use ColumnDataType::{DateTime, Double, Int64, String as Text};

    DatasetDefinition {
        name: DATASET_NAME.to_string(),
        tables: vec![
            Table {
                name: "CurrencyRates".to_string(),
                columns: vec![
                    Column::new("id", Int64),
                    Column::new("baseCurrency", Text),
                    Column::new("quoteCurrency", Text),
                    Column::new("date", DateTime),
                    Column::new("rate", Double),
                    Column::new("createdAt", DateTime),
                    Column::new("updatedAt", DateTime),
                ],
            },
            Table {
                name: "InterestRates".to_string(),
                columns: vec![
                    Column::new("id", Int64),
                    Column::new("institution", Text),
                    Column::new("product", Text),
                    Column::new("date", DateTime),
                    Column::new("rate", Double),
                    Column::new("createdAt", DateTime),
                    Column::new("updatedAt", DateTime),
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn definition_has_both_rate_tables() {
        let definition = finansehub_dataset_definition();

        assert_eq!(definition.name, DATASET_NAME);
        assert!(definition.name.contains(DATASET_NAME_MARKER));

        let names: Vec<&str> = definition
            .tables
            .iter()
            .map(|table| table.name.as_str())
            .collect();
        assert_eq!(names, vec!["CurrencyRates", "InterestRates"]);

        for table in &definition.tables {
            assert_eq!(table.columns.len(), 7);
            assert_eq!(table.columns[0].name, "id");
            assert_eq!(table.columns[0].data_type, ColumnDataType::Int64);
        }
    }

    #[test]
    fn definition_serializes_wire_field_names() {
        let definition = finansehub_dataset_definition();
        let json = serde_json::to_value(&definition).unwrap();

        assert_eq!(json["name"], DATASET_NAME);
        assert_eq!(json["tables"][0]["name"], "CurrencyRates");
        assert_eq!(json["tables"][0]["columns"][1]["name"], "baseCurrency");
        assert_eq!(json["tables"][0]["columns"][1]["dataType"], "String");
        assert_eq!(json["tables"][1]["columns"][4]["dataType"], "Double");
        assert_eq!(json["tables"][1]["columns"][3]["dataType"], "DateTime");
    }

    #[test]
    fn listed_dataset_keeps_unmodeled_fields() {
        let dataset: Dataset = serde_json::from_value(json!({
            "id": "abc-123",
            "name": "FinanseHub Currency & Interest Rates",
            "addRowsAPIEnabled": true
        }))
        .unwrap();

        assert_eq!(dataset.id, "abc-123");
        assert!(dataset.web_url.is_none());
        assert_eq!(dataset.extra["addRowsAPIEnabled"], json!(true));
    }
}
