/// Environment-backed setup configuration.
pub mod config;
/// Dataset definition types and the fixed FinanseHub schema.
pub mod dataset;
/// Response-body parsing and dataset name matching.
pub mod parse;
/// Dataset refresh history types.
pub mod refresh;
/// Setup client for the Power BI REST API.
pub mod setupclient;
/// Workspace (group) metadata types.
pub mod workspace;
