use std::collections::HashMap;

use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Fetch an access token via the OAuth2 client-credentials grant.
///
/// Sends a single form-encoded request to the tenant's token endpoint.
/// Any non-200 response is an error carrying the response body; there is
/// no retry and no token caching.
pub async fn fetch_client_credentials_token(
    client_id: &str,
    client_secret: &str,
    tenant_id: &str,
    scope: &str,
) -> Result<String, String> {
    let client = Client::new();
    let token_url = format!(
        "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
        tenant_id
    );

    let mut params = HashMap::new();
    params.insert("client_id", client_id);
    params.insert("client_secret", client_secret);
    params.insert("scope", scope);
    params.insert("grant_type", "client_credentials");

    let resp = client
        .post(&token_url)
        .form(&params)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = resp.status();
    let body = resp.text().await.map_err(|e| e.to_string())?;

    parse_token_response(status, &body)
}

/// Extract the access token from a token endpoint response.
fn parse_token_response(status: StatusCode, body: &str) -> Result<String, String> {
    if status != StatusCode::OK {
        return Err(format!("Failed to get access token: {body}"));
    }

    let json: Value = serde_json::from_str(body).map_err(|e| e.to_string())?;

    let access_token = json
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or("No access_token in response")?;

    if access_token.trim().is_empty() {
        return Err("Access token was empty".to_string());
    }

    Ok(access_token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_with_200_yields_exact_token() {
        let body = r#"{"token_type":"Bearer","expires_in":3599,"access_token":"eyJ0eXAi.abc.def"}"#;
        let token = parse_token_response(StatusCode::OK, body).unwrap();
        assert_eq!(token, "eyJ0eXAi.abc.def");
    }

    #[test]
    fn non_200_token_response_fails_with_body() {
        let body = r#"{"error":"invalid_client","error_description":"AADSTS7000215"}"#;
        let err = parse_token_response(StatusCode::UNAUTHORIZED, body).unwrap_err();
        assert!(err.starts_with("Failed to get access token:"));
        assert!(err.contains("AADSTS7000215"));
    }

    #[test]
    fn token_response_without_access_token_fails() {
        let err = parse_token_response(StatusCode::OK, r#"{"token_type":"Bearer"}"#).unwrap_err();
        assert_eq!(err, "No access_token in response");
    }

    #[test]
    fn empty_access_token_fails() {
        let err =
            parse_token_response(StatusCode::OK, r#"{"access_token":"  "}"#).unwrap_err();
        assert_eq!(err, "Access token was empty");
    }
}
