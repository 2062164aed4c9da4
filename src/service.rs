use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request body carries no usable payload")]
    EmptyPayload,
    #[error("generation failed")]
    Generation(#[from] anyhow::Error),
}

/// Wire envelope for one generation request. Untagged: success and failure
/// serialize to the flat shapes clients already expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Success {
        success: bool,
        html: String,
        message: String,
    },
    Failure {
        error: String,
        message: String,
    },
}

/// Transport-agnostic response: an HTTP-ish status plus the envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub envelope: Envelope,
}

impl Response {
    fn ok(html: String) -> Self {
        Response {
            status: 200,
            envelope: Envelope::Success {
                success: true,
                html,
                message: "Mind map generated successfully".to_string(),
            },
        }
    }

    fn method_not_allowed() -> Self {
        Response {
            status: 405,
            envelope: Envelope::Failure {
                error: "Method not allowed".to_string(),
                message: "This endpoint only accepts POST requests".to_string(),
            },
        }
    }

    fn bad_request() -> Self {
        Response {
            status: 400,
            envelope: Envelope::Failure {
                error: "Bad request".to_string(),
                message: "Please provide data in the request body".to_string(),
            },
        }
    }

    fn internal_error() -> Self {
        Response {
            status: 500,
            envelope: Envelope::Failure {
                error: "Internal server error".to_string(),
                message: "Failed to generate mind map".to_string(),
            },
        }
    }
}

/// Services one request end to end. Only POST generates; a missing or
/// empty payload never reaches layout; a generation failure is logged and
/// mapped to an opaque internal error, never a partial document.
pub fn handle_request(method: &str, body: Option<&str>, config: &Config) -> Response {
    if !method.eq_ignore_ascii_case("post") {
        return Response::method_not_allowed();
    }
    match run(body, config) {
        Ok(html) => Response::ok(html),
        Err(ServiceError::EmptyPayload) => Response::bad_request(),
        Err(ServiceError::Generation(err)) => {
            error!("mind map generation failed: {err:#}");
            Response::internal_error()
        }
    }
}

fn run(body: Option<&str>, config: &Config) -> Result<String, ServiceError> {
    let payload = extract_payload(body.ok_or(ServiceError::EmptyPayload)?)?;
    Ok(crate::generate(&payload, config)?)
}

/// Pulls the payload out of a request body. Strict JSON first, then JSON5
/// for clients that send relaxed bodies, then the raw body itself. A body
/// that parses as JSON must be an object carrying a non-empty `data`.
fn extract_payload(body: &str) -> Result<String, ServiceError> {
    let parsed: Option<Value> = serde_json::from_str(body)
        .ok()
        .or_else(|| json5::from_str(body).ok());
    let payload = match parsed {
        Some(value) => {
            let data = value
                .as_object()
                .and_then(|object| object.get("data"))
                .ok_or(ServiceError::EmptyPayload)?;
            match data {
                Value::Null => return Err(ServiceError::EmptyPayload),
                Value::String(text) => text.clone(),
                other => other.to_string(),
            }
        }
        None => body.to_string(),
    };
    if payload.is_empty() {
        return Err(ServiceError::EmptyPayload);
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn only_post_is_accepted() {
        let response = handle_request("GET", Some(r#"{"data":"idea"}"#), &config());
        assert_eq!(response.status, 405);
        assert_eq!(
            serde_json::to_value(&response.envelope).unwrap(),
            json!({
                "error": "Method not allowed",
                "message": "This endpoint only accepts POST requests"
            })
        );
    }

    #[test]
    fn missing_payload_is_a_client_error() {
        for body in [
            None,
            Some(r#"{}"#),
            Some(r#"{"data": null}"#),
            Some(r#"{"data": ""}"#),
            Some(r#"{"other": "field"}"#),
            Some(""),
        ] {
            let response = handle_request("POST", body, &config());
            assert_eq!(response.status, 400, "body {body:?}");
            assert_eq!(
                serde_json::to_value(&response.envelope).unwrap(),
                json!({
                    "error": "Bad request",
                    "message": "Please provide data in the request body"
                })
            );
        }
    }

    #[test]
    fn string_payload_produces_a_document() {
        let response = handle_request(
            "POST",
            Some(r#"{"data": "Launch plan: steps to ship"}"#),
            &config(),
        );
        assert_eq!(response.status, 200);
        let Envelope::Success {
            success,
            html,
            message,
        } = response.envelope
        else {
            panic!("expected success envelope");
        };
        assert!(success);
        assert_eq!(message, "Mind map generated successfully");
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn non_string_payloads_are_serialized() {
        let response = handle_request("POST", Some(r#"{"data": [1, 2, 3]}"#), &config());
        assert_eq!(response.status, 200);
        let Envelope::Success { html, .. } = response.envelope else {
            panic!("expected success envelope");
        };
        assert!(html.contains("[1,2,3]"));
    }

    #[test]
    fn relaxed_json_bodies_still_parse() {
        let response = handle_request("POST", Some("{data: 'Quarterly goals'}"), &config());
        assert_eq!(response.status, 200);
    }

    #[test]
    fn non_json_bodies_are_taken_verbatim() {
        let response = handle_request("POST", Some("Just one loose idea"), &config());
        assert_eq!(response.status, 200);
        let Envelope::Success { html, .. } = response.envelope else {
            panic!("expected success envelope");
        };
        assert!(html.contains("Just one loose idea"));
    }

    #[test]
    fn internal_error_envelope_is_opaque() {
        let response = Response::internal_error();
        assert_eq!(response.status, 500);
        assert_eq!(
            serde_json::to_value(&response.envelope).unwrap(),
            json!({
                "error": "Internal server error",
                "message": "Failed to generate mind map"
            })
        );
    }
}
