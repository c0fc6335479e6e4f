use crate::types::TransportError;
use reqwest::{Response, StatusCode};

/// Check the response status and turn failures into a [`TransportError`]
/// carrying the message reported by the provider.
pub async fn check_response_error(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let response_text = response
        .text()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;
    let message = provider_error_message(&response_text);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TransportError::Authentication(message),
        StatusCode::BAD_REQUEST => TransportError::InvalidRequest(message),
        StatusCode::TOO_MANY_REQUESTS => TransportError::RateLimit(message),
        status if status.is_server_error() => TransportError::ServiceError(message),
        status => TransportError::Status {
            status: status.as_u16(),
            message,
        },
    })
}

/// Extracts `error.message` from an OpenAI-style error body, falling back to the raw body
pub(crate) fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
