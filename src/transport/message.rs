use serde::Deserialize;

use crate::domain::{MessageBody, MessageResource, PhoneNumber, SendMessage};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
struct MessageJsonResponse {
    sid: String,
    status: String,
    to: String,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    num_segments: Option<String>,
    #[serde(default)]
    date_created: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    error_message: Option<String>,
}

pub fn encode_send_message_form(request: &SendMessage) -> Vec<(String, String)> {
    vec![
        (PhoneNumber::FIELD.to_owned(), request.to().e164().to_owned()),
        ("From".to_owned(), request.from().e164().to_owned()),
        (
            MessageBody::FIELD.to_owned(),
            request.body().as_str().to_owned(),
        ),
    ]
}

pub fn decode_message_json_response(json: &str) -> Result<MessageResource, TransportError> {
    let parsed: MessageJsonResponse = serde_json::from_str(json)?;

    Ok(MessageResource {
        sid: parsed.sid,
        status: parsed.status,
        to: parsed.to,
        from: parsed.from,
        body: parsed.body,
        num_segments: parsed.num_segments,
        date_created: parsed.date_created,
        error_code: parsed.error_code,
        error_message: parsed.error_message,
    })
}
