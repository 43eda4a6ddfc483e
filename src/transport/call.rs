use serde::Deserialize;

use super::twiml;
use crate::domain::{CallResource, PhoneNumber, PlaceCall, ValidationError};

/// Twilio rejects a `Twiml` parameter longer than this.
pub const TWIML_MAX_CHARS: usize = 4000;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Twiml(#[from] twiml::TransportError),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, Deserialize)]
struct CallJsonResponse {
    sid: String,
    status: String,
    to: String,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    date_created: Option<String>,
}

pub fn encode_place_call_form(request: &PlaceCall) -> Result<Vec<(String, String)>, TransportError> {
    let twiml = twiml::render_twiml(request.script())?;
    let actual = twiml.chars().count();
    if actual > TWIML_MAX_CHARS {
        return Err(ValidationError::TooLong {
            field: "Twiml",
            max: TWIML_MAX_CHARS,
            actual,
        }
        .into());
    }

    Ok(vec![
        (PhoneNumber::FIELD.to_owned(), request.to().e164().to_owned()),
        ("From".to_owned(), request.from().e164().to_owned()),
        ("Twiml".to_owned(), twiml),
    ])
}

pub fn decode_call_json_response(json: &str) -> Result<CallResource, TransportError> {
    let parsed: CallJsonResponse = serde_json::from_str(json)?;

    Ok(CallResource {
        sid: parsed.sid,
        status: parsed.status,
        to: parsed.to,
        from: parsed.from,
        direction: parsed.direction,
        date_created: parsed.date_created,
    })
}

#[cfg(test)]
mod tests {
    use crate::domain::{CallScript, ConferenceRoom, PauseSeconds, SpokenMessage};

    use super::*;

    #[test]
    fn encode_place_call_embeds_twiml() {
        let request = PlaceCall::new(
            PhoneNumber::parse("+15706200103").unwrap(),
            PhoneNumber::parse("+18024791999").unwrap(),
            CallScript::announcement(PauseSeconds::default(), SpokenMessage::new("Hi").unwrap()),
        );

        let params = encode_place_call_form(&request).unwrap();
        assert_eq!(params[0], ("To".to_owned(), "+15706200103".to_owned()));
        assert_eq!(params[1], ("From".to_owned(), "+18024791999".to_owned()));
        assert_eq!(params[2].0, "Twiml");
        assert!(params[2].1.ends_with(r#"<Response><Pause length="10"/><Say>Hi</Say></Response>"#));
    }

    #[test]
    fn longest_plain_script_fits_the_twiml_limit() {
        let request = PlaceCall::new(
            PhoneNumber::parse("+15706200103").unwrap(),
            PhoneNumber::parse("+18024791999").unwrap(),
            CallScript::conference(
                PauseSeconds::new(PauseSeconds::MAX).unwrap(),
                SpokenMessage::new("a".repeat(SpokenMessage::MAX_CHARS)).unwrap(),
                ConferenceRoom::new("r".repeat(ConferenceRoom::MAX_CHARS)).unwrap(),
            ),
        );

        let params = encode_place_call_form(&request).unwrap();
        assert!(params[2].1.chars().count() <= TWIML_MAX_CHARS);
    }

    #[test]
    fn escaped_text_past_the_twiml_limit_is_rejected() {
        // Each `&` becomes `&amp;` in the document.
        let request = PlaceCall::new(
            PhoneNumber::parse("+15706200103").unwrap(),
            PhoneNumber::parse("+18024791999").unwrap(),
            CallScript::announcement(
                PauseSeconds::default(),
                SpokenMessage::new("&".repeat(1000)).unwrap(),
            ),
        );

        let err = encode_place_call_form(&request).unwrap_err();
        assert!(matches!(
            err,
            TransportError::Invalid(ValidationError::TooLong {
                field: "Twiml",
                max: TWIML_MAX_CHARS,
                ..
            })
        ));
    }

    #[test]
    fn decode_call_resource() {
        let json = r#"
        {
          "account_sid": "ACXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX",
          "date_created": "Tue, 31 Aug 2010 20:36:28 +0000",
          "direction": "outbound-api",
          "from": "+18024791999",
          "sid": "CAe1644a7eed5088b159577c5802d8be38",
          "status": "queued",
          "to": "+15706200103"
        }
        "#;

        let resource = decode_call_json_response(json).unwrap();
        assert_eq!(resource.sid, "CAe1644a7eed5088b159577c5802d8be38");
        assert_eq!(resource.status, "queued");
        assert_eq!(resource.direction.as_deref(), Some("outbound-api"));
    }
}
