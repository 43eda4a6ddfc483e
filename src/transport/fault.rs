use serde::Deserialize;

use crate::domain::ApiFault;

#[derive(Debug, Clone, Deserialize)]
struct FaultJson {
    #[serde(default)]
    code: Option<i64>,
    message: String,
    #[serde(default)]
    more_info: Option<String>,
}

/// Decode Twilio's error document. Returns `None` when the body is not one.
pub fn decode_api_fault(body: &str) -> Option<ApiFault> {
    let parsed: FaultJson = serde_json::from_str(body).ok()?;
    Some(ApiFault {
        code: parsed.code,
        message: parsed.message,
        more_info: parsed.more_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_twilio_error_document() {
        let body = r#"
        {
          "code": 20404,
          "message": "The requested resource /PhoneNumbers/+1000 was not found",
          "more_info": "https://www.twilio.com/docs/errors/20404",
          "status": 404
        }
        "#;

        let fault = decode_api_fault(body).unwrap();
        assert_eq!(fault.code, Some(20404));
        assert!(fault.message.starts_with("The requested resource"));
        assert_eq!(
            fault.more_info.as_deref(),
            Some("https://www.twilio.com/docs/errors/20404")
        );
    }

    #[test]
    fn non_fault_bodies_yield_none() {
        assert_eq!(decode_api_fault("Bad Gateway"), None);
        assert_eq!(decode_api_fault(r#"{ "code": 1 }"#), None);
    }
}
