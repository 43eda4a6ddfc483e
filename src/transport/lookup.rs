use serde::Deserialize;
use url::Url;

use crate::domain::{CallerName, LineTypeIntelligence, LookupField, LookupRecord, LookupRequest};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("lookup base URL cannot carry path segments: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Deserialize)]
struct LookupJsonResponse {
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    valid: Option<bool>,
    #[serde(default)]
    caller_name: Option<CallerNameJson>,
    #[serde(default)]
    line_type_intelligence: Option<LineTypeJson>,
}

#[derive(Debug, Clone, Deserialize)]
struct CallerNameJson {
    #[serde(default)]
    caller_name: Option<String>,
    #[serde(default)]
    caller_type: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct LineTypeJson {
    #[serde(default, rename = "type")]
    line_type: Option<String>,
    #[serde(default)]
    carrier_name: Option<String>,
    #[serde(default)]
    mobile_country_code: Option<String>,
    #[serde(default)]
    mobile_network_code: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

/// Build `{base}/v2/PhoneNumbers/{e164}?Fields=...` for a lookup request.
pub fn encode_lookup_url(base: &Url, request: &LookupRequest) -> Result<Url, TransportError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| TransportError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(["v2", "PhoneNumbers", request.number().e164()]);

    if !request.fields().is_empty() {
        let fields = request
            .fields()
            .iter()
            .map(|field| field.as_str())
            .collect::<Vec<_>>()
            .join(",");
        url.query_pairs_mut().append_pair(LookupField::PARAM, &fields);
    }

    Ok(url)
}

pub fn decode_lookup_json_response(json: &str) -> Result<LookupRecord, TransportError> {
    let parsed: LookupJsonResponse = serde_json::from_str(json)?;

    Ok(LookupRecord {
        phone_number: parsed.phone_number,
        valid: parsed.valid,
        caller_name: parsed.caller_name.map(|value| CallerName {
            caller_name: value.caller_name,
            caller_type: value.caller_type,
            error_code: value.error_code,
        }),
        line_type_intelligence: parsed
            .line_type_intelligence
            .map(|value| LineTypeIntelligence {
                line_type: value.line_type,
                carrier_name: value.carrier_name,
                mobile_country_code: value.mobile_country_code,
                mobile_network_code: value.mobile_network_code,
                error_code: value.error_code,
            }),
    })
}

#[cfg(test)]
mod tests {
    use crate::domain::PhoneNumber;

    use super::*;

    #[test]
    fn encode_lookup_url_appends_number_and_fields() {
        let base = Url::parse("https://lookups.twilio.com").unwrap();
        let request = LookupRequest::new(
            PhoneNumber::parse("+15706200103").unwrap(),
            [LookupField::CallerName, LookupField::LineTypeIntelligence],
        );

        let url = encode_lookup_url(&base, &request).unwrap();
        assert_eq!(url.path(), "/v2/PhoneNumbers/+15706200103");

        let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();
        assert_eq!(
            pairs,
            vec![(
                "Fields".to_owned(),
                "caller_name,line_type_intelligence".to_owned()
            )]
        );
    }

    #[test]
    fn encode_lookup_url_keeps_base_path_prefix() {
        let base = Url::parse("http://127.0.0.1:9000/twilio/").unwrap();
        let request = LookupRequest::new(PhoneNumber::parse("+18024791999").unwrap(), []);

        let url = encode_lookup_url(&base, &request).unwrap();
        assert_eq!(url.path(), "/twilio/v2/PhoneNumbers/+18024791999");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn decode_lookup_maps_requested_packages() {
        let json = r#"
        {
          "calling_country_code": "1",
          "country_code": "US",
          "phone_number": "+15706200103",
          "national_format": "(570) 620-0103",
          "valid": true,
          "caller_name": {
            "caller_name": "ALICE SMITH",
            "caller_type": "CONSUMER",
            "error_code": null
          },
          "line_type_intelligence": {
            "carrier_name": "Verizon Wireless",
            "error_code": null,
            "mobile_country_code": "310",
            "mobile_network_code": "004",
            "type": "mobile"
          },
          "sim_swap": null
        }
        "#;

        let record = decode_lookup_json_response(json).unwrap();
        assert_eq!(record.phone_number.as_deref(), Some("+15706200103"));
        assert_eq!(record.valid, Some(true));
        assert_eq!(
            record.caller_name.unwrap().caller_name.as_deref(),
            Some("ALICE SMITH")
        );
        let line_type = record.line_type_intelligence.unwrap();
        assert_eq!(line_type.line_type.as_deref(), Some("mobile"));
        assert_eq!(line_type.carrier_name.as_deref(), Some("Verizon Wireless"));
    }

    #[test]
    fn decode_lookup_treats_null_packages_as_absent() {
        let json = r#"{ "phone_number": "+18024791999", "caller_name": null }"#;
        let record = decode_lookup_json_response(json).unwrap();
        assert!(record.caller_name.is_none());
        assert!(record.line_type_intelligence.is_none());
    }
}
