use serde::Serialize;

/// Result of a Lookup v2 query. Packages that were not requested are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupRecord {
    pub phone_number: Option<String>,
    pub valid: Option<bool>,
    pub caller_name: Option<CallerName>,
    pub line_type_intelligence: Option<LineTypeIntelligence>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerName {
    pub caller_name: Option<String>,
    pub caller_type: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTypeIntelligence {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub line_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_network_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
}

impl LineTypeIntelligence {
    /// Shorthand for a classification carrying only its `type`.
    pub fn of_type(line_type: impl Into<String>) -> Self {
        Self {
            line_type: Some(line_type.into()),
            ..Default::default()
        }
    }
}

/// Message resource returned after Twilio accepted an SMS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResource {
    pub sid: String,
    pub status: String,
    pub to: String,
    pub from: Option<String>,
    pub body: Option<String>,
    pub num_segments: Option<String>,
    pub date_created: Option<String>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}

/// Call resource returned after Twilio queued an outbound call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResource {
    pub sid: String,
    pub status: String,
    pub to: String,
    pub from: Option<String>,
    pub direction: Option<String>,
    pub date_created: Option<String>,
}

/// Error document Twilio returns alongside non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiFault {
    pub code: Option<i64>,
    pub message: String,
    pub more_info: Option<String>,
}
