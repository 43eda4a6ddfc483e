//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{CallScript, LookupField, LookupRequest, PlaceCall, SendMessage, Verb};
pub use response::{
    ApiFault, CallResource, CallerName, LineTypeIntelligence, LookupRecord, MessageResource,
};
pub use validation::ValidationError;
pub use value::{
    AccountSid, ApiKey, ApiSecret, ConferenceRoom, MessageBody, PauseSeconds, PhoneNumber,
    SpokenMessage,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_sid_requires_ac_prefix() {
        assert!(matches!(
            AccountSid::new("   "),
            Err(ValidationError::Empty {
                field: AccountSid::FIELD
            })
        ));
        assert!(matches!(
            AccountSid::new("SK123"),
            Err(ValidationError::InvalidSid { prefix: "AC", .. })
        ));
        assert_eq!(AccountSid::new(" AC123 ").unwrap().as_str(), "AC123");
    }

    #[test]
    fn api_secret_is_redacted_in_debug() {
        let secret = ApiSecret::new("hunter2").unwrap();
        assert_eq!(format!("{secret:?}"), "ApiSecret(***)");
        assert!(ApiSecret::new("").is_err());
    }

    #[test]
    fn phone_number_normalizes_to_e164() {
        let pn = PhoneNumber::parse(" +1 (570) 620-0103 ").unwrap();
        assert_eq!(pn.raw(), "+1 (570) 620-0103");
        assert_eq!(pn.e164(), "+15706200103");
        assert_eq!(pn.to_string(), "+15706200103");
    }

    #[test]
    fn phone_number_rejects_missing_country_and_garbage() {
        assert!(matches!(
            PhoneNumber::parse(""),
            Err(ValidationError::Empty { .. })
        ));
        assert!(matches!(
            PhoneNumber::parse("not a number"),
            Err(ValidationError::InvalidPhoneNumber { .. })
        ));
    }

    #[test]
    fn message_body_length_is_enforced() {
        assert!(MessageBody::new("  ").is_err());
        assert!(MessageBody::new("a".repeat(MessageBody::MAX_CHARS)).is_ok());
        let err = MessageBody::new("a".repeat(MessageBody::MAX_CHARS + 1)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { .. }));
    }

    #[test]
    fn pause_range_is_enforced() {
        assert!(PauseSeconds::new(0).is_err());
        assert!(PauseSeconds::new(1).is_ok());
        assert!(PauseSeconds::new(120).is_ok());
        assert!(PauseSeconds::new(121).is_err());
        assert_eq!(PauseSeconds::default().value(), 10);
    }

    #[test]
    fn conference_room_defaults_and_trims() {
        assert_eq!(ConferenceRoom::default().as_str(), "MyConferenceRoom");
        assert_eq!(ConferenceRoom::new(" standup ").unwrap().as_str(), "standup");
        assert!(ConferenceRoom::new("").is_err());
    }

    #[test]
    fn spoken_text_and_room_lengths_are_enforced() {
        assert!(SpokenMessage::new("a".repeat(SpokenMessage::MAX_CHARS)).is_ok());
        assert!(matches!(
            SpokenMessage::new("a".repeat(SpokenMessage::MAX_CHARS + 1)),
            Err(ValidationError::TooLong { field: "Say", max: 3500, .. })
        ));
        assert!(matches!(
            ConferenceRoom::new("r".repeat(ConferenceRoom::MAX_CHARS + 1)),
            Err(ValidationError::TooLong { field: "Conference", max: 128, .. })
        ));
    }

    #[test]
    fn lookup_request_deduplicates_fields() {
        let pn = PhoneNumber::parse("+15706200103").unwrap();
        let request = LookupRequest::new(
            pn,
            [
                LookupField::CallerName,
                LookupField::LineTypeIntelligence,
                LookupField::CallerName,
            ],
        );
        assert_eq!(
            request.fields(),
            &[LookupField::CallerName, LookupField::LineTypeIntelligence]
        );
    }

    #[test]
    fn conference_script_orders_verbs() {
        let script = CallScript::conference(
            PauseSeconds::default(),
            SpokenMessage::new("hi").unwrap(),
            ConferenceRoom::default(),
        );
        assert!(matches!(
            script.verbs(),
            [
                Verb::Pause { .. },
                Verb::Say { .. },
                Verb::DialConference { .. }
            ]
        ));
    }

    #[test]
    fn line_type_serializes_only_present_attributes() {
        let json = serde_json::to_value(LineTypeIntelligence::of_type("mobile")).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "mobile" }));
    }
}
