use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Twilio account identifier (`AC...`).
///
/// Invariant: non-empty after trimming and starts with `AC`.
pub struct AccountSid(String);

impl AccountSid {
    /// Field name used in configuration and error messages.
    pub const FIELD: &'static str = "AccountSid";
    const PREFIX: &'static str = "AC";

    /// Create a validated [`AccountSid`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if !trimmed.starts_with(Self::PREFIX) {
            return Err(ValidationError::InvalidSid {
                field: Self::FIELD,
                prefix: Self::PREFIX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Twilio API key (`SK...`), used as the basic-auth username.
///
/// Invariant: non-empty after trimming.
pub struct ApiKey(String);

impl ApiKey {
    pub const FIELD: &'static str = "ApiKey";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq)]
/// Twilio API key secret, used as the basic-auth password.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
pub struct ApiSecret(String);

impl ApiSecret {
    pub const FIELD: &'static str = "ApiSecret";

    /// Create a validated [`ApiSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiSecret(***)")
    }
}

#[derive(Debug, Clone)]
/// Phone number parsed and normalized to E.164 with the `phonenumber` crate.
///
/// Input must carry an explicit country prefix (`+1...`); there is no default
/// region.
pub struct PhoneNumber {
    raw: String,
    e164: String,
}

impl PhoneNumber {
    /// Field name used by Twilio for recipients (`To`).
    pub const FIELD: &'static str = "To";

    /// Parse and normalize a phone number into E.164.
    pub fn parse(input: impl Into<String>) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty {
                field: "phoneNumber",
            });
        }

        let parsed = phonenumber::parse(None, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164 })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.e164)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// SMS body.
///
/// Invariant: not blank and at most [`MessageBody::MAX_CHARS`] characters.
pub struct MessageBody(String);

impl MessageBody {
    /// Form field name used by Twilio (`Body`).
    pub const FIELD: &'static str = "Body";
    /// Twilio rejects bodies longer than this.
    pub const MAX_CHARS: usize = 1600;

    /// Create a validated message body.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let chars = value.chars().count();
        if chars > Self::MAX_CHARS {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(value))
    }

    /// Borrow the body as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Text spoken to the callee via text-to-speech.
///
/// Invariant: not blank and at most [`SpokenMessage::MAX_CHARS`] characters.
pub struct SpokenMessage(String);

impl SpokenMessage {
    pub const FIELD: &'static str = "Say";
    /// Leaves room for the surrounding markup inside Twilio's 4000-character
    /// `Twiml` parameter.
    pub const MAX_CHARS: usize = 3500;

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let chars = value.chars().count();
        if chars > Self::MAX_CHARS {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Conference room name callees are bridged into.
///
/// Invariant: non-empty after trimming, at most [`ConferenceRoom::MAX_CHARS`].
pub struct ConferenceRoom(String);

impl ConferenceRoom {
    pub const FIELD: &'static str = "Conference";
    /// Room used when neither the request nor the configuration names one.
    pub const DEFAULT: &'static str = "MyConferenceRoom";
    pub const MAX_CHARS: usize = 128;

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let chars = trimmed.chars().count();
        if chars > Self::MAX_CHARS {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConferenceRoom {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Silence before the spoken message starts, giving the callee time to pick up.
///
/// Invariant: `1..=120` seconds.
pub struct PauseSeconds(u16);

impl PauseSeconds {
    pub const MIN: u16 = 1;
    pub const MAX: u16 = 120;
    pub const DEFAULT: u16 = 10;

    pub fn new(value: u16) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::PauseOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl Default for PauseSeconds {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}
