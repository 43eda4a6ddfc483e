use crate::domain::value::{ConferenceRoom, MessageBody, PauseSeconds, PhoneNumber, SpokenMessage};

/// Data package requested from the Lookup v2 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupField {
    CallerName,
    LineTypeIntelligence,
}

impl LookupField {
    /// Query parameter carrying the comma-separated field list (`Fields`).
    pub const PARAM: &'static str = "Fields";

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CallerName => "caller_name",
            Self::LineTypeIntelligence => "line_type_intelligence",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LookupRequest {
    number: PhoneNumber,
    fields: Vec<LookupField>,
}

impl LookupRequest {
    /// Look up `number`, asking for each field in `fields` once.
    pub fn new(number: PhoneNumber, fields: impl IntoIterator<Item = LookupField>) -> Self {
        let mut unique = Vec::new();
        for field in fields {
            if !unique.contains(&field) {
                unique.push(field);
            }
        }
        Self {
            number,
            fields: unique,
        }
    }

    pub fn number(&self) -> &PhoneNumber {
        &self.number
    }

    pub fn fields(&self) -> &[LookupField] {
        &self.fields
    }
}

#[derive(Debug, Clone)]
pub struct SendMessage {
    to: PhoneNumber,
    from: PhoneNumber,
    body: MessageBody,
}

impl SendMessage {
    pub fn new(to: PhoneNumber, from: PhoneNumber, body: MessageBody) -> Self {
        Self { to, from, body }
    }

    pub fn to(&self) -> &PhoneNumber {
        &self.to
    }

    pub fn from(&self) -> &PhoneNumber {
        &self.from
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }
}

/// One instruction of a call-control document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Pause { length: PauseSeconds },
    Say { text: SpokenMessage },
    DialConference { room: ConferenceRoom },
}

/// Ordered list of verbs executed once the callee answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallScript {
    verbs: Vec<Verb>,
}

impl CallScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause, then speak `text`.
    pub fn announcement(pause: PauseSeconds, text: SpokenMessage) -> Self {
        Self::new().pause(pause).say(text)
    }

    /// Pause, speak `text`, then bridge the callee into `room`.
    pub fn conference(pause: PauseSeconds, text: SpokenMessage, room: ConferenceRoom) -> Self {
        Self::announcement(pause, text).dial_conference(room)
    }

    pub fn pause(mut self, length: PauseSeconds) -> Self {
        self.verbs.push(Verb::Pause { length });
        self
    }

    pub fn say(mut self, text: SpokenMessage) -> Self {
        self.verbs.push(Verb::Say { text });
        self
    }

    pub fn dial_conference(mut self, room: ConferenceRoom) -> Self {
        self.verbs.push(Verb::DialConference { room });
        self
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }
}

#[derive(Debug, Clone)]
pub struct PlaceCall {
    to: PhoneNumber,
    from: PhoneNumber,
    script: CallScript,
}

impl PlaceCall {
    pub fn new(to: PhoneNumber, from: PhoneNumber, script: CallScript) -> Self {
        Self { to, from, script }
    }

    pub fn to(&self) -> &PhoneNumber {
        &self.to
    }

    pub fn from(&self) -> &PhoneNumber {
        &self.from
    }

    pub fn script(&self) -> &CallScript {
        &self.script
    }
}
