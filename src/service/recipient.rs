use serde_json::{Map, Value};

use crate::domain::{PhoneNumber, ValidationError};

/// Someone a message or call is addressed to.
///
/// Every scalar attribute of the incoming JSON object is kept, in document
/// order, as a substitution source for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    phone_number: PhoneNumber,
    fields: Vec<(String, String)>,
}

impl Recipient {
    pub const PHONE_NUMBER: &'static str = "phoneNumber";

    /// Build a recipient from a JSON object. `phoneNumber` is required.
    ///
    /// Strings are kept as-is, numbers and booleans are stringified, and
    /// nulls, arrays and objects are ignored.
    pub fn from_json(object: Map<String, Value>) -> Result<Self, ValidationError> {
        let phone_number = match object.get(Self::PHONE_NUMBER) {
            Some(Value::String(raw)) => PhoneNumber::parse(raw.as_str())?,
            Some(other) => {
                return Err(ValidationError::InvalidPhoneNumber {
                    input: other.to_string(),
                });
            }
            None => {
                return Err(ValidationError::Empty {
                    field: Self::PHONE_NUMBER,
                });
            }
        };

        let fields = object
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::String(text) => Some((name, text)),
                Value::Number(number) => Some((name, number.to_string())),
                Value::Bool(flag) => Some((name, flag.to_string())),
                Value::Null | Value::Array(_) | Value::Object(_) => None,
            })
            .collect();

        Ok(Self {
            phone_number,
            fields,
        })
    }

    pub fn phone_number(&self) -> &PhoneNumber {
        &self.phone_number
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}
