//! In-memory provider used by facade and route tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::provider::TelephonyProvider;
use crate::client::{BoxFuture, TwilioError};
use crate::domain::{
    ApiFault, CallResource, CallScript, CallerName, LineTypeIntelligence, LookupField,
    LookupRecord, LookupRequest, MessageResource, PlaceCall, SendMessage,
};

#[derive(Debug, Default)]
pub struct FakeProvider {
    directory: HashMap<String, (Option<String>, Option<String>)>,
    unreachable: HashSet<String>,
    lookups: Mutex<Vec<(String, Vec<LookupField>)>>,
    messages: Mutex<Vec<(String, String, String)>>,
    calls: Mutex<Vec<(String, CallScript)>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Numbers without an entry answer lookups with Twilio's 404 document.
    pub fn with_lookup(
        mut self,
        number: &str,
        caller_name: Option<&str>,
        line_type: Option<&str>,
    ) -> Self {
        self.directory.insert(
            number.to_owned(),
            (caller_name.map(str::to_owned), line_type.map(str::to_owned)),
        );
        self
    }

    /// Messages and calls to `number` are rejected with error 21211.
    pub fn rejecting(mut self, number: &str) -> Self {
        self.unreachable.insert(number.to_owned());
        self
    }

    pub fn lookup_fields(&self) -> Vec<Vec<LookupField>> {
        self.lookups
            .lock()
            .unwrap()
            .iter()
            .map(|(_, fields)| fields.clone())
            .collect()
    }

    /// `(to, from, body)` of every accepted or rejected send, in call order.
    pub fn sent_messages(&self) -> Vec<(String, String, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn placed_calls(&self) -> Vec<(String, CallScript)> {
        self.calls.lock().unwrap().clone()
    }

    fn rejection(number: &str) -> TwilioError {
        TwilioError::Api {
            status: 400,
            fault: ApiFault {
                code: Some(21211),
                message: format!("The 'To' number {number} is not a valid phone number."),
                more_info: Some("https://www.twilio.com/docs/errors/21211".to_owned()),
            },
        }
    }
}

impl TelephonyProvider for FakeProvider {
    fn lookup(&self, request: LookupRequest) -> BoxFuture<'_, Result<LookupRecord, TwilioError>> {
        Box::pin(async move {
            let number = request.number().e164().to_owned();
            self.lookups
                .lock()
                .unwrap()
                .push((number.clone(), request.fields().to_vec()));

            let Some((caller, line_type)) = self.directory.get(&number) else {
                return Err(TwilioError::Api {
                    status: 404,
                    fault: ApiFault {
                        code: Some(20404),
                        message: format!("The requested resource /PhoneNumbers/{number} was not found"),
                        more_info: None,
                    },
                });
            };

            let wants = |field| request.fields().contains(&field);
            Ok(LookupRecord {
                phone_number: Some(number.clone()),
                valid: Some(true),
                caller_name: wants(LookupField::CallerName).then(|| CallerName {
                    caller_name: caller.clone(),
                    ..Default::default()
                }),
                line_type_intelligence: wants(LookupField::LineTypeIntelligence)
                    .then(|| line_type.clone().map(LineTypeIntelligence::of_type))
                    .flatten(),
            })
        })
    }

    fn send_message(
        &self,
        request: SendMessage,
    ) -> BoxFuture<'_, Result<MessageResource, TwilioError>> {
        Box::pin(async move {
            let to = request.to().e164().to_owned();
            let from = request.from().e164().to_owned();
            let body = request.body().as_str().to_owned();
            let sid = {
                let mut messages = self.messages.lock().unwrap();
                messages.push((to.clone(), from.clone(), body.clone()));
                format!("SM{:032}", messages.len())
            };

            if self.unreachable.contains(&to) {
                return Err(Self::rejection(&to));
            }
            Ok(MessageResource {
                sid,
                status: "queued".to_owned(),
                to,
                from: Some(from),
                body: Some(body),
                num_segments: Some("1".to_owned()),
                ..Default::default()
            })
        })
    }

    fn create_call(&self, request: PlaceCall) -> BoxFuture<'_, Result<CallResource, TwilioError>> {
        Box::pin(async move {
            let to = request.to().e164().to_owned();
            let sid = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((to.clone(), request.script().clone()));
                format!("CA{:032}", calls.len())
            };

            if self.unreachable.contains(&to) {
                return Err(Self::rejection(&to));
            }
            Ok(CallResource {
                sid,
                status: "queued".to_owned(),
                to,
                from: Some(request.from().e164().to_owned()),
                direction: Some("outbound-api".to_owned()),
                date_created: None,
            })
        })
    }
}
