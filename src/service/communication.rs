use std::sync::Arc;

use super::ServiceError;
use super::dispatch::{BatchError, BatchReport, Dispatcher};
use super::provider::TelephonyProvider;
use super::recipient::Recipient;
use super::template::{TemplateMode, render as render_template};
use crate::domain::{
    CallResource, CallScript, ConferenceRoom, MessageBody, MessageResource, PauseSeconds,
    PhoneNumber, PlaceCall, SendMessage, SpokenMessage, ValidationError,
};

/// Why a broadcast did not complete.
#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    /// The rendered text for recipient `index` is unacceptable. Nothing was sent.
    #[error("recipient {index}: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// A fail-fast batch stopped at a provider failure.
    #[error(transparent)]
    Dispatch(#[from] BatchError<ServiceError>),
}

/// Fixed parameters of outbound messages and calls.
#[derive(Debug, Clone)]
pub struct OutboundSettings {
    /// Number every message and call is sent from.
    pub sender: PhoneNumber,
    pub pause: PauseSeconds,
    pub conference_room: ConferenceRoom,
    pub template_mode: TemplateMode,
    /// Whether `/sms` and `/call` render their message against the
    /// recipient's fields. Off by default: single sends go out verbatim.
    pub template_single: bool,
}

impl OutboundSettings {
    pub fn new(sender: PhoneNumber) -> Self {
        Self {
            sender,
            pause: PauseSeconds::default(),
            conference_room: ConferenceRoom::default(),
            template_mode: TemplateMode::default(),
            template_single: false,
        }
    }
}

/// Billable write operations: SMS, announcement calls, conference calls.
#[derive(Clone)]
pub struct CommunicationService {
    provider: Arc<dyn TelephonyProvider>,
    dispatcher: Dispatcher,
    settings: OutboundSettings,
}

impl CommunicationService {
    pub fn new(
        provider: Arc<dyn TelephonyProvider>,
        dispatcher: Dispatcher,
        settings: OutboundSettings,
    ) -> Self {
        Self {
            provider,
            dispatcher,
            settings,
        }
    }

    pub fn settings(&self) -> &OutboundSettings {
        &self.settings
    }

    pub async fn send_message(
        &self,
        to: PhoneNumber,
        body: MessageBody,
    ) -> Result<MessageResource, ServiceError> {
        tracing::debug!(to = %to, "sending message");
        let request = SendMessage::new(to, self.settings.sender.clone(), body);
        let resource = self.provider.send_message(request).await?;
        tracing::info!(sid = %resource.sid, status = %resource.status, "message accepted");
        Ok(resource)
    }

    /// Call `to`; once answered, wait the configured pause, then speak `spoken`.
    pub async fn place_announcement_call(
        &self,
        to: PhoneNumber,
        spoken: SpokenMessage,
    ) -> Result<CallResource, ServiceError> {
        let script = CallScript::announcement(self.settings.pause, spoken);
        self.place_call(to, script).await
    }

    /// Like [`CommunicationService::place_announcement_call`], then join `room`.
    pub async fn place_conference_call(
        &self,
        to: PhoneNumber,
        spoken: SpokenMessage,
        room: ConferenceRoom,
    ) -> Result<CallResource, ServiceError> {
        let script = CallScript::conference(self.settings.pause, spoken, room);
        self.place_call(to, script).await
    }

    /// Render `template` for `recipient` and text it to them.
    pub async fn send_personalized_message(
        &self,
        recipient: &Recipient,
        template: &str,
    ) -> Result<MessageResource, ServiceError> {
        let body = MessageBody::new(self.render(recipient, template))?;
        self.send_message(recipient.phone_number().clone(), body)
            .await
    }

    /// Render `template` for `recipient` and call them with it.
    pub async fn place_personalized_call(
        &self,
        recipient: &Recipient,
        template: &str,
    ) -> Result<CallResource, ServiceError> {
        let spoken = SpokenMessage::new(self.render(recipient, template))?;
        self.place_announcement_call(recipient.phone_number().clone(), spoken)
            .await
    }

    /// Text every recipient their rendered message.
    ///
    /// All messages are rendered and validated before the first send.
    pub async fn broadcast_sms(
        &self,
        recipients: Vec<Recipient>,
        template: &str,
    ) -> Result<BatchReport<MessageResource, ServiceError>, BroadcastError> {
        let messages = self.prepare(recipients, template, |text| MessageBody::new(text))?;
        tracing::info!(count = messages.len(), "broadcasting SMS");
        Ok(self
            .dispatcher
            .run(messages, |(to, body)| self.send_message(to, body))
            .await?)
    }

    pub async fn announce_calls(
        &self,
        recipients: Vec<Recipient>,
        template: &str,
    ) -> Result<BatchReport<CallResource, ServiceError>, BroadcastError> {
        let spoken = self.prepare(recipients, template, |text| SpokenMessage::new(text))?;
        tracing::info!(count = spoken.len(), "placing announcement calls");
        Ok(self
            .dispatcher
            .run(spoken, |(to, text)| self.place_announcement_call(to, text))
            .await?)
    }

    /// Call every recipient and bridge them into one room, the configured one by default.
    pub async fn conference_calls(
        &self,
        recipients: Vec<Recipient>,
        template: &str,
        room: Option<ConferenceRoom>,
    ) -> Result<BatchReport<CallResource, ServiceError>, BroadcastError> {
        let spoken = self.prepare(recipients, template, |text| SpokenMessage::new(text))?;
        let room = room.unwrap_or_else(|| self.settings.conference_room.clone());
        tracing::info!(count = spoken.len(), room = room.as_str(), "placing conference calls");
        let room = &room;
        Ok(self
            .dispatcher
            .run(spoken, |(to, text)| {
                self.place_conference_call(to, text, room.clone())
            })
            .await?)
    }

    /// Render and validate the text for every recipient, stopping at the first bad one.
    fn prepare<T, F>(
        &self,
        recipients: Vec<Recipient>,
        template: &str,
        validate: F,
    ) -> Result<Vec<(PhoneNumber, T)>, BroadcastError>
    where
        F: Fn(String) -> Result<T, ValidationError>,
    {
        recipients
            .iter()
            .enumerate()
            .map(|(index, recipient)| {
                let text = validate(self.render(recipient, template))
                    .map_err(|source| BroadcastError::Invalid { index, source })?;
                Ok((recipient.phone_number().clone(), text))
            })
            .collect()
    }

    fn render(&self, recipient: &Recipient, template: &str) -> String {
        render_template(self.settings.template_mode, template, recipient.fields())
    }

    async fn place_call(
        &self,
        to: PhoneNumber,
        script: CallScript,
    ) -> Result<CallResource, ServiceError> {
        tracing::debug!(to = %to, verbs = script.verbs().len(), "placing call");
        let request = PlaceCall::new(to, self.settings.sender.clone(), script);
        let resource = self.provider.create_call(request).await?;
        tracing::info!(sid = %resource.sid, status = %resource.status, "call queued");
        Ok(resource)
    }
}
