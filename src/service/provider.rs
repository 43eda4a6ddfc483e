use crate::client::{BoxFuture, TwilioClient, TwilioError};
use crate::domain::{
    CallResource, LookupRecord, LookupRequest, MessageResource, PlaceCall, SendMessage,
};

/// Operations the facades need from a telephony provider.
///
/// [`TwilioClient`] is the production implementation; tests substitute a fake
/// so nothing billable is placed.
pub trait TelephonyProvider: Send + Sync {
    fn lookup(&self, request: LookupRequest) -> BoxFuture<'_, Result<LookupRecord, TwilioError>>;

    fn send_message(
        &self,
        request: SendMessage,
    ) -> BoxFuture<'_, Result<MessageResource, TwilioError>>;

    fn create_call(&self, request: PlaceCall) -> BoxFuture<'_, Result<CallResource, TwilioError>>;
}

impl TelephonyProvider for TwilioClient {
    fn lookup(&self, request: LookupRequest) -> BoxFuture<'_, Result<LookupRecord, TwilioError>> {
        Box::pin(TwilioClient::lookup(self, request))
    }

    fn send_message(
        &self,
        request: SendMessage,
    ) -> BoxFuture<'_, Result<MessageResource, TwilioError>> {
        Box::pin(TwilioClient::send_message(self, request))
    }

    fn create_call(&self, request: PlaceCall) -> BoxFuture<'_, Result<CallResource, TwilioError>> {
        Box::pin(TwilioClient::create_call(self, request))
    }
}
