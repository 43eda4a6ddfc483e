//! Service layer: template rendering, batch dispatch, and the lookup and
//! communication facades built on a [`TelephonyProvider`].

mod communication;
pub mod dispatch;
mod lookup;
mod provider;
mod recipient;
pub mod template;
#[cfg(test)]
pub(crate) mod testing;

pub use communication::{BroadcastError, CommunicationService, OutboundSettings};
pub use dispatch::{BatchError, BatchPolicy, BatchReport, Dispatcher, ItemOutcome};
pub use lookup::{LookupResult, LookupService};
pub use provider::TelephonyProvider;
pub use recipient::Recipient;
pub use template::TemplateMode;

use crate::client::TwilioError;
use crate::domain::ValidationError;

/// Errors returned by the facades for a single number or recipient.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The provider call failed.
    #[error(transparent)]
    Provider(#[from] TwilioError),

    /// A rendered message or call text is not acceptable to the provider.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
