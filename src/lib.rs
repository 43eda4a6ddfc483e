//! HTTP relay for Twilio number lookup, SMS, and voice calls.
//!
//! Layers, bottom-up: a domain layer of validated types, a transport layer
//! for Twilio's wire formats (JSON resources, form bodies, TwiML), a client
//! layer issuing authenticated requests, a service layer with templating and
//! ordered batch dispatch, and an axum router on top.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use phonerelay::{
//!     Credentials, Dispatcher, LookupService, PhoneNumber, TwilioClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::new("AC...", "SK...", "secret")?;
//!     let client = Arc::new(TwilioClient::new(credentials)?);
//!     let lookups = LookupService::new(client, Dispatcher::default());
//!     let result = lookups.lookup(PhoneNumber::parse("+15706200103")?).await?;
//!     println!("{:?}", result.caller_id);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod logging;
pub mod server;
pub mod service;
mod transport;

pub use client::{Credentials, TwilioClient, TwilioClientBuilder, TwilioError};
pub use config::{Config, ConfigError};
pub use domain::{
    CallResource, CallScript, ConferenceRoom, LineTypeIntelligence, MessageBody, MessageResource,
    PauseSeconds, PhoneNumber, SpokenMessage, ValidationError,
};
pub use server::{ApiError, AppState, router};
pub use service::{
    BatchPolicy, BatchReport, BroadcastError, CommunicationService, Dispatcher, LookupResult,
    LookupService, OutboundSettings, Recipient, ServiceError, TemplateMode,
};
