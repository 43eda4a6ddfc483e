//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::domain::{
    AccountSid, ApiFault, ApiKey, ApiSecret, CallResource, LookupRecord, LookupRequest,
    MessageResource, PlaceCall, SendMessage, ValidationError,
};
use crate::transport::CallTransportError;

const DEFAULT_API_BASE_URL: &str = "https://api.twilio.com";
const DEFAULT_LOOKUP_BASE_URL: &str = "https://lookups.twilio.com";
const API_VERSION: &str = "2010-04-01";

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn get<'a>(
        &'a self,
        url: Url,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;

    fn post_form<'a>(
        &'a self,
        url: Url,
        credentials: &'a Credentials,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    async fn read(
        request: reqwest::RequestBuilder,
    ) -> Result<HttpResponse, Box<dyn StdError + Send + Sync>> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get<'a>(
        &'a self,
        url: Url,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let request = self.client.get(url).basic_auth(
                credentials.api_key.as_str(),
                Some(credentials.api_secret.as_str()),
            );
            Self::read(request).await
        })
    }

    fn post_form<'a>(
        &'a self,
        url: Url,
        credentials: &'a Credentials,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let request = self
                .client
                .post(url)
                .basic_auth(
                    credentials.api_key.as_str(),
                    Some(credentials.api_secret.as_str()),
                )
                .form(&params);
            Self::read(request).await
        })
    }
}

#[derive(Debug, Clone)]
/// Credentials for Twilio REST calls.
///
/// Requests authenticate with an API key/secret pair (HTTP basic auth) and are
/// scoped to the account identified by `account_sid`.
pub struct Credentials {
    account_sid: AccountSid,
    api_key: ApiKey,
    api_secret: ApiSecret,
}

impl Credentials {
    /// Validate and bundle the three credential parts.
    pub fn new(
        account_sid: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            account_sid: AccountSid::new(account_sid)?,
            api_key: ApiKey::new(api_key)?,
            api_secret: ApiSecret::new(api_secret)?,
        })
    }

    pub fn account_sid(&self) -> &AccountSid {
        &self.account_sid
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`TwilioClient`].
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - API-level failures (Twilio error documents),
/// - validation/parse failures.
pub enum TwilioError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code without a Twilio error document.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Twilio rejected the request with an error document.
    #[error("API error {status}: {}", .fault.message)]
    Api { status: u16, fault: ApiFault },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// A configured base URL is unusable.
    #[error("invalid endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`TwilioClient`].
///
/// Use this when you need to customize the base URLs, timeout, or user-agent.
pub struct TwilioClientBuilder {
    credentials: Credentials,
    api_base_url: String,
    lookup_base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TwilioClientBuilder {
    /// Create a builder with the default base URLs and no timeout/user-agent override.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            lookup_base_url: DEFAULT_LOOKUP_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the REST API base URL (messages and calls).
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the Lookup API base URL.
    pub fn lookup_base_url(mut self, url: impl Into<String>) -> Self {
        self.lookup_base_url = url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`TwilioClient`].
    pub fn build(self) -> Result<TwilioClient, TwilioError> {
        let api_base = parse_base_url(&self.api_base_url)?;
        let lookup_base = parse_base_url(&self.lookup_base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| TwilioError::Transport(Box::new(err)))?;

        Ok(TwilioClient {
            credentials: self.credentials,
            api_base,
            lookup_base,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, TwilioError> {
    let url = Url::parse(raw).map_err(|err| TwilioError::InvalidEndpoint {
        url: raw.to_owned(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(TwilioError::InvalidEndpoint {
            url: raw.to_owned(),
            reason: "URL cannot be a base".to_owned(),
        });
    }
    Ok(url)
}

#[derive(Clone)]
/// High-level Twilio client covering Lookup v2, Messages and Calls.
///
/// By default it uses:
/// - `https://lookups.twilio.com` for number lookups
/// - `https://api.twilio.com` for messages and calls
pub struct TwilioClient {
    credentials: Credentials,
    api_base: Url,
    lookup_base: Url,
    http: Arc<dyn HttpTransport>,
}

impl TwilioClient {
    /// Create a client using the default base URLs.
    ///
    /// For more customization, use [`TwilioClient::builder`].
    pub fn new(credentials: Credentials) -> Result<Self, TwilioError> {
        TwilioClientBuilder::new(credentials).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> TwilioClientBuilder {
        TwilioClientBuilder::new(credentials)
    }

    /// Query Lookup v2 for the requested data packages.
    ///
    /// Errors:
    /// - [`TwilioError::Api`] when Twilio rejects the number (e.g. 404 for unknown numbers),
    /// - [`TwilioError::HttpStatus`] for other non-2xx responses,
    /// - [`TwilioError::Parse`] when the body is not a lookup resource.
    pub async fn lookup(&self, request: LookupRequest) -> Result<LookupRecord, TwilioError> {
        let url = crate::transport::encode_lookup_url(&self.lookup_base, &request)
            .map_err(|err| TwilioError::Parse(Box::new(err)))?;

        let response = self
            .http
            .get(url, &self.credentials)
            .await
            .map_err(TwilioError::Transport)?;
        let body = success_body(response)?;

        crate::transport::decode_lookup_json_response(&body)
            .map_err(|err| TwilioError::Parse(Box::new(err)))
    }

    /// Send an SMS through the Messages resource.
    pub async fn send_message(&self, request: SendMessage) -> Result<MessageResource, TwilioError> {
        let url = self.account_resource_url("Messages.json")?;
        let params = crate::transport::encode_send_message_form(&request);

        let response = self
            .http
            .post_form(url, &self.credentials, params)
            .await
            .map_err(TwilioError::Transport)?;
        let body = success_body(response)?;

        crate::transport::decode_message_json_response(&body)
            .map_err(|err| TwilioError::Parse(Box::new(err)))
    }

    /// Originate an outbound call executing the request's call script.
    pub async fn create_call(&self, request: PlaceCall) -> Result<CallResource, TwilioError> {
        let url = self.account_resource_url("Calls.json")?;
        let params = crate::transport::encode_place_call_form(&request).map_err(|err| match err {
            CallTransportError::Invalid(err) => TwilioError::Validation(err),
            other => TwilioError::Parse(Box::new(other)),
        })?;

        let response = self
            .http
            .post_form(url, &self.credentials, params)
            .await
            .map_err(TwilioError::Transport)?;
        let body = success_body(response)?;

        crate::transport::decode_call_json_response(&body)
            .map_err(|err| TwilioError::Parse(Box::new(err)))
    }

    fn account_resource_url(&self, resource: &str) -> Result<Url, TwilioError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| TwilioError::InvalidEndpoint {
                url: self.api_base.to_string(),
                reason: "URL cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend([
                API_VERSION,
                "Accounts",
                self.credentials.account_sid.as_str(),
                resource,
            ]);
        Ok(url)
    }
}

fn success_body(response: HttpResponse) -> Result<String, TwilioError> {
    if (200..=299).contains(&response.status) {
        return Ok(response.body);
    }

    if let Some(fault) = crate::transport::decode_api_fault(&response.body) {
        return Err(TwilioError::Api {
            status: response.status,
            fault,
        });
    }

    let body = if response.body.trim().is_empty() {
        None
    } else {
        Some(response.body)
    };
    Err(TwilioError::HttpStatus {
        status: response.status,
        body,
    })
}
