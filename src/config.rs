//! Process configuration read from the environment (and `.env`, when present).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::client::Credentials;
use crate::domain::{
    AccountSid, ApiKey, ApiSecret, ConferenceRoom, PauseSeconds, PhoneNumber, ValidationError,
};
use crate::logging::LogFormat;
use crate::service::{BatchPolicy, Dispatcher, OutboundSettings, TemplateMode};

const DEFAULT_PORT: u16 = 1337;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(var: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub listen: SocketAddr,
    /// Overrides the REST API base URL (e.g. a local mock).
    pub api_base_url: Option<String>,
    pub lookup_base_url: Option<String>,
    pub http_timeout: Option<Duration>,
    pub dispatcher: Dispatcher,
    pub outbound: OutboundSettings,
    pub log_format: LogFormat,
    /// The `.env` file that was loaded, if any. Logged once logging is up.
    pub dotenv_path: Option<PathBuf>,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let dotenv_path = match dotenvy::dotenv() {
            Ok(path) => Some(path),
            Err(err) if err.not_found() => None,
            Err(err) => return Err(ConfigError::invalid(".env", err)),
        };
        Ok(Self {
            dotenv_path,
            ..Self::from_lookup(|var| std::env::var(var).ok())?
        })
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let credentials = Credentials::new(
            vars.required("TWILIO_ACCOUNT_SID")?,
            vars.required("TWILIO_API_KEY")?,
            vars.required("TWILIO_API_KEY_SECRET")?,
        )
        .map_err(|err| ConfigError::invalid(credential_var(&err), err))?;

        let sender = PhoneNumber::parse(vars.required("TWILIO_PHONE_NUMBER")?)
            .map_err(|err| ConfigError::invalid("TWILIO_PHONE_NUMBER", err))?;

        let host = vars
            .parsed::<IpAddr>("HOST")?
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = vars.parsed::<u16>("PORT")?.unwrap_or(DEFAULT_PORT);

        let http_timeout = vars
            .parsed::<u64>("HTTP_TIMEOUT_SECS")?
            .map(Duration::from_secs);

        let concurrency = vars
            .parsed::<NonZeroUsize>("DISPATCH_CONCURRENCY")?
            .unwrap_or(NonZeroUsize::MIN);
        let policy = vars.parsed::<BatchPolicy>("BATCH_POLICY")?.unwrap_or_default();

        let pause = match vars.parsed::<u16>("CALL_PAUSE_SECONDS")? {
            Some(seconds) => PauseSeconds::new(seconds)
                .map_err(|err| ConfigError::invalid("CALL_PAUSE_SECONDS", err))?,
            None => PauseSeconds::default(),
        };
        let conference_room = match vars.get("CONFERENCE_ROOM") {
            Some(room) => ConferenceRoom::new(room)
                .map_err(|err| ConfigError::invalid("CONFERENCE_ROOM", err))?,
            None => ConferenceRoom::default(),
        };

        Ok(Self {
            credentials,
            listen: SocketAddr::new(host, port),
            api_base_url: vars.get("TWILIO_API_BASE_URL"),
            lookup_base_url: vars.get("TWILIO_LOOKUP_BASE_URL"),
            http_timeout,
            dispatcher: Dispatcher::new(concurrency, policy),
            outbound: OutboundSettings {
                sender,
                pause,
                conference_room,
                template_mode: vars.parsed::<TemplateMode>("TEMPLATE_MODE")?.unwrap_or_default(),
                template_single: vars
                    .parsed::<bool>("TEMPLATE_SINGLE_RECIPIENT")?
                    .unwrap_or(false),
            },
            log_format: vars.parsed::<LogFormat>("LOG_FORMAT")?.unwrap_or_default(),
            dotenv_path: None,
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Blank values count as unset.
    fn get(&self, var: &str) -> Option<String> {
        (self.0)(var).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, var: &'static str) -> Result<String, ConfigError> {
        self.get(var).ok_or(ConfigError::Missing(var))
    }

    fn parsed<T>(&self, var: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: ToString,
    {
        self.get(var)
            .map(|value| {
                value
                    .trim()
                    .parse::<T>()
                    .map_err(|err| ConfigError::invalid(var, err))
            })
            .transpose()
    }
}

fn credential_var(err: &ValidationError) -> &'static str {
    let field = match err {
        ValidationError::Empty { field } | ValidationError::InvalidSid { field, .. } => *field,
        _ => AccountSid::FIELD,
    };
    match field {
        ApiKey::FIELD => "TWILIO_API_KEY",
        ApiSecret::FIELD => "TWILIO_API_KEY_SECRET",
        _ => "TWILIO_ACCOUNT_SID",
    }
}
