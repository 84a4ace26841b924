use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors returned by a control-plane client implementation.
///
/// `ResourceNotFound` is the one variant the action layer inspects; every
/// other variant is forwarded to callers unchanged.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("requested resource not found")]
    ResourceNotFound,

    #[error("control plane returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

/// Errors produced by the log-tailing transport.
///
/// These flow on the dedicated log-error channel of a start run and never
/// terminate polling on their own.
#[derive(Error, Debug)]
pub enum LogStreamError {
    #[error("log stream connection failed: {0}")]
    Connection(String),

    #[error("WebSocket error: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),

    #[error("malformed log envelope: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<tokio_tungstenite::tungstenite::Error> for LogStreamError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        LogStreamError::WebSocket(Box::new(err))
    }
}

/// Terminal errors of the action layer: queries, the health-check update,
/// and the start orchestration. At most one of these is ever delivered on
/// a start run's errors channel.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("application not found: {lookup}")]
    ApplicationNotFound { lookup: String },

    #[error("health check endpoints are only valid for http health checks")]
    HttpHealthCheckInvalid,

    #[error("application staging failed: {reason}")]
    StagingFailed { reason: String },

    #[error("timed out waiting for application '{name}' to stage")]
    StagingTimeout { name: String },

    #[error("timed out waiting for application '{name}' to start")]
    StartupTimeout { name: String },

    #[error("an instance of application '{name}' crashed")]
    InstanceCrashed { name: String },

    #[error("an instance of application '{name}' is flapping")]
    InstanceFlapping { name: String },

    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    LogStream(#[from] LogStreamError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
