use thiserror::Error;

/// Boxed error returned by the injectable capabilities.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// JSON → XML conversion failures.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("parse failed: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("JSON is valid but it is not a record")]
    UnrecognizedSchema,
}

impl ConvertError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, ConvertError::Malformed(_))
    }

    pub fn is_unrecognized_schema(&self) -> bool {
        matches!(self, ConvertError::UnrecognizedSchema)
    }
}

/// Failures reaching a URL or reading its response.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("get failed: {0}")]
    Transport(#[source] BoxError),

    #[error("Invalid Content-Type header. Expected application/json, received {0:?}")]
    UnexpectedContentType(String),

    #[error("reading response body failed: {0}")]
    BodyRead(#[source] BoxError),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),

    #[error("closing output failed: {0}")]
    Close(#[source] std::io::Error),

    #[error("Error creating output directory {path:?}: {source}")]
    OutputDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("internal worker failure: {0}")]
    WorkerJoin(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Output,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl PipelineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PipelineError::Convert(_) => ErrorCategory::Input,
            PipelineError::Fetch(_) => ErrorCategory::Network,
            PipelineError::Write(_)
            | PipelineError::Close(_)
            | PipelineError::OutputDir { .. }
            | PipelineError::IoError(_) => ErrorCategory::Output,
            PipelineError::MissingConfigError { .. }
            | PipelineError::InvalidConfigValueError { .. }
            | PipelineError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            PipelineError::WorkerJoin(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PipelineError::Convert(_) | PipelineError::Fetch(_) => ErrorSeverity::Medium,
            PipelineError::Write(_) | PipelineError::Close(_) | PipelineError::IoError(_) => {
                ErrorSeverity::Medium
            }
            PipelineError::MissingConfigError { .. }
            | PipelineError::InvalidConfigValueError { .. }
            | PipelineError::ConfigValidationError { .. } => ErrorSeverity::High,
            PipelineError::OutputDir { .. } | PipelineError::WorkerJoin(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// Whether the error aborts a whole run rather than a single URL.
    pub fn is_fatal(&self) -> bool {
        self.severity() >= ErrorSeverity::High
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PipelineError::Convert(ConvertError::Malformed(_)) => {
                "Check that the URL returns well-formed JSON"
            }
            PipelineError::Convert(ConvertError::UnrecognizedSchema) => {
                "The document must contain at least one of Id, first_name, last_name, City, State"
            }
            PipelineError::Fetch(FetchError::UnexpectedContentType(_)) => {
                "The server must answer with Content-Type: application/json"
            }
            PipelineError::Fetch(_) => "Check the URL and network connectivity, or raise --timeout-secs",
            PipelineError::Write(_) | PipelineError::Close(_) | PipelineError::IoError(_) => {
                "Check free disk space and permissions of the output directory"
            }
            PipelineError::OutputDir { .. } => {
                "Make sure the output path is writable or choose another one with --output"
            }
            PipelineError::MissingConfigError { .. } => {
                "Pass the value on the command line or in the --config file"
            }
            PipelineError::InvalidConfigValueError { .. }
            | PipelineError::ConfigValidationError { .. } => "Fix the configuration value and retry",
            PipelineError::WorkerJoin(_) => "This is a bug; rerun with --verbose and report it",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PipelineError::MissingConfigError { field } => {
                format!("--{} flag cannot be empty.", field)
            }
            PipelineError::OutputDir { path, .. } => format!("Error Creating Dir: {:?}", path),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
