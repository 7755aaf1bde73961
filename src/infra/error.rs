use thiserror::Error;

/// Failures from the service's environment during startup and serving:
/// deployment configuration, the Postgres backend, telemetry setup, and
/// listener I/O.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("invalid deployment configuration: {message}")]
    Configuration { message: String },
    #[error("database unavailable: {message}")]
    Database { message: String },
    #[error("telemetry setup failed: {message}")]
    Telemetry { message: String },
    #[error("listener i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

impl InfraError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry {
            message: message.into(),
        }
    }
}
