//! Notification sink port: pushing resolved values to the outside world.

use std::future::Future;
use std::time::Duration;

/// Failure to deliver a value to the sink.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// No credential is configured.
    #[error("no credential configured for the notification sink")]
    MissingCredential,

    /// The sink refused the credential.
    #[error("notification sink rejected the credential (HTTP {status})")]
    Unauthorized { status: u16 },

    /// The sink answered with a non-success status.
    #[error("notification sink answered HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The sink could not be reached.
    #[error("notification sink unreachable")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("notification sink did not answer within {0:?}")]
    TimedOut(Duration),
}

impl NotifyError {
    /// Whether retrying cannot help until the credential is fixed.
    #[must_use]
    pub fn is_credential_error(&self) -> bool {
        matches!(self, Self::MissingCredential | Self::Unauthorized { .. })
    }
}

/// Pushes string values to named entities of an external system.
pub trait NotificationSink {
    /// Check that the sink is reachable with the configured credential.
    fn verify(&self) -> impl Future<Output = Result<(), NotifyError>> + Send;

    /// Set `entity` to `value`.
    fn notify(
        &self,
        entity: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

impl<T: NotificationSink + Send + Sync> NotificationSink for std::sync::Arc<T> {
    fn verify(&self) -> impl Future<Output = Result<(), NotifyError>> + Send {
        (**self).verify()
    }

    fn notify(
        &self,
        entity: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send {
        (**self).notify(entity, value)
    }
}
