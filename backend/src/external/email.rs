//! SMTP delivery for alert emails

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::SmtpConfig;
use crate::error::{AppError, AppResult};

/// Destination for alert notifications.
///
/// Calls are best-effort: callers log and discard any error, so a failing
/// sink can never fail or roll back the operation that raised the alert.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, subject: &str, body: &str) -> AppResult<()>;
}

/// SMTP-backed notification sink
#[derive(Clone)]
pub struct EmailSink {
    config: SmtpConfig,
}

impl EmailSink {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn build_transport(&self) -> AppResult<SmtpTransport> {
        let credentials = Credentials::new(
            self.config.username.clone(),
            self.config.password.clone(),
        );

        let transport = SmtpTransport::starttls_relay(&self.config.host)
            .map_err(|e| {
                AppError::ExternalService(format!("failed to create SMTP transport: {}", e))
            })?
            .port(self.config.port)
            .credentials(credentials)
            .build();

        Ok(transport)
    }
}

#[async_trait]
impl NotificationSink for EmailSink {
    async fn notify(&self, subject: &str, body: &str) -> AppResult<()> {
        if !self.config.is_configured() {
            tracing::debug!("email settings not configured, skipping email notification");
            return Ok(());
        }

        let from = self
            .config
            .email_from
            .parse()
            .map_err(|e| AppError::ExternalService(format!("invalid from address: {}", e)))?;
        let to = self
            .config
            .email_to
            .parse()
            .map_err(|e| AppError::ExternalService(format!("invalid to address: {}", e)))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::ExternalService(format!("failed to build email: {}", e)))?;

        let transport = self.build_transport()?;

        // SMTP delivery happens off the async runtime; the caller does not
        // wait for delivery confirmation.
        tokio::task::spawn_blocking(move || {
            if let Err(e) = transport.send(&message) {
                tracing::warn!("failed to send alert email: {}", e);
            }
        });

        Ok(())
    }
}
