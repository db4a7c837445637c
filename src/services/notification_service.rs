//! Servicio de notificaciones por correo
//!
//! Despacho best-effort de correos de ciclo de vida de cuentas a través de
//! un gateway HTTP de correo. El envío nunca bloquea ni revierte la
//! operación que lo dispara: se lanza en background y los fallos solo se
//! registran en el log.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::EnvironmentConfig;
use crate::utils::errors::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, mail: OutgoingMail) -> Result<(), AppError>;
}

/// Transporte real: POST del correo al gateway configurado
pub struct HttpMailTransport {
    client: reqwest::Client,
    gateway_url: String,
}

impl HttpMailTransport {
    pub fn new(client: reqwest::Client, gateway_url: String) -> Self {
        Self { client, gateway_url }
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn deliver(&self, mail: OutgoingMail) -> Result<(), AppError> {
        let response = self
            .client
            .post(&self.gateway_url)
            .json(&mail)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Mail gateway unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Mail gateway returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Transporte nulo para entornos sin gateway configurado
struct NoopMailTransport;

#[async_trait]
impl MailTransport for NoopMailTransport {
    async fn deliver(&self, mail: OutgoingMail) -> Result<(), AppError> {
        info!("📧 (sin gateway) correo descartado: '{}' para {}", mail.subject, mail.to);
        Ok(())
    }
}

#[derive(Clone)]
pub struct NotificationService {
    transport: Arc<dyn MailTransport>,
    from: String,
}

impl NotificationService {
    pub fn new(client: reqwest::Client, config: &EnvironmentConfig) -> Self {
        let transport: Arc<dyn MailTransport> = match &config.mail_gateway_url {
            Some(url) => Arc::new(HttpMailTransport::new(client, url.clone())),
            None => Arc::new(NoopMailTransport),
        };

        Self {
            transport,
            from: config.mail_from.clone(),
        }
    }

    #[cfg(test)]
    fn with_transport(transport: Arc<dyn MailTransport>, from: &str) -> Self {
        Self {
            transport,
            from: from.to_string(),
        }
    }

    pub fn account_created(&self, to: &str, id_number: i64, password: &str, role: &str) {
        self.dispatch(account_created_mail(&self.from, to, id_number, password, role));
    }

    pub fn account_deleted(&self, to: &str, id_number: i64, role: &str) {
        self.dispatch(account_deleted_mail(&self.from, to, id_number, role));
    }

    pub fn password_changed(&self, to: &str, id_number: i64, password: &str) {
        self.dispatch(password_changed_mail(&self.from, to, id_number, password));
    }

    /// Fire-and-forget: el resultado del gateway no afecta a la operación
    /// que disparó el correo
    fn dispatch(&self, mail: OutgoingMail) {
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            let to = mail.to.clone();
            let subject = mail.subject.clone();
            if let Err(e) = transport.deliver(mail).await {
                warn!("📧 Fallo enviando '{}' a {}: {}", subject, to, e);
            }
        });
    }
}

fn format_role(role: &str) -> String {
    let lower = role.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => lower,
    }
}

fn account_created_mail(
    from: &str,
    to: &str,
    id_number: i64,
    password: &str,
    role: &str,
) -> OutgoingMail {
    let html_body = format!(
        r#"<h2>Welcome to Fleet Management System!</h2>
<p>Your {} account has been successfully created. Below are your login credentials:</p>
<ul>
    <li><strong>ID Number:</strong> {}</li>
    <li><strong>Password:</strong> {}</li>
</ul>
<p>Please log in to the system and change your password immediately for security.</p>
<p>If you did not request this account, please contact the system administrator.</p>
<p>Best regards,<br>Fleet Management System Team</p>"#,
        format_role(role),
        id_number,
        password
    );

    OutgoingMail {
        from: from.to_string(),
        to: to.to_string(),
        subject: "Your Fleet Management System Account Has Been Created".to_string(),
        html_body,
    }
}

fn account_deleted_mail(from: &str, to: &str, id_number: i64, role: &str) -> OutgoingMail {
    let html_body = format!(
        r#"<h2>Account Deletion Notification</h2>
<p>Dear {},</p>
<p>Your {} account in the Fleet Management System has been deleted by an administrator.</p>
<p>If you believe this was done in error, please contact the system administrator immediately.</p>
<p>Best regards,<br>Fleet Management System Team</p>"#,
        id_number,
        format_role(role)
    );

    OutgoingMail {
        from: from.to_string(),
        to: to.to_string(),
        subject: "Your Fleet Management System Account Has Been Deleted".to_string(),
        html_body,
    }
}

fn password_changed_mail(from: &str, to: &str, id_number: i64, password: &str) -> OutgoingMail {
    let html_body = format!(
        r#"<h2>Password Change Notification</h2>
<p>Your account with ID Number <strong>{}</strong> has had its password changed.</p>
<ul>
    <li><strong>ID Number:</strong> {}</li>
    <li><strong>Password:</strong> {}</li>
</ul>
<p>If you did not initiate this change, please contact the system administrator immediately.</p>
<p>Best regards,<br>Fleet Management System Team</p>"#,
        id_number, id_number, password
    );

    OutgoingMail {
        from: from.to_string(),
        to: to.to_string(),
        subject: "Your Fleet Management System Password Has Been Changed".to_string(),
        html_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingTransport {
        delivered: Mutex<Vec<OutgoingMail>>,
        fail: bool,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn deliver(&self, mail: OutgoingMail) -> Result<(), AppError> {
            if self.fail {
                return Err(AppError::Internal("gateway down".to_string()));
            }
            self.delivered.lock().unwrap().push(mail);
            Ok(())
        }
    }

    #[test]
    fn test_account_created_mail_contents() {
        let mail = account_created_mail(
            "no-reply@fleet.local",
            "james@example.com",
            34567890,
            "changeme123",
            "DRIVER",
        );

        assert_eq!(mail.to, "james@example.com");
        assert!(mail.subject.contains("Created"));
        assert!(mail.html_body.contains("Driver account"));
        assert!(mail.html_body.contains("34567890"));
        assert!(mail.html_body.contains("changeme123"));
    }

    #[test]
    fn test_role_formatting() {
        assert_eq!(format_role("MARSHALL"), "Marshall");
        assert_eq!(format_role("driver"), "Driver");
    }

    #[tokio::test]
    async fn test_dispatch_is_fire_and_forget() {
        let transport = Arc::new(RecordingTransport {
            delivered: Mutex::new(Vec::new()),
            fail: false,
        });
        let service =
            NotificationService::with_transport(transport.clone(), "no-reply@fleet.local");

        service.account_deleted("james@example.com", 34567890, "DRIVER");

        // el spawn corre en background; darle un tick al runtime
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let delivered = transport.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert!(delivered[0].subject.contains("Deleted"));
    }

    #[tokio::test]
    async fn test_gateway_failure_does_not_propagate() {
        let transport = Arc::new(RecordingTransport {
            delivered: Mutex::new(Vec::new()),
            fail: true,
        });
        let service = NotificationService::with_transport(transport, "no-reply@fleet.local");

        // no hay panic ni error visible para el caller
        service.password_changed("james@example.com", 34567890, "newpass1");
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}
