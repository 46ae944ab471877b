//! Transactional email collaborator and the notification template.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tozemoon_config::MailConfig;

use crate::submission::{ContactFields, escape_html};

/// One message handed to the mail provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub reply_to: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Build the site-owner notification for a validated submission.
///
/// The visitor's address goes into `reply_to`; sender and recipient come from configuration.
/// Every user-supplied value is escaped before it reaches the HTML part.
pub fn compose_notification(mail: &MailConfig, fields: &ContactFields) -> OutgoingEmail {
    let text = format!(
        "Nom: {}\nEmail: {}\n\n{}",
        fields.name, fields.email, fields.message
    );
    let html = format!(
        concat!(
            "<div style=\"font-family:system-ui,-apple-system,Segoe UI,Roboto,Helvetica,Arial,sans-serif\">",
            "<h2>Nouveau message du site</h2>",
            "<p><strong>Nom:</strong> {name}</p>",
            "<p><strong>Email:</strong> {email}</p>",
            "<hr />",
            "<pre style=\"white-space:pre-wrap;font-size:14px;line-height:1.5\">{message}</pre>",
            "</div>"
        ),
        name = escape_html(&fields.name),
        email = escape_html(&fields.email),
        message = escape_html(&fields.message),
    );
    OutgoingEmail {
        from: mail.from.clone(),
        to: mail.to.clone(),
        subject: format!("{} — {}", mail.subject_prefix, fields.name),
        reply_to: fields.email.clone(),
        text,
        html,
    }
}

/// Resend `POST /emails` client.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: Client,
    api_url: String,
    api_key: String,
}

impl ResendMailer {
    pub fn new(client: Client, mail: &MailConfig) -> Self {
        Self {
            client,
            api_url: mail.api_url.clone(),
            api_key: mail.api_key.clone(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_escapes_html_but_not_text() {
        let fields = ContactFields::new("Jane <3", "jane@example.com", "<script>x</script>");
        let email = compose_notification(&MailConfig::default(), &fields);
        assert!(email.html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(email.html.contains("Jane &lt;3"));
        assert!(!email.html.contains("<script>"));
        assert_eq!(
            email.text,
            "Nom: Jane <3\nEmail: jane@example.com\n\n<script>x</script>"
        );
        assert_eq!(email.reply_to, "jane@example.com");
        assert_eq!(email.subject, "Nouveau message — Jane <3");
    }

    #[test]
    fn serializes_with_provider_field_names() {
        let fields = ContactFields::new("Jane", "jane@example.com", "hi");
        let email = compose_notification(&MailConfig::default(), &fields);
        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(json["reply_to"], "jane@example.com");
        assert_eq!(json["to"], MailConfig::default().to);
    }
}
