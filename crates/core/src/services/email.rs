//! Email delivery.
//!
//! Transport only: message composition happens at the notification
//! dispatcher, this service just moves a finished message to the
//! configured provider.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};
use serde::{Deserialize, Serialize};

use reclaim_common::{AppError, AppResult, EmailSettings};

/// Email provider configuration.
#[derive(Debug, Clone)]
pub enum EmailProvider {
    /// SMTP with STARTTLS
    Smtp(SmtpConfig),
    /// SendGrid
    SendGrid(SendGridConfig),
    /// Mailgun
    Mailgun(MailgunConfig),
}

/// SMTP configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP host
    pub host: String,
    /// SMTP port
    pub port: u16,
    /// Username
    pub username: Option<String>,
    /// Password
    pub password: Option<String>,
}

/// SendGrid configuration.
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    /// SendGrid API key
    pub api_key: String,
}

/// Mailgun configuration.
#[derive(Debug, Clone)]
pub struct MailgunConfig {
    /// Mailgun API key
    pub api_key: String,
    /// Mailgun domain
    pub domain: String,
}

/// Email configuration.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Email provider
    pub provider: EmailProvider,
    /// From address
    pub from_address: String,
    /// From name
    pub from_name: String,
    /// Base URL used in the footer of HTML emails
    pub public_url: String,
}

impl EmailConfig {
    /// Build a provider configuration from the settings file.
    ///
    /// Returns `None` when email is disabled or when the selected provider
    /// is missing required settings; a partially configured provider is
    /// treated as disabled rather than failing startup.
    #[must_use]
    pub fn from_settings(settings: &EmailSettings, public_url: &str) -> Option<Self> {
        if !settings.enabled {
            return None;
        }

        let provider = match settings.provider.as_str() {
            "smtp" => {
                let Some(host) = settings.smtp_host.clone() else {
                    tracing::warn!("Email enabled with smtp provider but no smtp_host set");
                    return None;
                };
                EmailProvider::Smtp(SmtpConfig {
                    host,
                    port: settings.smtp_port,
                    username: settings.smtp_username.clone(),
                    password: settings.smtp_password.clone(),
                })
            }
            "sendgrid" => {
                let Some(api_key) = settings.sendgrid_api_key.clone() else {
                    tracing::warn!("Email enabled with sendgrid provider but no API key set");
                    return None;
                };
                EmailProvider::SendGrid(SendGridConfig { api_key })
            }
            "mailgun" => {
                let (Some(api_key), Some(domain)) = (
                    settings.mailgun_api_key.clone(),
                    settings.mailgun_domain.clone(),
                ) else {
                    tracing::warn!("Email enabled with mailgun provider but key or domain missing");
                    return None;
                };
                EmailProvider::Mailgun(MailgunConfig { api_key, domain })
            }
            other => {
                tracing::warn!(provider = %other, "Unknown email provider, disabling email");
                return None;
            }
        };

        Some(Self {
            provider,
            from_address: settings.from_address.clone(),
            from_name: settings.from_name.clone(),
            public_url: public_url.to_string(),
        })
    }
}

/// Email message to be sent.
#[derive(Debug)]
pub struct EmailMessage {
    /// Recipient email address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain text body
    pub text_body: String,
    /// HTML body (optional)
    pub html_body: Option<String>,
}

/// Email delivery result.
#[derive(Debug, Serialize)]
pub struct EmailDeliveryResult {
    /// Whether the email was accepted by the provider
    pub success: bool,
    /// Message ID from provider (if available)
    pub message_id: Option<String>,
    /// Error message (if failed)
    pub error: Option<String>,
}

/// Email service.
#[derive(Clone)]
pub struct EmailService {
    config: Option<EmailConfig>,
    http_client: reqwest::Client,
}

impl EmailService {
    /// Create a new email service.
    #[must_use]
    pub fn new(config: Option<EmailConfig>) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Check if email delivery is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Send an email.
    pub async fn send(&self, message: EmailMessage) -> AppResult<EmailDeliveryResult> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("Email service not configured".to_string()))?;

        match &config.provider {
            EmailProvider::Smtp(smtp) => self.send_smtp(smtp, config, message).await,
            EmailProvider::SendGrid(sg) => self.send_sendgrid(sg, config, message).await,
            EmailProvider::Mailgun(mg) => self.send_mailgun(mg, config, message).await,
        }
    }

    /// Send a plain-text notification, deriving the HTML part.
    pub async fn send_plain(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> AppResult<EmailDeliveryResult> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("Email service not configured".to_string()))?;

        let html = wrap_html(&paragraphs_html(body), config);
        let message = EmailMessage {
            to: to.to_string(),
            subject: subject.to_string(),
            text_body: body.to_string(),
            html_body: Some(html),
        };

        self.send(message).await
    }

    // Provider-specific implementations

    async fn send_smtp(
        &self,
        smtp: &SmtpConfig,
        config: &EmailConfig,
        message: EmailMessage,
    ) -> AppResult<EmailDeliveryResult> {
        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid from address: {e}")))?;
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| AppError::BadRequest(format!("Invalid recipient address: {e}")))?;

        let builder = lettre::Message::builder()
            .from(from)
            .to(to)
            .subject(&message.subject);

        let email = match message.html_body {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                message.text_body,
                html,
            )),
            None => builder.body(message.text_body),
        }
        .map_err(|e| AppError::Internal(format!("Failed to build email: {e}")))?;

        let mut transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .map_err(|e| AppError::ExternalService(format!("SMTP setup failed: {e}")))?
            .port(smtp.port);

        if let (Some(username), Some(password)) = (&smtp.username, &smtp.password) {
            transport = transport.credentials(Credentials::new(username.clone(), password.clone()));
        }

        transport
            .build()
            .send(email)
            .await
            .map_err(|e| AppError::ExternalService(format!("SMTP send failed: {e}")))?;

        Ok(EmailDeliveryResult {
            success: true,
            message_id: None,
            error: None,
        })
    }

    async fn send_sendgrid(
        &self,
        sg: &SendGridConfig,
        config: &EmailConfig,
        message: EmailMessage,
    ) -> AppResult<EmailDeliveryResult> {
        let body = serde_json::json!({
            "personalizations": [{
                "to": [{"email": message.to}]
            }],
            "from": {
                "email": config.from_address,
                "name": config.from_name
            },
            "subject": message.subject,
            "content": [
                {"type": "text/plain", "value": message.text_body},
                {"type": "text/html", "value": message.html_body.unwrap_or_default()}
            ]
        });

        let response = self
            .http_client
            .post("https://api.sendgrid.com/v3/mail/send")
            .header("Authorization", format!("Bearer {}", sg.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("SendGrid request failed: {e}")))?;

        if response.status().is_success() {
            let message_id = response
                .headers()
                .get("X-Message-Id")
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            Ok(EmailDeliveryResult {
                success: true,
                message_id,
                error: None,
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Ok(EmailDeliveryResult {
                success: false,
                message_id: None,
                error: Some(error_text),
            })
        }
    }

    async fn send_mailgun(
        &self,
        mg: &MailgunConfig,
        config: &EmailConfig,
        message: EmailMessage,
    ) -> AppResult<EmailDeliveryResult> {
        let mut form_params = vec![
            (
                "from",
                format!("{} <{}>", config.from_name, config.from_address),
            ),
            ("to", message.to),
            ("subject", message.subject),
            ("text", message.text_body),
        ];

        if let Some(html) = message.html_body {
            form_params.push(("html", html));
        }

        let response = self
            .http_client
            .post(format!("https://api.mailgun.net/v3/{}/messages", mg.domain))
            .basic_auth("api", Some(&mg.api_key))
            .form(&form_params)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Mailgun request failed: {e}")))?;

        if response.status().is_success() {
            #[derive(Deserialize)]
            struct MailgunResponse {
                id: Option<String>,
            }
            let result: MailgunResponse = response
                .json()
                .await
                .unwrap_or(MailgunResponse { id: None });
            Ok(EmailDeliveryResult {
                success: true,
                message_id: result.id,
                error: None,
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Ok(EmailDeliveryResult {
                success: false,
                message_id: None,
                error: Some(error_text),
            })
        }
    }
}

/// Escape text for embedding in HTML.
///
/// Message bodies carry user-supplied item titles.
#[must_use]
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render a plain-text body as HTML paragraphs.
fn paragraphs_html(body: &str) -> String {
    body.split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .map(|p| format!("<p>{}</p>", escape_html(p.trim()).replace('\n', "<br>")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap HTML content in a basic email template.
fn wrap_html(content: &str, config: &EmailConfig) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }}
        a {{ color: #007bff; }}
    </style>
</head>
<body>
    {}
    <hr style="margin-top: 40px; border: none; border-top: 1px solid #e9ecef;">
    <p style="font-size: 12px; color: #6c757d;">
        This email was sent from <a href="{}">{}</a>.<br>
        This is an automated notification, please do not reply.
    </p>
</body>
</html>"#,
        content, config.public_url, config.from_name
    )
}
