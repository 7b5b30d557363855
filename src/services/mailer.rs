use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde_json::json;

use crate::{config::MailSettings, error::NotifyError, templates::Hbs};

#[derive(Debug, Clone, PartialEq)]
pub struct Mail {
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, mail: &Mail) -> Result<(), NotifyError>;
}

pub fn build_notifier(settings: &MailSettings) -> Result<Arc<dyn Notifier>, NotifyError> {
    match &settings.host {
        Some(host) => {
            tracing::info!("email notifications via smtp://{}:{}", host, settings.port);
            Ok(Arc::new(SmtpMailer::new(host, settings)?))
        }
        None => {
            tracing::info!("email notifications disabled (no EMAIL_HOST), logging instead");
            Ok(Arc::new(LogNotifier))
        }
    }
}

fn mailbox(addr: &str) -> Result<Mailbox, NotifyError> {
    addr.parse::<Mailbox>()
        .map_err(|e| NotifyError::Address(format!("{addr}: {e}")))
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, settings: &MailSettings) -> Result<Self, NotifyError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(settings.port);

        if !settings.user.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.user.clone(),
                settings.pass.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from: mailbox(&settings.from)?,
        })
    }
}

#[async_trait]
impl Notifier for SmtpMailer {
    async fn send(&self, to: &str, mail: &Mail) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(mailbox(to)?)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(())
    }
}

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, mail: &Mail) -> Result<(), NotifyError> {
        tracing::info!(to, subject = %mail.subject, "email (not sent):\n{}", mail.body);
        Ok(())
    }
}

pub fn threshold_alert_mail(
    hbs: &Hbs,
    chain: &str,
    target_price: f64,
    current_price: f64,
) -> Result<Mail, NotifyError> {
    let body = hbs.render(
        "mail/threshold_alert",
        &json!({
            "chain": chain,
            "target_price": target_price.to_string(),
            "current_price": current_price.to_string(),
        }),
    )?;

    Ok(Mail {
        subject: format!("Price Alert: {chain} reached ${target_price}"),
        body,
    })
}

pub fn spike_alert_mail(
    hbs: &Hbs,
    chain: &str,
    old_price: f64,
    new_price: f64,
    increase_pct: f64,
) -> Result<Mail, NotifyError> {
    let increase = format!("{increase_pct:.2}");
    let body = hbs.render(
        "mail/spike_alert",
        &json!({
            "chain": chain,
            "increase": increase,
            "old_price": format!("{old_price:.2}"),
            "new_price": format!("{new_price:.2}"),
        }),
    )?;

    Ok(Mail {
        subject: format!("Price Alert: {chain} Price Increased by {increase}%"),
        body,
    })
}
