//! Email delivery for order confirmations and operator notifications.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates. Every
//! message is sent multipart with a plain-text alternative.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use thiserror::Error;

use fresca_core::Order;
use fresca_core::types::money::format_usd;

use crate::config::EmailConfig;

/// Template-facing view of an order, with amounts preformatted and
/// optional contact fields already defaulted.
struct OrderView {
    order_id: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    customer_address: String,
    instructions: Option<String>,
    items: Vec<ItemView>,
    subtotal: String,
    discount: Option<String>,
    tax: String,
    total: String,
    payment_method: String,
    placed_at: String,
}

struct ItemView {
    quantity: u32,
    name: String,
    description: Option<String>,
    line_total: String,
}

impl OrderView {
    fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.order_id.clone(),
            customer_name: order.customer.name.clone(),
            customer_email: order
                .customer
                .email()
                .unwrap_or("N/A")
                .to_string(),
            customer_phone: order
                .customer
                .phone
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            customer_address: order
                .customer
                .address
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            instructions: order.customer.instructions.clone(),
            items: order
                .items
                .iter()
                .map(|item| ItemView {
                    quantity: item.quantity,
                    name: item.name.clone(),
                    description: item.description.clone(),
                    line_total: format_usd(item.line_total()),
                })
                .collect(),
            subtotal: format_usd(order.pricing.subtotal),
            discount: (order.pricing.discount > Decimal::ZERO)
                .then(|| format_usd(order.pricing.discount)),
            tax: format_usd(order.pricing.tax),
            total: format_usd(order.pricing.total),
            payment_method: order.payment_method.to_string(),
            placed_at: order.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

/// HTML template for the customer order confirmation.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    order: &'a OrderView,
}

/// Plain text template for the customer order confirmation.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    order: &'a OrderView,
}

/// HTML template for the operator order notification.
#[derive(Template)]
#[template(path = "email/order_notification.html")]
struct OrderNotificationHtml<'a> {
    order: &'a OrderView,
}

/// Plain text template for the operator order notification.
#[derive(Template)]
#[template(path = "email/order_notification.txt")]
struct OrderNotificationText<'a> {
    order: &'a OrderView,
}

/// HTML template for relayed contact-form submissions.
#[derive(Template)]
#[template(path = "email/contact_form.html")]
struct ContactFormHtml<'a> {
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    subject: &'a str,
    message: &'a str,
    received_at: &'a str,
}

/// Plain text template for relayed contact-form submissions.
#[derive(Template)]
#[template(path = "email/contact_form.txt")]
struct ContactFormText<'a> {
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    subject: &'a str,
    message: &'a str,
    received_at: &'a str,
}

/// A contact-form submission relayed to the operator inbox.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    /// Sender's name.
    pub name: String,
    /// Sender's email.
    pub email: String,
    /// Sender's phone, if given.
    pub phone: Option<String>,
    /// Subject line chosen by the sender.
    pub subject: String,
    /// Free-form message body.
    pub message: String,
}

/// Errors raised while rendering or relaying mail.
#[derive(Debug, Error)]
pub enum EmailError {
    /// The SMTP relay rejected the connection or the message.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Message assembly failed before anything was sent.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// An address did not parse as a mailbox.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// A body template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Sends transactional email over the configured SMTP relay.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    notification_address: String,
}

impl EmailService {
    /// Build the SMTP transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the relay host is not a valid SMTP endpoint.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.expose_secret().to_owned(),
            ))
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            notification_address: config.notification_address.clone(),
        })
    }

    /// Send the order confirmation to the customer.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or a template fails to render.
    pub async fn send_order_confirmation(
        &self,
        order: &Order,
        to: &str,
    ) -> Result<(), EmailError> {
        let view = OrderView::from_order(order);
        let html = OrderConfirmationHtml { order: &view }.render()?;
        let text = OrderConfirmationText { order: &view }.render()?;

        self.send_multipart_email(to, "Order Confirmation - Fresca Kitchen", &text, &html)
            .await
    }

    /// Send the new-order notification to the operator inbox.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or a template fails to render.
    pub async fn send_order_notification(&self, order: &Order) -> Result<(), EmailError> {
        let view = OrderView::from_order(order);
        let html = OrderNotificationHtml { order: &view }.render()?;
        let text = OrderNotificationText { order: &view }.render()?;
        let subject = format!("🚨 New Order Received - {}", view.total);

        self.send_multipart_email(&self.notification_address, &subject, &text, &html)
            .await
    }

    /// Relay a contact-form submission to the operator inbox.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or a template fails to render.
    pub async fn send_contact_message(&self, contact: &ContactMessage) -> Result<(), EmailError> {
        let received_at = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();
        let html = ContactFormHtml {
            name: &contact.name,
            email: &contact.email,
            phone: contact.phone.as_deref(),
            subject: &contact.subject,
            message: &contact.message,
            received_at: &received_at,
        }
        .render()?;
        let text = ContactFormText {
            name: &contact.name,
            email: &contact.email,
            phone: contact.phone.as_deref(),
            subject: &contact.subject,
            message: &contact.message,
            received_at: &received_at,
        }
        .render()?;
        let subject = format!("[Fresca Kitchen] {}", contact.subject);

        self.send_multipart_email(&self.notification_address, &subject, &text, &html)
            .await
    }

    /// Send one message with text and HTML alternatives.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let body = MultiPart::alternative()
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_PLAIN)
                    .body(text_body.to_owned()),
            )
            .singlepart(
                SinglePart::builder()
                    .header(ContentType::TEXT_HTML)
                    .body(html_body.to_owned()),
            );

        let message = Message::builder()
            .from(parse_mailbox(&self.from_address)?)
            .to(parse_mailbox(to)?)
            .subject(subject)
            .multipart(body)?;

        self.mailer.send(message).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }
}

/// Parse an address into a lettre mailbox.
fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_owned()))
}
