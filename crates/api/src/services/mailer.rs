//! Transactional email client.
//!
//! Thin wrapper over the hosted email provider's REST API. Message bodies
//! are built here so the verification and order flows stay free of HTML.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;

use grow_smart_core::{Email, OtpCode};

use crate::config::MailerConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailerError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Client could not be constructed.
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Transactional email client.
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    base_url: String,
    from_address: String,
}

impl Mailer {
    /// Create a new email client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MailerConfig) -> Result<Self, MailerError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| MailerError::Config(format!("Invalid API key format: {e}")))?,
        );
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            from_address: config.from_address.clone(),
        })
    }

    /// Send one HTML email.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider rejects it.
    pub async fn send(&self, to: &Email, subject: &str, html: &str) -> Result<(), MailerError> {
        let url = format!("{}/emails", self.base_url);

        let body = SendRequest {
            from: &self.from_address,
            to: [to.as_str()],
            subject,
            html,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(to = %to, subject, "Email accepted by provider");
        Ok(())
    }

    /// Send a login OTP.
    ///
    /// # Errors
    ///
    /// Returns error if delivery fails.
    pub async fn send_otp(&self, to: &Email, code: &OtpCode) -> Result<(), MailerError> {
        self.send(to, "Your Grow Smart login code", &otp_body(code))
            .await
    }

    /// Send an email-verification link.
    ///
    /// # Errors
    ///
    /// Returns error if delivery fails.
    pub async fn send_verification_link(&self, to: &Email, link: &str) -> Result<(), MailerError> {
        self.send(to, "Verify your Grow Smart email", &verification_body(link))
            .await
    }

    /// Notify a seller that an order was placed against their listing.
    ///
    /// # Errors
    ///
    /// Returns error if delivery fails.
    pub async fn send_order_notification(
        &self,
        to: &Email,
        note: &OrderNote<'_>,
    ) -> Result<(), MailerError> {
        self.send(to, "New order for your listing", &order_body(note))
            .await
    }
}

/// Details for the seller notification email.
#[derive(Debug)]
pub struct OrderNote<'a> {
    /// Public order reference.
    pub reference: &'a str,
    /// Crop named in the listing.
    pub crop_name: &'a str,
    /// Ordered quantity in kilograms.
    pub quantity_kg: &'a str,
    /// Total price.
    pub total_price: &'a str,
    /// Buyer's email address.
    pub buyer_email: &'a str,
}

fn otp_body(code: &OtpCode) -> String {
    format!(
        "<p>Your Grow Smart login code is:</p>\
         <p style=\"font-size:24px;letter-spacing:4px\"><strong>{}</strong></p>\
         <p>The code expires in 10 minutes. If you did not request it, you can ignore this email.</p>",
        code.as_str()
    )
}

fn verification_body(link: &str) -> String {
    format!(
        "<p>Confirm your email address for Grow Smart:</p>\
         <p><a href=\"{link}\">Verify my email</a></p>\
         <p>The link expires in 24 hours. If you did not request it, you can ignore this email.</p>"
    )
}

fn order_body(note: &OrderNote<'_>) -> String {
    format!(
        "<p>You have a new order (ref {reference}).</p>\
         <ul>\
         <li>Crop: {crop}</li>\
         <li>Quantity: {quantity} kg</li>\
         <li>Total: {total}</li>\
         <li>Buyer: {buyer}</li>\
         </ul>\
         <p>Log in to Grow Smart to accept or reject the order.</p>",
        reference = note.reference,
        crop = note.crop_name,
        quantity = note.quantity_kg,
        total = note.total_price,
        buyer = note.buyer_email,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_body_contains_code_and_expiry() {
        let code = OtpCode::parse("123456").unwrap();
        let body = otp_body(&code);
        assert!(body.contains("123456"));
        assert!(body.contains("10 minutes"));
    }

    #[test]
    fn test_verification_body_contains_link() {
        let body = verification_body("https://example.com/confirm?token=abc");
        assert!(body.contains("https://example.com/confirm?token=abc"));
        assert!(body.contains("24 hours"));
    }

    #[test]
    fn test_order_body_contains_details() {
        let note = OrderNote {
            reference: "f1c2",
            crop_name: "tomato",
            quantity_kg: "25.00",
            total_price: "500.00",
            buyer_email: "buyer@example.com",
        };
        let body = order_body(&note);
        assert!(body.contains("f1c2"));
        assert!(body.contains("tomato"));
        assert!(body.contains("25.00"));
        assert!(body.contains("buyer@example.com"));
    }
}
