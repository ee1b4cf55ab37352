//! Mail delivery of the rendered PDF.

use std::fmt;
use std::future::Future;

use lettre::message::header::{ContentType, ContentTypeErr};
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

/// Port that uses implicit TLS; every other port negotiates STARTTLS.
pub const SMTPS_PORT: u16 = 465;

/// Errors while delivering a document.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("invalid attachment content type: {0}")]
    ContentType(#[from] ContentTypeErr),

    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// SMTP server and login.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"********")
            .finish()
    }
}

/// A rendered document addressed to a device.
#[derive(Debug, Clone)]
pub struct Parcel {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub subject: String,
    pub from: String,
    pub to: String,
}

/// Sends a parcel to its recipient.
pub trait Delivery {
    fn send(
        &self,
        parcel: &Parcel,
        credentials: &SmtpCredentials,
    ) -> impl Future<Output = Result<(), DeliveryError>>;
}

impl<T: Delivery + ?Sized> Delivery for &T {
    fn send(
        &self,
        parcel: &Parcel,
        credentials: &SmtpCredentials,
    ) -> impl Future<Output = Result<(), DeliveryError>> {
        (**self).send(parcel, credentials)
    }
}

/// Delivers over SMTP with lettre on the tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpMailer;

impl SmtpMailer {
    /// Builds the multipart message: a short text body plus the PDF.
    pub fn build_message(parcel: &Parcel) -> Result<Message, DeliveryError> {
        let from = parse_mailbox(&parcel.from)?;
        let to = parse_mailbox(&parcel.to)?;
        let pdf = ContentType::parse("application/pdf")?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(parcel.subject.clone())
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(format!("{}\n", parcel.subject)))
                    .singlepart(
                        Attachment::new(parcel.filename.clone()).body(parcel.bytes.clone(), pdf),
                    ),
            )?;
        Ok(message)
    }
}

impl Delivery for SmtpMailer {
    async fn send(
        &self,
        parcel: &Parcel,
        credentials: &SmtpCredentials,
    ) -> Result<(), DeliveryError> {
        let message = Self::build_message(parcel)?;

        let builder = if credentials.port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&credentials.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&credentials.host)?
        };
        let transport = builder
            .port(credentials.port)
            .credentials(Credentials::new(
                credentials.user.clone(),
                credentials.password.clone(),
            ))
            .build();

        transport.send(message).await?;
        info!(to = %parcel.to, file = %parcel.filename, "delivered");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|source| DeliveryError::Address {
            address: address.to_string(),
            source,
        })
}
