use std::str::FromStr;

use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};

use crate::config::SmtpConfig;
use crate::model::Booking;
use crate::notify::{Notifier, NotifyError};

/// Sends a plain-text confirmation per committed booking. Failures are
/// for the caller to log (see `notify_soft`) — the booking stays put.
pub struct ConfirmationMailer {
    config: SmtpConfig,
}

impl ConfirmationMailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    fn body(booking: &Booking) -> String {
        let description = booking.description.as_deref().unwrap_or("-");
        format!(
            "Hello {user},\n\n\
             Your booking is confirmed.\n\n\
             Room:     {room}\n\
             From:     {from_date} {start}\n\
             To:       {to_date} {end}\n\
             Priority: {priority}\n\
             Notes:    {description}\n\n\
             Reference: {id}\n",
            user = booking.user,
            room = booking.room,
            from_date = booking.slot.from_date,
            start = booking.slot.start,
            to_date = booking.slot.to_date,
            end = booking.slot.end,
            priority = booking.priority,
            description = description,
            id = booking.id,
        )
    }

    fn send(&self, booking: &Booking) -> Result<(), NotifyError> {
        let from = Mailbox::from_str(&self.config.from)
            .map_err(|e| NotifyError(format!("invalid from address: {e}")))?;
        let to = Mailbox::from_str(&booking.email)
            .map_err(|e| NotifyError(format!("invalid to address: {e}")))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(format!("Booking confirmed: {}", booking.room))
            .header(ContentType::TEXT_PLAIN)
            .body(Self::body(booking))
            .map_err(|e| NotifyError(format!("failed to build message: {e}")))?;

        let builder = if self.config.use_tls {
            SmtpTransport::starttls_relay(&self.config.host)
                .map_err(|e| NotifyError(format!("failed to create transport: {e}")))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.host)
        }
        .port(self.config.port);

        let builder = match (&self.config.username, &self.config.password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.clone(), pass.clone()))
            }
            _ => builder,
        };

        builder
            .build()
            .send(&message)
            .map_err(|e| NotifyError(format!("smtp send failed: {e}")))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for ConfirmationMailer {
    async fn booking_confirmed(&self, booking: &Booking) -> Result<(), NotifyError> {
        self.send(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Slot};
    use chrono::{NaiveDate, NaiveTime};
    use ulid::Ulid;

    #[test]
    fn body_includes_slot_and_reference() {
        let booking = Booking {
            id: Ulid::new(),
            user: "Ada".into(),
            email: "ada@example.com".into(),
            room: "Room A".into(),
            slot: Slot::on(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            ),
            priority: Priority::High,
            description: Some("board meeting".into()),
        };
        let body = ConfirmationMailer::body(&booking);
        assert!(body.contains("Room A"));
        assert!(body.contains("2024-01-01 09:00:00"));
        assert!(body.contains("High"));
        assert!(body.contains("board meeting"));
        assert!(body.contains(&booking.id.to_string()));
    }

    #[test]
    fn bad_recipient_is_an_error_not_a_panic() {
        let mailer = ConfirmationMailer::new(SmtpConfig {
            host: "localhost".into(),
            port: 25,
            from: "rooms@example.com".into(),
            username: None,
            password: None,
            use_tls: false,
        });
        let booking = Booking {
            id: Ulid::new(),
            user: "Ada".into(),
            email: "not an address".into(),
            room: "Room A".into(),
            slot: Slot::on(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            ),
            priority: Priority::Low,
            description: None,
        };
        assert!(mailer.send(&booking).is_err());
    }
}
