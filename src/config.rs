use std::path::PathBuf;

/// SMTP settings for the confirmation mailer. Credentials come from the
/// environment; nothing here has a baked-in secret.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Backing CSV file for the booking table.
    pub data_file: PathBuf,
    /// Bookable rooms; room matching everywhere is exact and case-sensitive.
    pub rooms: Vec<String>,
    /// Prometheus exporter port. None disables metrics.
    pub metrics_port: Option<u16>,
    /// None disables the confirmation mailer.
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    /// Read configuration from `ROOMTAB_*` environment variables.
    /// `ROOMTAB_ROOMS` is a comma-separated list; empty entries are
    /// dropped, surrounding whitespace is trimmed.
    pub fn from_env() -> Self {
        let data_file = std::env::var("ROOMTAB_DATA_FILE")
            .unwrap_or_else(|_| "./bookings.csv".into())
            .into();
        let rooms = std::env::var("ROOMTAB_ROOMS")
            .map(|s| parse_rooms(&s))
            .unwrap_or_default();
        let metrics_port = std::env::var("ROOMTAB_METRICS_PORT")
            .ok()
            .and_then(|s| s.parse().ok());

        let smtp = std::env::var("ROOMTAB_SMTP_HOST").ok().map(|host| SmtpConfig {
            host,
            port: std::env::var("ROOMTAB_SMTP_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(587),
            from: std::env::var("ROOMTAB_SMTP_FROM")
                .unwrap_or_else(|_| "rooms@localhost".into()),
            username: std::env::var("ROOMTAB_SMTP_USERNAME").ok(),
            password: std::env::var("ROOMTAB_SMTP_PASSWORD").ok(),
            use_tls: std::env::var("ROOMTAB_SMTP_TLS")
                .map(|s| s != "0" && !s.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
        });

        Self {
            data_file,
            rooms,
            metrics_port,
            smtp,
        }
    }
}

fn parse_rooms(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooms_list_splits_and_trims() {
        assert_eq!(
            parse_rooms("Room A, Room B ,,Boardroom"),
            vec!["Room A".to_string(), "Room B".into(), "Boardroom".into()]
        );
        assert!(parse_rooms("").is_empty());
        assert!(parse_rooms(" , ").is_empty());
    }
}
