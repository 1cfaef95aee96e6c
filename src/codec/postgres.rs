//! Postgres connection-string codec
//!
//! The Postgres dialect uses the libpq keyword form: space-separated
//! `key=value` tokens drawn from `host`, `dbname`, `user`, `password`,
//! `port`, and `sslmode`. Only configured fields are emitted, in a fixed
//! order, so an all-default record builds the empty string.
//!
//! `sslmode` is modeled as `Option<SslMode>` rather than a sentinel string:
//! `None` means "not configured" and never produces a token. Values with
//! embedded spaces are not representable in this grammar.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::codec::ConnectionCodec;

/// Discrete fields of a Postgres connection string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresFields {
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub dbname: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub port: String,

    /// `None` means not configured; no `sslmode=` token is emitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sslmode: Option<SslMode>,
}

impl PostgresFields {
    /// Apply a single `(fieldName, newValue)` change event.
    ///
    /// A blank or unrecognized `sslmode` value clears the setting, matching
    /// the "not configured" option of the originating form. Returns `false`
    /// when the field name is not part of this dialect.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        match name {
            "host" => self.host = value.to_string(),
            "dbname" => self.dbname = value.to_string(),
            "user" => self.user = value.to_string(),
            "password" => self.password = value.to_string(),
            "port" => self.port = value.to_string(),
            "sslmode" => self.sslmode = SslMode::from_str(value.trim()).ok(),
            _ => return false,
        }
        true
    }
}

/// libpq `sslmode` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    Disable,
    Allow,
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl SslMode {
    /// The wire name used in connection strings.
    pub fn as_str(self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Allow => "allow",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized `sslmode` name
#[derive(Debug, thiserror::Error)]
#[error("Invalid sslmode: {0}")]
pub struct ParseSslModeError(String);

impl FromStr for SslMode {
    type Err = ParseSslModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disable" => Ok(SslMode::Disable),
            "allow" => Ok(SslMode::Allow),
            "prefer" => Ok(SslMode::Prefer),
            "require" => Ok(SslMode::Require),
            "verify-ca" => Ok(SslMode::VerifyCa),
            "verify-full" => Ok(SslMode::VerifyFull),
            other => Err(ParseSslModeError(other.to_string())),
        }
    }
}

/// The keys a parsed string may mention, each present only if found.
///
/// This is the raw token-level result; [`PostgresCodec::parse`] applies it
/// onto a default record. Exposed so callers can distinguish "key absent"
/// from "key present with empty value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialFields {
    pub host: Option<String>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub port: Option<String>,
    pub sslmode: Option<String>,
}

impl PartialFields {
    /// True when no known key was found.
    pub fn is_empty(&self) -> bool {
        self.host.is_none()
            && self.dbname.is_none()
            && self.user.is_none()
            && self.password.is_none()
            && self.port.is_none()
            && self.sslmode.is_none()
    }

    /// Overlay found keys onto `fields`, leaving absent keys at their
    /// current (default) values. An unrecognized sslmode value degrades to
    /// "not configured".
    pub fn apply(self, fields: &mut PostgresFields) {
        if let Some(v) = self.host {
            fields.host = v;
        }
        if let Some(v) = self.dbname {
            fields.dbname = v;
        }
        if let Some(v) = self.user {
            fields.user = v;
        }
        if let Some(v) = self.password {
            fields.password = v;
        }
        if let Some(v) = self.port {
            fields.port = v;
        }
        if let Some(v) = self.sslmode {
            fields.sslmode = SslMode::from_str(&v).ok();
        }
    }
}

/// Split a raw string into the known `key=value` tokens it mentions.
///
/// Tokens are whitespace-separated and split on the first `=`; unknown keys
/// and bare words are ignored. First occurrence of a key wins.
pub fn parse_partial(raw: &str) -> PartialFields {
    let mut partial = PartialFields::default();

    for token in raw.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        let value = value.trim();
        let slot = match key {
            "host" => &mut partial.host,
            "dbname" => &mut partial.dbname,
            "user" => &mut partial.user,
            "password" => &mut partial.password,
            "port" => &mut partial.port,
            "sslmode" => &mut partial.sslmode,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    partial
}

/// Codec for the Postgres keyword grammar.
#[derive(Debug, Clone, Copy)]
pub struct PostgresCodec;

impl ConnectionCodec for PostgresCodec {
    type Fields = PostgresFields;

    const STRING_KEY: &'static str = "connection_string";
    const NAME: &'static str = "postgres";

    fn build(fields: &PostgresFields) -> String {
        // Fixed emission order: host, dbname, user, password, port, sslmode.
        let mut tokens = Vec::new();
        for (key, value) in [
            ("host", &fields.host),
            ("dbname", &fields.dbname),
            ("user", &fields.user),
            ("password", &fields.password),
            ("port", &fields.port),
        ] {
            if !value.is_empty() {
                tokens.push(format!("{}={}", key, value));
            }
        }
        if let Some(mode) = fields.sslmode {
            tokens.push(format!("sslmode={}", mode));
        }
        tokens.join(" ")
    }

    fn parse(raw: &str) -> PostgresFields {
        let partial = parse_partial(raw);
        if partial.is_empty() && !raw.trim().is_empty() {
            warn!(
                dialect = PostgresCodec::NAME,
                "connection string mentioned no known keys; returning default fields"
            );
        }

        let mut fields = PostgresFields::default();
        partial.apply(&mut fields);
        fields
    }

    fn set_field(fields: &mut PostgresFields, name: &str, value: &str) -> bool {
        fields.set(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_fields() -> PostgresFields {
        PostgresFields {
            host: "localhost".to_string(),
            dbname: "bucket_events".to_string(),
            user: "postgres".to_string(),
            password: "password".to_string(),
            port: "5432".to_string(),
            sslmode: Some(SslMode::Disable),
        }
    }

    #[test]
    fn test_build_full() {
        assert_eq!(
            PostgresCodec::build(&full_fields()),
            "host=localhost dbname=bucket_events user=postgres password=password port=5432 sslmode=disable"
        );
    }

    #[test]
    fn test_build_skips_empty_and_unset() {
        let fields = PostgresFields {
            host: "localhost".to_string(),
            ..Default::default()
        };
        assert_eq!(PostgresCodec::build(&fields), "host=localhost");
    }

    #[test]
    fn test_build_all_default_is_empty() {
        assert_eq!(PostgresCodec::build(&PostgresFields::default()), "");
    }

    #[test]
    fn test_build_never_emits_unset_sslmode() {
        let mut fields = full_fields();
        fields.sslmode = None;
        assert!(!PostgresCodec::build(&fields).contains("sslmode"));
    }

    #[test]
    fn test_parse_round_trip_from_fields() {
        let fields = full_fields();
        assert_eq!(PostgresCodec::parse(&PostgresCodec::build(&fields)), fields);
    }

    #[test]
    fn test_parse_partial_reports_only_found_keys() {
        let partial = parse_partial("host=localhost");
        assert_eq!(partial.host.as_deref(), Some("localhost"));
        assert!(partial.dbname.is_none());
        assert!(partial.user.is_none());
        assert!(partial.password.is_none());
        assert!(partial.port.is_none());
        assert!(partial.sslmode.is_none());
    }

    #[test]
    fn test_parse_fills_missing_keys_with_defaults() {
        let fields = PostgresCodec::parse("host=localhost");
        assert_eq!(fields.host, "localhost");
        assert_eq!(fields.dbname, "");
        assert_eq!(fields.sslmode, None);
    }

    #[test]
    fn test_parse_ignores_unknown_keys_and_bare_words() {
        let fields = PostgresCodec::parse("garbage host=h1 application_name=app");
        assert_eq!(fields.host, "h1");
        assert_eq!(fields.user, "");
    }

    #[test]
    fn test_parse_first_occurrence_wins() {
        let fields = PostgresCodec::parse("host=h1 host=h2");
        assert_eq!(fields.host, "h1");
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let fields = PostgresCodec::parse("  host=localhost   port=5432  ");
        assert_eq!(fields.host, "localhost");
        assert_eq!(fields.port, "5432");
    }

    #[test]
    fn test_parse_malformed_degrades_to_defaults() {
        assert_eq!(PostgresCodec::parse("not a connection string"), PostgresFields::default());
    }

    #[test]
    fn test_parse_unknown_sslmode_degrades_to_unset() {
        let fields = PostgresCodec::parse("host=h sslmode=bogus");
        assert_eq!(fields.sslmode, None);
    }

    #[test]
    fn test_parse_key_present_with_empty_value() {
        // 'host=' is found but carries an empty value; it overlays the
        // default with an (identical) empty string.
        let partial = parse_partial("host= port=5432");
        assert_eq!(partial.host.as_deref(), Some(""));
        assert_eq!(partial.port.as_deref(), Some("5432"));
    }

    #[test]
    fn test_sslmode_parse_and_display() {
        assert_eq!("verify-full".parse::<SslMode>().unwrap(), SslMode::VerifyFull);
        assert_eq!(SslMode::VerifyCa.to_string(), "verify-ca");
        assert!("".parse::<SslMode>().is_err());
    }

    #[test]
    fn test_fields_deserialize_from_json() {
        let f: PostgresFields =
            serde_json::from_str(r#"{"host":"h","sslmode":"verify-ca"}"#).unwrap();
        assert_eq!(f.host, "h");
        assert_eq!(f.sslmode, Some(SslMode::VerifyCa));
        assert_eq!(f.dbname, "");
        assert_eq!(PostgresCodec::build(&f), "host=h sslmode=verify-ca");
    }

    #[test]
    fn test_set_clears_sslmode_on_blank() {
        let mut fields = full_fields();
        assert!(fields.set("sslmode", " "));
        assert_eq!(fields.sslmode, None);
        assert!(fields.set("sslmode", "require"));
        assert_eq!(fields.sslmode, Some(SslMode::Require));
    }
}
