//! MySQL DSN codec
//!
//! The MySQL dialect uses the Go-driver DSN shape:
//!
//! ```text
//! <user>:<password>@tcp(<host>:<port>)/<dbname>
//! ```
//!
//! Building always instantiates the full template; a blank field simply
//! produces an empty segment (all-empty fields render as `:@tcp(:)/`).
//! Parsing is an explicit delimiter scan rather than a regex: it looks for
//! structurally complete `@tcp(` / `)/` occurrences and lets the last one
//! win, which is the documented policy when a string contains several DSNs.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::codec::ConnectionCodec;

/// Structural anchors of the DSN template.
const TCP_OPEN: &str = "@tcp(";
const TCP_CLOSE: &str = ")/";

/// Discrete fields of a MySQL DSN. Any field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MysqlFields {
    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub port: String,

    #[serde(default)]
    pub dbname: String,
}

impl MysqlFields {
    /// Apply a single `(fieldName, newValue)` change event.
    ///
    /// Returns `false` when the field name is not part of this dialect.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let slot = match name {
            "user" => &mut self.user,
            "password" => &mut self.password,
            "host" => &mut self.host,
            "port" => &mut self.port,
            "dbname" => &mut self.dbname,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }
}

/// Codec for the MySQL DSN grammar.
#[derive(Debug, Clone, Copy)]
pub struct MysqlCodec;

impl ConnectionCodec for MysqlCodec {
    type Fields = MysqlFields;

    const STRING_KEY: &'static str = "dsn_string";
    const NAME: &'static str = "mysql";

    fn build(fields: &MysqlFields) -> String {
        // The template is always fully instantiated, never partially built.
        format!(
            "{}:{}@tcp({}:{})/{}",
            fields.user, fields.password, fields.host, fields.port, fields.dbname
        )
    }

    fn parse(raw: &str) -> MysqlFields {
        let mut fields = MysqlFields::default();
        let mut matched = false;

        // Start of the credential segment for the next occurrence: either
        // the start of the string or just past the previous occurrence.
        let mut seg_start = 0;
        let mut pos = 0;

        while let Some(found) = raw[pos..].find(TCP_OPEN) {
            let at = pos + found;
            // Advance unconditionally so the scan always makes progress.
            pos = at + TCP_OPEN.len();

            // Credentials must carry a ':' separator to count as a match.
            let prefix = &raw[seg_start..at];
            let Some((user, password)) = prefix.split_once(':') else {
                continue;
            };

            // No closing ')/' anywhere ahead means no complete occurrence
            // remains in the rest of the string.
            let after = &raw[pos..];
            let Some(close) = after.find(TCP_CLOSE) else {
                break;
            };
            let Some((host, port)) = after[..close].split_once(':') else {
                continue;
            };

            let db_start = pos + close + TCP_CLOSE.len();
            fields.user = user.to_string();
            fields.password = password.to_string();
            fields.host = host.to_string();
            fields.port = port.to_string();
            fields.dbname = raw[db_start..].to_string();
            matched = true;

            seg_start = db_start;
            pos = db_start;
        }

        if !matched && !raw.trim().is_empty() {
            warn!(
                dialect = MysqlCodec::NAME,
                "connection string did not match the DSN grammar; returning empty fields"
            );
        }

        fields
    }

    fn set_field(fields: &mut MysqlFields, name: &str, value: &str) -> bool {
        fields.set(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(user: &str, password: &str, host: &str, port: &str, dbname: &str) -> MysqlFields {
        MysqlFields {
            user: user.to_string(),
            password: password.to_string(),
            host: host.to_string(),
            port: port.to_string(),
            dbname: dbname.to_string(),
        }
    }

    #[test]
    fn test_build_full() {
        let f = fields("root", "s3cr3t", "db.local", "3306", "events");
        assert_eq!(MysqlCodec::build(&f), "root:s3cr3t@tcp(db.local:3306)/events");
    }

    #[test]
    fn test_build_all_empty_keeps_template() {
        let f = MysqlFields::default();
        assert_eq!(MysqlCodec::build(&f), ":@tcp(:)/");
    }

    #[test]
    fn test_parse_round_trip_from_fields() {
        let f = fields("root", "s3cr3t", "db.local", "3306", "events");
        assert_eq!(MysqlCodec::parse(&MysqlCodec::build(&f)), f);
    }

    #[test]
    fn test_parse_empty_template_round_trips() {
        assert_eq!(MysqlCodec::parse(":@tcp(:)/"), MysqlFields::default());
    }

    #[test]
    fn test_parse_malformed_degrades_to_empty() {
        assert_eq!(MysqlCodec::parse("not a dsn string"), MysqlFields::default());
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(MysqlCodec::parse(""), MysqlFields::default());
    }

    #[test]
    fn test_parse_last_occurrence_wins() {
        let f = MysqlCodec::parse("a:b@tcp(h1:1)/d1 a:b@tcp(h2:2)/d2");
        assert_eq!(f.host, "h2");
        assert_eq!(f.port, "2");
        assert_eq!(f.dbname, "d2");
    }

    #[test]
    fn test_parse_missing_credential_colon_is_not_a_match() {
        // The grammar requires a ':' before '@tcp('.
        assert_eq!(MysqlCodec::parse("root@tcp(h:1)/db"), MysqlFields::default());
    }

    #[test]
    fn test_parse_missing_host_colon_is_not_a_match() {
        assert_eq!(MysqlCodec::parse("a:b@tcp(host)/db"), MysqlFields::default());
    }

    #[test]
    fn test_parse_unclosed_tcp_segment() {
        assert_eq!(MysqlCodec::parse("a:b@tcp(h:1"), MysqlFields::default());
    }

    #[test]
    fn test_parse_lazy_user_split() {
        // user stops at the first ':'; everything up to '@tcp(' is password.
        let f = MysqlCodec::parse("u:p:w@tcp(h:1)/db");
        assert_eq!(f.user, "u");
        assert_eq!(f.password, "p:w");
    }

    #[test]
    fn test_parse_port_keeps_extra_colons() {
        // host stops at the first ':'; the rest up to ')/' is port.
        let f = MysqlCodec::parse("a:b@tcp(h:1:2)/db");
        assert_eq!(f.host, "h");
        assert_eq!(f.port, "1:2");
    }

    #[test]
    fn test_fields_deserialize_from_json() {
        // Omitted keys default to empty, matching a partially filled form.
        let f: MysqlFields = serde_json::from_str(r#"{"user":"root","host":"db"}"#).unwrap();
        assert_eq!(f.user, "root");
        assert_eq!(f.host, "db");
        assert_eq!(f.port, "");
        assert_eq!(MysqlCodec::build(&f), "root:@tcp(db:)/");
    }

    #[test]
    fn test_parse_dbname_runs_to_end() {
        let f = MysqlCodec::parse("a:b@tcp(h:1)/db/extra?opts");
        assert_eq!(f.dbname, "db/extra?opts");
    }
}
