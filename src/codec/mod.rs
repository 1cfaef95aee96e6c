//! Connection-string codecs
//!
//! Each supported dialect converts both ways between discrete connection
//! fields and a single connection string. Building is a pure templating
//! step; parsing accepts arbitrary hand-typed input and degrades to
//! default-valued fields rather than erroring.

pub mod mysql;
pub mod postgres;

pub use mysql::MysqlCodec;
pub use postgres::PostgresCodec;

/// Two-way conversion between discrete fields and a connection string.
///
/// Both directions are total functions: `build` accepts any field values
/// (including all-empty) and `parse` accepts any string. A string that does
/// not match the dialect's grammar parses to default fields.
pub trait ConnectionCodec {
    /// The discrete field record for this dialect.
    type Fields: Clone
        + Default
        + PartialEq
        + std::fmt::Debug
        + serde::Serialize
        + serde::de::DeserializeOwned;

    /// Payload key under which the connection string is submitted
    /// (`dsn_string` for MySQL, `connection_string` for Postgres).
    const STRING_KEY: &'static str;

    /// Human-readable dialect name, used in logs and the CLI.
    const NAME: &'static str;

    /// Render the canonical connection string for `fields`.
    fn build(fields: &Self::Fields) -> String;

    /// Recover fields from a (possibly hand-edited) connection string.
    ///
    /// Keys the string does not mention come back at their defaults; the
    /// parser never merges with prior field state.
    fn parse(raw: &str) -> Self::Fields;

    /// Apply a `(fieldName, newValue)` change event to `fields`.
    ///
    /// Returns `false` when the field name is not part of this dialect.
    fn set_field(fields: &mut Self::Fields, name: &str, value: &str) -> bool;
}
