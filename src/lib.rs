//! dsnsync - bidirectional connection-string codec for notification targets
//!
//! dsnsync converts both ways between the discrete connection fields of a
//! database-backed notification target and the single connection string the
//! target service consumes, and keeps the two representations in sync while
//! an operator edits either side.
//!
//! # Features
//!
//! - **Two dialects**: MySQL DSN form (`user:pass@tcp(host:port)/db`) and
//!   Postgres keyword form (`host=... dbname=... sslmode=...`)
//! - **Forgiving parsing**: hand-typed strings never error; anything the
//!   grammar cannot express degrades to default fields
//! - **Mode sync**: a two-state controller mediating field edits, raw-string
//!   edits, and the manual-string toggle
//! - **Payload builder**: the ordered `key_values` change set submitted to
//!   the configuration endpoint
//! - **Profiles**: named target drafts persisted to ~/.dsnsync/profiles.toml
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`codec`]: per-dialect build/parse between fields and strings
//! - [`sync`]: the fields-vs-string mode controller
//! - [`payload`]: submission payload types and construction
//! - [`profiles`]: saved target drafts
//! - [`error`]: error types and result aliases
//!
//! # Example
//!
//! ```
//! use dsnsync::codec::{ConnectionCodec, MysqlCodec};
//! use dsnsync::sync::FieldSync;
//!
//! let mut sync = FieldSync::<MysqlCodec>::new();
//! sync.edit_field(|f| {
//!     f.set("user", "root");
//!     f.set("host", "db.local");
//!     f.set("port", "3306");
//!     f.set("dbname", "events");
//! });
//! assert_eq!(sync.connection_string(), "root:@tcp(db.local:3306)/events");
//!
//! // Hand-edit the raw string, then drop back to fields.
//! sync.set_manual(true);
//! sync.edit_string("admin:pw@tcp(db2:3307)/audit");
//! sync.set_manual(false);
//! assert_eq!(sync.fields().unwrap().host, "db2");
//! ```

pub mod codec;
pub mod error;
pub mod payload;
pub mod profiles;
pub mod sync;

pub use codec::{ConnectionCodec, MysqlCodec, PostgresCodec};
pub use error::{DsnSyncError, PayloadError, ProfileError, Result};
pub use payload::{EventFormat, KeyValue, TargetConfig, TargetSettings, strip_empty};
pub use sync::{FieldSync, SyncState};
