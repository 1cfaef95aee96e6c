//! dsnsync - connection-string codec CLI
//!
//! Thin command-line front end over the library: parse a connection string
//! into fields, build a string from fields, produce the full submission
//! payload, or save and reload target drafts. The actual logic is in the
//! library modules for better testability.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dsnsync::codec::{ConnectionCodec, MysqlCodec, PostgresCodec};
use dsnsync::error::PayloadResult;
use dsnsync::payload::{EventFormat, TargetConfig, TargetSettings, strip_empty};
use dsnsync::profiles::{self, TargetProfile};
use dsnsync::sync::FieldSync;

#[derive(Parser)]
#[command(name = "dsnsync", version, about = "Connection-string codec for notification targets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Supported connection-string dialects
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Dialect {
    Mysql,
    Postgres,
}

/// Auxiliary target settings shared by `payload` and `save`
#[derive(Args)]
struct SettingsArgs {
    /// Target table name
    #[arg(long)]
    table: Option<String>,

    /// Event record format: namespace or access
    #[arg(long)]
    format: Option<String>,

    /// Staging directory for undelivered events
    #[arg(long)]
    queue_dir: Option<String>,

    /// Maximum number of undelivered events
    #[arg(long)]
    queue_limit: Option<String>,

    /// Free-form comment
    #[arg(long)]
    comment: Option<String>,
}

impl SettingsArgs {
    fn apply(self, settings: &mut TargetSettings) -> PayloadResult<()> {
        if let Some(table) = self.table {
            settings.table = table;
        }
        if let Some(format) = self.format {
            settings.format = Some(format.parse::<EventFormat>()?);
        }
        if let Some(queue_dir) = self.queue_dir {
            settings.queue_dir = queue_dir;
        }
        if let Some(queue_limit) = self.queue_limit {
            settings.queue_limit = queue_limit;
        }
        if let Some(comment) = self.comment {
            settings.comment = comment;
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum Command {
    /// Parse a connection string into discrete fields (JSON on stdout)
    Parse {
        #[arg(long, value_enum)]
        dialect: Dialect,

        /// The raw connection string
        string: String,
    },

    /// Build a connection string from discrete fields
    Build {
        #[arg(long, value_enum)]
        dialect: Dialect,

        /// Field assignments, e.g. --set host=localhost --set port=5432
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        sets: Vec<String>,

        /// Read the full fields record as JSON instead of --set flags
        #[arg(long, value_name = "JSON", conflicts_with = "sets")]
        json: Option<String>,
    },

    /// Produce the key_values submission payload (JSON on stdout)
    Payload {
        #[arg(long, value_enum)]
        dialect: Dialect,

        /// Field assignments, e.g. --set host=localhost
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        sets: Vec<String>,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Keep empty-valued pairs instead of stripping them
        #[arg(long)]
        keep_empty: bool,
    },

    /// Save a target draft to ~/.dsnsync/profiles.toml
    Save {
        #[arg(long, value_enum)]
        dialect: Dialect,

        /// Profile name
        name: String,

        /// Field assignments, e.g. --set host=localhost
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        sets: Vec<String>,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Load a saved target draft (JSON on stdout)
    Load {
        /// Profile name
        name: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dsnsync=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Parse { dialect, string } => match dialect {
            Dialect::Mysql => run_parse::<MysqlCodec>(&string),
            Dialect::Postgres => run_parse::<PostgresCodec>(&string),
        },
        Command::Build { dialect, sets, json } => match dialect {
            Dialect::Mysql => run_build::<MysqlCodec>(&sets, json.as_deref()),
            Dialect::Postgres => run_build::<PostgresCodec>(&sets, json.as_deref()),
        },
        Command::Payload {
            dialect,
            sets,
            settings,
            keep_empty,
        } => match dialect {
            Dialect::Mysql => run_payload::<MysqlCodec>(&sets, settings, keep_empty),
            Dialect::Postgres => run_payload::<PostgresCodec>(&sets, settings, keep_empty),
        },
        Command::Save {
            dialect,
            name,
            sets,
            settings,
        } => {
            let profile = match dialect {
                Dialect::Mysql => make_profile::<MysqlCodec>(&name, &sets, settings)?,
                Dialect::Postgres => make_profile::<PostgresCodec>(&name, &sets, settings)?,
            };
            save_profile(profile)?;
            Ok(())
        }
        Command::Load { name } => {
            println!("{}", load_profile(&name)?);
            Ok(())
        }
    }
}

/// Apply `FIELD=VALUE` assignments onto a default field record.
fn fields_from_sets<C: ConnectionCodec>(sets: &[String]) -> Result<C::Fields> {
    let mut fields = C::Fields::default();
    for assignment in sets {
        let Some((name, value)) = assignment.split_once('=') else {
            bail!("Invalid assignment '{}': expected FIELD=VALUE", assignment);
        };
        if !C::set_field(&mut fields, name, value) {
            bail!("Unknown field '{}' for dialect {}", name, C::NAME);
        }
    }
    Ok(fields)
}

fn run_parse<C: ConnectionCodec>(raw: &str) -> Result<()> {
    let fields = C::parse(raw);
    let json = serde_json::to_string_pretty(&fields).context("serializing fields")?;
    println!("{}", json);
    Ok(())
}

fn run_build<C: ConnectionCodec>(sets: &[String], json: Option<&str>) -> Result<()> {
    let fields = match json {
        Some(json) => serde_json::from_str::<C::Fields>(json).context("parsing fields JSON")?,
        None => fields_from_sets::<C>(sets)?,
    };
    println!("{}", C::build(&fields));
    Ok(())
}

fn run_payload<C: ConnectionCodec>(
    sets: &[String],
    settings: SettingsArgs,
    keep_empty: bool,
) -> Result<()> {
    let mut target = TargetConfig::<C> {
        sync: FieldSync::with_fields(fields_from_sets::<C>(sets)?),
        settings: TargetSettings::default(),
    };
    settings.apply(&mut target.settings)?;

    let mut pairs = target.key_values();
    if !keep_empty {
        pairs = strip_empty(pairs);
    }
    let json = serde_json::to_string_pretty(&pairs).context("serializing payload")?;
    println!("{}", json);
    Ok(())
}

fn make_profile<C: ConnectionCodec>(
    name: &str,
    sets: &[String],
    settings: SettingsArgs,
) -> Result<TargetProfile> {
    let mut target = TargetConfig::<C> {
        sync: FieldSync::with_fields(fields_from_sets::<C>(sets)?),
        settings: TargetSettings::default(),
    };
    settings.apply(&mut target.settings)?;
    Ok(TargetProfile::from_target(name, &target))
}

/// Insert or replace the profile by name in the store.
fn save_profile(profile: TargetProfile) -> dsnsync::Result<()> {
    let mut profiles = profiles::load_profiles()?;
    match profiles.iter_mut().find(|p| p.name == profile.name) {
        Some(slot) => *slot = profile,
        None => profiles.push(profile),
    }
    profiles::save_profiles(profiles)?;
    Ok(())
}

fn load_profile(name: &str) -> dsnsync::Result<String> {
    let profile = profiles::find_profile(name)?;
    Ok(serde_json::to_string_pretty(&profile)?)
}
