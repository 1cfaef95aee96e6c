//! Target profile store
//!
//! Manages named notification-target drafts stored in
//! ~/.dsnsync/profiles.toml, so a half-configured target can be reloaded
//! into the form later. Only the connection string is persisted, not the
//! discrete fields: the codec re-derives them on load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::codec::ConnectionCodec;
use crate::error::{ProfileError, ProfileResult};
use crate::payload::{TargetConfig, TargetSettings};
use crate::sync::FieldSync;

/// One saved target draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetProfile {
    /// Profile name
    pub name: String,

    /// Dialect the connection string belongs to ("mysql" or "postgres")
    pub dialect: String,

    /// The connection string as last derived or typed
    #[serde(default)]
    pub connection_string: String,

    /// Auxiliary settings
    #[serde(flatten)]
    pub settings: TargetSettings,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProfilesFile {
    #[serde(default)]
    profiles: Vec<TargetProfile>,
}

impl TargetProfile {
    /// Capture a profile from a live target configuration.
    pub fn from_target<C: ConnectionCodec>(name: &str, target: &TargetConfig<C>) -> Self {
        Self {
            name: name.to_string(),
            dialect: C::NAME.to_string(),
            connection_string: target.sync.connection_string(),
            settings: target.settings.clone(),
        }
    }

    /// Rehydrate a target configuration in fields mode.
    ///
    /// The stored string is parsed through the codec, so a hand-edited
    /// profile degrades to default fields the same way the form does.
    pub fn into_target<C: ConnectionCodec>(self) -> TargetConfig<C> {
        TargetConfig {
            sync: FieldSync::with_fields(C::parse(&self.connection_string)),
            settings: self.settings,
        }
    }

    /// Get the config directory path (~/.dsnsync/)
    pub fn config_dir() -> ProfileResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ProfileError::NoHomeDir)?;
        Ok(home.join(".dsnsync"))
    }

    /// Get the profiles file path
    pub fn profiles_file() -> ProfileResult<PathBuf> {
        Ok(Self::config_dir()?.join("profiles.toml"))
    }
}

/// Load all target profiles from the profiles file
pub fn load_profiles() -> ProfileResult<Vec<TargetProfile>> {
    let path = TargetProfile::profiles_file()?;
    load_profiles_from(&path)
}

fn load_profiles_from(path: &Path) -> ProfileResult<Vec<TargetProfile>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    let file: ProfilesFile = toml::from_str(&content)?;
    Ok(file.profiles)
}

/// Save the full profile list, replacing the file
pub fn save_profiles(profiles: Vec<TargetProfile>) -> ProfileResult<()> {
    let path = TargetProfile::profiles_file()?;
    save_profiles_to(&path, profiles)
}

fn save_profiles_to(path: &Path, profiles: Vec<TargetProfile>) -> ProfileResult<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(&ProfilesFile { profiles })?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Find a profile by name
pub fn find_profile(name: &str) -> ProfileResult<TargetProfile> {
    let profiles = load_profiles()?;
    profiles
        .into_iter()
        .find(|p| p.name == name)
        .ok_or_else(|| ProfileError::ProfileNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{MysqlCodec, PostgresCodec};
    use crate::payload::EventFormat;

    #[test]
    fn test_profile_captures_current_string() {
        let mut target = TargetConfig::<MysqlCodec>::new();
        target.sync.edit_field(|f| {
            f.set("user", "root");
            f.set("host", "db");
        });
        target.settings.table = "events".to_string();

        let profile = TargetProfile::from_target("staging", &target);
        assert_eq!(profile.dialect, "mysql");
        assert_eq!(profile.connection_string, "root:@tcp(db:)/");
        assert_eq!(profile.settings.table, "events");
    }

    #[test]
    fn test_profile_round_trips_through_target() {
        let mut target = TargetConfig::<PostgresCodec>::new();
        target.sync.edit_field(|f| {
            f.set("host", "localhost");
            f.set("dbname", "bucket_events");
            f.set("sslmode", "disable");
        });
        target.settings.format = Some(EventFormat::Access);

        let profile = TargetProfile::from_target("prod", &target);
        let restored: TargetConfig<PostgresCodec> = profile.into_target();
        assert!(!restored.sync.manual_mode());
        assert_eq!(
            restored.sync.connection_string(),
            "host=localhost dbname=bucket_events sslmode=disable"
        );
        assert_eq!(restored.settings.format, Some(EventFormat::Access));
    }

    #[test]
    fn test_profiles_file_round_trip_on_disk() {
        let dir = std::env::temp_dir().join("dsnsync-profile-test");
        let path = dir.join("profiles.toml");
        let _ = std::fs::remove_file(&path);

        let profile = TargetProfile {
            name: "draft".to_string(),
            dialect: "postgres".to_string(),
            connection_string: "host=h port=5432".to_string(),
            settings: TargetSettings::default(),
        };
        save_profiles_to(&path, vec![profile]).unwrap();

        let loaded = load_profiles_from(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "draft");
        assert_eq!(loaded[0].connection_string, "host=h port=5432");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_yields_empty_list() {
        let path = std::env::temp_dir().join("dsnsync-no-such-profiles.toml");
        assert!(load_profiles_from(&path).unwrap().is_empty());
    }
}
