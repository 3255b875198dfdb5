use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use regio_config::Config;
use serde::{Deserialize, Serialize};

/// Represents a user profile
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub value: Config,
}

/// Profiles stored as `<root>/<name>.json`
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<config dir>/regio/profiles`
    pub fn user_default() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("regio").join("profiles")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn profile_file(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    /// Create the folder and the main profile if missing
    pub fn init(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;

        if !self.profile_file("main").exists() {
            self.save("main", &Config::default())?;
            tracing::info!("Created main profile in {}", self.root.display());
        }
        Ok(())
    }

    /// Load a profile by name, falling back to main, then to defaults
    pub fn load(&self, name: &str) -> anyhow::Result<Config> {
        let file = self.profile_file(name);
        if file.exists() {
            return read_profile(&file);
        }

        tracing::warn!("Profile {name} not found, falling back to main profile");
        let main = self.profile_file("main");
        if main.exists() {
            read_profile(&main)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, name: &str, config: &Config) -> anyhow::Result<PathBuf> {
        let profile = Profile {
            name: name.into(),
            value: config.clone(),
        };
        let file = self.profile_file(name);
        fs::write(&file, serde_json::to_string_pretty(&profile)?)
            .with_context(|| format!("Failed to write {}", file.display()))?;
        Ok(file)
    }
}

fn read_profile(file: &Path) -> anyhow::Result<Config> {
    let data = fs::read_to_string(file)?;
    let profile: Profile = serde_json::from_str(&data)
        .with_context(|| format!("Invalid profile {}", file.display()))?;
    Ok(profile.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regio_config::poll::PollMode;

    #[test]
    fn init_creates_main_profile_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("profiles"));
        store.init().unwrap();

        let mut config = store.load("main").unwrap();
        config.poll.interval_ms = 1234;
        store.save("main", &config).unwrap();

        store.init().unwrap();
        assert_eq!(store.load("main").unwrap().poll.interval_ms, 1234);
    }

    #[test]
    fn unknown_profile_falls_back_to_main() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        let mut config = Config::default();
        config.poll.mode = PollMode::Fast;
        store.save("main", &config).unwrap();

        assert_eq!(store.load("subtitles").unwrap().poll.mode, PollMode::Fast);
    }

    #[test]
    fn missing_store_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("nowhere"));
        assert_eq!(store.load("main").unwrap().poll.interval_ms, 900);
    }

    #[test]
    fn broken_profile_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProfileStore::new(dir.path());
        fs::write(dir.path().join("main.json"), "{ not json").unwrap();
        assert!(store.load("main").is_err());
    }
}
