use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{AdoLensError, Result};

/// Persisted user preferences.
///
/// The key-value store behind the `config` subcommand: a default project so
/// `--project` can be omitted, and an optional per-project list of visible
/// pipeline ids. A project with no entry shows all of its pipelines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Project used when no --project argument is given
    pub default_project: Option<String>,

    /// Pipeline ids to show, keyed by project name; absent key = show all
    #[serde(default)]
    pub visible_pipelines: IndexMap<String, Vec<i64>>,
}

impl Settings {
    /// Visible pipeline ids for a project, or `None` for "show all".
    pub fn visible_pipelines_for(&self, project: &str) -> Option<&[i64]> {
        self.visible_pipelines
            .get(project)
            .map(|ids| ids.as_slice())
    }
}

/// On-disk settings store.
///
/// Lives at `<config dir>/adolens/settings.toml`; a missing file reads as
/// defaults so first runs need no setup.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Opens the store at the platform config location.
    pub fn open() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AdoLensError::Config("No config directory found".into()))?
            .join("adolens");

        Ok(Self {
            path: config_dir.join("settings.toml"),
        })
    }

    /// Store rooted at an explicit path; used by tests.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!("No settings file at {}, using defaults", self.path.display());
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(&self.path)?;
        toml::from_str(&contents)
            .map_err(|e| AdoLensError::Config(format!("Failed to parse settings: {e}")))
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(settings)
            .map_err(|e| AdoLensError::Config(format!("Failed to serialize settings: {e}")))?;
        fs::write(&self.path, contents)?;

        debug!("Settings saved to {}", self.path.display());
        Ok(())
    }

    pub fn default_project(&self) -> Result<Option<String>> {
        Ok(self.load()?.default_project)
    }

    pub fn set_default_project(&self, name: &str) -> Result<()> {
        let mut settings = self.load()?;
        settings.default_project = Some(name.to_string());
        self.save(&settings)
    }

    pub fn clear_default_project(&self) -> Result<()> {
        let mut settings = self.load()?;
        settings.default_project = None;
        self.save(&settings)
    }

    pub fn visible_pipelines(&self, project: &str) -> Result<Option<Vec<i64>>> {
        Ok(self
            .load()?
            .visible_pipelines_for(project)
            .map(<[i64]>::to_vec))
    }

    pub fn set_visible_pipelines(&self, project: &str, ids: Vec<i64>) -> Result<()> {
        let mut settings = self.load()?;
        settings.visible_pipelines.insert(project.to_string(), ids);
        self.save(&settings)
    }

    pub fn clear_visible_pipelines(&self, project: &str) -> Result<()> {
        let mut settings = self.load()?;
        settings.visible_pipelines.shift_remove(project);
        self.save(&settings)
    }

    /// Removes the settings file entirely.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            info!("Settings cleared: {}", self.path.display());
        }
        Ok(())
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::at(dir.path().join("adolens").join("settings.toml"))
    }

    #[test]
    fn test_missing_file_reads_as_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let settings = store.load().unwrap();
        assert!(settings.default_project.is_none());
        assert!(settings.visible_pipelines.is_empty());
    }

    #[test]
    fn test_default_project_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.set_default_project("Phoenix").unwrap();
        assert_eq!(store.default_project().unwrap().as_deref(), Some("Phoenix"));

        store.clear_default_project().unwrap();
        assert!(store.default_project().unwrap().is_none());
    }

    #[test]
    fn test_visible_pipelines_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.set_visible_pipelines("Phoenix", vec![3, 1, 7]).unwrap();

        // Order preserved as written
        assert_eq!(
            store.visible_pipelines("Phoenix").unwrap(),
            Some(vec![3, 1, 7])
        );

        // Absent project means "show all"
        assert_eq!(store.visible_pipelines("Atlas").unwrap(), None);

        store.clear_visible_pipelines("Phoenix").unwrap();
        assert_eq!(store.visible_pipelines("Phoenix").unwrap(), None);
    }

    #[test]
    fn test_clearing_removes_the_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.set_default_project("Phoenix").unwrap();
        assert!(store.path().exists());

        store.clear().unwrap();
        assert!(!store.path().exists());

        // Clearing again is a no-op, not an error
        store.clear().unwrap();
    }

    #[test]
    fn test_settings_survive_reload() {
        let dir = TempDir::new().unwrap();
        {
            let store = store_in(&dir);
            store.set_default_project("Atlas").unwrap();
            store.set_visible_pipelines("Atlas", vec![2, 4]).unwrap();
        }

        let reopened = store_in(&dir);
        let settings = reopened.load().unwrap();
        assert_eq!(settings.default_project.as_deref(), Some("Atlas"));
        assert_eq!(settings.visible_pipelines_for("Atlas"), Some(&[2, 4][..]));
    }
}
