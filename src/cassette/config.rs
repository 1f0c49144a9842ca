//! Cassette configuration for composable per-port replay.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// File name of a port's cassette inside a recording directory.
#[must_use]
pub fn cassette_file(port: &str) -> String {
    format!("{port}.cassette.yaml")
}

/// Per-port cassette file paths. Ports without a path panic when called
/// during replay.
#[derive(Debug, Clone, Default)]
pub struct CassetteConfig {
    /// Path to the clock port cassette file.
    pub clock: Option<PathBuf>,
    /// Path to the issues port cassette file.
    pub issues: Option<PathBuf>,
    /// Path to the sheets port cassette file.
    pub sheets: Option<PathBuf>,
}

/// Per-port replayers, each with its own interaction stream.
pub struct PortReplayers {
    /// Replayer for the clock port.
    pub clock: Option<CassetteReplayer>,
    /// Replayer for the issues port.
    pub issues: Option<CassetteReplayer>,
    /// Replayer for the sheets port.
    pub sheets: Option<CassetteReplayer>,
}

impl CassetteConfig {
    /// Config pointing at every port cassette a recording session wrote to `dir`.
    /// Files that do not exist are left unconfigured.
    #[must_use]
    pub fn from_dir(dir: &Path) -> Self {
        let existing = |port: &str| Some(dir.join(cassette_file(port))).filter(|p| p.exists());
        Self { clock: existing("clock"), issues: existing("issues"), sheets: existing("sheets") }
    }

    /// Load one cassette file and create a replayer for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<CassetteReplayer, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        Ok(CassetteReplayer::new(&cassette))
    }

    /// Load all configured per-port cassette files and create replayers.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured cassette file cannot be read or parsed.
    pub fn load_all(&self) -> Result<PortReplayers, String> {
        Ok(PortReplayers {
            clock: self.clock.as_deref().map(Self::load).transpose()?,
            issues: self.issues.as_deref().map(Self::load).transpose()?,
            sheets: self.sheets.as_deref().map(Self::load).transpose()?,
        })
    }
}
