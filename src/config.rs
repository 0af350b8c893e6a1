// ⚙️ Settings - Data file locations and printer backend
// Loaded from a JSON file; absent file or keys fall back to defaults

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default settings file, next to the data files
pub const DEFAULT_SETTINGS_PATH: &str = "Data/settings.json";

/// Highest copy count the operator may request
pub const DEFAULT_MAX_COPIES: u32 = 101;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Item catalog export (semicolon-delimited)
    pub catalog_path: PathBuf,

    /// Known barcode corrections
    pub corrections_path: PathBuf,

    /// Append-only print log
    pub journal_path: PathBuf,

    /// Pre-rendered label artwork, one `<barcode>.png` per item
    pub label_dir: PathBuf,

    /// Where tracing output goes while the terminal UI owns the screen
    pub debug_log_path: PathBuf,

    pub max_copies: u32,

    pub printer: PrinterSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            catalog_path: PathBuf::from("Data/Hay - Hynder.txt"),
            corrections_path: PathBuf::from("Data/Rettelser.txt"),
            journal_path: PathBuf::from("Data/log.txt"),
            label_dir: PathBuf::from("Data/PNG"),
            debug_log_path: PathBuf::from("Data/label-scanner.log"),
            max_copies: DEFAULT_MAX_COPIES,
            printer: PrinterSettings::default(),
        }
    }
}

/// Printer backend selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PrinterSettings {
    /// Hand the artwork to a spooler command (`lp` style)
    Command {
        program: String,
        #[serde(default)]
        destination: Option<String>,
        #[serde(default)]
        extra_args: Vec<String>,
    },

    /// Write one file per copy into a directory (dry runs)
    Directory { path: PathBuf },
}

impl Default for PrinterSettings {
    fn default() -> Self {
        PrinterSettings::Command {
            program: "lp".to_string(),
            destination: None,
            extra_args: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. A missing file means defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;

        let settings: Settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings JSON: {:?}", path))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_copies == 0 {
            bail!("max_copies must be at least 1");
        }
        if let PrinterSettings::Command { program, .. } = &self.printer {
            if program.trim().is_empty() {
                bail!("printer.program must not be empty");
            }
        }
        Ok(())
    }
}
