// 🖨️ Printing - Label artwork and printer backends
//
// Artwork is pre-rendered (one PNG per barcode); this module only loads it
// and hands it to a printer. Copies are independent pages.

use crate::barcode::Barcode;
use crate::config::PrinterSettings;
use crate::error::PrintError;
use chrono::Local;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, info};

// ============================================================================
// COPY COUNT
// ============================================================================

/// Number of copies, validated against the configured maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyCount(u32);

impl CopyCount {
    pub fn new(requested: u32, max: u32) -> Result<Self, PrintError> {
        if (1..=max).contains(&requested) {
            Ok(CopyCount(requested))
        } else {
            Err(PrintError::CopyCount { requested, max })
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

// ============================================================================
// LABEL ARTWORK
// ============================================================================

/// Raster artwork for one label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelImage {
    pub barcode: Barcode,
    pub path: PathBuf,
    pub bytes: Arc<Vec<u8>>,
}

/// Produces the printable image for a barcode
pub trait LabelRenderer {
    fn rasterize(&mut self, barcode: &Barcode) -> Result<LabelImage, PrintError>;
}

/// Reads `<dir>/<barcode>.png` the first time a barcode is needed and
/// keeps it for later previews and prints.
#[derive(Debug, Default)]
pub struct PngLabelStore {
    dir: PathBuf,
    cache: HashMap<Barcode, LabelImage>,
}

impl PngLabelStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        PngLabelStore {
            dir: dir.as_ref().to_path_buf(),
            cache: HashMap::new(),
        }
    }

    pub fn path_for(&self, barcode: &Barcode) -> PathBuf {
        self.dir.join(format!("{}.png", barcode))
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl LabelRenderer for PngLabelStore {
    fn rasterize(&mut self, barcode: &Barcode) -> Result<LabelImage, PrintError> {
        if let Some(image) = self.cache.get(barcode) {
            return Ok(image.clone());
        }

        let path = self.path_for(barcode);
        let bytes = fs::read(&path).map_err(|source| PrintError::MissingArtwork {
            barcode: barcode.to_string(),
            path: path.clone(),
            source,
        })?;
        debug!(barcode = %barcode, bytes = bytes.len(), "label artwork loaded");

        let image = LabelImage {
            barcode: barcode.clone(),
            path,
            bytes: Arc::new(bytes),
        };
        self.cache.insert(barcode.clone(), image.clone());
        Ok(image)
    }
}

// ============================================================================
// PRINTERS
// ============================================================================

pub trait PrinterService {
    fn print(&mut self, image: &LabelImage, copies: CopyCount) -> Result<(), PrintError>;

    /// Short description for status lines
    fn describe(&self) -> String;
}

/// Sends the artwork file to a spooler command:
/// `<program> [-d <destination>] -n <copies> [extra args] <file>`
#[derive(Debug, Clone)]
pub struct CommandPrinter {
    program: String,
    destination: Option<String>,
    extra_args: Vec<String>,
}

impl CommandPrinter {
    pub fn new(program: String, destination: Option<String>, extra_args: Vec<String>) -> Self {
        CommandPrinter {
            program,
            destination,
            extra_args,
        }
    }

    pub fn args(&self, image: &LabelImage, copies: CopyCount) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(destination) = &self.destination {
            args.push("-d".to_string());
            args.push(destination.clone());
        }
        args.push("-n".to_string());
        args.push(copies.get().to_string());
        args.extend(self.extra_args.iter().cloned());
        args.push(image.path.display().to_string());
        args
    }
}

impl PrinterService for CommandPrinter {
    fn print(&mut self, image: &LabelImage, copies: CopyCount) -> Result<(), PrintError> {
        let output = Command::new(&self.program)
            .args(self.args(image, copies))
            .output()
            .map_err(|source| PrintError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PrintError::Rejected {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!(
            program = %self.program,
            barcode = %image.barcode,
            copies = copies.get(),
            "label sent to printer"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.destination {
            Some(destination) => format!("{} → {}", self.program, destination),
            None => format!("{} → default printer", self.program),
        }
    }
}

/// Writes each copy as its own file, for dry runs without a printer
#[derive(Debug, Clone)]
pub struct DirectoryPrinter {
    dir: PathBuf,
}

impl DirectoryPrinter {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        DirectoryPrinter {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl PrinterService for DirectoryPrinter {
    fn print(&mut self, image: &LabelImage, copies: CopyCount) -> Result<(), PrintError> {
        fs::create_dir_all(&self.dir).map_err(|source| PrintError::Output {
            path: self.dir.clone(),
            source,
        })?;

        let stamp = Local::now().format("%Y%m%d-%H%M%S%3f");
        for copy in 1..=copies.get() {
            let path = self
                .dir
                .join(format!("{}-{}-{:03}.png", image.barcode, stamp, copy));
            fs::write(&path, image.bytes.as_slice())
                .map_err(|source| PrintError::Output { path, source })?;
        }

        info!(
            dir = %self.dir.display(),
            barcode = %image.barcode,
            copies = copies.get(),
            "label written to print directory"
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("directory {}", self.dir.display())
    }
}

/// Build the configured printer backend
pub fn printer_from_settings(settings: &PrinterSettings) -> Box<dyn PrinterService> {
    match settings {
        PrinterSettings::Command {
            program,
            destination,
            extra_args,
        } => Box::new(CommandPrinter::new(
            program.clone(),
            destination.clone(),
            extra_args.clone(),
        )),
        PrinterSettings::Directory { path } => Box::new(DirectoryPrinter::new(path)),
    }
}
