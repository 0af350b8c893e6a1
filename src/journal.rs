// 🧾 Print Journal - Append-only, best-effort record of print actions

use crate::catalog::Item;
use chrono::{Local, NaiveDateTime};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// How the printed item was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    Scanner,
    Manual,
}

impl PrintMode {
    pub fn tag(&self) -> &'static str {
        match self {
            PrintMode::Scanner => "Scanner",
            PrintMode::Manual => "Manual",
        }
    }
}

/// One journal line, e.g.
/// `2024-05-02 14:03:11: 3 x Seat Cushion, Sand, 1001, AB100 (Scanner)`
pub fn format_entry(at: NaiveDateTime, item: &Item, copies: u32, mode: PrintMode) -> String {
    format!(
        "{}: {} x {}, {}, {}, {} ({})\n",
        at.format("%Y-%m-%d %H:%M:%S"),
        copies,
        item.name,
        item.color,
        item.old_number,
        item.new_number,
        mode.tag()
    )
}

/// Appends one line per print. Appends are serialized, and a failed write
/// is logged and dropped: the labels are already on the printer.
#[derive(Debug)]
pub struct PrintJournal {
    path: PathBuf,
    lock: Mutex<()>,
}

impl PrintJournal {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        PrintJournal {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a completed print. Never fails.
    pub fn record(&self, item: &Item, copies: u32, mode: PrintMode) {
        let line = format_entry(Local::now().naive_local(), item, copies, mode);

        // A poisoned lock only means another append panicked; keep going
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));

        match result {
            Ok(()) => debug!(path = %self.path.display(), "print journaled"),
            Err(err) => warn!(
                path = %self.path.display(),
                error = %err,
                "print journal write failed; entry dropped"
            ),
        }
    }
}
