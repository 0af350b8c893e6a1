// 🏷️ Label Station - One operator session: select an item, preview, print
//
// Scanner and manual selection feed the same print path. Failed scans and
// failed prints leave the current selection untouched.

use crate::catalog::Item;
use crate::config::Settings;
use crate::data::LabelData;
use crate::error::PrintError;
use crate::journal::{PrintJournal, PrintMode};
use crate::lookup::{LookupIndex, NumberMode};
use crate::printing::{
    printer_from_settings, CopyCount, LabelImage, LabelRenderer, PngLabelStore, PrinterService,
};
use crate::resolver::{DisambiguationPrompt, Resolution, Resolver};
use std::sync::Arc;
use tracing::{info, warn};

// ============================================================================
// WARNINGS
// ============================================================================

/// Surfaces an operator-visible warning; returns once it is shown
pub trait WarningPresenter {
    fn show(&mut self, title: &str, message: &str);
}

impl<F> WarningPresenter for F
where
    F: FnMut(&str, &str),
{
    fn show(&mut self, title: &str, message: &str) {
        self(title, message)
    }
}

// ============================================================================
// SELECTION
// ============================================================================

/// The item currently shown and ready to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub item: Item,
    pub mode: PrintMode,
    /// Barcode line for the item panel (shows corrections)
    pub barcode_display: String,
}

// ============================================================================
// STATION
// ============================================================================

pub struct Station {
    data: Arc<LabelData>,
    lookup: LookupIndex,
    journal: PrintJournal,
    renderer: Box<dyn LabelRenderer>,
    printer: Box<dyn PrinterService>,
    max_copies: u32,
    selection: Option<Selection>,
    preview: Option<LabelImage>,
}

impl Station {
    pub fn new(
        data: Arc<LabelData>,
        journal: PrintJournal,
        renderer: Box<dyn LabelRenderer>,
        printer: Box<dyn PrinterService>,
        max_copies: u32,
    ) -> Self {
        let lookup = LookupIndex::new(&data.catalog);
        Station {
            data,
            lookup,
            journal,
            renderer,
            printer,
            max_copies,
            selection: None,
            preview: None,
        }
    }

    /// Wire the station from settings: PNG artwork store, configured printer
    pub fn from_settings(settings: &Settings, data: Arc<LabelData>) -> Self {
        Station::new(
            data,
            PrintJournal::new(&settings.journal_path),
            Box::new(PngLabelStore::new(&settings.label_dir)),
            printer_from_settings(&settings.printer),
            settings.max_copies,
        )
    }

    pub fn data(&self) -> &LabelData {
        &self.data
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn preview(&self) -> Option<&LabelImage> {
        self.preview.as_ref()
    }

    pub fn max_copies(&self) -> u32 {
        self.max_copies
    }

    pub fn printer_description(&self) -> String {
        self.printer.describe()
    }

    pub fn clear(&mut self) {
        self.selection = None;
        self.preview = None;
    }

    // ------------------------------------------------------------------------
    // Scanner mode
    // ------------------------------------------------------------------------

    /// Resolve a scan and, on success, make it the current selection.
    /// Warnings go to `warnings`; cancellation changes nothing.
    pub fn scan(
        &mut self,
        input: &str,
        prompt: &mut dyn DisambiguationPrompt,
        warnings: &mut dyn WarningPresenter,
    ) -> Resolution {
        let resolution = Resolver::new(&self.data).resolve(input, prompt);

        match &resolution {
            Resolution::Resolved(resolved) => {
                self.select(
                    resolved.item.clone(),
                    PrintMode::Scanner,
                    resolved.barcode_display(),
                    warnings,
                );
            }
            Resolution::Cancelled => {}
            other => {
                if let Some((title, message)) = other.warning() {
                    warnings.show(title, message);
                }
            }
        }

        resolution
    }

    // ------------------------------------------------------------------------
    // Manual mode
    // ------------------------------------------------------------------------

    pub fn search(&self, query: &str, mode: NumberMode) -> Vec<String> {
        self.lookup.search(query, mode)
    }

    /// Select the item behind a manual-mode label
    pub fn select_manual(
        &mut self,
        label: &str,
        mode: NumberMode,
        warnings: &mut dyn WarningPresenter,
    ) -> Option<&Selection> {
        let item = self.lookup.select(label, mode)?.clone();
        let barcode_display = item.barcode.to_string();
        self.select(item, PrintMode::Manual, barcode_display, warnings);
        self.selection.as_ref()
    }

    fn select(
        &mut self,
        item: Item,
        mode: PrintMode,
        barcode_display: String,
        warnings: &mut dyn WarningPresenter,
    ) {
        self.preview = match self.renderer.rasterize(&item.barcode) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!(barcode = %item.barcode, error = %err, "no preview available");
                warnings.show("Missing label", &err.to_string());
                None
            }
        };
        self.selection = Some(Selection {
            item,
            mode,
            barcode_display,
        });
    }

    // ------------------------------------------------------------------------
    // Printing
    // ------------------------------------------------------------------------

    /// Print the current selection and journal it.
    ///
    /// Any failure is shown through `warnings` and the selection is kept so
    /// the operator can retry without rescanning. After a successful
    /// scanner-mode print the selection is cleared, ready for the next scan.
    pub fn print(
        &mut self,
        copies: u32,
        warnings: &mut dyn WarningPresenter,
    ) -> Result<(), PrintError> {
        let result = self.try_print(copies);

        match &result {
            Ok(()) => {}
            Err(PrintError::NothingSelected) => {
                warnings.show("Error", "Scan an item before printing.");
            }
            Err(err) => {
                warn!(error = %err, "print failed");
                warnings.show("Print failed", &err.to_string());
            }
        }

        result
    }

    fn try_print(&mut self, copies: u32) -> Result<(), PrintError> {
        let selection = self.selection.as_ref().ok_or(PrintError::NothingSelected)?;
        let copies = CopyCount::new(copies, self.max_copies)?;

        let image = match &self.preview {
            Some(image) => image.clone(),
            None => self.renderer.rasterize(&selection.item.barcode)?,
        };

        self.printer.print(&image, copies)?;

        info!(
            barcode = %selection.item.barcode,
            copies = copies.get(),
            mode = selection.mode.tag(),
            "printed"
        );
        self.journal.record(&selection.item, copies.get(), selection.mode);

        if selection.mode == PrintMode::Scanner {
            self.clear();
        } else if self.preview.is_none() {
            self.preview = Some(image);
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
