// Label Scanner - Core Library
// Barcode resolution, manual lookup and print journaling for the label station

pub mod barcode;
pub mod catalog;
pub mod config;
pub mod corrections;
pub mod data;
pub mod error;
pub mod journal;
pub mod logging;
pub mod lookup;
pub mod printing;
pub mod resolver;
pub mod station;

// Re-export commonly used types
pub use barcode::Barcode;
pub use catalog::{Catalog, Item};
pub use config::{PrinterSettings, Settings};
pub use corrections::{CorrectionIndex, CorrectionRule};
pub use data::LabelData;
pub use error::{LoadError, LoadResult, PrintError};
pub use journal::{PrintJournal, PrintMode};
pub use lookup::{display_label, LookupIndex, NumberMode};
pub use printing::{
    CommandPrinter, CopyCount, DirectoryPrinter, LabelImage, LabelRenderer, PngLabelStore,
    PrinterService,
};
pub use resolver::{
    DisambiguationPrompt, Disambiguation, Resolution, ResolvedItem, Resolver, ScanStep,
};
pub use station::{Selection, Station, WarningPresenter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
