// 🗂️ Label Data - Read-only context shared by resolver, lookup and station

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::corrections::CorrectionIndex;
use crate::error::LoadResult;

/// Catalog and correction rules, loaded once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct LabelData {
    pub catalog: Catalog,
    pub corrections: CorrectionIndex,
}

impl LabelData {
    pub fn new(catalog: Catalog, corrections: CorrectionIndex) -> Self {
        LabelData {
            catalog,
            corrections,
        }
    }

    /// Load both data files named in the settings. Either failing aborts startup.
    pub fn load(settings: &Settings) -> LoadResult<Self> {
        let catalog = Catalog::load(&settings.catalog_path)?;
        let corrections = CorrectionIndex::load(&settings.corrections_path)?;
        Ok(LabelData::new(catalog, corrections))
    }
}
