// 🩹 Correction Rules - Known barcode mislabelling, as data
// Each wrong barcode maps to one direct replacement or to a set of candidates

use crate::barcode::Barcode;
use crate::catalog::{is_blank, line_of, read_text, semicolon_reader};
use crate::error::{LoadError, LoadResult};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

// ============================================================================
// SOURCE FORMAT
// ============================================================================

/// Discriminator for an unambiguous replacement row
pub const TAG_REPLACE: &str = "erstat";

/// Discriminator for a barcode shared by several items
pub const TAG_MULTIPLE: &str = "flere";

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionRule {
    /// Any scan of `wrong` means `correct`
    DirectReplacement { wrong: Barcode, correct: Barcode },

    /// A scan of `wrong` may mean any of `candidates`; a human must pick.
    /// The candidate list includes `wrong` itself, since the code is right
    /// for one of the colliding items.
    AmbiguousReplacement {
        wrong: Barcode,
        candidates: Vec<Barcode>,
    },
}

impl CorrectionRule {
    pub fn wrong_barcode(&self) -> &Barcode {
        match self {
            CorrectionRule::DirectReplacement { wrong, .. } => wrong,
            CorrectionRule::AmbiguousReplacement { wrong, .. } => wrong,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, CorrectionRule::AmbiguousReplacement { .. })
    }
}

// ============================================================================
// CORRECTION INDEX
// ============================================================================

/// Read-only rule table keyed by wrong barcode.
#[derive(Debug, Clone, Default)]
pub struct CorrectionIndex {
    rules: HashMap<String, CorrectionRule>,
}

impl CorrectionIndex {
    /// Create an empty index
    pub fn new() -> Self {
        CorrectionIndex::default()
    }

    /// Load rules from the corrections file. Failure is fatal for startup.
    pub fn load<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        let path = path.as_ref();
        let text = read_text(path)?;
        let index = CorrectionIndex::parse(&text, path)?;

        info!(
            path = %path.display(),
            rules = index.len(),
            ambiguous = index.rules.values().filter(|r| r.is_ambiguous()).count(),
            "corrections loaded"
        );

        Ok(index)
    }

    /// Parse corrections text; the first line is a header and is skipped.
    pub fn parse(text: &str, path: &Path) -> LoadResult<Self> {
        let mut reader = semicolon_reader(text);
        let mut index = CorrectionIndex::new();
        let mut header_seen = false;

        for (idx, result) in reader.records().enumerate() {
            let record = result.map_err(|source| LoadError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            if is_blank(&record) {
                continue;
            }
            if !header_seen {
                header_seen = true;
                continue;
            }

            let line = line_of(&record, idx + 1);
            let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();

            let rule = match fields.first().copied() {
                Some(TAG_REPLACE) => {
                    let barcodes = parse_barcodes(&fields[1..], line, path)?;
                    let [wrong, correct]: [Barcode; 2] =
                        barcodes.try_into().map_err(|found: Vec<Barcode>| {
                            LoadError::MalformedRow {
                                path: path.to_path_buf(),
                                line,
                                reason: format!(
                                    "'{}' needs a wrong and a correct barcode, found {} barcode(s)",
                                    TAG_REPLACE,
                                    found.len()
                                ),
                            }
                        })?;
                    CorrectionRule::DirectReplacement { wrong, correct }
                }
                Some(TAG_MULTIPLE) => {
                    let barcodes = parse_barcodes(&fields[1..], line, path)?;
                    let Some(wrong) = barcodes.first().cloned() else {
                        return Err(LoadError::MalformedRow {
                            path: path.to_path_buf(),
                            line,
                            reason: format!("'{}' row has no barcodes", TAG_MULTIPLE),
                        });
                    };

                    let mut candidates: Vec<Barcode> = Vec::with_capacity(barcodes.len());
                    for barcode in barcodes {
                        if !candidates.contains(&barcode) {
                            candidates.push(barcode);
                        }
                    }

                    CorrectionRule::AmbiguousReplacement { wrong, candidates }
                }
                other => {
                    warn!(
                        path = %path.display(),
                        line,
                        tag = other.unwrap_or(""),
                        "skipping correction row with unknown tag"
                    );
                    continue;
                }
            };

            index.insert(rule, line, path)?;
        }

        Ok(index)
    }

    fn insert(&mut self, rule: CorrectionRule, line: usize, path: &Path) -> LoadResult<()> {
        let key = rule.wrong_barcode().to_string();
        if self.rules.contains_key(&key) {
            return Err(LoadError::DuplicateRule {
                path: path.to_path_buf(),
                line,
                barcode: key,
            });
        }
        self.rules.insert(key, rule);
        Ok(())
    }

    /// Build an index directly from rules (rejects duplicate keys)
    pub fn from_rules(rules: Vec<CorrectionRule>) -> LoadResult<Self> {
        let mut index = CorrectionIndex::new();
        for (idx, rule) in rules.into_iter().enumerate() {
            index.insert(rule, idx + 1, Path::new("<memory>"))?;
        }
        Ok(index)
    }

    pub fn rule_for(&self, barcode: &str) -> Option<&CorrectionRule> {
        self.rules.get(barcode)
    }

    /// True when a direct replacement exists for `barcode`
    pub fn is_known_wrong(&self, barcode: &str) -> bool {
        matches!(
            self.rules.get(barcode),
            Some(CorrectionRule::DirectReplacement { .. })
        )
    }

    pub fn is_ambiguous(&self, barcode: &str) -> bool {
        matches!(
            self.rules.get(barcode),
            Some(CorrectionRule::AmbiguousReplacement { .. })
        )
    }

    pub fn replacement_for(&self, barcode: &str) -> Option<&Barcode> {
        match self.rules.get(barcode) {
            Some(CorrectionRule::DirectReplacement { correct, .. }) => Some(correct),
            _ => None,
        }
    }

    pub fn candidates_for(&self, barcode: &str) -> Option<&[Barcode]> {
        match self.rules.get(barcode) {
            Some(CorrectionRule::AmbiguousReplacement { candidates, .. }) => Some(candidates),
            _ => None,
        }
    }

    /// Get number of rules loaded
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn parse_barcodes(fields: &[&str], line: usize, path: &Path) -> LoadResult<Vec<Barcode>> {
    fields
        .iter()
        .map(|raw| {
            Barcode::parse(raw).ok_or_else(|| LoadError::MalformedRow {
                path: path.to_path_buf(),
                line,
                reason: format!("'{}' is not a 13-digit barcode", raw),
            })
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
