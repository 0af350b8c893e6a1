// 🎯 Barcode Resolver - Scan → canonical item
//
// Rules are evaluated strictly in this order; the first match wins:
//   1. format      - exactly 13 ASCII digits, checked before any lookup
//   2. ambiguous   - barcode shared by several items → ask the operator
//   3. catalog     - barcode is a known item
//   4. correction  - barcode has a direct replacement in the catalog
//   5. unknown
//
// Ambiguity is checked before the catalog because an ambiguous barcode is
// often also a real catalog barcode (it is correct for one of the items).

use crate::barcode::Barcode;
use crate::catalog::Item;
use crate::data::LabelData;
use crate::lookup::{display_label, NumberMode};
use std::collections::HashMap;
use tracing::{debug, info, warn};

// ============================================================================
// DISAMBIGUATION CAPABILITY
// ============================================================================

/// Human-in-the-loop selection among candidate items.
///
/// `ask` blocks until the operator picks one of `labels` (returned verbatim)
/// or cancels (None). No timeout applies.
pub trait DisambiguationPrompt {
    fn ask(&mut self, labels: &[String]) -> Option<String>;
}

impl<F> DisambiguationPrompt for F
where
    F: FnMut(&[String]) -> Option<String>,
{
    fn ask(&mut self, labels: &[String]) -> Option<String> {
        self(labels)
    }
}

// ============================================================================
// RESOLUTION RESULT
// ============================================================================

/// A scan that identified exactly one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub item: Item,
    /// What the operator scanned
    pub scanned: Barcode,
    /// Set exactly when the item's barcode differs from the scan
    pub corrected_from: Option<Barcode>,
}

impl ResolvedItem {
    fn new(item: Item, scanned: Barcode) -> Self {
        let corrected_from = if item.barcode == scanned {
            None
        } else {
            Some(scanned.clone())
        };
        ResolvedItem {
            item,
            scanned,
            corrected_from,
        }
    }

    /// Barcode line for the item panel: plain, or `"{scanned} corrected to {actual}"`
    pub fn barcode_display(&self) -> String {
        match &self.corrected_from {
            Some(scanned) => format!("{} corrected to {}", scanned, self.item.barcode),
            None => self.item.barcode.to_string(),
        }
    }
}

/// Terminal state of one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedItem),
    /// Not exactly 13 digits
    InvalidFormat { input: String },
    /// Valid format but no usable catalog or correction match
    UnknownBarcode { barcode: Barcode },
    /// Operator dismissed the disambiguation prompt; nothing happened
    Cancelled,
}

impl Resolution {
    pub fn resolved(&self) -> Option<&ResolvedItem> {
        match self {
            Resolution::Resolved(resolved) => Some(resolved),
            _ => None,
        }
    }

    pub fn into_resolved(self) -> Option<ResolvedItem> {
        match self {
            Resolution::Resolved(resolved) => Some(resolved),
            _ => None,
        }
    }

    /// Barcode line for the item panel; None unless resolved
    pub fn barcode_display(&self) -> Option<String> {
        self.resolved().map(ResolvedItem::barcode_display)
    }

    /// Operator-facing (title, message) for the failure states
    pub fn warning(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Resolution::InvalidFormat { .. } => Some(("Invalid barcode", "The barcode is not valid.")),
            Resolution::UnknownBarcode { .. } => Some(("Unknown barcode", "The barcode is unknown.")),
            Resolution::Resolved(_) | Resolution::Cancelled => None,
        }
    }
}

// ============================================================================
// SUSPENDED STATE
// ============================================================================

/// Ambiguous scan waiting for the operator's choice.
#[derive(Debug, Clone)]
pub struct Disambiguation {
    scanned: Barcode,
    candidates: Vec<(String, Item)>,
}

impl Disambiguation {
    pub fn scanned(&self) -> &Barcode {
        &self.scanned
    }

    /// Known candidate items, in catalog order
    pub fn candidates(&self) -> impl Iterator<Item = &Item> {
        self.candidates.iter().map(|(_, item)| item)
    }

    /// New-number display labels offered to the operator
    pub fn labels(&self) -> Vec<String> {
        self.candidates.iter().map(|(label, _)| label.clone()).collect()
    }

    /// Finish with the operator's pick. A label that was never offered
    /// counts as a cancellation.
    pub fn choose(self, label: &str) -> Resolution {
        let scanned = self.scanned;
        match self.candidates.into_iter().find(|(offered, _)| offered == label) {
            Some((_, item)) => {
                info!(scanned = %scanned, chosen = %item.barcode, "ambiguous scan resolved");
                Resolution::Resolved(ResolvedItem::new(item, scanned))
            }
            None => {
                warn!(scanned = %scanned, label, "selection was not among the offered candidates");
                Resolution::Cancelled
            }
        }
    }

    pub fn cancel(self) -> Resolution {
        debug!(scanned = %self.scanned, "disambiguation cancelled");
        Resolution::Cancelled
    }
}

/// New-number labels for the candidates. Labels that would read the same
/// (noise stripping can fold two names together) get the barcode appended,
/// so every offered label maps back to exactly one item.
fn unique_labels(items: impl Iterator<Item = Item>) -> Vec<(String, Item)> {
    let mut labelled: Vec<(String, Item)> = items
        .map(|item| (display_label(&item, NumberMode::New), item))
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for (label, _) in &labelled {
        *counts.entry(label.clone()).or_default() += 1;
    }

    for (label, item) in &mut labelled {
        if counts.get(label.as_str()).copied().unwrap_or(0) > 1 {
            label.push_str(&format!(" ({})", item.barcode));
        }
    }

    labelled
}

/// Result of the synchronous part of resolution
#[derive(Debug, Clone)]
pub enum ScanStep {
    Finished(Resolution),
    AwaitingDisambiguation(Disambiguation),
}

// ============================================================================
// RESOLVER
// ============================================================================

pub struct Resolver<'a> {
    data: &'a LabelData,
}

impl<'a> Resolver<'a> {
    pub fn new(data: &'a LabelData) -> Self {
        Resolver { data }
    }

    /// Run the resolution rules up to (and excluding) the operator prompt
    pub fn begin(&self, input: &str) -> ScanStep {
        let Some(scanned) = Barcode::parse(input) else {
            debug!(input, "scan rejected: not 13 digits");
            return ScanStep::Finished(Resolution::InvalidFormat {
                input: input.to_string(),
            });
        };

        let catalog = &self.data.catalog;
        let corrections = &self.data.corrections;

        if let Some(barcodes) = corrections.candidates_for(scanned.as_str()) {
            let mut known: Vec<(usize, &Item)> = barcodes
                .iter()
                .filter_map(|barcode| {
                    let position = catalog.position(barcode.as_str())?;
                    catalog.find_by_barcode(barcode.as_str()).map(|item| (position, item))
                })
                .collect();
            known.sort_by_key(|(position, _)| *position);

            if known.is_empty() {
                warn!(scanned = %scanned, "ambiguous rule has no known candidates");
                return ScanStep::Finished(Resolution::UnknownBarcode { barcode: scanned });
            }

            let candidates = unique_labels(known.into_iter().map(|(_, item)| item.clone()));

            return ScanStep::AwaitingDisambiguation(Disambiguation {
                scanned,
                candidates,
            });
        }

        if let Some(item) = catalog.find_by_barcode(scanned.as_str()) {
            debug!(scanned = %scanned, "scan matched catalog");
            return ScanStep::Finished(Resolution::Resolved(ResolvedItem::new(
                item.clone(),
                scanned,
            )));
        }

        if let Some(correct) = corrections.replacement_for(scanned.as_str()) {
            return match catalog.find_by_barcode(correct.as_str()) {
                Some(item) => {
                    info!(scanned = %scanned, corrected = %correct, "scan corrected");
                    ScanStep::Finished(Resolution::Resolved(ResolvedItem::new(
                        item.clone(),
                        scanned,
                    )))
                }
                None => {
                    warn!(
                        scanned = %scanned,
                        corrected = %correct,
                        "correction points to a barcode missing from the catalog"
                    );
                    ScanStep::Finished(Resolution::UnknownBarcode { barcode: scanned })
                }
            };
        }

        debug!(scanned = %scanned, "scan unknown");
        ScanStep::Finished(Resolution::UnknownBarcode { barcode: scanned })
    }

    /// Resolve a scan, blocking on `prompt` when the barcode is ambiguous
    pub fn resolve(&self, input: &str, prompt: &mut dyn DisambiguationPrompt) -> Resolution {
        match self.begin(input) {
            ScanStep::Finished(resolution) => resolution,
            ScanStep::AwaitingDisambiguation(pending) => match prompt.ask(&pending.labels()) {
                Some(label) => pending.choose(&label),
                None => pending.cancel(),
            },
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::corrections::CorrectionIndex;
    use std::path::Path;

    // A, B known; C (5710000000048) referenced by a rule but not in the catalog
    const CATALOG: &str = "\
Gammelt varenummer;Varenavn;Farve;Stregkode;Nyt varenummer
1001;Palissade Seat Cushion FR;Anthracite;5710000000017;AB100
1002;Palissade Seat Cushion FR;Sky Grey;5710000000024;AB101
1003;Palissade Lounge Cushion textile;Iron Red;5710000000031;AB102
";

    const CORRECTIONS: &str = "\
type;barcode;replacements
erstat;5710000000109;5710000000017
erstat;5710000000116;5710000000999
flere;5710000000031;5710000000024;5710000000048
flere;5710000000123;5710000000055
";

    fn data() -> LabelData {
        LabelData::new(
            Catalog::parse(CATALOG, Path::new("catalog.txt")).unwrap(),
            CorrectionIndex::parse(CORRECTIONS, Path::new("corrections.txt")).unwrap(),
        )
    }

    /// Prompt that records what it was offered and answers with a fixed choice
    struct FakePrompt {
        offered: Vec<Vec<String>>,
        answer: Option<usize>,
    }

    impl FakePrompt {
        fn picking(index: usize) -> Self {
            FakePrompt {
                offered: Vec::new(),
                answer: Some(index),
            }
        }

        fn cancelling() -> Self {
            FakePrompt {
                offered: Vec::new(),
                answer: None,
            }
        }
    }

    impl DisambiguationPrompt for FakePrompt {
        fn ask(&mut self, labels: &[String]) -> Option<String> {
            self.offered.push(labels.to_vec());
            self.answer.and_then(|i| labels.get(i).cloned())
        }
    }

    fn never_asked(_: &[String]) -> Option<String> {
        panic!("prompt must not be shown");
    }

    #[test]
    fn test_invalid_formats() {
        let data = data();
        let resolver = Resolver::new(&data);

        for input in ["", "abc", "571000000001", "57100000000170", "57100000000a7"] {
            let resolution = resolver.resolve(input, &mut never_asked);
            assert_eq!(
                resolution,
                Resolution::InvalidFormat {
                    input: input.to_string()
                },
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_format_checked_before_correction_lookup() {
        // 5710000000109 has a replacement rule; longer or padded scans of it
        // must be rejected before any lookup
        let data = data();
        let resolver = Resolver::new(&data);

        for input in ["57100000001090", "5710000000109 ", "05710000000109"] {
            assert!(matches!(
                resolver.resolve(input, &mut never_asked),
                Resolution::InvalidFormat { .. }
            ));
        }
    }

    #[test]
    fn test_direct_catalog_match() {
        let data = data();
        let resolver = Resolver::new(&data);

        let resolved = resolver
            .resolve("5710000000017", &mut never_asked)
            .into_resolved()
            .unwrap();

        assert_eq!(resolved.item.old_number, "1001");
        assert_eq!(resolved.corrected_from, None);
        assert_eq!(resolved.barcode_display(), "5710000000017");
    }

    #[test]
    fn test_direct_replacement() {
        let data = data();
        let resolver = Resolver::new(&data);

        let resolved = resolver
            .resolve("5710000000109", &mut never_asked)
            .into_resolved()
            .unwrap();

        assert_eq!(resolved.item.barcode.as_str(), "5710000000017");
        assert_eq!(
            resolved.corrected_from,
            Barcode::parse("5710000000109")
        );
        assert_eq!(
            resolved.barcode_display(),
            "5710000000109 corrected to 5710000000017"
        );
    }

    #[test]
    fn test_replacement_to_unknown_item_is_unknown() {
        let data = data();
        let resolver = Resolver::new(&data);

        let resolution = resolver.resolve("5710000000116", &mut never_asked);

        assert!(matches!(resolution, Resolution::UnknownBarcode { .. }));
        assert!(resolution.resolved().is_none());
    }

    #[test]
    fn test_unknown_barcode() {
        let data = data();
        let resolver = Resolver::new(&data);

        for input in ["0000000000000", "5710000000999", "9999999999999"] {
            assert_eq!(
                resolver.resolve(input, &mut never_asked),
                Resolution::UnknownBarcode {
                    barcode: Barcode::parse(input).unwrap()
                }
            );
        }

        let resolution = resolver.resolve("5710000000999", &mut never_asked);
        assert_eq!(resolution.barcode_display(), None);
        assert_eq!(
            resolution.warning(),
            Some(("Unknown barcode", "The barcode is unknown."))
        );
    }

    #[test]
    fn test_ambiguous_offers_only_known_candidates() {
        let data = data();
        let resolver = Resolver::new(&data);
        let mut prompt = FakePrompt::picking(0);

        resolver.resolve("5710000000031", &mut prompt);

        // Candidates 031 (the scan itself) and 024 are known, 048 is not;
        // labels follow catalog order
        assert_eq!(
            prompt.offered,
            vec![vec![
                "AB101 - Seat Cushion - Sky Grey".to_string(),
                "AB102 - Lounge Cushion - Iron Red".to_string(),
            ]]
        );
    }

    #[test]
    fn test_ambiguous_pick_other_item_is_corrected() {
        let data = data();
        let resolver = Resolver::new(&data);

        let resolved = resolver
            .resolve("5710000000031", &mut FakePrompt::picking(0))
            .into_resolved()
            .unwrap();

        assert_eq!(resolved.item.barcode.as_str(), "5710000000024");
        assert_eq!(resolved.corrected_from, Barcode::parse("5710000000031"));
    }

    #[test]
    fn test_ambiguous_pick_scanned_item_is_not_corrected() {
        let data = data();
        let resolver = Resolver::new(&data);

        let resolved = resolver
            .resolve("5710000000031", &mut FakePrompt::picking(1))
            .into_resolved()
            .unwrap();

        assert_eq!(resolved.item.barcode.as_str(), "5710000000031");
        assert_eq!(resolved.corrected_from, None);
    }

    #[test]
    fn test_colliding_labels_map_to_distinct_items() {
        // Same new number and color; names differ only by a stripped " FR"
        let catalog = "\
Gammelt varenummer;Varenavn;Farve;Stregkode;Nyt varenummer
1001;Seat Cushion FR;Sand;5710000000017;AB100
1002;Seat Cushion;Sand;5710000000024;AB100
";
        let corrections = "\
type;barcode;replacements
flere;5710000000031;5710000000017;5710000000024
";
        let data = LabelData::new(
            Catalog::parse(catalog, Path::new("catalog.txt")).unwrap(),
            CorrectionIndex::parse(corrections, Path::new("corrections.txt")).unwrap(),
        );
        let resolver = Resolver::new(&data);

        let mut prompt = FakePrompt::picking(1);
        let second = resolver
            .resolve("5710000000031", &mut prompt)
            .into_resolved()
            .unwrap();

        assert_eq!(
            prompt.offered[0],
            vec![
                "AB100 - Seat Cushion - Sand (5710000000017)".to_string(),
                "AB100 - Seat Cushion - Sand (5710000000024)".to_string(),
            ]
        );
        assert_eq!(second.item.barcode.as_str(), "5710000000024");

        let first = resolver
            .resolve("5710000000031", &mut FakePrompt::picking(0))
            .into_resolved()
            .unwrap();
        assert_eq!(first.item.barcode.as_str(), "5710000000017");
    }

    #[test]
    fn test_ambiguous_checked_before_catalog() {
        // 5710000000031 is a real catalog barcode, yet the operator is asked
        let data = data();
        let resolver = Resolver::new(&data);
        let mut prompt = FakePrompt::cancelling();

        let resolution = resolver.resolve("5710000000031", &mut prompt);

        assert_eq!(prompt.offered.len(), 1);
        assert_eq!(resolution, Resolution::Cancelled);
    }

    #[test]
    fn test_ambiguous_without_known_candidates_is_unknown() {
        let data = data();
        let resolver = Resolver::new(&data);

        let resolution = resolver.resolve("5710000000123", &mut never_asked);
        assert!(matches!(resolution, Resolution::UnknownBarcode { .. }));
    }

    #[test]
    fn test_unoffered_label_counts_as_cancel() {
        let data = data();
        let resolver = Resolver::new(&data);

        let mut prompt = |_: &[String]| Some("AB100 - Seat Cushion - Anthracite".to_string());
        assert_eq!(
            resolver.resolve("5710000000031", &mut prompt),
            Resolution::Cancelled
        );
    }

    #[test]
    fn test_two_phase_api() {
        let data = data();
        let resolver = Resolver::new(&data);

        let ScanStep::AwaitingDisambiguation(pending) = resolver.begin("5710000000031") else {
            panic!("expected disambiguation");
        };

        assert_eq!(pending.scanned().as_str(), "5710000000031");
        assert_eq!(pending.candidates().count(), 2);

        let label = pending.labels()[1].clone();
        let resolved = pending.choose(&label).into_resolved().unwrap();
        assert_eq!(resolved.item.new_number, "AB102");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let data = data();
        let resolver = Resolver::new(&data);

        for input in ["5710000000017", "5710000000109", "5710000000116", "123"] {
            let first = resolver.resolve(input, &mut never_asked);
            let second = resolver.resolve(input, &mut never_asked);
            assert_eq!(first, second);
        }

        let first = resolver.resolve("5710000000031", &mut FakePrompt::picking(0));
        let second = resolver.resolve("5710000000031", &mut FakePrompt::picking(0));
        assert_eq!(first, second);
    }

    #[test]
    fn test_warning_messages() {
        assert_eq!(
            Resolution::InvalidFormat { input: "1".to_string() }.warning(),
            Some(("Invalid barcode", "The barcode is not valid."))
        );
        assert_eq!(
            Resolution::UnknownBarcode {
                barcode: Barcode::parse("5710000000999").unwrap()
            }
            .warning()
            .map(|(title, _)| title),
            Some("Unknown barcode")
        );
        assert_eq!(Resolution::Cancelled.warning(), None);
    }
}
