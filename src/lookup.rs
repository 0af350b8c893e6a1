// 🔎 Lookup Index - Manual selection by old/new item number, name and color

use crate::catalog::{Catalog, Item};

/// Brand and material qualifiers removed from display labels, in order.
/// Each entry is removed everywhere it occurs.
pub const LABEL_NOISE: [&str; 6] = [
    " FR",
    "Palissade ",
    " textile",
    " foam",
    " for Palissade",
    " Interliner",
];

const LABEL_SEPARATOR: &str = " - ";

/// Which item number leads the display label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberMode {
    #[default]
    Old,
    New,
}

impl NumberMode {
    pub fn toggle(&self) -> Self {
        match self {
            NumberMode::Old => NumberMode::New,
            NumberMode::New => NumberMode::Old,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            NumberMode::Old => "Old item numbers",
            NumberMode::New => "New item numbers",
        }
    }

    fn number<'a>(&self, item: &'a Item) -> &'a str {
        match self {
            NumberMode::Old => &item.old_number,
            NumberMode::New => &item.new_number,
        }
    }
}

/// Build the shortened `"{number} - {name} - {color}"` label for an item
pub fn display_label(item: &Item, mode: NumberMode) -> String {
    let mut label = format!(
        "{}{}{}{}{}",
        mode.number(item),
        LABEL_SEPARATOR,
        item.name,
        LABEL_SEPARATOR,
        item.color
    );
    for noise in LABEL_NOISE {
        label = label.replace(noise, "");
    }
    label
}

/// True when every whitespace-separated term occurs in `label`, ignoring case
pub fn matches_all_terms(label: &str, query: &str) -> bool {
    let label_lower = label.to_lowercase();
    query
        .split_whitespace()
        .all(|term| label_lower.contains(&term.to_lowercase()))
}

#[derive(Debug, Clone)]
struct Entry {
    item: Item,
    old_label: String,
    new_label: String,
}

impl Entry {
    fn label(&self, mode: NumberMode) -> &str {
        match mode {
            NumberMode::Old => &self.old_label,
            NumberMode::New => &self.new_label,
        }
    }
}

/// Precomputed display labels for every catalog item, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    entries: Vec<Entry>,
}

impl LookupIndex {
    pub fn new(catalog: &Catalog) -> Self {
        let entries = catalog
            .all()
            .iter()
            .map(|item| Entry {
                item: item.clone(),
                old_label: display_label(item, NumberMode::Old),
                new_label: display_label(item, NumberMode::New),
            })
            .collect();

        LookupIndex { entries }
    }

    /// Labels whose stripped text contains every query term (AND semantics).
    /// An empty query returns every label.
    pub fn search(&self, query: &str, mode: NumberMode) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.label(mode))
            .filter(|label| matches_all_terms(label, query))
            .map(str::to_string)
            .collect()
    }

    /// Map a displayed label back to its item via the leading number token.
    /// The first catalog item carrying that number wins.
    pub fn select(&self, label: &str, mode: NumberMode) -> Option<&Item> {
        let number = label
            .split_once(LABEL_SEPARATOR)
            .map(|(number, _)| number)
            .unwrap_or(label)
            .trim();

        self.entries
            .iter()
            .map(|entry| &entry.item)
            .find(|item| mode.number(item) == number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
