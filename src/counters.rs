//! Per-run outcome accumulators.
//!
//! A [`BatchCounters`] value is owned exclusively by one batch run, reset at
//! construction, and never persisted across runs. At the end of a completed
//! run every category satisfies `found == succeeded + skipped + errored`.

use std::collections::BTreeMap;

use serde_json::{Value, json};

/// Counts for one category (extension family) of files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Eligible files seen by the scan.
    pub found: u64,
    /// Files transformed successfully.
    pub succeeded: u64,
    /// Files skipped by policy (missing tags, collisions, no-op strips).
    pub skipped: u64,
    /// Files that failed with a recoverable per-file error.
    pub errored: u64,
}

impl Tally {
    /// `found == succeeded + skipped + errored`.
    pub fn is_balanced(&self) -> bool {
        self.found == self.succeeded + self.skipped + self.errored
    }
}

/// Per-category accumulator for one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchCounters {
    categories: BTreeMap<String, Tally>,
}

impl BatchCounters {
    /// Create a zeroed accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    fn tally(&mut self, category: &str) -> &mut Tally {
        self.categories.entry(category.to_string()).or_default()
    }

    /// Record that an eligible file was found.
    pub fn found(&mut self, category: &str) {
        self.tally(category).found += 1;
    }

    /// Record a successful transform.
    pub fn succeeded(&mut self, category: &str) {
        self.tally(category).succeeded += 1;
    }

    /// Record a policy skip.
    pub fn skipped(&mut self, category: &str) {
        self.tally(category).skipped += 1;
    }

    /// Record a per-file recoverable error.
    pub fn errored(&mut self, category: &str) {
        self.tally(category).errored += 1;
    }

    /// Iterate categories in lexicographic order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &Tally)> {
        self.categories
            .iter()
            .map(|(category, tally)| (category.as_str(), tally))
    }

    /// Sum across all categories.
    pub fn totals(&self) -> Tally {
        let mut totals = Tally::default();
        for tally in self.categories.values() {
            totals.found += tally.found;
            totals.succeeded += tally.succeeded;
            totals.skipped += tally.skipped;
            totals.errored += tally.errored;
        }
        totals
    }

    /// Every category (and therefore the totals) is balanced.
    pub fn is_balanced(&self) -> bool {
        self.categories.values().all(Tally::is_balanced)
    }

    /// Machine-readable summary for the CLI's `--json` mode.
    pub fn to_json(&self) -> Value {
        let totals = self.totals();
        json!({
            "categories": self
                .categories
                .iter()
                .map(|(category, tally)| {
                    (
                        category.clone(),
                        json!({
                            "found": tally.found,
                            "succeeded": tally.succeeded,
                            "skipped": tally.skipped,
                            "errored": tally.errored,
                        }),
                    )
                })
                .collect::<serde_json::Map<_, _>>(),
            "totals": {
                "found": totals.found,
                "succeeded": totals.succeeded,
                "skipped": totals.skipped,
                "errored": totals.errored,
            },
        })
    }
}
