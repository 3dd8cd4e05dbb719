//! Application storage schema and the rules for detecting a schema break.

use serde::{Deserialize, Serialize};

/// Number of global and local state slots an application reserves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSchema {
    pub global_ints: u64,
    pub global_bytes: u64,
    pub local_ints: u64,
    pub local_bytes: u64,
}

/// Everything fixed at creation time that bounds an application's storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSchema {
    pub schema: StateSchema,
    /// Extra 2 KiB program pages requested at creation.
    pub extra_pages: u64,
}

impl AppSchema {
    /// A schema break happens when any count grows past what `existing` reserved.
    ///
    /// Shrinking is compatible: the deployed app simply has unused slots.
    #[must_use]
    pub fn is_break_from(&self, existing: &AppSchema) -> bool {
        let new = &self.schema;
        let old = &existing.schema;
        new.global_ints > old.global_ints
            || new.global_bytes > old.global_bytes
            || new.local_ints > old.local_ints
            || new.local_bytes > old.local_bytes
            || self.extra_pages > existing.extra_pages
    }

    /// Human-readable list of the counts that grew, for error messages.
    #[must_use]
    pub fn describe_growth(&self, existing: &AppSchema) -> Vec<String> {
        let pairs = [
            ("global ints", existing.schema.global_ints, self.schema.global_ints),
            ("global bytes", existing.schema.global_bytes, self.schema.global_bytes),
            ("local ints", existing.schema.local_ints, self.schema.local_ints),
            ("local bytes", existing.schema.local_bytes, self.schema.local_bytes),
            ("extra pages", existing.extra_pages, self.extra_pages),
        ];
        pairs
            .into_iter()
            .filter(|(_, old, new)| new > old)
            .map(|(label, old, new)| format!("{label} {old} -> {new}"))
            .collect()
    }
}
