use crate::{DocumentKind, NumberingScheme};

/// Per-store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Prefix of generated numbers, e.g. `CON` in `CON-2025-0001`.
    pub prefix: String,
    pub scheme: NumberingScheme,
    /// How many date/random candidates a save may try before giving up on
    /// finding a free number. Sequential numbering is not bounded by this.
    pub max_number_attempts: u32,
}

impl StoreConfig {
    /// Defaults for a kind: its default prefix, sequential numbering.
    pub fn for_kind(kind: DocumentKind) -> Self {
        Self {
            prefix: kind.default_prefix().to_string(),
            scheme: NumberingScheme::Sequential,
            max_number_attempts: 16,
        }
    }

    /// Set the number prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the numbering scheme.
    pub fn with_scheme(mut self, scheme: NumberingScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set the cap on date/random candidates tried per save. Clamped to at least one.
    pub fn with_max_number_attempts(mut self, attempts: u32) -> Self {
        self.max_number_attempts = attempts.max(1);
        self
    }
}
