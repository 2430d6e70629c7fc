//! Export configuration.

use serde::{Deserialize, Serialize};

/// Controls which optional fields are written by the exporters.
///
/// Sender, date, time and text are always written.
///
/// # Example
///
/// ```rust
/// use chatarchive::core::OutputConfig;
///
/// let config = OutputConfig::new().with_ids().with_media();
/// assert!(config.include_ids);
/// assert!(!config.include_timestamps);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Include the computed timestamp (ISO 8601, UTC)
    pub include_timestamps: bool,
    /// Include message ids
    pub include_ids: bool,
    /// Include the resolved media kind and file name
    pub include_media: bool,
}

impl OutputConfig {
    /// Creates a configuration with every optional field off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration with every optional field on.
    pub fn all() -> Self {
        Self {
            include_timestamps: true,
            include_ids: true,
            include_media: true,
        }
    }

    /// Enables timestamps.
    #[must_use]
    pub fn with_timestamps(mut self) -> Self {
        self.include_timestamps = true;
        self
    }

    /// Enables message ids.
    #[must_use]
    pub fn with_ids(mut self) -> Self {
        self.include_ids = true;
        self
    }

    /// Enables media columns.
    #[must_use]
    pub fn with_media(mut self) -> Self {
        self.include_media = true;
        self
    }
}
