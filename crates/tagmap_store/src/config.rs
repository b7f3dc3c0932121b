//! Store configuration.

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether decoding the backing file rejects unknown envelope tags
    /// instead of falling back to their raw payload.
    pub strict_decode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict_decode: false,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to reject unknown envelope tags when loading.
    #[must_use]
    pub const fn strict_decode(mut self, value: bool) -> Self {
        self.strict_decode = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(!config.strict_decode);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new().strict_decode(true);
        assert!(config.strict_decode);
    }
}
