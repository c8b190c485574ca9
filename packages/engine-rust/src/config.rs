use serde::Deserialize;

/// Engine-level configuration.
///
/// Controls pagination defaults and the descriptor cache bound.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Page used when a request carries none (1-based).
    pub default_page: usize,
    /// Page size used when a request carries none.
    pub default_size: usize,
    /// Upper bound applied to any requested page size. `None` = no clamp.
    pub max_page_size: Option<usize>,
    /// Maximum entries per descriptor cache. `None` = unbounded.
    pub cache_capacity: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_size: 100,
            max_page_size: None,
            cache_capacity: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_page, 1);
        assert_eq!(config.default_size, 100);
        assert!(config.max_page_size.is_none());
        assert!(config.cache_capacity.is_none());
    }

    #[test]
    fn engine_config_partial_json_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"defaultSize": 25, "cacheCapacity": 512}"#).unwrap();
        assert_eq!(config.default_page, 1);
        assert_eq!(config.default_size, 25);
        assert_eq!(config.cache_capacity, Some(512));
        assert!(config.max_page_size.is_none());
    }
}
