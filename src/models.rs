use serde::{Deserialize, Serialize};

/// Settings read from `lumistream.conf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// `embedded`, a directory path, or an http(s) base URL
    pub asset_source: String,
    pub default_locale: String,
    pub translation_latency_ms: u64,
    pub toast_ms: u64,
    pub home_grid_count: usize,
    pub trending_grid_count: usize,
    pub music_grid_count: usize,
    pub related_count: usize,
    pub viewport_width: u32,
    pub catalog_file: String,
    pub translations_file: String,
    pub output_dir: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_source: "embedded".to_string(),
            default_locale: "en".to_string(),
            translation_latency_ms: 100,
            toast_ms: 2000,
            home_grid_count: 10,
            trending_grid_count: 5,
            music_grid_count: 5,
            related_count: 6,
            viewport_width: 768,
            catalog_file: String::new(),
            translations_file: String::new(),
            output_dir: "site-out".to_string(),
            log_level: "info".to_string(),
        }
    }
}
