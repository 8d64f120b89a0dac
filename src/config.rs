use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::models::Config;

const FILE_NAME: &str = "lumistream.conf";

fn config_file_path() -> PathBuf {
    match directories::ProjectDirs::from("com", "lumistream", "LumiStream") {
        Some(dirs) => dirs.config_dir().join(FILE_NAME),
        None => PathBuf::from(FILE_NAME),
    }
}

/// Parses `key=value` lines on top of the defaults. Unknown keys and
/// unparsable values are ignored.
pub fn parse_config(content: &str) -> Config {
    let mut cfg = Config::default();
    let d = Config::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((k, v)) = line.split_once('=') {
            let v = v.trim();
            match k.trim() {
                "asset_source" => cfg.asset_source = v.to_string(),
                "default_locale" => cfg.default_locale = v.to_string(),
                "translation_latency_ms" => cfg.translation_latency_ms = v.parse::<u64>().unwrap_or(d.translation_latency_ms),
                "toast_ms" => cfg.toast_ms = v.parse::<u64>().unwrap_or(d.toast_ms),
                "home_grid_count" => cfg.home_grid_count = v.parse::<usize>().unwrap_or(d.home_grid_count),
                "trending_grid_count" => cfg.trending_grid_count = v.parse::<usize>().unwrap_or(d.trending_grid_count),
                "music_grid_count" => cfg.music_grid_count = v.parse::<usize>().unwrap_or(d.music_grid_count),
                "related_count" => cfg.related_count = v.parse::<usize>().unwrap_or(d.related_count),
                "viewport_width" => cfg.viewport_width = v.parse::<u32>().unwrap_or(d.viewport_width),
                "catalog_file" => cfg.catalog_file = v.to_string(),
                "translations_file" => cfg.translations_file = v.to_string(),
                "output_dir" => cfg.output_dir = v.to_string(),
                "log_level" => cfg.log_level = v.to_string(),
                _ => {}
            }
        }
    }
    if cfg.asset_source.is_empty() {
        cfg.asset_source = d.asset_source;
    }
    cfg
}

pub fn read_config_from(path: &Path) -> Result<Config, io::Error> {
    Ok(parse_config(&fs::read_to_string(path)?))
}

/// Reads the user config, falling back to `./lumistream.conf`, then to defaults.
pub fn read_config() -> Config {
    let primary = config_file_path();
    match read_config_from(&primary) {
        Ok(cfg) => cfg,
        Err(_) => read_config_from(Path::new(FILE_NAME)).unwrap_or_default(),
    }
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut f = fs::File::create(path)?;
    writeln!(f, "asset_source={}", cfg.asset_source)?;
    writeln!(f, "default_locale={}", cfg.default_locale)?;
    writeln!(f, "translation_latency_ms={}", cfg.translation_latency_ms)?;
    writeln!(f, "toast_ms={}", cfg.toast_ms)?;
    writeln!(f, "home_grid_count={}", cfg.home_grid_count)?;
    writeln!(f, "trending_grid_count={}", cfg.trending_grid_count)?;
    writeln!(f, "music_grid_count={}", cfg.music_grid_count)?;
    writeln!(f, "related_count={}", cfg.related_count)?;
    writeln!(f, "viewport_width={}", cfg.viewport_width)?;
    if !cfg.catalog_file.is_empty() { writeln!(f, "catalog_file={}", cfg.catalog_file)?; }
    if !cfg.translations_file.is_empty() { writeln!(f, "translations_file={}", cfg.translations_file)?; }
    writeln!(f, "output_dir={}", cfg.output_dir)?;
    writeln!(f, "log_level={}", cfg.log_level)?;
    Ok(())
}

pub fn save_config(cfg: &Config) -> Result<PathBuf, io::Error> {
    let path = config_file_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys_and_keeps_defaults() {
        let cfg = parse_config(
            "# site\nasset_source = ./site\ndefault_locale=ja\nhome_grid_count=4\nviewport_width=wide\nunknown=1\n",
        );
        assert_eq!(cfg.asset_source, "./site");
        assert_eq!(cfg.default_locale, "ja");
        assert_eq!(cfg.home_grid_count, 4);
        assert_eq!(cfg.viewport_width, 768);
        assert_eq!(cfg.toast_ms, 2000);
    }

    #[test]
    fn empty_asset_source_means_embedded() {
        assert_eq!(parse_config("asset_source=\n").asset_source, "embedded");
    }

    #[test]
    fn save_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILE_NAME);
        let cfg = Config { related_count: 3, catalog_file: "videos.json".into(), ..Config::default() };
        save_config_to(&cfg, &path).unwrap();
        assert_eq!(read_config_from(&path).unwrap(), cfg);
    }
}
