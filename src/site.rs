use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::{info, warn};
use lumistream_core::assets;
use lumistream_core::player::watch_location;
use lumistream_core::{
    Catalog, CategoryFilter, DirSource, FragmentSource, HttpSource, LoadError, Locale, MemorySource, Page, PageKind, PageSettings,
    RandomSource, TranslationTable, XorShift64,
};

use crate::models::Config;

/// Where shells and fragments are read from, chosen by `asset_source`.
pub enum AssetSource {
    Embedded(MemorySource),
    Dir(DirSource),
    Http(HttpSource),
}

impl AssetSource {
    pub fn from_setting(setting: &str) -> Result<Self> {
        let setting = setting.trim();
        if setting.is_empty() || setting == "embedded" {
            return Ok(AssetSource::Embedded(assets::embedded()));
        }
        if let Ok(u) = url::Url::parse(setting) {
            if matches!(u.scheme(), "http" | "https") {
                let src = HttpSource::new(setting).with_context(|| format!("invalid asset URL {}", setting))?;
                return Ok(AssetSource::Http(src));
            }
        }
        let dir = Path::new(setting);
        if !dir.is_dir() {
            bail!("asset directory {} does not exist", dir.display());
        }
        Ok(AssetSource::Dir(DirSource::new(dir)))
    }

    pub fn describe(&self) -> &'static str {
        match self {
            AssetSource::Embedded(_) => "embedded",
            AssetSource::Dir(_) => "directory",
            AssetSource::Http(_) => "http",
        }
    }
}

impl FragmentSource for AssetSource {
    async fn fetch(&self, path: &str) -> Result<String, LoadError> {
        match self {
            AssetSource::Embedded(s) => s.fetch(path).await,
            AssetSource::Dir(s) => s.fetch(path).await,
            AssetSource::Http(s) => s.fetch(path).await,
        }
    }
}

pub async fn load_catalog(cfg: &Config) -> Result<Arc<Catalog>> {
    if cfg.catalog_file.trim().is_empty() {
        return Ok(Arc::new(Catalog::builtin().clone()));
    }
    let body = tokio::fs::read_to_string(&cfg.catalog_file)
        .await
        .with_context(|| format!("reading catalog {}", cfg.catalog_file))?;
    let catalog = Catalog::from_json(&body).with_context(|| format!("parsing catalog {}", cfg.catalog_file))?;
    info!("Loaded {} videos from {}", catalog.len(), cfg.catalog_file);
    Ok(Arc::new(catalog))
}

pub async fn load_table(cfg: &Config) -> Result<Arc<TranslationTable>> {
    if cfg.translations_file.trim().is_empty() {
        return Ok(Arc::new(TranslationTable::builtin().clone()));
    }
    let body = tokio::fs::read_to_string(&cfg.translations_file)
        .await
        .with_context(|| format!("reading translations {}", cfg.translations_file))?;
    let table = TranslationTable::from_json(&body)
        .with_context(|| format!("parsing translations {}", cfg.translations_file))?;
    Ok(Arc::new(table))
}

pub fn page_settings(cfg: &Config) -> PageSettings {
    PageSettings {
        translation_latency: Duration::from_millis(cfg.translation_latency_ms),
        toast_duration: Duration::from_millis(cfg.toast_ms),
        home_grid_count: cfg.home_grid_count,
        trending_grid_count: cfg.trending_grid_count,
        music_grid_count: cfg.music_grid_count,
        related_count: cfg.related_count,
        viewport_width: cfg.viewport_width,
    }
}

/// What to render and which clicks to replay.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub locale: Option<Locale>,
    pub category: Option<String>,
    pub video_id: Option<String>,
    pub seed: Option<u64>,
    pub clicks: Vec<String>,
}

fn random_source(seed: Option<u64>) -> Box<dyn RandomSource + Send> {
    match seed {
        Some(s) => Box::new(XorShift64::new(s)),
        None => Box::new(XorShift64::from_entropy()),
    }
}

pub async fn run_page(cfg: &Config, source: &AssetSource, kind: PageKind, opts: &RunOptions) -> Result<Page> {
    let catalog = load_catalog(cfg).await?;
    let table = load_table(cfg).await?;
    let shell = source
        .fetch(kind.shell_path())
        .await
        .with_context(|| format!("loading page shell {} from {} source", kind.shell_path(), source.describe()))?;

    let default_locale = match Locale::from_code(&cfg.default_locale) {
        Ok(l) => l,
        Err(e) => {
            warn!("{}; using en", e);
            Locale::En
        }
    };
    let location = match (kind, &opts.video_id) {
        (PageKind::Watch, Some(id)) => watch_location(id),
        _ => kind.shell_path().to_string(),
    };
    let mut page = Page::new(kind, &shell, catalog, table, page_settings(cfg), random_source(opts.seed))
        .with_location(&location)
        .with_locale(default_locale);
    page.start(source).await;

    if let Some(locale) = opts.locale {
        if locale != page.state.locale {
            page.apply_locale(locale).await;
        }
    }
    if let Some(category) = &opts.category {
        let wanted = CategoryFilter::from_tag(category);
        let tag = page.bindings().category_tags.and_then(|tags| {
            page.doc
                .elements_with_attr(tags, "data-category")
                .into_iter()
                .find(|n| page.doc.attr(*n, "data-category").map(CategoryFilter::from_tag).as_ref() == Some(&wanted))
        });
        match tag {
            Some(tag) => page.dispatch_click(tag).await,
            None => bail!("no category tag \"{}\" on this page", category),
        }
    }
    for id in &opts.clicks {
        if !page.click_id(id).await {
            warn!("Skipping click on missing element #{}", id);
        }
    }
    Ok(page)
}

/// Writes the rendered document (and the stylesheet when available) into `dir`.
pub async fn write_output(page: &Page, source: &AssetSource, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await.with_context(|| format!("creating {}", dir.display()))?;
    let out = dir.join(page.kind().shell_path());
    tokio::fs::write(&out, page.doc.to_html()).await.with_context(|| format!("writing {}", out.display()))?;
    match source.fetch("style.css").await {
        Ok(css) => {
            let css_path = dir.join("style.css");
            tokio::fs::write(&css_path, css).await.with_context(|| format!("writing {}", css_path.display()))?;
        }
        Err(e) => warn!("Stylesheet not copied: {}", e),
    }
    info!("Page written to {}", out.display());
    Ok(out)
}
