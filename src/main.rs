mod config;
mod i18n;
mod logger;
mod models;
mod site;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use lumistream_core::{Catalog, CategoryFilter, Locale, Page, PageKind, TranslationTable};

use config::{read_config, save_config};
use i18n::t;
use models::Config;
use site::{AssetSource, RunOptions, load_catalog, load_table, run_page, write_output};

#[derive(Parser)]
#[command(name = "lumistream")]
#[command(version)]
#[command(about = "Render the LumiStream Realm pages and replay clicks on them")]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file instead of the per-user lumistream.conf
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override `asset_source` (embedded, a directory, or an http(s) URL)
    #[arg(long, global = true)]
    assets: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Clone)]
struct PageArgs {
    /// Language to switch to after the initial render (en, ja, zh-TW, zh-CN)
    #[arg(short, long)]
    lang: Option<String>,

    /// Seed for the card sampler; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Element ids to click, in order
    #[arg(short, long, value_delimiter = ',')]
    click: Vec<String>,

    /// Output directory (defaults to `output_dir` from the config)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Open the written page in the browser
    #[arg(long)]
    open: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Render the browsing page
    Home {
        #[command(flatten)]
        page: PageArgs,

        /// Category tag to select, e.g. "Tech" or "All Data"
        #[arg(long)]
        category: Option<String>,
    },
    /// Render the playback page
    Watch {
        #[command(flatten)]
        page: PageArgs,

        /// Video id; the first catalog entry when omitted
        #[arg(long)]
        id: Option<String>,
    },
    /// Translation coverage per locale, relative to English
    Locales {
        /// Also list the missing keys
        #[arg(long)]
        keys: bool,
    },
    /// List the catalog
    Catalog {
        #[arg(long)]
        category: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write the effective settings to the per-user config file
    Init,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut cfg = match &cli.config {
        Some(path) => config::read_config_from(path).with_context(|| format!("reading config {}", path.display()))?,
        None => read_config(),
    };
    if let Some(assets) = &cli.assets {
        cfg.asset_source = assets.clone();
    }
    Ok(cfg)
}

fn parse_locale(code: Option<&str>) -> Result<Option<Locale>> {
    code.map(|c| Locale::from_code(c).with_context(|| format!("--lang {}", c))).transpose()
}

fn ui_locale(cfg: &Config, requested: Option<Locale>) -> Locale {
    requested.or_else(|| Locale::from_code(&cfg.default_locale).ok()).unwrap_or_default()
}

async fn render(cfg: &Config, kind: PageKind, args: &PageArgs, category: Option<String>, id: Option<String>) -> Result<()> {
    let locale = parse_locale(args.lang.as_deref())?;
    let source = AssetSource::from_setting(&cfg.asset_source)?;
    let opts = RunOptions { locale, category, video_id: id, seed: args.seed, clicks: args.click.clone() };
    let page = run_page(cfg, &source, kind, &opts).await?;

    let dir = args.out.clone().unwrap_or_else(|| PathBuf::from(&cfg.output_dir));
    let written = write_output(&page, &source, &dir).await?;
    report(&page, &written, ui_locale(cfg, locale));

    if args.open {
        let target = written.canonicalize().unwrap_or(written);
        if let Err(e) = webbrowser::open(&target.to_string_lossy()) {
            error!("Could not open browser: {}", e);
        }
    }
    Ok(())
}

fn report(page: &Page, written: &std::path::Path, lang: Locale) {
    println!("{}: {}", t("written_to", lang), written.display());
    if let Some(toast) = page.toast() {
        println!("{}: {}", t("toast", lang), toast.text);
    }
    let diags = page.diagnostics();
    if !diags.is_empty() {
        println!("{} ({}):", t("diagnostics", lang), diags.len());
        for d in diags {
            println!("  [{:?}] {}", d.kind, d.message);
        }
    }
}

fn audit(table: &TranslationTable, show_keys: bool, lang: Locale) {
    let reference = table.key_count(Locale::En);
    for locale in Locale::all() {
        let missing = table.missing_keys(Locale::En, *locale);
        let have = table.key_count(*locale);
        if missing.is_empty() {
            println!("{:<6} {:<10} {}/{} {}", locale.code(), locale.display_name(), have, reference, t("complete", lang));
        } else {
            println!("{:<6} {:<10} {}/{} {} {}", locale.code(), locale.display_name(), have, reference, missing.len(), t("missing_keys", lang));
            if show_keys {
                for k in missing {
                    println!("         {}", k);
                }
            }
        }
    }
}

fn list_catalog(catalog: &Catalog, category: Option<&str>, json: bool, lang: Locale) -> Result<()> {
    let filter = category.map(CategoryFilter::from_tag).unwrap_or_default();
    let videos: Vec<_> = catalog.filtered(&filter).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&videos)?);
        return Ok(());
    }
    for v in &videos {
        let live = if v.is_live { " [LIVE]" } else { "" };
        println!("{:<5} {:<14} {:<8} {}{}", v.id, v.category, v.views, v.title, live);
    }
    println!("{} {}", videos.len(), t("videos", lang));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli)?;
    let level = logger::level_filter(&cfg.log_level, cli.verbose);
    match logger::init(level) {
        Ok(path) => info!("lumistream {} logging to {}", env!("CARGO_PKG_VERSION"), path.display()),
        Err(e) => eprintln!("logger unavailable: {}", e),
    }
    let lang = ui_locale(&cfg, None);

    match cli.command {
        Command::Home { ref page, ref category } => render(&cfg, PageKind::Home, page, category.clone(), None).await,
        Command::Watch { ref page, ref id } => render(&cfg, PageKind::Watch, page, None, id.clone()).await,
        Command::Locales { keys } => {
            let table = load_table(&cfg).await?;
            audit(&table, keys, lang);
            Ok(())
        }
        Command::Catalog { ref category, json } => {
            let catalog = load_catalog(&cfg).await?;
            list_catalog(&catalog, category.as_deref(), json, lang)
        }
        Command::Init => {
            let path = save_config(&cfg).context("saving config")?;
            println!("{}: {}", t("written_to", lang), path.display());
            Ok(())
        }
    }
}
