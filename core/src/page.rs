//! Page session: the document plus explicit UI state for one page load.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::time::Instant;

use crate::card::{CardLabels, CardStyle};
use crate::catalog::Catalog;
use crate::document::{Document, NodeId};
use crate::grid::{fill_grid, GridRegion};
use crate::i18n::{fetch_translation, format_message, missing_message, TranslationTable};
use crate::loader::{load_component, FragmentSource};
use crate::models::{CategoryFilter, Diagnostic, DiagnosticKind, Locale, Toggle};
use crate::sampler::RandomSource;

/// Element ids that form the contract between markup and code.
pub mod ids {
    pub const SIDEBAR_CONTAINER: &str = "sidebar-container";
    pub const ACCOUNT_MENU_CONTAINER: &str = "account-menu-container";
    pub const LOADING_OVERLAY_CONTAINER: &str = "loading-overlay-container";
    pub const LOADING_OVERLAY: &str = "loading-overlay";
    pub const MAIN_CONTENT: &str = "main-content";
    pub const MESSAGE_BOX: &str = "message-box";
    pub const BACKDROP: &str = "overlay";
    pub const SIDEBAR: &str = "sidebar";
    pub const SIDEBAR_TOGGLE: &str = "sidebar-toggle";
    pub const USER_AVATAR: &str = "user-avatar";
    pub const ACCOUNT_MENU: &str = "account-menu";
    pub const LANGUAGE_OPTION: &str = "language-option";
    pub const LANGUAGE_SUBMENU: &str = "language-submenu";
    pub const CATEGORY_TAGS: &str = "category-tags";
    pub const HOME_GRID: &str = "home-video-grid";
    pub const TRENDING_GRID: &str = "trending-video-grid";
    pub const MUSIC_GRID: &str = "music-video-grid";
    pub const RELATED_GRID: &str = "related-videos-grid";
    pub const PLAYER: &str = "youtube-player";
    pub const VIDEO_TITLE: &str = "video-title";
    pub const CHANNEL_AVATAR: &str = "channel-avatar";
    pub const CHANNEL_NAME: &str = "channel-name";
    pub const CHANNEL_SUBSCRIBERS: &str = "channel-subscribers";
    pub const VIDEO_META: &str = "video-meta";
    pub const VIDEO_DESCRIPTION: &str = "video-description";
    pub const LIKE_BUTTON: &str = "like-button";
    pub const DISLIKE_BUTTON: &str = "dislike-button";
    pub const SHARE_BUTTON: &str = "share-button";
    pub const SAVE_BUTTON: &str = "save-button";
    pub const SUBSCRIBE_BUTTON: &str = "subscribe-button";
    pub const LIKE_COUNT: &str = "like-count";
    pub const DISLIKE_COUNT: &str = "dislike-count";
}

pub mod paths {
    pub const HOME_SHELL: &str = "index.html";
    pub const WATCH_SHELL: &str = "watch.html";
    pub const SIDEBAR: &str = "components/sidebar.html";
    pub const ACCOUNT_MENU: &str = "components/account_menu.html";
    pub const LOADING_OVERLAY: &str = "components/loading_overlay.html";
}

pub const I18N_ATTR: &str = "data-i18n-key";
pub const SHOW: &str = "show";
pub const SITE_NAME: &str = "LumiStream Realm";
/// Below this viewport width the home sidebar floats and starts hidden.
pub const MOBILE_BREAKPOINT: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Watch,
}

impl PageKind {
    pub fn shell_path(&self) -> &'static str {
        match self {
            PageKind::Home => paths::HOME_SHELL,
            PageKind::Watch => paths::WATCH_SHELL,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageSettings {
    pub translation_latency: Duration,
    pub toast_duration: Duration,
    pub home_grid_count: usize,
    pub trending_grid_count: usize,
    pub music_grid_count: usize,
    pub related_count: usize,
    pub viewport_width: u32,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            translation_latency: Duration::from_millis(100),
            toast_duration: Duration::from_millis(2000),
            home_grid_count: 10,
            trending_grid_count: 5,
            music_grid_count: 5,
            related_count: 6,
            viewport_width: 768,
        }
    }
}

impl PageSettings {
    pub fn home_regions(&self) -> Vec<GridRegion> {
        vec![
            GridRegion::new(ids::HOME_GRID, self.home_grid_count, CardStyle::Grid),
            GridRegion::new(ids::TRENDING_GRID, self.trending_grid_count, CardStyle::Grid),
            GridRegion::new(ids::MUSIC_GRID, self.music_grid_count, CardStyle::Grid),
        ]
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport_width < MOBILE_BREAKPOINT
    }
}

/// Ephemeral state of one page load.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub locale: Locale,
    pub category: CategoryFilter,
    pub sidebar: Toggle,
    pub account_menu: Toggle,
    pub language_menu: Toggle,
    /// Relative location, e.g. `watch.html?id=v3`
    pub location: String,
    pub history: Vec<String>,
    pub current_video: Option<String>,
    pub like_count: u32,
    pub dislike_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub expires_at: Instant,
}

/// Elements the interaction controller attaches to.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bindings {
    pub sidebar: Option<NodeId>,
    pub sidebar_toggle: Option<NodeId>,
    pub user_avatar: Option<NodeId>,
    pub account_menu: Option<NodeId>,
    pub language_option: Option<NodeId>,
    pub language_submenu: Option<NodeId>,
    pub main_content: Option<NodeId>,
    pub backdrop: Option<NodeId>,
    pub message_box: Option<NodeId>,
    pub loading_overlay: Option<NodeId>,
    pub category_tags: Option<NodeId>,
    pub related_grid: Option<NodeId>,
}

/// Proof that the layout fragments have been inserted.
#[derive(Debug)]
pub struct LayoutReady {
    pub loading_overlay: Option<NodeId>,
}

pub struct Page {
    pub doc: Document,
    pub state: UiState,
    kind: PageKind,
    catalog: Arc<Catalog>,
    table: Arc<TranslationTable>,
    settings: PageSettings,
    pub(crate) rng: Box<dyn RandomSource + Send>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) generation: u64,
    pub(crate) bindings: Bindings,
    toast: Option<Toast>,
}

impl Page {
    pub fn new(
        kind: PageKind,
        shell_html: &str,
        catalog: Arc<Catalog>,
        table: Arc<TranslationTable>,
        settings: PageSettings,
        rng: Box<dyn RandomSource + Send>,
    ) -> Self {
        let state = UiState { location: kind.shell_path().to_string(), ..Default::default() };
        Self {
            doc: Document::parse(shell_html),
            state,
            kind,
            catalog,
            table,
            settings,
            rng,
            diagnostics: Vec::new(),
            generation: 0,
            bindings: Bindings::default(),
            toast: None,
        }
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.state.location = location.to_string();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.state.locale = locale;
        self
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    pub(crate) fn catalog_handle(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    pub(crate) fn table_handle(&self) -> Arc<TranslationTable> {
        Arc::clone(&self.table)
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub(crate) fn record(&mut self, kind: DiagnosticKind, message: String) {
        match kind {
            DiagnosticKind::MissingTranslation => warn!("{}", message),
            _ => error!("{}", message),
        }
        self.diagnostics.push(Diagnostic { kind, message });
    }

    /// Localized string for the current locale; a miss falls back to English, then the key.
    pub fn localized(&mut self, key: &str) -> String {
        let locale = self.state.locale;
        if let Some(s) = self.table.lookup(locale, key) {
            return s.to_string();
        }
        let fallback = self.table.lookup(Locale::En, key).unwrap_or(key).to_string();
        self.record(
            DiagnosticKind::MissingTranslation,
            format!("Translation key '{}' not found for language '{}'", key, locale),
        );
        fallback
    }

    /// Loads the layout fragments into their placeholders.
    pub async fn load_layout<S: FragmentSource>(&mut self, source: &S) -> LayoutReady {
        let mut targets = vec![
            (ids::SIDEBAR_CONTAINER, paths::SIDEBAR),
            (ids::ACCOUNT_MENU_CONTAINER, paths::ACCOUNT_MENU),
        ];
        if self.kind == PageKind::Watch {
            targets.push((ids::LOADING_OVERLAY_CONTAINER, paths::LOADING_OVERLAY));
        }
        let mut loading_overlay = None;
        for (container_id, path) in targets {
            info!("Loading component {} into #{}", path, container_id);
            let container = self.doc.element_by_id(container_id);
            let first = load_component(&mut self.doc, container, path, source, &mut self.diagnostics).await;
            if path == paths::LOADING_OVERLAY {
                loading_overlay = first;
            }
        }
        LayoutReady { loading_overlay }
    }

    /// Resolves the interactive elements and puts every widget in its initial state.
    pub fn bind(&mut self, ready: LayoutReady) {
        let find = |doc: &Document, id: &str| doc.element_by_id(id);
        let doc = &self.doc;
        let mut b = Bindings {
            sidebar: find(doc, ids::SIDEBAR),
            sidebar_toggle: find(doc, ids::SIDEBAR_TOGGLE),
            user_avatar: find(doc, ids::USER_AVATAR),
            account_menu: find(doc, ids::ACCOUNT_MENU),
            language_option: find(doc, ids::LANGUAGE_OPTION),
            language_submenu: find(doc, ids::LANGUAGE_SUBMENU),
            main_content: find(doc, ids::MAIN_CONTENT),
            backdrop: find(doc, ids::BACKDROP),
            message_box: find(doc, ids::MESSAGE_BOX),
            loading_overlay: ready.loading_overlay,
            category_tags: find(doc, ids::CATEGORY_TAGS),
            related_grid: find(doc, ids::RELATED_GRID),
        };
        if b.loading_overlay.is_none() && self.kind == PageKind::Home {
            b.loading_overlay = find(doc, ids::LOADING_OVERLAY);
        }

        let mut required = vec![
            ("sidebar", b.sidebar),
            ("sidebar toggle", b.sidebar_toggle),
            ("user avatar", b.user_avatar),
            ("account menu", b.account_menu),
            ("language option", b.language_option),
            ("language submenu", b.language_submenu),
            ("main content", b.main_content),
            ("message box", b.message_box),
            ("loading overlay", b.loading_overlay),
        ];
        match self.kind {
            PageKind::Home => required.push(("category tags", b.category_tags)),
            PageKind::Watch => {
                required.push(("sidebar backdrop", b.backdrop));
                required.push(("related videos grid", b.related_grid));
            }
        }
        let missing: Vec<&str> = required.iter().filter(|(_, n)| n.is_none()).map(|(name, _)| *name).collect();
        self.bindings = b;
        for name in missing {
            self.record(DiagnosticKind::MissingTarget, format!("{} element not found; dependent wiring skipped", name));
        }

        self.state.account_menu = Toggle::Closed;
        self.state.language_menu = Toggle::Closed;
        self.state.sidebar = match self.kind {
            PageKind::Home if !self.settings.is_mobile() => Toggle::Open,
            _ => Toggle::Closed,
        };
        if let (PageKind::Watch, Some(sidebar)) = (self.kind, b.sidebar) {
            self.doc.add_class(sidebar, "video-page-sidebar-floating");
        }
        if self.kind == PageKind::Home {
            let filter = self.state.category.clone();
            self.highlight_category(&filter);
        }
        self.sync_widgets();
        debug!("bindings resolved: {:?}", self.bindings);
    }

    /// Fetches the shell-independent layout, binds, and renders the initial locale.
    pub async fn start<S: FragmentSource>(&mut self, source: &S) {
        let ready = self.load_layout(source).await;
        self.bind(ready);
        let locale = self.state.locale;
        self.apply_locale(locale).await;
    }

    /// Mirrors the widget toggles into CSS classes.
    pub fn sync_widgets(&mut self) {
        let b = self.bindings;
        if let Some(menu) = b.account_menu {
            self.doc.set_class(menu, SHOW, self.state.account_menu.is_open());
        }
        if let Some(sub) = b.language_submenu {
            self.doc.set_class(sub, SHOW, self.state.language_menu.is_open());
        }
        if let Some(sidebar) = b.sidebar {
            let open = self.state.sidebar.is_open();
            match self.kind {
                PageKind::Home => self.doc.set_class(sidebar, "hidden-mobile", !open),
                PageKind::Watch => {
                    self.doc.set_class(sidebar, "collapsed", !open);
                    if let Some(backdrop) = b.backdrop {
                        self.doc.set_class(backdrop, SHOW, open);
                    }
                }
            }
        }
    }

    pub(crate) fn set_loading(&mut self, on: bool) {
        if let Some(overlay) = self.bindings.loading_overlay {
            self.doc.set_class(overlay, SHOW, on);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.bindings.loading_overlay.is_some_and(|o| self.doc.has_class(o, SHOW))
    }

    /// Re-renders everything generated from the catalog.
    pub fn rerender_dynamic(&mut self) {
        match self.kind {
            PageKind::Home => self.render_grids(),
            PageKind::Watch => self.reload_watch(),
        }
    }

    /// Renders each home grid region with the current category.
    pub fn render_grids(&mut self) {
        let labels = CardLabels::resolve(&self.table, self.state.locale, &mut self.diagnostics);
        for region in self.settings.home_regions() {
            let Some(container) = self.doc.element_by_id(&region.element_id) else {
                self.record(
                    DiagnosticKind::MissingTarget,
                    format!("Video grid container #{} not found. Cannot render videos.", region.element_id),
                );
                continue;
            };
            let ids = fill_grid(
                &mut self.doc,
                container,
                &self.catalog,
                region.count,
                &self.state.category,
                region.style,
                &labels,
                &mut *self.rng,
            );
            debug!("#{} rendered {:?}", region.element_id, ids);
        }
    }

    pub(crate) fn highlight_category(&mut self, filter: &CategoryFilter) {
        let Some(container) = self.bindings.category_tags else { return };
        for tag in self.doc.elements_with_class(container, "category-tag") {
            let active = self.doc.attr(tag, "data-category") == Some(filter.tag_value());
            for c in ["border-cyan-400", "bg-cyan-900"] {
                self.doc.set_class(tag, c, active);
            }
            for c in ["bg-gray-700", "border-gray-600"] {
                self.doc.set_class(tag, c, !active);
            }
        }
    }

    /// Shows a localized toast; returns the text shown.
    pub async fn show_message(&mut self, key: &str, params: &[(&str, &str)]) -> String {
        let latency = self.settings.translation_latency;
        let text = match fetch_translation(&self.table, self.state.locale, key, latency).await {
            Some(template) => format_message(&template, params),
            None => {
                self.record(
                    DiagnosticKind::MissingTranslation,
                    format!("Translation key '{}' not found for language '{}'", key, self.state.locale),
                );
                missing_message(key)
            }
        };
        match self.bindings.message_box {
            Some(b) => {
                self.doc.set_text(b, &text);
                self.doc.add_class(b, SHOW);
                self.toast = Some(Toast { text: text.clone(), expires_at: Instant::now() + self.settings.toast_duration });
            }
            None => self.record(
                DiagnosticKind::MissingTarget,
                "Message box element not found. Cannot display message.".to_string(),
            ),
        }
        text
    }

    /// Hides the toast once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
            if let Some(b) = self.bindings.message_box {
                self.doc.remove_class(b, SHOW);
            }
        }
    }

    pub fn document_title(&self) -> Option<String> {
        let t = self.doc.elements_by_tag(self.doc.root(), "title").into_iter().next()?;
        Some(self.doc.text_content(t))
    }

    pub(crate) fn set_document_title(&mut self, title: &str) {
        if let Some(t) = self.doc.elements_by_tag(self.doc.root(), "title").into_iter().next() {
            self.doc.set_text(t, title);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::assets;
    use crate::sampler::XorShift64;

    pub fn settings() -> PageSettings {
        PageSettings { translation_latency: Duration::ZERO, ..Default::default() }
    }

    pub fn page(kind: PageKind) -> Page {
        let shell = match kind {
            PageKind::Home => assets::INDEX_HTML,
            PageKind::Watch => assets::WATCH_HTML,
        };
        Page::new(
            kind,
            shell,
            Arc::new(Catalog::builtin().clone()),
            Arc::new(TranslationTable::builtin().clone()),
            settings(),
            Box::new(XorShift64::new(1234)),
        )
    }

    pub async fn started(kind: PageKind) -> Page {
        let mut p = page(kind);
        p.start(&assets::embedded()).await;
        p
    }
}
