use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::i18n::TranslationTable;
use crate::models::{DiagnosticKind, Locale};
use crate::page::{Page, I18N_ATTR};

/// A prepared translation request. Resolving it needs no access to the page.
#[derive(Debug)]
pub struct TranslationTicket {
    pub locale: Locale,
    pub generation: u64,
    keys: Vec<String>,
    table: Arc<TranslationTable>,
    latency: Duration,
}

#[derive(Debug, Clone)]
pub struct ResolvedTranslations {
    pub locale: Locale,
    pub generation: u64,
    values: HashMap<String, Option<String>>,
}

impl ResolvedTranslations {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_deref())
    }

    pub fn misses(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.values.iter().filter(|(_, v)| v.is_none()).map(|(k, _)| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }
}

impl TranslationTicket {
    /// Waits out the lookup latency once, then resolves every collected key.
    pub async fn resolve(self) -> ResolvedTranslations {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let values = self
            .keys
            .into_iter()
            .map(|k| {
                let v = self.table.lookup(self.locale, &k).map(|s| s.to_string());
                (k, v)
            })
            .collect();
        ResolvedTranslations { locale: self.locale, generation: self.generation, values }
    }
}

impl Page {
    /// Starts switching to `locale`: bumps the generation, records the locale
    /// and shows the loading overlay.
    pub fn begin_translation(&mut self, locale: Locale) -> TranslationTicket {
        self.generation += 1;
        self.state.locale = locale;
        if !self.table().has_locale(locale) {
            self.record(
                DiagnosticKind::MissingTranslation,
                format!("Translations for language '{}' not found", locale),
            );
        }
        self.set_loading(true);

        let mut keys: Vec<String> = self
            .doc
            .elements_with_attr(self.doc.root(), I18N_ATTR)
            .into_iter()
            .filter_map(|n| self.doc.attr(n, I18N_ATTR).map(|s| s.to_string()))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        info!("Applying language {} (generation {}, {} keys)", locale, self.generation, keys.len());
        TranslationTicket {
            locale,
            generation: self.generation,
            keys,
            table: self.table_handle(),
            latency: self.settings().translation_latency,
        }
    }

    /// Applies resolved strings if they belong to the newest request.
    /// Returns false when the result was superseded and discarded.
    pub fn commit_translation(&mut self, resolved: ResolvedTranslations) -> bool {
        if resolved.generation != self.generation {
            warn!(
                "Discarding stale translation for {} (generation {}, current {})",
                resolved.locale, resolved.generation, self.generation
            );
            return false;
        }
        let locale = resolved.locale;
        for node in self.doc.elements_with_attr(self.doc.root(), I18N_ATTR) {
            let Some(key) = self.doc.attr(node, I18N_ATTR).map(|s| s.to_string()) else { continue };
            let value = match resolved.values.get(&key) {
                Some(v) => v.clone(),
                // tagged after the ticket was prepared
                None => self.table().lookup(locale, &key).map(|s| s.to_string()),
            };
            let Some(value) = value else {
                self.record(
                    DiagnosticKind::MissingTranslation,
                    format!("Translation key '{}' not found for language '{}'", key, locale),
                );
                continue;
            };
            if self.doc.tag(node) == Some("input") && self.doc.has_attr(node, "placeholder") {
                self.doc.set_attr(node, "placeholder", &value);
            } else {
                self.doc.set_text(node, &value);
            }
        }
        if let Some(html) = self.doc.elements_by_tag(self.doc.root(), "html").into_iter().next() {
            self.doc.set_attr(html, "lang", locale.code());
        }
        self.rerender_dynamic();
        self.set_loading(false);
        info!("Language {} applied", locale);
        true
    }

    /// Prepare, resolve and commit in one step.
    pub async fn apply_locale(&mut self, locale: Locale) -> bool {
        let ticket = self.begin_translation(locale);
        let resolved = ticket.resolve().await;
        self.commit_translation(resolved)
    }

    /// Like `apply_locale` but from a markup code. Unknown codes leave the page as is.
    pub async fn apply_locale_code(&mut self, code: &str) -> bool {
        match Locale::from_code(code) {
            Ok(locale) => self.apply_locale(locale).await,
            Err(e) => {
                self.record(DiagnosticKind::MissingTranslation, format!("Cannot switch language: {}", e));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{DiagnosticKind, Locale};
    use crate::page::testing::*;
    use crate::page::{ids, PageKind};

    fn text_of(p: &crate::page::Page, id: &str) -> String {
        p.doc.text_content(p.doc.element_by_id(id).unwrap())
    }

    fn app_name(p: &crate::page::Page) -> String {
        let root = p.doc.root();
        let node = p
            .doc
            .elements_with_attr(root, "data-i18n-key")
            .into_iter()
            .find(|n| p.doc.attr(*n, "data-i18n-key") == Some("app_name"))
            .unwrap();
        p.doc.text_content(node)
    }

    #[tokio::test]
    async fn switching_to_japanese_updates_tagged_text() {
        let mut p = started(PageKind::Home).await;
        assert!(p.apply_locale(Locale::Ja).await);
        assert_eq!(app_name(&p), "LumiStream Realm");
        let search = p.doc.element_by_id("search-input").unwrap();
        assert_eq!(p.doc.attr(search, "placeholder"), Some("動画を検索..."));
        assert_eq!(p.document_title().as_deref(), Some("LumiStream Realm - 未来の動画プラットフォーム"));
        let html = p.doc.elements_by_tag(p.doc.root(), "html")[0];
        assert_eq!(p.doc.attr(html, "lang"), Some("ja"));
        let footer = p.doc.elements_by_tag(p.doc.root(), "footer")[0];
        assert_eq!(p.doc.text_content(footer).trim(), "© 2025 LumiStream Realm. 無断複写・転載を禁じます。");
        assert!(p.diagnostics().is_empty(), "{:?}", p.diagnostics());
    }

    #[tokio::test]
    async fn every_tagged_node_matches_its_table_entry() {
        for kind in [PageKind::Home, PageKind::Watch] {
            for locale in Locale::all() {
                let mut p = started(kind).await;
                assert!(p.apply_locale(*locale).await);
                let root = p.doc.root();
                let tagged = p.doc.elements_with_attr(root, "data-i18n-key");
                assert!(!tagged.is_empty());
                for node in tagged {
                    if kind == PageKind::Watch && p.doc.tag(node) == Some("title") {
                        continue;
                    }
                    let key = p.doc.attr(node, "data-i18n-key").unwrap().to_string();
                    let expected = p.table().lookup(*locale, &key).unwrap_or_else(|| panic!("{} has no {}", locale, key));
                    let shown = if p.doc.tag(node) == Some("input") && p.doc.has_attr(node, "placeholder") {
                        p.doc.attr(node, "placeholder").unwrap_or_default().to_string()
                    } else {
                        p.doc.text_content(node)
                    };
                    assert_eq!(shown, expected, "{:?} {} {}", kind, locale, key);
                }
            }
        }
    }

    #[tokio::test]
    async fn switching_to_chinese_replaces_english_labels() {
        let mut p = started(PageKind::Home).await;
        let english = p.table().lookup(Locale::En, "search_placeholder").map(|s| s.to_string());
        assert!(p.apply_locale(Locale::ZhCn).await);
        let search = p.doc.element_by_id("search-input").unwrap();
        let shown = p.doc.attr(search, "placeholder").map(|s| s.to_string());
        assert_ne!(shown, english);
        assert_eq!(shown.as_deref(), p.table().lookup(Locale::ZhCn, "search_placeholder"));
    }

    #[tokio::test]
    async fn grids_pick_up_localized_suffix() {
        let mut p = started(PageKind::Home).await;
        p.apply_locale(Locale::Ja).await;
        let grid = p.doc.element_by_id(ids::HOME_GRID).unwrap();
        let meta = p.doc.elements_with_class(grid, "video-meta");
        assert!(!meta.is_empty());
        assert!(meta.iter().all(|m| p.doc.text_content(*m).contains("回視聴")));
    }

    #[tokio::test]
    async fn missing_key_keeps_prior_text() {
        let mut p = page(PageKind::Home);
        let main = p.doc.element_by_id(ids::MAIN_CONTENT).unwrap();
        let probe = p.doc.create_element("h2");
        p.doc.set_attr(probe, "id", "probe");
        p.doc.set_attr(probe, "data-i18n-key", "no_such_key");
        p.doc.set_text(probe, "Keep me");
        p.doc.append_child(main, probe);
        p.start(&crate::assets::embedded()).await;
        p.take_diagnostics();
        p.apply_locale(Locale::Ja).await;
        assert_eq!(text_of(&p, "probe"), "Keep me");
        let d = p.diagnostics();
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].kind, DiagnosticKind::MissingTranslation);
        assert!(d[0].message.contains("no_such_key"));
    }

    #[tokio::test]
    async fn stale_commit_is_discarded() {
        let mut p = started(PageKind::Home).await;
        let first = p.begin_translation(Locale::Ja);
        let second = p.begin_translation(Locale::ZhCn);
        let newer = second.resolve().await;
        let older = first.resolve().await;
        assert!(p.commit_translation(newer));
        assert!(!p.commit_translation(older));
        let html = p.doc.elements_by_tag(p.doc.root(), "html")[0];
        assert_eq!(p.doc.attr(html, "lang"), Some("zh-CN"));
        assert_eq!(p.state.locale, Locale::ZhCn);
    }

    #[tokio::test(start_paused = true)]
    async fn overlay_shows_until_commit() {
        let mut p = started(PageKind::Watch).await;
        assert!(!p.is_loading());
        let ticket = p.begin_translation(Locale::ZhTw);
        assert!(p.is_loading());
        let resolved = ticket.resolve().await;
        assert!(p.is_loading());
        p.commit_translation(resolved);
        assert!(!p.is_loading());
    }

    #[tokio::test]
    async fn unknown_code_is_rejected() {
        let mut p = started(PageKind::Home).await;
        assert!(!p.apply_locale_code("fr").await);
        assert_eq!(p.state.locale, Locale::En);
        assert_eq!(p.diagnostics().last().unwrap().kind, DiagnosticKind::MissingTranslation);
    }
}
