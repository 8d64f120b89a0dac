use crate::document::{Document, NodeId};
use crate::i18n::TranslationTable;
use crate::models::{Diagnostic, DiagnosticKind, Locale, Video};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    /// 16:9 thumbnail above the text
    Grid,
    /// small thumbnail beside the text, used for related videos
    Compact,
}

/// Localized strings that appear inside generated cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLabels {
    pub live_badge: String,
    pub views_suffix: String,
}

impl CardLabels {
    /// Resolves the card strings for `locale`, falling back to English and then to
    /// the key itself. Each miss is recorded.
    pub fn resolve(table: &TranslationTable, locale: Locale, diagnostics: &mut Vec<Diagnostic>) -> Self {
        let mut get = |key: &str| -> String {
            if let Some(s) = table.lookup(locale, key) {
                return s.to_string();
            }
            let message = format!("Translation key '{}' not found for language '{}'", key, locale);
            log::warn!("{}", message);
            diagnostics.push(Diagnostic { kind: DiagnosticKind::MissingTranslation, message });
            table.lookup(Locale::En, key).unwrap_or(key).to_string()
        };
        Self { live_badge: get("live_badge"), views_suffix: get("views_suffix") }
    }
}

pub fn meta_line(video: &Video, views_suffix: &str) -> String {
    format!("{}{} • {}", video.views, views_suffix, video.upload_time)
}

fn element(doc: &mut Document, parent: NodeId, tag: &str, class: &str) -> NodeId {
    let el = doc.create_element(tag);
    if !class.is_empty() {
        doc.set_attr(el, "class", class);
    }
    doc.append_child(parent, el);
    el
}

/// Builds a detached card element for `video`.
pub fn render_card(doc: &mut Document, video: &Video, style: CardStyle, labels: &CardLabels) -> NodeId {
    let grid = style == CardStyle::Grid;
    let card = doc.create_element("div");
    let class = if grid {
        "video-card bg-gray-800 rounded-xl shadow-lg cursor-pointer overflow-hidden border border-gray-700 video-card-hover"
    } else {
        "video-card bg-gray-800 rounded-xl shadow-lg cursor-pointer overflow-hidden border border-gray-700 video-card-hover flex items-start gap-3"
    };
    doc.set_attr(card, "class", class);
    doc.set_attr(card, "data-video-id", &video.id);
    doc.set_attr(card, "data-video-title", &video.title);
    doc.set_attr(card, "data-video-description", &video.description);

    let thumb_class = if grid { "thumbnail-container" } else { "w-36 h-20 flex-shrink-0 rounded-lg overflow-hidden relative" };
    let thumb = element(doc, card, "div", thumb_class);
    let img = element(doc, thumb, "img", "w-full h-full object-cover");
    doc.set_attr(img, "src", &video.thumbnail);
    doc.set_attr(img, "alt", &video.title);
    if video.is_live {
        let badge = element(doc, thumb, "span", "live-badge absolute top-2 right-2 bg-red-600 text-white text-xs font-bold px-2 py-1 rounded-md z-10");
        doc.set_text(badge, &labels.live_badge);
    }

    let info = element(doc, card, "div", if grid { "p-4" } else { "flex-1 overflow-hidden" });
    let title = element(
        doc,
        info,
        "h4",
        if grid { "font-semibold text-cyan-300 text-base line-clamp-2" } else { "font-semibold text-cyan-300 text-sm line-clamp-2" },
    );
    doc.set_text(title, &video.title);

    let channel = element(doc, info, "p", "text-gray-400 text-sm mt-1 flex items-center");
    doc.set_text(channel, &video.channel);
    if video.is_verified {
        element(doc, channel, "i", "fas fa-check-circle text-blue-400 ml-2");
    }

    let meta = element(doc, info, "p", "video-meta text-gray-500 text-xs");
    doc.set_text(meta, &meta_line(video, &labels.views_suffix));
    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn labels() -> CardLabels {
        CardLabels { live_badge: "LIVE".into(), views_suffix: " views".into() }
    }

    #[test]
    fn live_verified_card() {
        let mut doc = Document::new();
        let v = Catalog::builtin().get("v3").unwrap();
        let card = render_card(&mut doc, v, CardStyle::Grid, &labels());
        assert_eq!(doc.attr(card, "data-video-id"), Some("v3"));
        let badge = doc.elements_with_class(card, "live-badge");
        assert_eq!(badge.len(), 1);
        assert_eq!(doc.text_content(badge[0]), "LIVE");
        assert_eq!(doc.elements_by_tag(card, "i").len(), 1);
        let meta = doc.elements_with_class(card, "video-meta")[0];
        assert_eq!(doc.text_content(meta), "32K views • Streaming now");
    }

    #[test]
    fn plain_compact_card() {
        let mut doc = Document::new();
        let v = Catalog::builtin().get("v2").unwrap();
        let card = render_card(&mut doc, v, CardStyle::Compact, &labels());
        assert!(doc.has_class(card, "flex"));
        assert!(doc.elements_with_class(card, "live-badge").is_empty());
        assert!(doc.elements_by_tag(card, "i").is_empty());
    }

    #[test]
    fn labels_fall_back_to_english() {
        let mut table = TranslationTable::default();
        table.insert(Locale::En, "live_badge", "LIVE");
        table.insert(Locale::Ja, "views_suffix", " 回視聴");
        let mut diags = Vec::new();
        let l = CardLabels::resolve(&table, Locale::Ja, &mut diags);
        assert_eq!(l.live_badge, "LIVE");
        assert_eq!(l.views_suffix, " 回視聴");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::MissingTranslation);
    }
}
