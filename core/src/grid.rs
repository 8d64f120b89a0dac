use crate::card::{render_card, CardLabels, CardStyle};
use crate::catalog::Catalog;
use crate::document::{Document, NodeId};
use crate::models::{CategoryFilter, Video};
use crate::sampler::{sample, RandomSource};

/// A grid container on the page and how many cards it shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRegion {
    pub element_id: String,
    pub count: usize,
    pub style: CardStyle,
}

impl GridRegion {
    pub fn new(element_id: &str, count: usize, style: CardStyle) -> Self {
        Self { element_id: element_id.to_string(), count, style }
    }
}

/// Replaces the content of `container` with one card per video, in order.
pub fn render_grid(doc: &mut Document, container: NodeId, videos: &[&Video], style: CardStyle, labels: &CardLabels) -> Vec<String> {
    doc.clear_children(container);
    let mut ids = Vec::with_capacity(videos.len());
    for v in videos {
        let card = render_card(doc, v, style, labels);
        doc.append_child(container, card);
        ids.push(v.id.clone());
    }
    ids
}

/// Samples up to `count` videos matching `filter` and renders them into `container`.
#[allow(clippy::too_many_arguments)]
pub fn fill_grid(
    doc: &mut Document,
    container: NodeId,
    catalog: &Catalog,
    count: usize,
    filter: &CategoryFilter,
    style: CardStyle,
    labels: &CardLabels,
    rng: &mut dyn RandomSource,
) -> Vec<String> {
    let picked = sample(catalog, count, filter, rng);
    render_grid(doc, container, &picked, style, labels)
}

/// Ids of the cards currently shown in `container`.
pub fn rendered_ids(doc: &Document, container: NodeId) -> Vec<String> {
    doc.children(container)
        .iter()
        .filter_map(|c| doc.attr(*c, "data-video-id"))
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::XorShift64;

    fn labels() -> CardLabels {
        CardLabels { live_badge: "LIVE".into(), views_suffix: " views".into() }
    }

    #[test]
    fn replaces_prior_content() {
        let mut doc = Document::parse("<div id=\"g\"><p>old</p></div>");
        let g = doc.element_by_id("g").unwrap();
        let mut rng = XorShift64::new(5);
        let ids = fill_grid(&mut doc, g, Catalog::builtin(), 4, &CategoryFilter::All, CardStyle::Grid, &labels(), &mut rng);
        assert_eq!(ids.len(), 4);
        assert_eq!(rendered_ids(&doc, g), ids);
        assert!(doc.elements_by_tag(g, "p").iter().all(|p| doc.text_content(*p) != "old"));
    }

    #[test]
    fn tech_scenario_yields_three_cards() {
        let mut doc = Document::parse("<div id=\"g\"></div>");
        let g = doc.element_by_id("g").unwrap();
        let mut rng = XorShift64::new(11);
        let tech = CategoryFilter::Only("Tech".into());
        let ids = fill_grid(&mut doc, g, Catalog::builtin(), 5, &tech, CardStyle::Grid, &labels(), &mut rng);
        assert_eq!(ids.len(), 3);
        for id in &ids {
            assert_eq!(Catalog::builtin().get(id).unwrap().category, "Tech");
        }
    }

    #[test]
    fn every_card_maps_to_one_record() {
        let mut doc = Document::parse("<div id=\"g\"></div>");
        let g = doc.element_by_id("g").unwrap();
        let mut rng = XorShift64::new(8);
        let ids = fill_grid(&mut doc, g, Catalog::builtin(), 100, &CategoryFilter::All, CardStyle::Grid, &labels(), &mut rng);
        assert_eq!(ids.len(), 12);
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 12);
        assert!(ids.iter().all(|id| Catalog::builtin().get(id).is_some()));
    }
}
