use log::{debug, info};

use crate::card::{CardLabels, CardStyle};
use crate::document::NodeId;
use crate::grid::render_grid;
use crate::i18n::format_message;
use crate::models::{DiagnosticKind, Video};
use crate::page::{ids, Page, SITE_NAME};
use crate::player::{embed_url, video_id_from_location, watch_location, BLANK_PLAYER};
use crate::sampler::sample_related;

// demo label, there is no channel data behind it
const SUBSCRIBER_COUNT: &str = "1.2M";

impl Page {
    /// Video selected by the `id` query parameter, else the first catalog entry.
    pub fn initial_video_id(&self) -> Option<String> {
        video_id_from_location(&self.state.location).or_else(|| self.catalog().first().map(|v| v.id.clone()))
    }

    fn watch_el(&self, id: &str) -> Option<NodeId> {
        self.doc.element_by_id(id)
    }

    fn set_watch_text(&mut self, id: &str, text: &str) {
        if let Some(el) = self.watch_el(id) {
            self.doc.set_text(el, text);
        }
    }

    /// Loads `id` into the player area and draws fresh like/dislike counters.
    /// Returns false if the catalog has no such video.
    pub fn load_video(&mut self, id: &str) -> bool {
        let found = self.catalog().get(id).is_some();
        if found {
            self.state.current_video = Some(id.to_string());
            self.state.like_count = self.rng.below(1000) as u32;
            self.state.dislike_count = self.rng.below(100) as u32;
        } else {
            self.state.current_video = None;
            self.state.like_count = 0;
            self.state.dislike_count = 0;
        }
        self.render_details(id);
        found
    }

    fn render_details(&mut self, id: &str) {
        let Some(video) = self.catalog().get(id).cloned() else {
            self.render_not_found(id);
            return;
        };
        info!("Showing video {} ({})", video.id, video.title);
        if let Some(player) = self.watch_el(ids::PLAYER) {
            let src = embed_url(&video).unwrap_or_else(|| BLANK_PLAYER.to_string());
            self.doc.set_attr(player, "src", &src);
        }
        self.set_watch_text(ids::VIDEO_TITLE, &video.title);
        self.set_document_title(&format!("{} - {}", video.title, SITE_NAME));
        let initial: String = video.channel.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default();
        self.set_watch_text(ids::CHANNEL_AVATAR, &initial);
        self.render_channel_name(&video);

        let subscribers = format_message(&self.localized("channel_subscribers"), &[("count", SUBSCRIBER_COUNT)]);
        self.set_watch_text(ids::CHANNEL_SUBSCRIBERS, &subscribers);
        let suffix = self.localized("views_suffix");
        self.set_watch_text(ids::VIDEO_META, &crate::card::meta_line(&video, &suffix));
        self.set_watch_text(ids::VIDEO_DESCRIPTION, &video.description);
        self.sync_counters();
    }

    fn render_channel_name(&mut self, video: &Video) {
        let Some(el) = self.watch_el(ids::CHANNEL_NAME) else { return };
        self.doc.set_text(el, &video.channel);
        if video.is_verified {
            let icon = self.doc.create_element("i");
            self.doc.set_attr(icon, "class", "fas fa-check-circle text-blue-400 ml-2");
            self.doc.append_child(el, icon);
        }
    }

    fn render_not_found(&mut self, id: &str) {
        let text = self.localized("video_not_found");
        if let Some(player) = self.watch_el(ids::PLAYER) {
            self.doc.set_attr(player, "src", BLANK_PLAYER);
        }
        self.set_watch_text(ids::VIDEO_TITLE, &text);
        self.set_document_title(&format!("{} - {}", text, SITE_NAME));
        for field in [ids::CHANNEL_AVATAR, ids::CHANNEL_NAME, ids::CHANNEL_SUBSCRIBERS, ids::VIDEO_META, ids::VIDEO_DESCRIPTION] {
            self.set_watch_text(field, "");
        }
        self.sync_counters();
        self.record(DiagnosticKind::VideoNotFound, format!("Video with ID {} not found.", id));
    }

    pub(crate) fn sync_counters(&mut self) {
        let (likes, dislikes) = match self.state.current_video {
            Some(_) => (format!("{}K", self.state.like_count), format!("{}K", self.state.dislike_count)),
            None => ("0".to_string(), "0".to_string()),
        };
        self.set_watch_text(ids::LIKE_COUNT, &likes);
        self.set_watch_text(ids::DISLIKE_COUNT, &dislikes);
    }

    /// Fills the related list with other catalog entries.
    pub fn render_related(&mut self) -> Vec<String> {
        let Some(grid) = self.bindings().related_grid.or_else(|| self.watch_el(ids::RELATED_GRID)) else {
            self.record(
                DiagnosticKind::MissingTarget,
                "Related videos grid element not found. Cannot render related videos.".to_string(),
            );
            return Vec::new();
        };
        let current = self.state.current_video.clone().or_else(|| self.initial_video_id()).unwrap_or_default();
        let table = self.table_handle();
        let labels = CardLabels::resolve(&table, self.state.locale, &mut self.diagnostics);
        let count = self.settings().related_count;
        let catalog = self.catalog_handle();
        let picked = sample_related(&catalog, &current, count, &mut *self.rng);
        let rendered = render_grid(&mut self.doc, grid, &picked, CardStyle::Compact, &labels);
        debug!("related for {}: {:?}", current, rendered);
        rendered
    }

    /// Redraws the current video and its related list, keeping the counters
    /// when the video did not change.
    pub fn reload_watch(&mut self) {
        let Some(id) = self.initial_video_id() else {
            self.record(DiagnosticKind::VideoNotFound, "Catalog is empty; nothing to show.".to_string());
            return;
        };
        if self.state.current_video.as_deref() == Some(id.as_str()) {
            self.render_details(&id);
        } else {
            self.load_video(&id);
        }
        self.render_related();
    }

    /// Moves to another video as if its related card was clicked.
    pub fn navigate_to(&mut self, id: &str) {
        let location = watch_location(id);
        info!("Navigating to {}", location);
        self.state.history.push(location.clone());
        self.state.location = location;
        self.load_video(id);
        self.render_related();
    }
}
