//! Click routing. A click runs the handler of the innermost matching widget,
//! then bubbles to the main-content and document handlers unless stopped.

use log::{debug, info, warn};

use crate::document::NodeId;
use crate::models::CategoryFilter;
use crate::page::{ids, Page, PageKind, I18N_ATTR};

const WATCH_ACTIONS: [(&str, &str); 5] = [
    (ids::LIKE_BUTTON, "message_liked"),
    (ids::DISLIKE_BUTTON, "message_disliked"),
    (ids::SHARE_BUTTON, "message_shared"),
    (ids::SAVE_BUTTON, "message_saved"),
    (ids::SUBSCRIBE_BUTTON, "message_subscribed"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Bubble,
    Stop,
}

impl Page {
    fn inside(&self, scope: Option<NodeId>, target: NodeId) -> bool {
        scope.is_some_and(|s| self.doc.contains(s, target))
    }

    /// Tagged label text of `node`, or its whole text when it has none.
    fn label_text(&self, node: NodeId) -> String {
        let label = self
            .doc
            .descendants(node)
            .into_iter()
            .find(|n| self.doc.tag(*n) == Some("span") && self.doc.has_attr(*n, I18N_ATTR))
            .unwrap_or(node);
        self.doc.text_content(label).trim().to_string()
    }

    pub(crate) fn close_menus(&mut self) {
        self.state.account_menu.close();
        self.state.language_menu.close();
        self.sync_widgets();
    }

    fn close_sidebar(&mut self) {
        if self.state.sidebar.is_open() {
            self.state.sidebar.close();
            self.sync_widgets();
        }
    }

    /// Simulates a click on `target`.
    pub async fn dispatch_click(&mut self, target: NodeId) {
        debug!("click on {:?} ({:?})", target, self.doc.tag(target));
        if self.handle_target(target).await == Flow::Stop {
            return;
        }
        self.handle_main_content(target);
        self.handle_document(target);
    }

    /// Clicks the element with `id`; false when there is none.
    pub async fn click_id(&mut self, id: &str) -> bool {
        match self.doc.element_by_id(id) {
            Some(node) => {
                self.dispatch_click(node).await;
                true
            }
            None => {
                warn!("No element #{} to click", id);
                false
            }
        }
    }

    async fn handle_target(&mut self, target: NodeId) -> Flow {
        let b = *self.bindings();

        if self.inside(b.language_submenu, target) {
            let entry = self.doc.closest(target, |d, n| d.tag(n) == Some("a") && d.has_attr(n, "data-lang"));
            if let Some(entry) = entry {
                self.select_language(entry).await;
                return Flow::Bubble;
            }
        }
        if self.inside(b.user_avatar, target) {
            self.state.account_menu.flip();
            if !self.state.account_menu.is_open() {
                self.state.language_menu.close();
            }
            self.sync_widgets();
            return Flow::Stop;
        }
        if self.inside(b.language_option, target) {
            if self.state.account_menu.is_open() {
                self.state.language_menu.flip();
                self.sync_widgets();
            }
            return Flow::Stop;
        }
        if self.inside(b.account_menu, target) && !self.inside(b.language_submenu, target) {
            if let Some(item) = self.doc.closest(target, |d, n| d.tag(n) == Some("a")) {
                self.close_menus();
                let text = self.label_text(item);
                self.show_message("message_clicked", &[("clicked_item", text.as_str())]).await;
                return Flow::Bubble;
            }
        }
        if self.inside(b.category_tags, target) {
            let tag = self.doc.closest(target, |d, n| d.has_attr(n, "data-category"));
            if let Some(tag) = tag {
                self.select_category(tag).await;
                return Flow::Bubble;
            }
        }
        if self.inside(b.related_grid, target) {
            let card = self.doc.closest(target, |d, n| d.has_attr(n, "data-video-id"));
            if let Some(id) = card.and_then(|c| self.doc.attr(c, "data-video-id")).map(|s| s.to_string()) {
                self.navigate_to(&id);
                return Flow::Bubble;
            }
        }
        if self.kind() == PageKind::Watch {
            for (button, key) in WATCH_ACTIONS {
                if self.inside(self.doc.element_by_id(button), target) {
                    if self.state.current_video.is_some() {
                        self.show_message(key, &[]).await;
                    } else {
                        info!("#{} clicked without a loaded video; ignoring", button);
                    }
                    return Flow::Bubble;
                }
            }
        }
        if self.inside(b.sidebar_toggle, target) {
            self.state.sidebar.flip();
            self.sync_widgets();
            return Flow::Bubble;
        }
        if self.kind() == PageKind::Watch && self.inside(b.backdrop, target) {
            self.close_sidebar();
        }
        Flow::Bubble
    }

    async fn select_language(&mut self, entry: NodeId) {
        let code = self.doc.attr(entry, "data-lang").unwrap_or_default().to_string();
        let name = self.doc.text_content(entry).trim().to_string();
        info!("Language entry {} selected", code);
        if self.apply_locale_code(&code).await {
            self.show_message("message_language_set", &[("selected_language", name.as_str())]).await;
        } else {
            warn!("Language entry {} not applied", code);
        }
        self.close_menus();
    }

    async fn select_category(&mut self, tag: NodeId) {
        let value = self.doc.attr(tag, "data-category").unwrap_or_default().to_string();
        let filter = CategoryFilter::from_tag(&value);
        info!("Category selected: {}", filter.tag_value());
        self.state.category = filter.clone();
        self.highlight_category(&filter);
        self.render_grids();
        let text = self.label_text(tag);
        self.show_message("message_filtered_by", &[("filtered_category", text.as_str())]).await;
    }

    fn handle_main_content(&mut self, target: NodeId) {
        let b = *self.bindings();
        if !self.inside(b.main_content, target) {
            return;
        }
        match self.kind() {
            PageKind::Home => {
                if self.settings().is_mobile() {
                    self.close_sidebar();
                }
            }
            PageKind::Watch => {
                if !self.inside(b.sidebar, target) && !self.inside(b.sidebar_toggle, target) {
                    self.close_sidebar();
                }
            }
        }
    }

    fn handle_document(&mut self, target: NodeId) {
        let b = *self.bindings();
        if !self.inside(b.user_avatar, target) && !self.inside(b.account_menu, target) {
            if self.state.account_menu.is_open() || self.state.language_menu.is_open() {
                self.close_menus();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::rendered_ids;
    use crate::models::{CategoryFilter, Locale, Toggle};
    use crate::page::testing::*;
    use crate::page::{ids, Page, PageKind, SHOW};

    fn menus_visible(p: &Page) -> (bool, bool) {
        let b = p.bindings();
        (p.doc.has_class(b.account_menu.unwrap(), SHOW), p.doc.has_class(b.language_submenu.unwrap(), SHOW))
    }

    fn lang_entry(p: &Page, code: &str) -> crate::document::NodeId {
        let sub = p.bindings().language_submenu.unwrap();
        p.doc.elements_with_attr(sub, "data-lang").into_iter().find(|n| p.doc.attr(*n, "data-lang") == Some(code)).unwrap()
    }

    fn category_tag(p: &Page, value: &str) -> crate::document::NodeId {
        let tags = p.bindings().category_tags.unwrap();
        p.doc
            .elements_with_attr(tags, "data-category")
            .into_iter()
            .find(|n| p.doc.attr(*n, "data-category") == Some(value))
            .unwrap()
    }

    #[tokio::test]
    async fn sidebar_toggle_twice_restores_state() {
        for kind in [PageKind::Home, PageKind::Watch] {
            let mut p = started(kind).await;
            let sidebar = p.bindings().sidebar.unwrap();
            let before = p.doc.outer_html(sidebar);
            p.click_id(ids::SIDEBAR_TOGGLE).await;
            assert_ne!(p.doc.outer_html(sidebar), before);
            p.click_id(ids::SIDEBAR_TOGGLE).await;
            assert_eq!(p.doc.outer_html(sidebar), before);
        }
    }

    #[tokio::test]
    async fn watch_sidebar_shows_backdrop_and_closes_from_it() {
        let mut p = started(PageKind::Watch).await;
        p.click_id(ids::SIDEBAR_TOGGLE).await;
        let backdrop = p.bindings().backdrop.unwrap();
        assert!(p.doc.has_class(backdrop, SHOW));
        p.click_id(ids::BACKDROP).await;
        assert!(!p.doc.has_class(backdrop, SHOW));
        assert_eq!(p.state.sidebar, Toggle::Closed);

        p.click_id(ids::SIDEBAR_TOGGLE).await;
        p.click_id(ids::VIDEO_DESCRIPTION).await;
        assert_eq!(p.state.sidebar, Toggle::Closed);
    }

    #[tokio::test]
    async fn narrow_home_closes_sidebar_on_content_click() {
        let mut p = started(PageKind::Home).await;
        p.click_id(ids::SIDEBAR_TOGGLE).await;
        assert!(p.state.sidebar.is_open());
        p.click_id(ids::HOME_GRID).await;
        assert!(!p.state.sidebar.is_open());
    }

    #[tokio::test]
    async fn menus_never_show_submenu_alone() {
        let mut p = started(PageKind::Home).await;
        p.click_id(ids::LANGUAGE_OPTION).await;
        assert_eq!(menus_visible(&p), (false, false));
        p.click_id(ids::USER_AVATAR).await;
        assert_eq!(menus_visible(&p), (true, false));
        p.click_id(ids::LANGUAGE_OPTION).await;
        assert_eq!(menus_visible(&p), (true, true));
        p.click_id(ids::USER_AVATAR).await;
        assert_eq!(menus_visible(&p), (false, false));
    }

    #[tokio::test]
    async fn outside_click_closes_menus() {
        let mut p = started(PageKind::Home).await;
        p.click_id(ids::USER_AVATAR).await;
        p.click_id(ids::LANGUAGE_OPTION).await;
        p.click_id(ids::MAIN_CONTENT).await;
        assert_eq!(menus_visible(&p), (false, false));
    }

    #[tokio::test]
    async fn account_item_closes_menu_and_toasts() {
        let mut p = started(PageKind::Home).await;
        p.click_id(ids::USER_AVATAR).await;
        let menu = p.bindings().account_menu.unwrap();
        let help = p
            .doc
            .elements_with_attr(menu, "data-i18n-key")
            .into_iter()
            .find(|n| p.doc.attr(*n, "data-i18n-key") == Some("account_menu_help_text"))
            .unwrap();
        p.dispatch_click(help).await;
        assert_eq!(menus_visible(&p), (false, false));
        assert_eq!(p.toast().unwrap().text, "Clicked: Help");
    }

    #[tokio::test]
    async fn language_entry_switches_locale() {
        let mut p = started(PageKind::Home).await;
        p.click_id(ids::USER_AVATAR).await;
        p.click_id(ids::LANGUAGE_OPTION).await;
        let ja = lang_entry(&p, "ja");
        p.dispatch_click(ja).await;
        assert_eq!(p.state.locale, Locale::Ja);
        assert_eq!(menus_visible(&p), (false, false));
        let expected = p.table().lookup(Locale::Ja, "message_language_set").unwrap().replace("{selected_language}", "日本語");
        assert_eq!(p.toast().unwrap().text, expected);
    }

    #[tokio::test]
    async fn unsupported_language_entry_leaves_locale_and_skips_toast() {
        let mut p = started(PageKind::Home).await;
        let sub = p.bindings().language_submenu.unwrap();
        let entry = p.doc.create_element("a");
        p.doc.set_attr(entry, "data-lang", "fr");
        p.doc.set_text(entry, "Français");
        p.doc.append_child(sub, entry);
        p.click_id(ids::USER_AVATAR).await;
        p.click_id(ids::LANGUAGE_OPTION).await;
        p.dispatch_click(entry).await;
        assert_eq!(p.state.locale, Locale::En);
        assert!(p.toast().is_none());
        assert_eq!(menus_visible(&p), (false, false));
    }

    #[tokio::test]
    async fn category_click_filters_highlights_and_toasts() {
        let mut p = started(PageKind::Home).await;
        let tech = category_tag(&p, "Tech");
        p.dispatch_click(tech).await;
        assert_eq!(p.state.category, CategoryFilter::Only("Tech".into()));
        assert!(p.doc.has_class(tech, "bg-cyan-900"));
        assert!(!p.doc.has_class(category_tag(&p, "All Data"), "bg-cyan-900"));
        let home = p.doc.element_by_id(ids::HOME_GRID).unwrap();
        let shown = rendered_ids(&p.doc, home);
        assert_eq!(shown.len(), 3);
        assert!(shown.iter().all(|id| p.catalog().get(id).unwrap().category == "Tech"));
        assert_eq!(p.toast().unwrap().text, "Filtered by: Tech");
    }

    #[tokio::test]
    async fn category_survives_locale_switch() {
        let mut p = started(PageKind::Home).await;
        let space = category_tag(&p, "Space");
        p.dispatch_click(space).await;
        p.apply_locale(Locale::ZhCn).await;
        let music = p.doc.element_by_id(ids::MUSIC_GRID).unwrap();
        assert!(rendered_ids(&p.doc, music).iter().all(|id| p.catalog().get(id).unwrap().category == "Space"));
    }

    #[tokio::test]
    async fn related_card_navigates() {
        let mut p = started(PageKind::Watch).await;
        let grid = p.bindings().related_grid.unwrap();
        let first = p.doc.children(grid)[0];
        let id = p.doc.attr(first, "data-video-id").unwrap().to_string();
        let title = p.doc.elements_by_tag(first, "h4")[0];
        p.dispatch_click(title).await;
        assert_eq!(p.state.current_video.as_deref(), Some(id.as_str()));
        assert_eq!(p.state.history.last().map(String::as_str), Some(format!("watch.html?id={}", id).as_str()));
        assert!(!rendered_ids(&p.doc, grid).contains(&id));
    }

    #[tokio::test]
    async fn watch_buttons_toast_only_with_a_video() {
        let mut p = started(PageKind::Watch).await;
        p.click_id(ids::LIKE_BUTTON).await;
        assert_eq!(p.toast().unwrap().text, "You liked this video!");

        let mut p = page(PageKind::Watch).with_location("watch.html?id=missing");
        p.start(&crate::assets::embedded()).await;
        for id in [ids::LIKE_BUTTON, ids::DISLIKE_BUTTON, ids::SHARE_BUTTON, ids::SAVE_BUTTON, ids::SUBSCRIBE_BUTTON] {
            assert!(p.click_id(id).await);
        }
        assert!(p.toast().is_none());
    }
}
