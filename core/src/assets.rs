//! Default page shells and fragments compiled into the crate.

use crate::loader::MemorySource;
use crate::page::paths;

pub const INDEX_HTML: &str = include_str!("../assets/site/index.html");
pub const WATCH_HTML: &str = include_str!("../assets/site/watch.html");
pub const STYLE_CSS: &str = include_str!("../assets/site/style.css");
pub const SIDEBAR_HTML: &str = include_str!("../assets/site/components/sidebar.html");
pub const ACCOUNT_MENU_HTML: &str = include_str!("../assets/site/components/account_menu.html");
pub const LOADING_OVERLAY_HTML: &str = include_str!("../assets/site/components/loading_overlay.html");

/// Every embedded file keyed by its site-relative path.
pub fn files() -> [(&'static str, &'static str); 6] {
    [
        (paths::HOME_SHELL, INDEX_HTML),
        (paths::WATCH_SHELL, WATCH_HTML),
        ("style.css", STYLE_CSS),
        (paths::SIDEBAR, SIDEBAR_HTML),
        (paths::ACCOUNT_MENU, ACCOUNT_MENU_HTML),
        (paths::LOADING_OVERLAY, LOADING_OVERLAY_HTML),
    ]
}

pub fn embedded() -> MemorySource {
    let mut src = MemorySource::new();
    for (path, body) in files() {
        src.insert(path, body);
    }
    src
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::loader::FragmentSource;

    #[tokio::test]
    async fn embedded_source_serves_every_fragment() {
        let src = embedded();
        for (path, _) in files() {
            assert!(!src.fetch(path).await.unwrap().is_empty(), "{}", path);
        }
    }

    #[test]
    fn shells_carry_the_bound_ids() {
        let home = Document::parse(INDEX_HTML);
        for id in ["sidebar-container", "account-menu-container", "main-content", "message-box", "loading-overlay", "category-tags"] {
            assert!(home.element_by_id(id).is_some(), "home is missing #{}", id);
        }
        let watch = Document::parse(WATCH_HTML);
        for id in ["overlay", "youtube-player", "related-videos-grid", "loading-overlay-container", "like-count"] {
            assert!(watch.element_by_id(id).is_some(), "watch is missing #{}", id);
        }
    }
}
