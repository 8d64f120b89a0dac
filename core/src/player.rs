use urlencoding::encode;

use crate::models::Video;

pub const BLANK_PLAYER: &str = "about:blank";

const EMBED_BASE: &str = "https://www.youtube.com/embed";

/// Embed reference for the third-party player; autoplay stays off so
/// navigation does not start playback on its own.
pub fn embed_url(video: &Video) -> Option<String> {
    let reference = video.player_ref.as_deref()?.trim();
    if reference.is_empty() {
        return None;
    }
    Some(format!("{}/{}?controls=1&autoplay=0", EMBED_BASE, encode(reference)))
}

/// Relative location of the playback page for `id`.
pub fn watch_location(id: &str) -> String {
    format!("watch.html?id={}", encode(id))
}

/// `id` query parameter of a (possibly relative) location.
pub fn video_id_from_location(location: &str) -> Option<String> {
    let base = url::Url::parse("http://localhost/").ok()?;
    let parsed = base.join(location).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == "id")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}
