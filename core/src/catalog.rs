use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::error::CatalogError;
use crate::models::{CategoryFilter, Video};

/// Read-only, ordered list of sample videos.
#[derive(Debug, Clone)]
pub struct Catalog {
    videos: Vec<Video>,
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| Catalog { videos: sample_videos() });

impl Catalog {
    pub fn new(videos: Vec<Video>) -> Result<Self, CatalogError> {
        if videos.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for v in &videos {
            if !seen.insert(v.id.as_str()) {
                return Err(CatalogError::DuplicateId(v.id.clone()));
            }
        }
        Ok(Self { videos })
    }

    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Parses a JSON array of video records (camelCase fields).
    pub fn from_json(s: &str) -> Result<Self, CatalogError> {
        let videos: Vec<Video> = serde_json::from_str(s)?;
        Self::new(videos)
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn first(&self) -> Option<&Video> {
        self.videos.first()
    }

    pub fn get(&self, id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == id)
    }

    pub fn filtered<'a, 'f>(&'a self, filter: &'f CategoryFilter) -> impl Iterator<Item = &'a Video> + 'f
    where
        'a: 'f,
    {
        self.videos.iter().filter(move |v| filter.matches(v))
    }

    /// Distinct categories in catalog order
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for v in &self.videos {
            if !out.contains(&v.category.as_str()) {
                out.push(&v.category);
            }
        }
        out
    }
}

fn video(
    id: &str,
    title: &str,
    description: &str,
    channel: &str,
    is_verified: bool,
    views: &str,
    upload_time: &str,
    category: &str,
    is_live: bool,
    player_ref: &str,
) -> Video {
    Video {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        channel: channel.to_string(),
        is_verified,
        thumbnail: format!("https://placehold.co/640x360/1f2937/67e8f9?text={}", urlencoding::encode(title)),
        views: views.to_string(),
        upload_time: upload_time.to_string(),
        category: category.to_string(),
        is_live,
        player_ref: Some(player_ref.to_string()),
    }
}

fn sample_videos() -> Vec<Video> {
    vec![
        video("v1", "Quantum Chips Explained", "How qubits are fabricated and why error correction matters.", "FutureTech Lab", true, "1.2M", "2 days ago", "Tech", false, "Mf7EJsrRpNQ"),
        video("v2", "Building a Home Fusion Reactor?", "A skeptical look at tabletop fusion projects.", "Garage Physics", false, "845K", "1 week ago", "Tech", false, "xK3mQp9LwZc"),
        video("v3", "Live: Chip Fab Tour", "Walking the clean room of a semiconductor plant.", "FutureTech Lab", true, "32K", "Streaming now", "Tech", true, "bR8tVn2YhUo"),
        video("v4", "Inside the James Webb Deep Field", "What the deepest infrared image tells us about early galaxies.", "Cosmos Daily", true, "3.4M", "3 weeks ago", "Space", false, "Qz1cHf6DkEa"),
        video("v5", "Live: Launch Window Countdown", "Watching a heavy-lift rocket launch in real time.", "Orbit Watch", false, "120K", "Streaming now", "Space", true, "pW4sLx7NjTe"),
        video("v6", "Transformers From Scratch", "Attention, embeddings and training loops in one sitting.", "Neural Notes", true, "980K", "5 days ago", "AI", false, "Yd2gKv5RmBi"),
        video("v7", "Can AI Compose a Symphony?", "An orchestra performs a machine-written score.", "Synthetic Muse", false, "410K", "1 month ago", "AI", false, "Lh9bNc3TqXs"),
        video("v8", "CRISPR in Five Minutes", "Gene editing explained with paper models.", "Cell Stories", true, "2.1M", "2 months ago", "Life Science", false, "Ge6wPz1VuKd"),
        video("v9", "The Hidden Life of Fungi", "Mycelium networks and how forests talk.", "Wild Biology", false, "760K", "4 days ago", "Life Science", false, "Na5jRt8CyHm"),
        video("v10", "Lost Cities of the Silk Road", "Archaeologists retrace caravan routes across Central Asia.", "Chronicle", true, "1.8M", "3 months ago", "History", false, "Tf3xMb7QeWo"),
        video("v11", "The Printing Press Revolution", "How movable type changed Europe.", "Chronicle", true, "650K", "6 months ago", "History", false, "Uc8kDn4PsLr"),
        video("v12", "Lo-fi Beats for Deep Work", "Two hours of calm music for focus.", "Nebula Sounds", false, "5.6M", "1 year ago", "Music", false, "Jv2hSa9ZgFy"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_shape() {
        let c = Catalog::builtin();
        assert_eq!(c.len(), 12);
        let tech = CategoryFilter::Only("Tech".into());
        assert_eq!(c.filtered(&tech).count(), 3);
        assert_eq!(c.first().map(|v| v.id.as_str()), Some("v1"));
        assert_eq!(c.categories(), vec!["Tech", "Space", "AI", "Life Science", "History", "Music"]);
    }

    #[test]
    fn rejects_duplicates_and_empty() {
        let mut vids = Catalog::builtin().videos().to_vec();
        vids.push(vids[0].clone());
        assert!(matches!(Catalog::new(vids), Err(CatalogError::DuplicateId(id)) if id == "v1"));
        assert!(matches!(Catalog::new(Vec::new()), Err(CatalogError::Empty)));
    }

    #[test]
    fn parses_json_with_youtube_alias() {
        let json = r#"[{"id":"a","title":"T","description":"D","channel":"C","isVerified":true,
            "thumbnail":"t.png","views":"1K","uploadTime":"now","category":"Tech","isLive":false,
            "youtubeId":"abc"}]"#;
        let c = Catalog::from_json(json).unwrap();
        let v = c.get("a").unwrap();
        assert!(v.is_verified);
        assert_eq!(v.player_ref.as_deref(), Some("abc"));
        assert!(c.get("missing").is_none());
    }
}
