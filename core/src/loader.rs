use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use log::{error, info};

use crate::document::{Document, NodeId};
use crate::error::LoadError;
use crate::models::{Diagnostic, DiagnosticKind};

/// Where page shells and fragments come from.
#[allow(async_fn_in_trait)]
pub trait FragmentSource {
    async fn fetch(&self, path: &str) -> Result<String, LoadError>;
}

/// Fetches fragments relative to a base URL.
pub struct HttpSource {
    client: reqwest::Client,
    base: url::Url,
}

impl HttpSource {
    pub fn new(base: &str) -> Result<Self, LoadError> {
        // a base without trailing slash would drop its last segment on join
        let normalized = if base.ends_with('/') { base.to_string() } else { format!("{}/", base) };
        let base = url::Url::parse(&normalized).map_err(|_| LoadError::BadPath(base.to_string()))?;
        let client = reqwest::Client::builder()
            .user_agent("lumistream")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| LoadError::Transport { path: base.to_string(), source: e })?;
        Ok(Self { client, base })
    }
}

impl FragmentSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<String, LoadError> {
        let url = self.base.join(path).map_err(|_| LoadError::BadPath(path.to_string()))?;
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Transport { path: path.to_string(), source: e })?;
        info!("Fetch response for {}: status={}", path, res.status());
        if !res.status().is_success() {
            return Err(LoadError::Status { path: path.to_string(), status: res.status().as_u16() });
        }
        res.text().await.map_err(|e| LoadError::Transport { path: path.to_string(), source: e })
    }
}

/// Reads fragments from a directory on disk.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, LoadError> {
        let rel = Path::new(path);
        if rel.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir)) {
            return Err(LoadError::BadPath(path.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

impl FragmentSource for DirSource {
    async fn fetch(&self, path: &str) -> Result<String, LoadError> {
        let full = self.resolve(path)?;
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| LoadError::Io { path: path.to_string(), source: e })
    }
}

/// In-memory fragments keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: &str) -> Self {
        self.insert(path, body);
        self
    }

    pub fn insert(&mut self, path: &str, body: &str) {
        self.files.insert(path.to_string(), body.to_string());
    }
}

impl FragmentSource for MemorySource {
    async fn fetch(&self, path: &str) -> Result<String, LoadError> {
        self.files.get(path).cloned().ok_or_else(|| LoadError::NotFound(path.to_string()))
    }
}

/// Loads `path` into `container`, returning the fragment's first element.
///
/// Failures leave the container untouched and are recorded in `diagnostics`.
pub async fn load_component<S: FragmentSource>(
    doc: &mut Document,
    container: Option<NodeId>,
    path: &str,
    source: &S,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<NodeId> {
    let Some(container) = container else {
        let message = format!("Target container for {} is missing. Cannot load component.", path);
        error!("{}", message);
        diagnostics.push(Diagnostic { kind: DiagnosticKind::MissingTarget, message });
        return None;
    };
    info!("Attempting to fetch: {}", path);
    match source.fetch(path).await {
        Ok(html) => {
            let first = doc.set_inner_html(container, &html);
            info!("Loaded component {} ({} bytes)", path, html.len());
            first
        }
        Err(e) => {
            let message = format!("Error loading component {}: {}", path, e);
            error!("{}", message);
            diagnostics.push(Diagnostic { kind: DiagnosticKind::FragmentLoad, message });
            None
        }
    }
}
