//! Page pipeline for the LumiStream Realm site: translations, catalog,
//! fragment loading, card/grid rendering and click handling over an
//! in-memory document.

pub mod assets;
pub mod card;
pub mod catalog;
pub mod document;
pub mod error;
pub mod grid;
pub mod i18n;
pub mod interaction;
pub mod loader;
pub mod markup;
pub mod models;
pub mod page;
pub mod player;
pub mod sampler;
pub mod translate;
pub mod watch;

pub use catalog::Catalog;
pub use document::{Document, NodeId};
pub use error::{CatalogError, LoadError, LocaleError, TableError};
pub use i18n::TranslationTable;
pub use loader::{DirSource, FragmentSource, HttpSource, MemorySource};
pub use models::*;
pub use page::{LayoutReady, Page, PageKind, PageSettings, Toast, UiState};
pub use sampler::{RandomSource, XorShift64};
pub use translate::{ResolvedTranslations, TranslationTicket};
