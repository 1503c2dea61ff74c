//! Record and numbering types shared by the scenemap crates.

pub mod error;
pub mod ids;
pub mod numbers;
pub mod records;

pub use error::{ModelError, Result as ModelResult};
pub use ids::{IndexerKind, RecordId, SeriesId};
pub use numbers::SeasonEpisode;
pub use records::{
    Document, EpisodeEntry, RecordKind, RefreshLedgerEntry, SceneNumbers,
    SceneOverride,
};
