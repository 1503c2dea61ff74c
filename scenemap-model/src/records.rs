//! Typed views over the documents kept in the record store.
//!
//! Scene fields use `0` as the "unmapped" sentinel rather than `null`, and
//! documents missing a scene field decode with that sentinel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::ModelError;
use crate::ids::{IndexerKind, SeriesId};
use crate::numbers::SeasonEpisode;

/// The record families this crate reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Local scene numbering overrides entered by a user.
    SceneNumbering,
    /// Episode documents owned by the episode catalog.
    TvEpisode,
    /// Last XEM refresh per series.
    XemRefresh,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::SceneNumbering => "scene_numbering",
            RecordKind::TvEpisode => "tv_episodes",
            RecordKind::XemRefresh => "xem_refresh",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scene_numbering" => Ok(RecordKind::SceneNumbering),
            "tv_episodes" => Ok(RecordKind::TvEpisode),
            "xem_refresh" => Ok(RecordKind::XemRefresh),
            other => Err(ModelError::UnknownRecordKind(other.to_string())),
        }
    }
}

/// Binds a document type to the record kind and partition it lives in.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const KIND: RecordKind;

    fn partition_key(&self) -> SeriesId;

    fn indexer(&self) -> IndexerKind;
}

/// A user supplied scene numbering override.
///
/// Addressed either by `(season, episode)` or by `absolute_number`. A record
/// whose scene pair is `(0, 0)` is a cleared override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneOverride {
    pub indexer_id: SeriesId,
    pub indexer: IndexerKind,
    #[serde(default)]
    pub season: u32,
    #[serde(default)]
    pub episode: u32,
    #[serde(default)]
    pub absolute_number: u32,
    #[serde(default)]
    pub scene_season: u32,
    #[serde(default)]
    pub scene_episode: u32,
    #[serde(default)]
    pub scene_absolute_number: u32,
}

impl SceneOverride {
    pub fn native(&self) -> SeasonEpisode {
        SeasonEpisode::new(self.season, self.episode)
    }

    pub fn scene(&self) -> SeasonEpisode {
        SeasonEpisode::new(self.scene_season, self.scene_episode)
    }
}

impl Document for SceneOverride {
    const KIND: RecordKind = RecordKind::SceneNumbering;

    fn partition_key(&self) -> SeriesId {
        self.indexer_id
    }

    fn indexer(&self) -> IndexerKind {
        self.indexer
    }
}

/// The numbering portion of an episode document.
///
/// Other keys of the underlying document belong to the episode catalog and
/// are left untouched by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeEntry {
    pub indexer_id: SeriesId,
    pub indexer: IndexerKind,
    pub season: u32,
    pub episode: u32,
    #[serde(default)]
    pub absolute_number: u32,
    #[serde(default)]
    pub scene_season: u32,
    #[serde(default)]
    pub scene_episode: u32,
    #[serde(default)]
    pub scene_absolute_number: u32,
}

impl EpisodeEntry {
    pub fn new(
        indexer_id: SeriesId,
        indexer: IndexerKind,
        season: u32,
        episode: u32,
    ) -> Self {
        EpisodeEntry {
            indexer_id,
            indexer,
            season,
            episode,
            absolute_number: 0,
            scene_season: 0,
            scene_episode: 0,
            scene_absolute_number: 0,
        }
    }

    pub fn with_absolute_number(mut self, absolute_number: u32) -> Self {
        self.absolute_number = absolute_number;
        self
    }

    pub fn native(&self) -> SeasonEpisode {
        SeasonEpisode::new(self.season, self.episode)
    }

    pub fn scene(&self) -> SeasonEpisode {
        SeasonEpisode::new(self.scene_season, self.scene_episode)
    }

    pub fn scene_numbers(&self) -> SceneNumbers {
        SceneNumbers {
            season: self.scene_season,
            episode: self.scene_episode,
            absolute: self.scene_absolute_number,
        }
    }
}

impl Document for EpisodeEntry {
    const KIND: RecordKind = RecordKind::TvEpisode;

    fn partition_key(&self) -> SeriesId {
        self.indexer_id
    }

    fn indexer(&self) -> IndexerKind {
        self.indexer
    }
}

/// The three scene fields carried by an episode document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneNumbers {
    pub season: u32,
    pub episode: u32,
    pub absolute: u32,
}

impl SceneNumbers {
    pub const UNMAPPED: SceneNumbers = SceneNumbers {
        season: 0,
        episode: 0,
        absolute: 0,
    };
}

/// When XEM data was last requested for a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshLedgerEntry {
    pub indexer_id: SeriesId,
    pub indexer: IndexerKind,
    /// Unix timestamp in seconds.
    pub last_refreshed: i64,
}

impl Document for RefreshLedgerEntry {
    const KIND: RecordKind = RecordKind::XemRefresh;

    fn partition_key(&self) -> SeriesId {
        self.indexer_id
    }

    fn indexer(&self) -> IndexerKind {
        self.indexer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn episode_without_scene_fields_decodes_as_unmapped() {
        let doc = json!({
            "indexer_id": 100,
            "indexer": 1,
            "season": 1,
            "episode": 4,
            "name": "Pilot, Part 2",
        });

        let entry: EpisodeEntry = serde_json::from_value(doc).unwrap();
        assert_eq!(entry.native(), SeasonEpisode::new(1, 4));
        assert_eq!(entry.scene_numbers(), SceneNumbers::UNMAPPED);
    }

    #[test]
    fn record_kind_tags_round_trip() {
        for kind in [
            RecordKind::SceneNumbering,
            RecordKind::TvEpisode,
            RecordKind::XemRefresh,
        ] {
            assert_eq!(kind.as_str().parse::<RecordKind>(), Ok(kind));
        }
        assert!("shows".parse::<RecordKind>().is_err());
    }
}
