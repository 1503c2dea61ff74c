use std::fmt;

use serde::{Deserialize, Serialize};

/// A season/episode pair in either native or scene numbering.
///
/// Stored documents use `0` as the "unmapped" sentinel; a scene pair only
/// counts as a mapping when both components are non-zero.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct SeasonEpisode {
    pub season: u32,
    pub episode: u32,
}

impl SeasonEpisode {
    pub const UNSET: SeasonEpisode = SeasonEpisode {
        season: 0,
        episode: 0,
    };

    pub fn new(season: u32, episode: u32) -> Self {
        SeasonEpisode { season, episode }
    }

    /// Combines optional parts; `None` unless both are present.
    pub fn from_parts(season: Option<u32>, episode: Option<u32>) -> Option<Self> {
        Some(SeasonEpisode::new(season?, episode?))
    }

    /// Both components carry a real number.
    pub fn is_mapped(&self) -> bool {
        self.season != 0 && self.episode != 0
    }

    /// Both components are the unmapped sentinel.
    pub fn is_unset(&self) -> bool {
        self.season == 0 && self.episode == 0
    }
}

impl From<(u32, u32)> for SeasonEpisode {
    fn from((season, episode): (u32, u32)) -> Self {
        SeasonEpisode { season, episode }
    }
}

impl fmt::Display for SeasonEpisode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}E{:02}", self.season, self.episode)
    }
}
