//! Entertainment Items
//!
//! Typed catalog entries. Every item carries a shared attribute set plus a
//! kind-specific payload; the payload variant decides the item's [`MediaKind`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Highest rating an item may carry
pub const MAX_RATING: f64 = 10.0;

/// Media kinds the catalog understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Music,
    Book,
    Game,
}

impl MediaKind {
    /// All kinds, in catalog record order
    pub const ALL: [MediaKind; 4] = [
        MediaKind::Movie,
        MediaKind::Music,
        MediaKind::Book,
        MediaKind::Game,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Music => "music",
            MediaKind::Book => "book",
            MediaKind::Game => "game",
        }
    }

    /// Top-level key of this kind's bucket in a catalog record
    pub fn bucket(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movies",
            MediaKind::Music => "music",
            MediaKind::Book => "books",
            MediaKind::Game => "games",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" => Ok(MediaKind::Movie),
            "music" => Ok(MediaKind::Music),
            "book" | "books" => Ok(MediaKind::Book),
            "game" | "games" => Ok(MediaKind::Game),
            other => Err(format!("unknown media kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub director: String,
    pub actors: Vec<String>,
    /// Running time in minutes
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicDetails {
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    /// Track length in seconds
    #[serde(default)]
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDetails {
    pub author: String,
    pub pages: u32,
    pub publisher: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetails {
    pub developer: String,
    pub platforms: Vec<String>,
    pub multiplayer: bool,
}

/// Kind-specific payload, tagged with `"type"` in persisted records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemDetails {
    Movie(MovieDetails),
    Music(MusicDetails),
    Book(BookDetails),
    Game(GameDetails),
}

impl ItemDetails {
    pub fn kind(&self) -> MediaKind {
        match self {
            ItemDetails::Movie(_) => MediaKind::Movie,
            ItemDetails::Music(_) => MediaKind::Music,
            ItemDetails::Book(_) => MediaKind::Book,
            ItemDetails::Game(_) => MediaKind::Game,
        }
    }
}

impl From<MovieDetails> for ItemDetails {
    fn from(details: MovieDetails) -> Self {
        ItemDetails::Movie(details)
    }
}

impl From<MusicDetails> for ItemDetails {
    fn from(details: MusicDetails) -> Self {
        ItemDetails::Music(details)
    }
}

impl From<BookDetails> for ItemDetails {
    fn from(details: BookDetails) -> Self {
        ItemDetails::Book(details)
    }
}

impl From<GameDetails> for ItemDetails {
    fn from(details: GameDetails) -> Self {
        ItemDetails::Game(details)
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntertainmentItem {
    pub id: String,
    pub title: String,
    pub genre: Vec<String>,
    pub year: i32,
    pub rating: f64,
    #[serde(flatten)]
    pub details: ItemDetails,
}

impl EntertainmentItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        genre: Vec<String>,
        year: i32,
        rating: f64,
        details: impl Into<ItemDetails>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            genre,
            year,
            rating,
            details: details.into(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.details.kind()
    }

    /// Check the invariants the catalog relies on
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidItem {
                id: self.id.clone(),
                message: "id cannot be empty".into(),
            });
        }
        if !self.rating.is_finite() || !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(Error::InvalidItem {
                id: self.id.clone(),
                message: format!("rating {} outside 0-{}", self.rating, MAX_RATING).into(),
            });
        }
        Ok(())
    }

    /// Case-insensitive substring match on title or any genre.
    /// `needle` must already be lowercase.
    pub(crate) fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.genre.iter().any(|g| g.to_lowercase().contains(needle))
    }
}
