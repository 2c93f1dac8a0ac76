use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod anilist;
pub mod query;

pub use anilist::AniListClient;
pub use query::{SearchParams, SearchVariables};

/// One manga/novel/one-shot entry as the upstream catalog returns it.
///
/// Field names follow the upstream camelCase schema so an item deserialized
/// from the catalog serializes back to the same JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: i64,
    pub site_url: Option<String>,
    pub is_adult: Option<bool>,
    pub title: MediaTitle,
    pub cover_image: CoverImage,
    pub description: Option<String>,
    pub average_score: Option<u32>,
    pub popularity: Option<u64>,
    pub genres: Option<Vec<String>>,
    pub format: Option<String>,
    pub status: Option<String>,
    pub start_date: FuzzyDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaTitle {
    pub english: Option<String>,
    pub romaji: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverImage {
    pub large: Option<String>,
    pub medium: Option<String>,
}

/// A partial date; zero or absent components mean "unknown".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyDate {
    pub year: Option<u32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl MediaItem {
    pub fn genres(&self) -> &[String] {
        self.genres.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaFormat {
    Manga,
    Novel,
    OneShot,
}

impl MediaFormat {
    pub const ALL: [MediaFormat; 3] = [Self::Manga, Self::Novel, Self::OneShot];

    pub fn as_param(&self) -> &'static str {
        match self {
            MediaFormat::Manga => "MANGA",
            MediaFormat::Novel => "NOVEL",
            MediaFormat::OneShot => "ONE_SHOT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaStatus {
    Finished,
    Releasing,
    NotYetReleased,
    Cancelled,
    Hiatus,
}

impl MediaStatus {
    pub const ALL: [MediaStatus; 5] = [
        Self::Finished,
        Self::Releasing,
        Self::NotYetReleased,
        Self::Cancelled,
        Self::Hiatus,
    ];

    pub fn as_param(&self) -> &'static str {
        match self {
            MediaStatus::Finished => "FINISHED",
            MediaStatus::Releasing => "RELEASING",
            MediaStatus::NotYetReleased => "NOT_YET_RELEASED",
            MediaStatus::Cancelled => "CANCELLED",
            MediaStatus::Hiatus => "HIATUS",
        }
    }
}

#[async_trait::async_trait]
pub trait CatalogProvider {
    async fn search(&self, variables: &SearchVariables) -> Result<Vec<MediaItem>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_media_item_keeps_upstream_shape() {
        let raw = json!({
            "id": 30013,
            "siteUrl": "https://anilist.co/manga/30013",
            "isAdult": false,
            "title": { "english": null, "romaji": "One Piece", "native": "ONE PIECE" },
            "coverImage": { "large": "https://img/l.jpg", "medium": "https://img/m.jpg" },
            "description": "Gol D. Roger<br>...",
            "averageScore": 92,
            "popularity": 250000,
            "genres": ["Action", "Adventure"],
            "format": "MANGA",
            "status": "RELEASING",
            "startDate": { "year": 1997, "month": 7, "day": 22 }
        });

        let item: MediaItem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(item.title.romaji.as_deref(), Some("One Piece"));
        assert_eq!(item.genres(), ["Action", "Adventure"]);
        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn test_media_item_requires_structural_fields() {
        let missing_title = json!({
            "id": 1,
            "coverImage": {},
            "startDate": {}
        });
        assert!(serde_json::from_value::<MediaItem>(missing_title).is_err());

        let string_id = json!({
            "id": "1",
            "title": {},
            "coverImage": {},
            "startDate": {}
        });
        assert!(serde_json::from_value::<MediaItem>(string_id).is_err());
    }

    #[test]
    fn test_enum_params_match_upstream_names() {
        assert_eq!(MediaFormat::OneShot.as_param(), "ONE_SHOT");
        assert_eq!(MediaStatus::NotYetReleased.as_param(), "NOT_YET_RELEASED");
        assert_eq!(
            serde_json::to_value(MediaStatus::Hiatus).unwrap(),
            json!("HIATUS")
        );
    }
}
