use serde::Serialize;

pub const SEARCH_QUERY: &str = r#"
query ($search: String, $genres: [String], $formats: [MediaFormat], $status: [MediaStatus]) {
    Page(page: 1, perPage: 24) {
        media(
            type: MANGA
            search: $search
            genre_in: $genres
            format_in: $formats
            status_in: $status
            sort: [POPULARITY_DESC, SCORE_DESC]
        ) {
            id
            siteUrl
            isAdult
            title { english romaji native }
            coverImage { large medium }
            description(asHtml: true)
            averageScore
            popularity
            genres
            format
            status
            startDate { year month day }
        }
    }
}
"#;

/// Query string accepted by `GET /api/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub q: Option<String>,
    pub genres: Option<String>,
    pub formats: Option<String>,
    pub status: Option<String>,
}

impl SearchParams {
    /// Build from decoded query pairs. The first occurrence of a key wins and
    /// unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "q" => &mut params.q,
                "genres" => &mut params.genres,
                "formats" => &mut params.formats,
                "status" => &mut params.status,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// GraphQL variables for [`SEARCH_QUERY`]. Unset fields are left out of the
/// JSON object entirely, which the catalog treats as "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<String>>,
}

impl SearchVariables {
    pub fn from_params(params: &SearchParams) -> Self {
        Self {
            search: params.q.clone(),
            genres: params.genres.as_deref().map(split_tokens),
            formats: params.formats.as_deref().map(split_tokens),
            status: params.status.as_deref().map(split_tokens),
        }
    }
}

/// Split a comma list exactly on `,`. Tokens are not trimmed and empty
/// tokens are kept.
pub fn split_tokens(raw: &str) -> Vec<String> {
    raw.split(',').map(str::to_string).collect()
}
