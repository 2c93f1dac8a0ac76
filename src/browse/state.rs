use tracing::debug;

use crate::catalog::{MediaFormat, MediaItem, MediaStatus};

/// Genres offered by the filter panel.
pub const GENRES: [&str; 12] = [
    "Action",
    "Adventure",
    "Comedy",
    "Drama",
    "Fantasy",
    "Horror",
    "Mystery",
    "Romance",
    "Sci-Fi",
    "Slice of Life",
    "Supernatural",
    "Thriller",
];

/// Free-text query plus the three multi-select filter groups. Each group keeps
/// toggle order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub query: String,
    pub genres: Vec<String>,
    pub formats: Vec<MediaFormat>,
    pub statuses: Vec<MediaStatus>,
}

impl SearchFilters {
    pub fn is_searching(&self) -> bool {
        !self.query.trim().is_empty()
            || !self.genres.is_empty()
            || !self.formats.is_empty()
            || !self.statuses.is_empty()
    }

    /// Query string pairs for `GET /api/search`; empty groups are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        let query = self.query.trim();
        if !query.is_empty() {
            pairs.push(("q", query.to_string()));
        }
        if !self.genres.is_empty() {
            pairs.push(("genres", self.genres.join(",")));
        }
        if !self.formats.is_empty() {
            let formats: Vec<&str> = self.formats.iter().map(MediaFormat::as_param).collect();
            pairs.push(("formats", formats.join(",")));
        }
        if !self.statuses.is_empty() {
            let statuses: Vec<&str> = self.statuses.iter().map(MediaStatus::as_param).collect();
            pairs.push(("status", statuses.join(",")));
        }

        pairs
    }
}

fn toggle<T: PartialEq>(set: &mut Vec<T>, value: T) {
    if let Some(pos) = set.iter().position(|v| *v == value) {
        set.remove(pos);
    } else {
        set.push(value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    HasResults,
    NoResults,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetQuery(String),
    ToggleGenre(String),
    ToggleFormat(MediaFormat),
    ToggleStatus(MediaStatus),
    ClearFilters,
    SearchSucceeded { seq: u64, items: Vec<MediaItem> },
    SearchFailed { seq: u64 },
    SelectItem(usize),
    DeselectItem,
    GoHome,
}

/// What the caller has to do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Filters changed: (re)arm the debounce window.
    ScheduleSearch,
    /// Issue a search right away.
    SearchNow,
}

/// Snapshot handed to whoever performs the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub filters: SearchFilters,
}

/// What the results area should show.
#[derive(Debug, PartialEq)]
pub enum ResultsView<'a> {
    Loading,
    NoMatches,
    Grid {
        heading: String,
        items: &'a [MediaItem],
    },
}

/// A single chip in the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChip {
    Genre(&'static str),
    Format(MediaFormat),
    Status(MediaStatus),
}

impl FilterChip {
    /// Every chip in panel order: genres, then formats, then statuses.
    pub fn all() -> Vec<FilterChip> {
        GENRES
            .into_iter()
            .map(FilterChip::Genre)
            .chain(MediaFormat::ALL.into_iter().map(FilterChip::Format))
            .chain(MediaStatus::ALL.into_iter().map(FilterChip::Status))
            .collect()
    }

    pub fn toggle_action(&self) -> Action {
        match *self {
            FilterChip::Genre(genre) => Action::ToggleGenre(genre.to_string()),
            FilterChip::Format(format) => Action::ToggleFormat(format),
            FilterChip::Status(status) => Action::ToggleStatus(status),
        }
    }
}

/// Search screen state. Mutated only through [`BrowseState::apply`] and
/// [`BrowseState::begin_search`].
#[derive(Debug)]
pub struct BrowseState {
    filters: SearchFilters,
    results: Vec<MediaItem>,
    phase: Phase,
    selected: Option<MediaItem>,
    latest_seq: u64,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            filters: SearchFilters::default(),
            results: Vec::new(),
            phase: Phase::Loading,
            selected: None,
            latest_seq: 0,
        }
    }
}

impl BrowseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn results(&self) -> &[MediaItem] {
        &self.results
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected(&self) -> Option<&MediaItem> {
        self.selected.as_ref()
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    pub fn is_searching(&self) -> bool {
        self.filters.is_searching()
    }

    pub fn is_chip_active(&self, chip: FilterChip) -> bool {
        match chip {
            FilterChip::Genre(genre) => self.filters.genres.iter().any(|g| g == genre),
            FilterChip::Format(format) => self.filters.formats.contains(&format),
            FilterChip::Status(status) => self.filters.statuses.contains(&status),
        }
    }

    /// Start a new search: bumps the sequence number so any response still in
    /// flight is ignored when it lands.
    pub fn begin_search(&mut self) -> SearchRequest {
        self.latest_seq += 1;
        self.phase = Phase::Loading;
        SearchRequest {
            seq: self.latest_seq,
            filters: self.filters.clone(),
        }
    }

    pub fn apply(&mut self, action: Action) -> Effect {
        match action {
            Action::SetQuery(query) => {
                if query == self.filters.query {
                    return Effect::None;
                }
                self.filters.query = query;
                Effect::ScheduleSearch
            }
            Action::ToggleGenre(genre) => {
                toggle(&mut self.filters.genres, genre);
                Effect::ScheduleSearch
            }
            Action::ToggleFormat(format) => {
                toggle(&mut self.filters.formats, format);
                Effect::ScheduleSearch
            }
            Action::ToggleStatus(status) => {
                toggle(&mut self.filters.statuses, status);
                Effect::ScheduleSearch
            }
            Action::ClearFilters => {
                if self.filters == SearchFilters::default() {
                    return Effect::None;
                }
                self.filters = SearchFilters::default();
                Effect::ScheduleSearch
            }
            Action::SearchSucceeded { seq, items } => {
                if !self.accepts(seq) {
                    return Effect::None;
                }
                self.phase = if items.is_empty() {
                    Phase::NoResults
                } else {
                    Phase::HasResults
                };
                self.results = items;
                Effect::None
            }
            Action::SearchFailed { seq } => {
                if !self.accepts(seq) {
                    return Effect::None;
                }
                self.results.clear();
                self.phase = Phase::NoResults;
                Effect::None
            }
            Action::SelectItem(index) => {
                if let Some(item) = self.results.get(index) {
                    self.selected = Some(item.clone());
                }
                Effect::None
            }
            Action::DeselectItem => {
                self.selected = None;
                Effect::None
            }
            Action::GoHome => {
                self.filters = SearchFilters::default();
                self.selected = None;
                Effect::SearchNow
            }
        }
    }

    fn accepts(&self, seq: u64) -> bool {
        if seq != self.latest_seq {
            debug!(seq, latest = self.latest_seq, "Discarding stale search response");
            return false;
        }
        true
    }

    pub fn results_view(&self) -> ResultsView<'_> {
        if self.phase == Phase::Loading {
            return ResultsView::Loading;
        }

        if self.results.is_empty() && self.is_searching() {
            return ResultsView::NoMatches;
        }

        let heading = if self.is_searching() {
            format!("Found {} manga", self.results.len())
        } else {
            "Top Picks For You".to_string()
        };

        ResultsView::Grid {
            heading,
            items: &self.results,
        }
    }
}
