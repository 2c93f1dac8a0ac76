use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Node};

use crate::catalog::{FuzzyDate, MediaTitle};

pub const NO_DESCRIPTION: &str = "No description available";

static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn tag_pattern() -> &'static Regex {
    TAG_PATTERN.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"))
}

/// Strip markup and cut to `max_chars` characters, appending `...` when cut.
pub fn truncate_description(description: Option<&str>, max_chars: usize) -> String {
    let Some(description) = description.filter(|d| !d.is_empty()) else {
        return NO_DESCRIPTION.to_string();
    };

    let stripped = tag_pattern().replace_all(description, "");
    if stripped.chars().count() > max_chars {
        let cut: String = stripped.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        stripped.into_owned()
    }
}

/// Full description as plain text for the detail view. `<br>` becomes a
/// newline, other tags are dropped and entities decoded.
pub fn plain_description(description: Option<&str>) -> String {
    let Some(description) = description.filter(|d| !d.trim().is_empty()) else {
        return NO_DESCRIPTION.to_string();
    };

    let fragment = Html::parse_fragment(description);
    let mut decoded = String::with_capacity(description.len());
    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(text) => decoded.push_str(&text.replace('\u{a0}', " ")),
            Node::Element(element) if element.name() == "br" => decoded.push('\n'),
            _ => {}
        }
    }

    // Upstream descriptions use "<br>\n" pairs; collapse the resulting runs.
    let mut out = String::with_capacity(decoded.len());
    let mut blank_run = 0;
    for line in decoded.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }

    out.trim().to_string()
}

/// `month/day/year`, with `??` for an unknown month or day and `Unknown` when
/// the year itself is missing.
pub fn format_date(date: &FuzzyDate) -> String {
    let known = |part: Option<u32>| part.filter(|v| *v != 0);

    let Some(year) = known(date.year) else {
        return "Unknown".to_string();
    };
    let month = known(date.month).map_or_else(|| "??".to_string(), |m| m.to_string());
    let day = known(date.day).map_or_else(|| "??".to_string(), |d| d.to_string());

    format!("{}/{}/{}", month, day, year)
}

/// Score on a 0-10 scale: 85 -> "8.5", 90 -> "9".
pub fn format_score(score: u32) -> String {
    if score % 10 == 0 {
        (score / 10).to_string()
    } else {
        format!("{}.{}", score / 10, score % 10)
    }
}

/// Badge text for a result card; only scored entries get one.
pub fn score_badge(average_score: Option<u32>) -> Option<String> {
    average_score.filter(|s| *s > 0).map(format_score)
}

pub fn detail_score(average_score: Option<u32>) -> String {
    score_badge(average_score).unwrap_or_else(|| "N/A".to_string())
}

pub fn display_title(title: &MediaTitle) -> &str {
    [&title.english, &title.romaji, &title.native]
        .into_iter()
        .filter_map(|t| t.as_deref())
        .find(|t| !t.is_empty())
        .unwrap_or("Untitled")
}

/// `ONE_SHOT` -> `ONE SHOT`. Only the first underscore is replaced.
pub fn humanize_enum(value: Option<&str>) -> String {
    value
        .map(|v| v.replacen('_', " ", 1))
        .unwrap_or_else(|| "Unknown".to_string())
}

/// First `shown` genres, plus a `+N` chip for the rest.
pub fn genre_chips(genres: &[String], shown: usize) -> Vec<String> {
    let mut chips: Vec<String> = genres.iter().take(shown).cloned().collect();
    if genres.len() > shown {
        chips.push(format!("+{}", genres.len() - shown));
    }
    chips
}

pub fn popularity_rank(popularity: Option<u64>) -> String {
    match popularity {
        Some(p) => format!("#{}", p),
        None => "#?".to_string(),
    }
}
