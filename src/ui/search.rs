use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::browse::format::{
    display_title, format_date, genre_chips, humanize_enum, popularity_rank, score_badge,
    truncate_description,
};
use crate::browse::{BrowseState, FilterChip, ResultsView};
use crate::catalog::MediaItem;

use super::widgets::{status_color, titled_block};

/// Where keyboard input currently goes on the search screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Query,
    Filters,
    Results,
}

pub fn render_search_view(
    frame: &mut Frame,
    area: Rect,
    state: &BrowseState,
    list_state: &mut ListState,
    focus: Focus,
    filter_cursor: Option<usize>,
    description_limit: usize,
    accent: Color,
) {
    let filter_height = if filter_cursor.is_some() { 8 } else { 1 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(filter_height),
            Constraint::Min(3),
        ])
        .split(area);

    render_search_input(frame, chunks[0], &state.filters().query, focus, accent);

    match filter_cursor {
        Some(cursor) => render_filter_panel(frame, chunks[1], state, cursor, focus, accent),
        None => render_filter_summary(frame, chunks[1], state),
    }

    render_results(frame, chunks[2], state, list_state, description_limit, accent);
}

fn render_search_input(frame: &mut Frame, area: Rect, query: &str, focus: Focus, accent: Color) {
    let border = if focus == Focus::Query {
        accent
    } else {
        Color::DarkGray
    };

    let (text, style) = if query.is_empty() {
        (
            "Search for manga by title, author, or keywords...",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (query, Style::default().fg(Color::White))
    };

    let input = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(" Kansou · Manga Search ")
                .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        )
        .style(style);

    frame.render_widget(input, area);

    if focus == Focus::Query {
        let cursor_x = area.x.saturating_add(cursor_offset(query)).saturating_add(1);
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Display columns taken by the query, so wide glyphs move the cursor by two.
fn cursor_offset(query: &str) -> u16 {
    u16::try_from(Line::raw(query).width()).unwrap_or(u16::MAX)
}

fn chip_label(chip: FilterChip) -> String {
    match chip {
        FilterChip::Genre(genre) => genre.to_string(),
        FilterChip::Format(format) => humanize_enum(Some(format.as_param())),
        FilterChip::Status(status) => humanize_enum(Some(status.as_param())),
    }
}

fn render_filter_panel(
    frame: &mut Frame,
    area: Rect,
    state: &BrowseState,
    cursor: usize,
    focus: Focus,
    accent: Color,
) {
    let mut genres = vec![Span::styled("Genres  ", Style::default().add_modifier(Modifier::BOLD))];
    let mut formats = vec![Span::styled("Formats ", Style::default().add_modifier(Modifier::BOLD))];
    let mut statuses = vec![Span::styled("Status  ", Style::default().add_modifier(Modifier::BOLD))];

    for (idx, chip) in FilterChip::all().into_iter().enumerate() {
        let mut style = if state.is_chip_active(chip) {
            Style::default().fg(Color::Black).bg(accent)
        } else {
            Style::default().fg(Color::Gray)
        };
        if focus == Focus::Filters && idx == cursor {
            style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
        }

        let span = Span::styled(format!(" {} ", chip_label(chip)), style);
        let line = match chip {
            FilterChip::Genre(_) => &mut genres,
            FilterChip::Format(_) => &mut formats,
            FilterChip::Status(_) => &mut statuses,
        };
        line.push(span);
        line.push(Span::raw(" "));
    }

    let text = Text::from(vec![
        Line::from(genres),
        Line::from(formats),
        Line::from(statuses),
    ]);

    let panel = Paragraph::new(text)
        .block(titled_block("Filters", accent))
        .wrap(Wrap { trim: false });
    frame.render_widget(panel, area);
}

fn render_filter_summary(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let filters = state.filters();
    let mut active: Vec<String> = filters.genres.clone();
    active.extend(filters.formats.iter().map(|f| humanize_enum(Some(f.as_param()))));
    active.extend(filters.statuses.iter().map(|s| humanize_enum(Some(s.as_param()))));

    let summary = if active.is_empty() {
        Span::styled("no filters", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(active.join(", "), Style::default().fg(Color::Cyan))
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(":Filters "),
        summary,
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn media_list_item(item: &MediaItem, description_limit: usize) -> ListItem<'static> {
    let mut header = vec![Span::styled(
        display_title(&item.title).to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(score) = score_badge(item.average_score) {
        header.push(Span::styled(
            format!("  ★ {}", score),
            Style::default().fg(Color::Yellow),
        ));
    }
    if item.is_adult == Some(true) {
        header.push(Span::styled("  18+", Style::default().fg(Color::Red)));
    }

    let mut meta = vec![
        Span::styled(
            format_date(&item.start_date),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" │ "),
        Span::raw(humanize_enum(item.format.as_deref()).to_lowercase()),
        Span::raw(" │ "),
        Span::styled(
            humanize_enum(item.status.as_deref()),
            Style::default().fg(status_color(item.status.as_deref())),
        ),
        Span::raw(" │ "),
        Span::styled(
            popularity_rank(item.popularity),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(" │"),
    ];
    for chip in genre_chips(item.genres(), 3) {
        meta.push(Span::raw(" "));
        meta.push(Span::styled(format!("[{}]", chip), Style::default().fg(Color::Cyan)));
    }

    let description = Line::styled(
        truncate_description(item.description.as_deref(), description_limit),
        Style::default().fg(Color::Gray),
    );

    ListItem::new(Text::from(vec![
        Line::from(header),
        Line::from(meta),
        description,
        Line::raw(""),
    ]))
}

fn render_results(
    frame: &mut Frame,
    area: Rect,
    state: &BrowseState,
    list_state: &mut ListState,
    description_limit: usize,
    accent: Color,
) {
    match state.results_view() {
        ResultsView::Loading => {
            let loading = Paragraph::new("Loading...")
                .block(titled_block("Results", accent))
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(loading, area);
        }
        ResultsView::NoMatches => {
            let text = Text::from(vec![
                Line::raw(""),
                Line::styled(
                    "No manga found",
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::styled(
                    "Try adjusting your search terms or filters",
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            let empty = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(titled_block("Results", accent));
            frame.render_widget(empty, area);
        }
        ResultsView::Grid { heading, items } => {
            let list_items: Vec<ListItem> = items
                .iter()
                .map(|item| media_list_item(item, description_limit))
                .collect();

            let list = List::new(list_items)
                .block(titled_block(&heading, accent))
                .highlight_style(Style::default().bg(Color::DarkGray))
                .highlight_symbol("▶ ");

            frame.render_stateful_widget(list, area, list_state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_offset_uses_display_width() {
        assert_eq!(cursor_offset(""), 0);
        assert_eq!(cursor_offset("Berserk"), 7);
        assert_eq!(cursor_offset("進撃の巨人"), 10);
        assert_eq!(cursor_offset("One Piece 航海"), 14);
    }
}
