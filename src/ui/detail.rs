use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Clear, Paragraph, Wrap},
};

use crate::browse::format::{
    detail_score, display_title, format_date, humanize_enum, plain_description, popularity_rank,
};
use crate::catalog::MediaItem;

use super::widgets::{centered_rect, status_color, titled_block};

fn field_line(label: &'static str, value: String, value_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<12}", label),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(value, value_style),
    ])
}

/// Modal with the full entry. Drawn over whatever is underneath.
pub fn render_detail_view(frame: &mut Frame, area: Rect, item: &MediaItem, accent: Color) {
    let modal = centered_rect(80, 80, area);
    frame.render_widget(Clear, modal);

    let title = display_title(&item.title);
    let mut lines: Vec<Line> = Vec::new();

    if item.title.english.as_deref().is_some_and(|e| !e.is_empty()) {
        if let Some(romaji) = item.title.romaji.as_deref() {
            lines.push(Line::styled(
                romaji.to_string(),
                Style::default().fg(Color::Gray),
            ));
        }
    }
    if let Some(native) = item.title.native.as_deref() {
        lines.push(Line::styled(
            native.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    }

    lines.push(Line::from(vec![
        Span::styled("★ ", Style::default().fg(Color::Yellow)),
        Span::styled(
            detail_score(item.average_score),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("    "),
        Span::styled(
            popularity_rank(item.popularity),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
    ]));
    if item.is_adult == Some(true) {
        lines.push(Line::styled("18+", Style::default().fg(Color::Red)));
    }
    lines.push(Line::raw(""));

    for line in plain_description(item.description.as_deref()).lines() {
        lines.push(Line::raw(line.to_string()));
    }
    lines.push(Line::raw(""));

    lines.push(field_line(
        "Format",
        humanize_enum(item.format.as_deref()),
        Style::default(),
    ));
    lines.push(field_line(
        "Status",
        humanize_enum(item.status.as_deref()),
        Style::default().fg(status_color(item.status.as_deref())),
    ));
    lines.push(field_line(
        "Start Date",
        format_date(&item.start_date),
        Style::default(),
    ));
    lines.push(field_line(
        "Genres",
        item.genres().join(", "),
        Style::default().fg(Color::Cyan),
    ));

    if let Some(url) = item.site_url.as_deref() {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled("o", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" View on AniList  "),
            Span::styled(url.to_string(), Style::default().fg(accent)),
        ]));
    }

    let detail = Paragraph::new(Text::from(lines))
        .block(titled_block(title, accent))
        .wrap(Wrap { trim: false });

    frame.render_widget(detail, modal);
}
