use std::collections::HashMap;

use image::RgbImage;
use image::imageops::FilterType;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Padding, Paragraph, Row, Table, TableState, Wrap,
};

use crate::entry::Entry;
use crate::poster::{Artwork, fit_within};

use super::super::format::{entry_details, truncate};
use super::form::{FormMode, FormState};
use super::{ArtworkState, PendingDelete, View};

const ACCENT: Color = Color::Rgb(110, 170, 255);
const MUTED: Color = Color::Rgb(185, 195, 210);
const TEXT: Color = Color::Rgb(230, 235, 242);

pub(super) fn draw_tui(
    frame: &mut Frame,
    entries: &[Entry],
    table_state: &mut TableState,
    view: &View,
    status: &str,
    artwork_by_url: &HashMap<String, ArtworkState>,
) {
    let bg = Block::default().style(Style::default().bg(Color::Black));
    frame.render_widget(bg, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected_text = table_state
        .selected()
        .map(|idx| (idx + 1).to_string())
        .unwrap_or_else(|| "-".to_string());
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "WATCHLIST",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!("{} entries", entries.len()),
            Style::default().fg(MUTED),
        ),
        Span::styled("   ", Style::default()),
        Span::styled(
            format!("selected {selected_text}"),
            Style::default().fg(MUTED),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(panel_block("Dashboard"));
    frame.render_widget(header, chunks[0]);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);
    let details_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(20)])
        .split(body_chunks[1]);

    // Rows are rendered straight from the collection so row N is always position N.
    let rows: Vec<Row> = entries
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(entry.title.clone()),
                Cell::from(entry.category.clone()),
                Cell::from(entry.status.label()),
                Cell::from(entry.rating.to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(42),
            Constraint::Percentage(20),
            Constraint::Length(14),
            Constraint::Length(7),
        ],
    )
    .header(
        Row::new(vec!["Title", "Category", "Status", "Rating"])
            .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
    )
    .block(panel_block("Watchlist"))
    .row_highlight_style(
        Style::default()
            .bg(ACCENT)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▸ ");
    frame.render_stateful_widget(table, body_chunks[0], table_state);

    let selected_entry = table_state.selected().and_then(|idx| entries.get(idx));
    render_poster(frame, details_chunks[0], selected_entry, artwork_by_url);

    let details = match selected_entry {
        Some(entry) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    truncate(&entry.title, 48),
                    Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            lines.extend(entry_details(entry).lines().map(|line| Line::from(line.to_string())));
            lines
        }
        None => vec![
            Line::from("Nothing selected."),
            Line::from(""),
            Line::from("Press a to add an entry."),
        ],
    };
    let details_widget = Paragraph::new(details)
        .style(Style::default().fg(TEXT))
        .wrap(Wrap { trim: false })
        .block(panel_block("Details"));
    frame.render_widget(details_widget, details_chunks[1]);

    let status_widget = Paragraph::new(status.to_string())
        .style(status_style(status))
        .block(panel_block("Status"));
    frame.render_widget(status_widget, chunks[2]);

    let hints = match view {
        View::Browse => "↑/↓ move  a add  e/Enter edit  d delete  q quit",
        View::Form(_) => "Tab/↑/↓ field  ←/→ change  type to edit  Enter save  Esc cancel",
        View::ConfirmDelete(_) => "y/Enter delete  n/Esc cancel",
    };
    let footer = Paragraph::new(Span::styled(hints, Style::default().fg(MUTED)))
        .alignment(Alignment::Center)
        .block(panel_block("Controls"));
    frame.render_widget(footer, chunks[3]);

    match view {
        View::Browse => {}
        View::Form(form) => render_form(frame, form),
        View::ConfirmDelete(pending) => render_confirm_delete(frame, pending),
    }
}

fn render_poster(
    frame: &mut Frame,
    area: Rect,
    entry: Option<&Entry>,
    artwork_by_url: &HashMap<String, ArtworkState>,
) {
    let block = panel_block("Poster");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let placeholder = |text: &'static str| {
        Paragraph::new(text)
            .style(Style::default().fg(MUTED))
            .alignment(Alignment::Center)
    };

    let Some(entry) = entry else {
        return;
    };
    let url = entry.image.trim();
    if url.is_empty() {
        frame.render_widget(placeholder("No image"), inner);
        return;
    }

    match artwork_by_url.get(url) {
        None | Some(ArtworkState::Loading) => frame.render_widget(placeholder("Loading..."), inner),
        Some(ArtworkState::Ready(Artwork::Missing)) => {
            frame.render_widget(placeholder("No image"), inner)
        }
        Some(ArtworkState::Ready(Artwork::Failed(_))) => {
            frame.render_widget(placeholder("Error loading image"), inner)
        }
        Some(ArtworkState::Ready(Artwork::Loaded(image))) => {
            let lines = artwork_lines(image, inner.width, inner.height);
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
        }
    }
}

/// Draws the image with upper-half blocks: each cell carries two vertically
/// stacked pixels, the top one as foreground and the bottom one as background.
pub(crate) fn artwork_lines(image: &RgbImage, columns: u16, rows: u16) -> Vec<Line<'static>> {
    let (width, height) = fit_within(
        image.width(),
        image.height(),
        u32::from(columns),
        u32::from(rows) * 2,
    );
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let scaled = image::imageops::resize(image, width, height, FilterType::Triangle);
    (0..height)
        .step_by(2)
        .map(|y| {
            let spans = (0..width)
                .map(|x| {
                    let top = pixel_color(&scaled, x, y);
                    let bottom = if y + 1 < height {
                        pixel_color(&scaled, x, y + 1)
                    } else {
                        Color::Black
                    };
                    Span::styled("▀", Style::default().fg(top).bg(bottom))
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect()
}

fn pixel_color(image: &RgbImage, x: u32, y: u32) -> Color {
    let [r, g, b] = image.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}

fn render_form(frame: &mut Frame, form: &FormState) {
    let title = match form.mode {
        FormMode::Add => "Add New",
        FormMode::Edit { .. } => "Edit Selected",
    };

    let mut lines = Vec::new();
    for field in form.visible_fields() {
        let focused = field == form.focus;
        let label_style = if focused {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MUTED)
        };
        let mut value = form.field_value(field);
        if focused && field.is_text() {
            value.push('_');
        } else if focused {
            value = format!("◂ {value} ▸");
        }
        let marker = if focused { "▸ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<18}", field.label()), label_style),
            Span::styled(value, Style::default().fg(TEXT)),
        ]));
    }

    let area = centered_fixed_rect(72, lines.len() as u16 + 6, frame.area());
    render_popup_shadow(frame, area);
    frame.render_widget(Clear, area);
    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(modal_block(title));
    frame.render_widget(popup, area);
}

fn render_confirm_delete(frame: &mut Frame, pending: &PendingDelete) {
    let popup_text = format!(
        "Delete this entry?\n\n{}\n\nThis cannot be undone.\n\n[y / Enter] Delete   [n / Esc] Cancel",
        truncate(&pending.title, 56)
    );
    let popup_area = popup_rect_for_text(frame.area(), &popup_text);
    render_popup_shadow(frame, popup_area);
    frame.render_widget(Clear, popup_area);
    let popup = Paragraph::new(popup_text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(modal_block("Confirm Delete"));
    frame.render_widget(popup, popup_area);
}

fn panel_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(125, 135, 150)))
        .title(title)
}

fn modal_block(title: &'static str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(
            Style::default()
                .fg(Color::Rgb(160, 190, 235))
                .add_modifier(Modifier::BOLD),
        )
        .title(title)
        .padding(Padding::new(2, 2, 1, 1))
}

fn status_style(status: &str) -> Style {
    if status.starts_with("ERROR:") {
        Style::default()
            .fg(Color::Rgb(255, 145, 120))
            .add_modifier(Modifier::BOLD)
    } else if status.starts_with("INFO:") {
        Style::default().fg(Color::Rgb(205, 165, 255))
    } else {
        Style::default().fg(TEXT)
    }
}

fn centered_fixed_rect(width: u16, height: u16, area: Rect) -> Rect {
    let clamped_width = width.min(area.width.max(1));
    let clamped_height = height.min(area.height.max(1));
    let x = area.x + area.width.saturating_sub(clamped_width) / 2;
    let y = area.y + area.height.saturating_sub(clamped_height) / 2;
    Rect::new(x, y, clamped_width, clamped_height)
}

fn render_popup_shadow(frame: &mut Frame, popup_area: Rect) {
    let area = frame.area();
    let shadow = Rect::new(
        (popup_area.x + 1).min(area.x + area.width.saturating_sub(1)),
        (popup_area.y + 1).min(area.y + area.height.saturating_sub(1)),
        popup_area.width.saturating_sub(1),
        popup_area.height.saturating_sub(1),
    );
    if shadow.width == 0 || shadow.height == 0 {
        return;
    }
    let shadow_block = Block::default().style(Style::default().bg(Color::Rgb(14, 16, 24)));
    frame.render_widget(shadow_block, shadow);
}

fn popup_rect_for_text(area: Rect, text: &str) -> Rect {
    let max_line_width = text
        .lines()
        .map(|line| line.chars().count() as u16)
        .max()
        .unwrap_or(0);
    let line_count = text.lines().count() as u16;

    let available_width = area.width.saturating_sub(2).max(1);
    let min_width = 48.min(available_width);
    let max_width = 72.min(available_width);
    let width = max_line_width.saturating_add(12).clamp(min_width, max_width);

    let available_height = area.height.saturating_sub(2).max(1);
    let min_height = 10.min(available_height);
    let max_height = 18.min(available_height);
    let height = line_count.saturating_add(6).clamp(min_height, max_height);

    centered_fixed_rect(width, height, area)
}
