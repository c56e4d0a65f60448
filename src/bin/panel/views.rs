//! View rendering for the panel
//!
//! One render function per view plus the shared header/footer chrome.
//! Rendering is a pure function of [`App`] state; nothing here talks to
//! the host.

use crate::app::{App, InputMode, View};
use argus_core::timefmt;
use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Color palette, switched by the dark-mode preference
struct Palette {
    text: Color,
    accent: Color,
    dim: Color,
}

fn palette(dark: bool) -> Palette {
    if dark {
        Palette {
            text: Color::White,
            accent: Color::Cyan,
            dim: Color::DarkGray,
        }
    } else {
        Palette {
            text: Color::Black,
            accent: Color::Blue,
            dim: Color::Gray,
        }
    }
}

/// Draw the whole panel
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    match app.view {
        View::Dashboard => draw_dashboard(f, app, chunks[1]),
        View::Tools => draw_tools(f, app, chunks[1]),
        View::Settings => draw_settings(f, app, chunks[1]),
    }
    draw_footer(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let colors = palette(app.prefs.dark_mode);
    let (pin_icon, pin_tooltip) = app.pin_indicator();

    let mut spans = Vec::new();
    for view in View::all() {
        let style = if view == app.view {
            Style::default().fg(colors.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.dim)
        };
        spans.push(Span::styled(
            format!(" {} {} ", view.shortcut_key(), view.title()),
            style,
        ));
    }
    spans.push(Span::styled(
        format!("  {pin_icon} "),
        Style::default().fg(colors.text),
    ));

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Argus — {pin_tooltip}: p ")),
    );
    f.render_widget(header, area);
}

fn draw_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let colors = palette(app.prefs.dark_mode);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    // Stat boxes: visits, open tabs, bookmarks
    let stats = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(chunks[0]);
    let stat = |value: String, label: &str| {
        Paragraph::new(vec![
            Line::from(Span::styled(
                value,
                Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(label.to_string(), Style::default().fg(colors.dim))),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
    };
    f.render_widget(stat(app.snapshot.visit_count.to_string(), "Visits"), stats[0]);
    f.render_widget(stat(app.snapshot.tab_count.to_string(), "Open tabs"), stats[1]);
    f.render_widget(stat(app.snapshot.bookmark_count.to_string(), "Bookmarks"), stats[2]);

    // Recent activity, newest first
    let now_ms = Utc::now().timestamp_millis();
    let items: Vec<ListItem> = if app.snapshot.recent.is_empty() {
        vec![ListItem::new(Span::styled(
            "No recent activity",
            Style::default().fg(colors.dim),
        ))]
    } else {
        app.snapshot
            .recent
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(entry.action.clone(), Style::default().fg(colors.text)),
                    Span::styled(
                        format!("  {}", timefmt::format_relative(entry.timestamp, now_ms)),
                        Style::default().fg(colors.dim),
                    ),
                ]))
            })
            .collect()
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Recent Activity "),
    );
    f.render_widget(list, chunks[1]);
}

fn draw_tools(f: &mut Frame, app: &App, area: Rect) {
    let colors = palette(app.prefs.dark_mode);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(3),
        ])
        .split(area);

    // Search field
    let search_style = if app.input_mode == InputMode::Search {
        Style::default().fg(colors.accent)
    } else {
        Style::default().fg(colors.dim)
    };
    let cursor = if app.input_mode == InputMode::Search { "▏" } else { "" };
    let search = Paragraph::new(format!("{}{cursor}", app.search_input))
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search or enter URL (/) "),
        );
    f.render_widget(search, chunks[0]);

    let hints = Paragraph::new(Line::from(Span::styled(
        "c screenshot | b bookmark | t translate | m reading mode | i reading time",
        Style::default().fg(colors.dim),
    )));
    f.render_widget(hints, chunks[1]);

    // Tab list, host order, selected row highlighted
    let items: Vec<ListItem> = app
        .tabs()
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let marker = if tab.favicon_url.is_some() { "◉" } else { "○" };
            let style = if i == app.selected_tab {
                Style::default().fg(colors.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text)
            };
            ListItem::new(Span::styled(format!("{marker} {}", tab.title), style))
        })
        .collect();
    let list = List::new(items).block(
        Block::default().borders(Borders::ALL).title(format!(
            " Tabs ({}) — ↑/↓ select, Enter switch, x close ",
            app.tabs().len()
        )),
    );
    f.render_widget(list, chunks[2]);
}

fn draw_settings(f: &mut Frame, app: &App, area: Rect) {
    let colors = palette(app.prefs.dark_mode);
    use argus_core::prefs::PrefKey;

    let toggle = |key: PrefKey, shortcut: char| {
        let mark = if app.prefs.get(key) { "[x]" } else { "[ ]" };
        Line::from(vec![
            Span::styled(format!("{mark} "), Style::default().fg(colors.accent)),
            Span::styled(key.label().to_string(), Style::default().fg(colors.text)),
            Span::styled(format!(" ({shortcut})"), Style::default().fg(colors.dim)),
        ])
    };

    let mut lines = vec![
        toggle(PrefKey::DarkMode, 'd'),
        toggle(PrefKey::AutoPin, 'a'),
        toggle(PrefKey::Shortcuts, 's'),
        toggle(PrefKey::Notifications, 'n'),
        Line::default(),
        Line::from(Span::styled(
            "e export data | x clear all data",
            Style::default().fg(colors.dim),
        )),
    ];
    if app.input_mode == InputMode::ConfirmClear {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Clear ALL data? This cannot be undone. (y/n)",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    let settings = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Settings "));
    f.render_widget(settings, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    // The transient success notice takes over the footer while active
    let footer = if let Some(notice) = app.notice() {
        Paragraph::new(notice.message.as_str()).style(Style::default().fg(Color::Green))
    } else {
        Paragraph::new("1-3 views | Tab next | r refresh | p pin | q quit")
            .style(Style::default().fg(Color::Gray))
    };
    f.render_widget(footer, area);
}
