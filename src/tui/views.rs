//! TUI Views
//!
//! Wizard view, tool list view, and the shared header, footer and help
//! overlay.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
};

use super::app::App;
use super::colors;
use super::state::{InteractionMode, View as ActiveView};
use crate::notice::{Notice, NoticeLevel};
use crate::tools::Tool;

/// Trait for renderable views
pub trait View {
    /// Render the view to the frame
    fn render(&self, frame: &mut Frame, area: Rect, app: &App);

    /// Get the view title
    fn title(&self) -> &'static str;
}

/// One tool at a time, with the setup actions
pub struct WizardView;

impl WizardView {
    fn tool_lines(tool: &Tool, configured: bool) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let status = if configured {
            Span::styled("configured", Style::default().fg(colors::CONFIGURED))
        } else {
            Span::styled("not configured", Style::default().fg(colors::PENDING))
        };
        lines.push(Line::from(vec![
            Span::styled(tool.name.clone(), Style::default().fg(colors::HEADER).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            status,
        ]));
        if let Some(category) = &tool.category {
            lines.push(Line::from(Span::styled(category.clone(), Style::default().fg(colors::DIM))));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(tool.description.clone()));
        lines.push(Line::from(""));

        lines.push(Line::from(format!(
            "Wait for response: {}   Disable interruptions: {}",
            yes_no(tool.waits_for_response()),
            yes_no(tool.disables_interruptions())
        )));
        if let Some(mode) = tool.execution_mode {
            lines.push(Line::from(format!("Execution mode: {}", mode.as_str())));
        }
        lines.push(Line::from(""));

        if tool.parameters.is_empty() {
            lines.push(Line::from(Span::styled("No parameters", Style::default().fg(colors::DIM))));
        }
        for p in &tool.parameters {
            let required = if p.required { "required" } else { "optional" };
            lines.push(Line::from(vec![
                Span::styled(p.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(format!(" ({}, {})", p.param_type, required), Style::default().fg(colors::DIM)),
                Span::raw(format!(": {}", p.description)),
            ]));
            if !p.enum_slice().is_empty() {
                lines.push(Line::from(format!("    one of: {}", p.enum_slice().join(", "))));
            }
        }
        lines
    }
}

impl View for WizardView {
    fn render(&self, frame: &mut Frame, area: Rect, app: &App) {
        let Some(wizard) = app.wizard() else {
            let empty = Paragraph::new("No tools in the registry")
                .style(Style::default().fg(colors::DIM))
                .block(Block::default().borders(Borders::ALL).title(" Wizard "));
            frame.render_widget(empty, area);
            return;
        };

        let tool = wizard.current();
        let title = format!(" Tool {} of {} ", wizard.index() + 1, wizard.registry().len());
        let body = Paragraph::new(Self::tool_lines(tool, app.tracker().is_configured(&tool.name)))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(body, area);
    }

    fn title(&self) -> &'static str {
        "Wizard"
    }
}

/// Filterable list of tool cards
pub struct ToolsView;

impl View for ToolsView {
    fn render(&self, frame: &mut Frame, area: Rect, app: &App) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let filter = app.list.category.as_deref().unwrap_or("all categories");
        let search_style = if app.mode == InteractionMode::Search {
            Style::default().fg(colors::KEYBIND)
        } else {
            Style::default()
        };
        let search = Paragraph::new(app.list.query.as_str())
            .style(search_style)
            .block(Block::default().borders(Borders::ALL).title(format!(" Search ({}) ", filter)));
        frame.render_widget(search, chunks[0]);

        let visible = app.list.visible(app.registry());
        let items: Vec<ListItem> = visible
            .iter()
            .enumerate()
            .map(|(i, tool)| {
                let card = app.card(tool);
                let style = if i == app.list.selected {
                    Style::default().bg(colors::SELECTED).add_modifier(Modifier::BOLD)
                } else if card.configured {
                    Style::default().fg(colors::CONFIGURED)
                } else {
                    Style::default()
                };
                let lines: Vec<Line> = card.lines().into_iter().map(Line::from).collect();
                ListItem::new(lines).style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Tools ({}/{}) ", visible.len(), app.registry().len())),
        );
        frame.render_widget(list, chunks[1]);
    }

    fn title(&self) -> &'static str {
        "Tools"
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn notice_color(notice: &Notice) -> ratatui::style::Color {
    match notice.level {
        NoticeLevel::Info => colors::HEADER,
        NoticeLevel::Success => colors::CONFIGURED,
        NoticeLevel::Warning => colors::PENDING,
        NoticeLevel::Error => colors::FAILED,
    }
}

fn keybinds(view: ActiveView, mode: InteractionMode) -> &'static str {
    match (mode, view) {
        (InteractionMode::Search, _) => "type to filter  Enter done  Esc clear",
        (InteractionMode::Help, _) => "Esc close",
        (_, ActiveView::Wizard) => "n next  p prev  m mark+next  s skip  c copy  y copy name  Tab list  ? help  q quit",
        (_, ActiveView::Tools) => {
            "↑↓ move  Enter expand  Space toggle  / search  f category  c copy  w wizard  Tab wizard  q quit"
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let (configured, total) = app.progress();
    let ratio = if total == 0 { 0.0 } else { configured as f64 / total as f64 };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" ELEC-MATE voice tools - {} ", app.view.title())),
        )
        .gauge_style(Style::default().fg(colors::CONFIGURED))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{}/{} configured", configured, total));
    frame.render_widget(gauge, area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let line = match app.notice() {
        Some(notice) => Line::from(Span::styled(notice.message.clone(), Style::default().fg(notice_color(notice)))),
        None => Line::from(Span::styled(keybinds(app.view, app.mode), Style::default().fg(colors::KEYBIND))),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let width = area.width.min(64);
    let height = area.height.min(16);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    let text = vec![
        Line::from("Wizard"),
        Line::from("  n / →  next tool        p / ←  previous tool"),
        Line::from("  m      mark configured and go to the next tool"),
        Line::from("  s      skip to the next unconfigured tool"),
        Line::from("  c      copy tool definition   y  copy name"),
        Line::from(""),
        Line::from("Tools"),
        Line::from("  ↑ ↓    move      Enter  expand card"),
        Line::from("  Space  toggle configured"),
        Line::from("  /      search    f  cycle category filter"),
        Line::from("  w      open selected tool in the wizard"),
        Line::from(""),
        Line::from("Tab switch view   q quit"),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Help ")),
        popup,
    );
}

/// Draw the whole screen
pub fn render(app: &App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    match app.view {
        ActiveView::Wizard => WizardView.render(frame, chunks[1], app),
        ActiveView::Tools => ToolsView.render(frame, chunks[1], app),
    }
    render_footer(frame, chunks[2], app);

    if app.mode == InteractionMode::Help {
        render_help(frame, frame.area());
    }
}
