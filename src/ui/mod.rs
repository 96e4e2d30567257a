use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use deadline_widget::{
    deadline::format_countdown,
    widget::{timer::TimerFace, ListWidgetAdapter},
};

use crate::app::App;

// ─── Root draw ────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    // Layout: [ content | status_bar(1) ]
    let root = Layout::default().direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)]).split(area);

    // Content: [ deadline list | timer(30) ]
    let cols = Layout::default().direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)]).split(root[0]);

    draw_list(f, app, cols[0]);
    draw_timer(f, app, cols[1]);
    draw_statusbar(f, app, root[1]);

    if app.show_help { draw_help(f, area, app); }
}

fn widget_block<'a>(app: &App, label: &'a str) -> Block<'a> {
    let t = &app.theme;
    Block::default()
        .title(Title::from(Line::from(Span::styled(
            label,
            Style::default().fg(t.fg()).add_modifier(Modifier::BOLD),
        ))))
        .borders(Borders::ALL)
        .border_type(t.border_type())
        .border_style(Style::default().fg(t.border()))
        .style(Style::default().bg(t.bg()))
}

// ─── Deadline list widget ─────────────────────────────────────────────────────

fn draw_list(f: &mut Frame, app: &App, area: Rect) {
    let t       = &app.theme;
    let adapter = app.controller.list();
    let block   = widget_block(app, " Upcoming Deadlines ");

    if adapter.item_count() == 0 {
        // Empty view, as the platform list shows when the adapter has no rows.
        f.render_widget(
            Paragraph::new("  No upcoming deadlines").block(block).style(Style::default().fg(t.fg_dim())),
            area,
        );
        return;
    }

    // Host side of the adapter contract: ask for each row by position.
    let items: Vec<ListItem> = (0..adapter.item_count()).map(|i| {
        let row   = adapter.item_at(i);
        let time_style = if row.time_label == "Done" {
            Style::default().fg(t.done()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.timer())
        };
        ListItem::new(Line::from(vec![
            Span::styled(format!(" {:<6}", row.department), Style::default().fg(t.dept()).add_modifier(Modifier::BOLD)),
            Span::styled(format!("{:<6} ", row.number), Style::default().fg(t.fg_dim())),
            Span::styled(row.title, Style::default().fg(t.fg())),
            Span::raw("  "),
            Span::styled(row.time_label, time_style),
        ]))
    }).collect();

    let mut state = ListState::default();
    state.select(Some(app.list_cursor));
    f.render_stateful_widget(
        List::new(items).block(block)
            .highlight_style(Style::default().bg(t.row_bg()))
            .highlight_symbol("▶"),
        area,
        &mut state,
    );
}

// ─── Timer widget ─────────────────────────────────────────────────────────────

fn draw_timer(f: &mut Frame, app: &App, area: Rect) {
    let t     = &app.theme;
    let entry = app.controller.timer();
    let block = widget_block(app, " Deadline Timer ");

    let digits = match &entry.face {
        TimerFace::Countdown { .. } => entry
            .remaining_millis(app.monotonic_now())
            .map(format_countdown)
            .unwrap_or_default(),
        TimerFace::Static(label) => label.clone(),
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            entry.title.clone(),
            Style::default().fg(t.fg()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(entry.subject.clone(), Style::default().fg(t.fg_dim()))),
        Line::from(""),
        Line::from(Span::styled(
            digits,
            Style::default().fg(t.timer()).add_modifier(Modifier::BOLD),
        )),
    ];

    f.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Center),
        area,
    );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_statusbar(f: &mut Frame, app: &App, area: Rect) {
    let t   = &app.theme;
    let bar = Paragraph::new(Line::from(vec![
        Span::styled(
            " j/k:move  r:refresh  ?:help  q:quit",
            Style::default().fg(t.fg_dim()),
        ),
        Span::styled(
            format!("  {}", app.status),
            Style::default().fg(t.fg()).add_modifier(Modifier::ITALIC),
        ),
    ])).style(Style::default().bg(t.row_bg()));
    f.render_widget(bar, area);
}

// ─── Help overlay ────────────────────────────────────────────────────────────

fn draw_help(f: &mut Frame, area: Rect, app: &App) {
    let t    = &app.theme;
    let rect = centered(60, 50, area);
    f.render_widget(Clear, rect);

    let accent = Style::default().fg(t.timer()).add_modifier(Modifier::BOLD);
    let dim    = Style::default().fg(t.fg_dim());
    let lines  = vec![
        Line::from(""),
        Line::from(Span::styled("  Deadline list", accent)),
        Line::from(Span::styled("  j / k  ↓ / ↑      Move selection", dim)),
        Line::from(""),
        Line::from(Span::styled("  Shared store", accent)),
        Line::from(Span::styled("  r                  Re-read the store now", dim)),
        Line::from(Span::styled("  Changes on disk refresh both widgets automatically", dim)),
        Line::from(""),
        Line::from(Span::styled("  General", accent)),
        Line::from(Span::styled("  ?                  Help (any key closes)", dim)),
        Line::from(Span::styled("  q / Esc            Quit", dim)),
    ];

    f.render_widget(
        Paragraph::new(lines).block(widget_block(app, " Keyboard Shortcuts "))
            .style(Style::default().fg(t.fg()))
            .wrap(Wrap { trim: false }),
        rect,
    );
}

// ─── Utilities ────────────────────────────────────────────────────────────────

fn centered(pct_x: u16, pct_y: u16, r: Rect) -> Rect {
    let vert = Layout::default().direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ]).split(r);
    Layout::default().direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ]).split(vert[1])[1]
}
