use grabber_core::{AppViewModel, ButtonView, Format, PreviewView, ProgressView, ResultView};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::{constants, layout, UiState};

pub fn draw(f: &mut Frame, view: &AppViewModel, ui: &UiState) {
    let show_outcome = view.result.is_some() || view.error.is_some();
    let main = layout::create_main_layout(f.area(), view.progress.is_some(), show_outcome);

    draw_input(f, main.input, view);
    f.render_widget(controls_line(view), main.controls);
    draw_preview(f, main.preview, view.preview.as_ref(), ui);
    if let Some(progress) = &view.progress {
        draw_progress(f, main.progress, progress);
    }
    if let Some(result) = &view.result {
        f.render_widget(result_panel(result), main.outcome);
    } else if let Some(error) = &view.error {
        f.render_widget(error_panel(error), main.outcome);
    }

    let help = Paragraph::new(constants::HELP_TEXT)
        .block(Block::default().borders(Borders::ALL).title(constants::HELP_TITLE))
        .wrap(Wrap { trim: true });
    f.render_widget(help, main.help);

    if let Some(alert) = &view.alert {
        draw_alert(f, alert);
    }
}

fn draw_input(f: &mut Frame, area: Rect, view: &AppViewModel) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let shown = input_tail(&view.input, inner_width.saturating_sub(1));
    let input = Paragraph::new(shown).block(
        Block::default()
            .borders(Borders::ALL)
            .title(constants::INPUT_TITLE)
            .title_top(Line::from(constants::APP_TITLE).right_aligned()),
    );
    f.render_widget(input, area);
    if view.alert.is_none() {
        let offset = shown.chars().count() as u16;
        f.set_cursor_position((area.x + 1 + offset, area.y + 1));
    }
}

/// The last `width` characters of `input`, so the caret stays visible.
fn input_tail(input: &str, width: usize) -> &str {
    let count = input.chars().count();
    if count <= width {
        return input;
    }
    let skip = count - width;
    match input.char_indices().nth(skip) {
        Some((index, _)) => &input[index..],
        None => "",
    }
}

fn controls_line(view: &AppViewModel) -> Paragraph<'static> {
    let mut spans = vec![Span::raw(" Format: ")];
    for format in Format::ALL {
        let mark = if format == view.format { "(*)" } else { "( )" };
        let style = if format == view.format {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(
            format!("{mark} {} ", format.as_str().to_uppercase()),
            style,
        ));
    }
    spans.push(Span::raw("   "));
    spans.push(button(view.submit, Color::Green));
    spans.push(Span::raw(" "));
    if view.progress.is_some() {
        spans.push(button(view.cancel, Color::Red));
    }
    Paragraph::new(Line::from(spans))
}

fn button(button: ButtonView, color: Color) -> Span<'static> {
    let style = if button.enabled {
        Style::default().fg(Color::Black).bg(color)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!("[ {} ]", button.label), style)
}

fn draw_preview(f: &mut Frame, area: Rect, preview: Option<&PreviewView>, ui: &UiState) {
    let block = Block::default().borders(Borders::ALL);
    let Some(preview) = preview else {
        let hint = Paragraph::new("Paste a YouTube video or playlist URL above.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block.title(constants::PREVIEW_TITLE));
        f.render_widget(hint, area);
        return;
    };

    let mut block = block.title(format!(" {} ", preview.title));
    if preview.loading {
        f.render_widget(Paragraph::new("").block(block), area);
        return;
    }
    if !preview.entries.is_empty() {
        let mark = if preview.select_all { "x" } else { " " };
        block = block.title_bottom(format!(" [{mark}] Select all "));
    }

    let items: Vec<ListItem> = preview
        .entries
        .iter()
        .map(|row| {
            let mark = match (row.selectable, row.checked) {
                (false, _) => "[-]",
                (true, true) => "[x]",
                (true, false) => "[ ]",
            };
            let line = format!("{mark} {:>8}  {}", row.duration, row.title);
            if row.selectable {
                ListItem::new(line)
            } else {
                ListItem::new(line).style(Style::default().fg(Color::DarkGray))
            }
        })
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default();
    if !preview.entries.is_empty() {
        state.select(Some(ui.cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_progress(f: &mut Frame, area: Rect, progress: &ProgressView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(constants::PROGRESS_TITLE);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [gauge_row, status_row, file_row] = layout::progress_rows(inner);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(progress.ratio())
        .label(progress.percent_text.clone());
    f.render_widget(gauge, gauge_row);
    f.render_widget(Paragraph::new(progress.status.clone()), status_row);
    f.render_widget(
        Paragraph::new(progress.current_file.clone()).style(Style::default().fg(Color::DarkGray)),
        file_row,
    );
}

fn result_panel(result: &ResultView) -> Paragraph<'static> {
    let lines = vec![
        Line::from(Span::styled(
            result.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(result.download_url.clone()),
        Line::from(Span::styled(
            constants::RESULT_HINT,
            Style::default().fg(Color::DarkGray),
        )),
    ];
    Paragraph::new(lines)
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL).title(constants::RESULT_TITLE))
        .wrap(Wrap { trim: true })
}

fn error_panel(error: &str) -> Paragraph<'static> {
    let lines = vec![
        Line::from(error.to_string()),
        Line::from(Span::styled(
            constants::ERROR_HINT,
            Style::default().fg(Color::DarkGray),
        )),
    ];
    Paragraph::new(lines)
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL).title(constants::ERROR_TITLE))
        .wrap(Wrap { trim: true })
}

fn draw_alert(f: &mut Frame, alert: &str) {
    let area = layout::centered_rect(60, 5, f.area());
    let popup = Paragraph::new(vec![
        Line::from(alert.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            constants::ALERT_HINT,
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(constants::ALERT_TITLE)
            .style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}
