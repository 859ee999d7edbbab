use ratatui::prelude::*;

/// Vertical bands of the main screen.
pub struct MainLayout {
    pub input: Rect,
    pub controls: Rect,
    pub preview: Rect,
    /// Zero height while the progress panel is hidden.
    pub progress: Rect,
    /// Result or error panel; zero height when neither is shown.
    pub outcome: Rect,
    pub help: Rect,
}

pub fn create_main_layout(area: Rect, show_progress: bool, show_outcome: bool) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(if show_progress { 5 } else { 0 }),
            Constraint::Length(if show_outcome { 5 } else { 0 }),
            Constraint::Length(3),
        ])
        .split(area);

    MainLayout {
        input: chunks[0],
        controls: chunks[1],
        preview: chunks[2],
        progress: chunks[3],
        outcome: chunks[4],
        help: chunks[5],
    }
}

/// Splits the inner progress area into the gauge row and two text rows.
pub fn progress_rows(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// A box `percent_x` wide and `height` tall, centered in `area`.
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_panels_take_no_rows() {
        let layout = create_main_layout(Rect::new(0, 0, 80, 30), false, false);
        assert_eq!(layout.progress.height, 0);
        assert_eq!(layout.outcome.height, 0);
        assert_eq!(layout.preview.height, 30 - 3 - 1 - 3);
    }

    #[test]
    fn popup_is_centered() {
        let popup = centered_rect(60, 5, Rect::new(0, 0, 100, 25));
        assert_eq!(popup.height, 5);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 10);
    }
}
