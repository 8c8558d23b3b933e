use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};

pub struct AppLayout {
    pub header: Rect,
    pub content: Rect,
    pub input_box: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // View
            Constraint::Length(3), // Command box
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    AppLayout {
        header: chunks[0],
        content: chunks[1],
        input_box: chunks[2],
        status_bar: chunks[3],
    }
}

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_heights() {
        let layout = compute_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.input_box.height, 3);
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.content.height, 19);
        assert_eq!(layout.status_bar.y, 23);
    }

    #[test]
    fn test_centered_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered(area, 20, 4);
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (10, 3, 20, 4));
        let big = centered(area, 100, 100);
        assert_eq!((big.width, big.height), (40, 10));
    }
}
