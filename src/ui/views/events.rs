use crate::app::state::AppState;
use crate::catalog::DEFAULT_MAX_PRICE;
use crate::ui::theme::Theme;
use crate::ui::views::{
    format_short_date, format_time, hint_line, price_span, render_message, spots_label, truncate,
};
use ratatui::prelude::*;
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

fn filter_line(state: &AppState) -> Line<'static> {
    let q = &state.query;
    let mut spans = vec![Span::styled("Filters: ", Theme::secondary())];
    let mut push = |label: &str, value: String, active: bool| {
        spans.push(Span::styled(format!("{} ", label), Theme::muted()));
        let style = if active { Theme::key_hint() } else { Theme::text() };
        spans.push(Span::styled(format!("{}  ", value), style));
    };
    push(
        "search",
        if q.search.is_empty() { "-".to_string() } else { format!("\"{}\"", q.search) },
        !q.search.is_empty(),
    );
    push(
        "category",
        q.category.clone().unwrap_or_else(|| "All".to_string()),
        q.category.is_some(),
    );
    push(
        "date",
        q.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "any".to_string()),
        q.date.is_some(),
    );
    push(
        "price",
        format!("${:.0}-${:.0}", q.min_price, q.max_price),
        q.min_price > 0.0 || q.max_price < DEFAULT_MAX_PRICE,
    );
    push("sort", q.sort.label().to_string(), false);
    Line::from(spans)
}

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let [filters, summary, table_area, hints] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(filter_line(state)), filters);
    frame.render_widget(
        Paragraph::new(hint_line(&[
            ("↑↓", "select"),
            ("←→", "page"),
            ("Enter", "open"),
            ("s", "sort"),
            ("c", "category"),
            ("f", "search"),
            ("x", "clear"),
        ])),
        hints,
    );

    if !state.events_loaded {
        render_message(frame, table_area, state, "Loading events...", state.is_loading());
        return;
    }

    let info = state.page_info();
    let page_label = if info.total_pages > 1 {
        format!("   Page {} of {}", info.page, info.total_pages)
    } else {
        String::new()
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(info.summary(), Theme::secondary()),
            Span::styled(page_label, Theme::muted()),
        ])),
        summary,
    );

    let events = state.page_events();
    if events.is_empty() {
        let text = if state.query.is_filtered() {
            "No events found. Try adjusting your search or filters."
        } else {
            "No events available yet."
        };
        render_message(frame, table_area, state, text, false);
        return;
    }

    let title_width = (table_area.width as usize).saturating_sub(70).max(16);
    let rows: Vec<Row> = events
        .iter()
        .map(|event| {
            Row::new(vec![
                Cell::from(truncate(&event.title, title_width)),
                Cell::from(event.category.clone()),
                Cell::from(format!(
                    "{} {}",
                    format_short_date(&state.config.ui, event.starts_at),
                    format_time(&state.config.ui, event.starts_at)
                )),
                Cell::from(truncate(&event.location, 24)),
                Cell::from(price_span(event)),
                Cell::from(spots_label(event)),
            ])
            .style(Theme::text())
        })
        .collect();

    let header = Row::new(["Event", "Category", "When", "Where", "Price", "Spots"])
        .style(Theme::heading())
        .bottom_margin(1);
    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(11),
            Constraint::Length(22),
            Constraint::Length(24),
            Constraint::Length(9),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .column_spacing(2)
    .row_highlight_style(Theme::selected())
    .highlight_symbol("▶ ");

    let selected = state.selected.min(events.len() - 1);
    let mut table_state = TableState::default().with_selected(Some(selected));
    frame.render_stateful_widget(table, table_area, &mut table_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_filter_line_marks_active() {
        let mut state = AppState::new(AppConfig::default(), None);
        state.update_query(|q| q.category = Some("Music".into()));
        let text: String = filter_line(&state)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.contains("category Music"));
        assert!(text.contains("search -"));
        assert!(text.contains("price $0-$500"));
    }
}
