mod form;
mod header;
mod input_box;
mod layout;
mod overlay;
mod status_bar;
mod theme;
mod views;

use crate::app::state::AppState;
use ratatui::prelude::*;

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let app_layout = layout::compute_layout(area);

    header::render(frame, app_layout.header, state);
    views::render(frame, app_layout.content, state);
    input_box::render(frame, app_layout.input_box, state);
    status_bar::render(frame, app_layout.status_bar, state);

    // Overlays, bottom to top
    if let Some(confirm) = &state.confirm {
        overlay::render_confirm(frame, app_layout.content, confirm);
    }
    if state.help_visible {
        overlay::render_help(frame, area);
    }
    overlay::render_toasts(frame, app_layout.content, state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::seed::seed_events;
    use crate::app::route::Route;
    use crate::app::state::Remote;
    use crate::config::AppConfig;
    use ratatui::backend::TestBackend;

    fn screen(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn loaded() -> AppState {
        let mut state = AppState::new(AppConfig::default(), None);
        state.events = seed_events();
        state.events_loaded = true;
        state
    }

    #[test]
    fn test_events_view_lists_page() {
        let mut state = loaded();
        state.route = Route::events();
        let text = screen(&state);
        assert!(text.contains("Showing 1-4 of 4 events"));
        assert!(text.contains("Startup Pitch Night"));
    }

    #[test]
    fn test_detail_not_found() {
        let mut state = loaded();
        state.route = Route::EventDetail("99".into());
        state.detail = Remote::Failed("Event not found".into());
        assert!(screen(&state).contains("Event Not Found"));
    }

    #[test]
    fn test_detail_shows_capacity() {
        let mut state = loaded();
        state.route = Route::EventDetail("4".into());
        state.detail = Remote::Ready(state.events[3].clone());
        let text = screen(&state);
        assert!(text.contains("42/50 attending (84%)"));
        assert!(text.contains("8 spots remaining"));
    }

    #[test]
    fn test_toast_is_drawn() {
        let mut state = loaded();
        state.toast_success("RSVP successful!");
        assert!(screen(&state).contains("RSVP successful!"));
    }

    #[test]
    fn test_unknown_path_renders_404() {
        let mut state = loaded();
        state.route = Route::parse("/nowhere");
        let text = screen(&state);
        assert!(text.contains("Page Not Found"));
        assert!(text.contains("/nowhere"));
    }
}
