use unicode_width::UnicodeWidthStr;

/// Single-line editable text with a byte-offset cursor. Used by the command
/// line (with history) and by every form field.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub text: String,
    pub cursor: usize,
    pub history: Vec<String>,
    pub history_index: Option<usize>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.history_index = None;
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.text.len() {
            let next = self.next_boundary();
            self.text.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor = self.next_boundary();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Take the text out, recording non-empty lines in history.
    pub fn take_text(&mut self) -> String {
        let text = std::mem::take(&mut self.text);
        self.cursor = 0;
        self.history_index = None;
        if !text.is_empty() {
            self.history.push(text.clone());
        }
        text
    }

    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.history_index {
            Some(i) if i > 0 => i - 1,
            Some(_) => return,
            None => self.history.len() - 1,
        };
        self.history_index = Some(idx);
        self.text = self.history[idx].clone();
        self.cursor = self.text.len();
    }

    pub fn history_down(&mut self) {
        match self.history_index {
            Some(i) if i + 1 < self.history.len() => {
                let idx = i + 1;
                self.history_index = Some(idx);
                self.text = self.history[idx].clone();
                self.cursor = self.text.len();
            }
            Some(_) => {
                self.history_index = None;
                self.text.clear();
                self.cursor = 0;
            }
            None => {}
        }
    }

    pub fn delete_word_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let before = &self.text[..self.cursor];
        let trimmed = before.trim_end_matches(' ');
        let pos = trimmed.rfind(' ').map(|i| i + 1).unwrap_or(0);
        self.text.drain(pos..self.cursor);
        self.cursor = pos;
    }

    /// Display column of the cursor.
    pub fn cursor_col(&self) -> usize {
        self.text[..self.cursor].width()
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing_multibyte() {
        let mut input = InputState::new();
        for c in "café".chars() {
            input.insert_char(c);
        }
        input.delete_back();
        assert_eq!(input.text, "caf");
        input.move_home();
        input.delete_forward();
        assert_eq!(input.text, "af");
        input.move_right();
        input.insert_char('é');
        assert_eq!(input.text, "aéf");
        assert_eq!(input.cursor_col(), 2);
    }

    #[test]
    fn test_delete_word_back() {
        let mut input = InputState::new();
        input.set_text("/search summer  ");
        input.delete_word_back();
        assert_eq!(input.text, "/search ");
        input.delete_word_back();
        assert_eq!(input.text, "");
    }

    #[test]
    fn test_history() {
        let mut input = InputState::new();
        input.set_text("/events");
        assert_eq!(input.take_text(), "/events");
        input.set_text("/home");
        input.take_text();
        input.history_up();
        assert_eq!(input.text, "/home");
        input.history_up();
        assert_eq!(input.text, "/events");
        input.history_down();
        assert_eq!(input.text, "/home");
        input.history_down();
        assert_eq!(input.text, "");
    }
}
