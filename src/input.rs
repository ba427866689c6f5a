use crate::config;

/// Single-line text field edited from keyboard characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    text: String,
    max_chars: usize,
}

impl TextField {
    pub fn new() -> Self {
        TextField {
            text: String::new(),
            max_chars: config::MAX_INPUT_CHARS,
        }
    }

    pub fn with_text(text: &str) -> Self {
        let mut field = TextField::new();
        for c in text.chars() {
            field.push(c);
        }
        field
    }

    /// Append a typed character. Control characters and overflow are ignored.
    pub fn push(&mut self, c: char) -> bool {
        if c.is_control() || self.text.chars().count() >= self.max_chars {
            return false;
        }
        self.text.push(c);
        true
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl Default for TextField {
    fn default() -> Self {
        TextField::new()
    }
}

/// Which field receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Seed,
    Guess,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Seed => Focus::Guess,
            Focus::Guess => Focus::Seed,
        }
    }
}
