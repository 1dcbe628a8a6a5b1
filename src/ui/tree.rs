//! Indented tree layout for console output

use crate::protocol::Choice;

/// Marker drawn where a new name branches off its parent
const BRANCH: char = '+';

/// Line layout for a nesting depth, where depth 1 is the roots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLayout {
    width: usize,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self { width: 2 }
    }
}

impl TreeLayout {
    fn rails(&self, count: usize) -> String {
        let mut rail = " ".repeat(self.width);
        rail.push('|');
        rail.repeat(count)
    }

    /// Bare connector line at `depth`
    pub fn connector(&self, depth: usize) -> String {
        self.rails(depth.saturating_sub(1))
    }

    /// Text line belonging to the name at `depth`
    pub fn regular(&self, depth: usize, text: &str) -> String {
        format!("{}{}{}", self.connector(depth), " ".repeat(self.width), text)
    }

    /// Header for a newly entered name
    pub fn branch(&self, depth: usize, name: &str) -> String {
        let mut line = self.connector(depth);
        line.pop();
        line.push(BRANCH);
        line.push_str(&"-".repeat(self.width - 1));
        line.push_str(name);
        line
    }

    /// Indentation for a prompt that starts its own line
    pub fn prompt_indent(&self, depth: usize) -> String {
        format!("{}{}", self.rails(depth), " ".repeat(self.width))
    }

    /// `[y] Yes, [n] No, [q] Quit: `
    pub fn options<'a>(&self, options: &[Choice], label: impl Fn(Choice) -> &'a str) -> String {
        let listed = options
            .iter()
            .map(|choice| format!("[{}] {}", choice.key(), label(*choice)))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}: ", listed)
    }
}
