use std::collections::HashMap;

use fltk::enums::{Color, Font};
use fltk::text::StyleTableEntry;

use super::classifier::TaskState;

/// Style character for unstyled text.
pub const DEFAULT_STYLE: char = 'A';

// FLTK style chars run 'A'..'Z'; the default takes 'A', the four task
// styles take 'B'..'E', and name styles are allocated from 'F' upward.
const FIRST_TASK_CHAR: u8 = b'B';
const FIRST_NAME_CHAR: u8 = b'F';
const MAX_ENTRIES: usize = 26;

const OPEN_RGB: (u8, u8, u8) = (0x35, 0x84, 0xe4);
const COMPLETED_RGB: (u8, u8, u8) = (0x26, 0xa2, 0x69);
const CAVEAT_RGB: (u8, u8, u8) = (0x98, 0xc0, 0x3a);
const MAYBE_RGB: (u8, u8, u8) = (0xc0, 0x9c, 0x3a);

/// Pastel foregrounds for name styles, keyed by the color labels the
/// extraction service is prompted to use.
const NAME_PALETTE: &[(&str, (u8, u8, u8))] = &[
    ("red", (0xff, 0xb3, 0xba)),
    ("yellow", (0xff, 0xf6, 0xb3)),
    ("green", (0xba, 0xff, 0xc9)),
    ("blue", (0x8a, 0xc4, 0xf0)),
    ("purple", (0xe0, 0xbb, 0xff)),
    ("orange", (0xff, 0xd6, 0xa5)),
    ("pink", (0xff, 0xb7, 0xce)),
    ("grey", (0xe2, 0xe2, 0xe2)),
    ("black", (0x07, 0x06, 0x06)),
    ("brown", (0xe4, 0xc1, 0xb9)),
    ("teal", (0xb3, 0xff, 0xf6)),
];
const FALLBACK_NAME_RGB: (u8, u8, u8) = (0xe0, 0xe0, 0xe0);

/// Per-document registry of named styles.
///
/// Maps style names to single-byte style characters backed by an FLTK
/// `StyleTableEntry` table. Creation is idempotent: asking for an existing
/// name returns the char it already has, so reconnecting to a configured
/// document never duplicates entries.
pub struct StyleMap {
    name_to_char: HashMap<String, char>,
    entries: Vec<StyleTableEntry>,
    font: Font,
    font_size: i32,
    table_changed: bool,
}

impl StyleMap {
    pub fn new(font: Font, font_size: i32) -> Self {
        let mut map = Self {
            name_to_char: HashMap::new(),
            entries: Vec::new(),
            font,
            font_size,
            table_changed: true,
        };
        map.push_entry("default", Color::Foreground);
        map.push_entry("task-open", rgb(OPEN_RGB));
        map.push_entry("task-completed", rgb(COMPLETED_RGB));
        map.push_entry("task-completed-but", rgb(CAVEAT_RGB));
        map.push_entry("task-maybe", rgb(MAYBE_RGB));
        map
    }

    /// Create the named style if missing; either way return its style char.
    pub fn ensure_style(&mut self, name: &str, color: (u8, u8, u8)) -> char {
        if let Some(&ch) = self.name_to_char.get(name) {
            return ch;
        }
        self.push_entry(name, rgb(color))
    }

    /// Style for an extracted name's color label.
    ///
    /// The style name is derived from the lowercased label, so "Blue" and
    /// "blue" share one entry. Labels outside the palette get the neutral
    /// fallback color.
    pub fn ensure_name_style(&mut self, color_label: &str) -> char {
        let label = color_label.to_lowercase();
        let style_name = format!("llm-name-{}", label);
        self.ensure_style(&style_name, palette_rgb(&label))
    }

    fn push_entry(&mut self, name: &str, color: Color) -> char {
        let idx = self.entries.len();
        if idx >= MAX_ENTRIES {
            // Table is full; reuse the last char instead of growing past
            // what FLTK's style chars can address.
            return (b'A' + (MAX_ENTRIES - 1) as u8) as char;
        }
        let ch = (b'A' + idx as u8) as char;
        self.entries.push(StyleTableEntry {
            color,
            font: self.font,
            size: self.font_size,
        });
        self.name_to_char.insert(name.to_string(), ch);
        self.table_changed = true;
        ch
    }

    /// Style char for a task state; `Plain` lines have none.
    pub fn task_char(&self, state: TaskState) -> Option<char> {
        let name = match state {
            TaskState::Plain => return None,
            TaskState::Open => "task-open",
            TaskState::Completed => "task-completed",
            TaskState::CompletedWithCaveat => "task-completed-but",
            TaskState::MaybeCompleted => "task-maybe",
        };
        self.name_to_char.get(name).copied()
    }

    pub fn is_task_char(ch: char) -> bool {
        ch.is_ascii() && (FIRST_TASK_CHAR..FIRST_NAME_CHAR).contains(&(ch as u8))
    }

    pub fn is_name_char(ch: char) -> bool {
        ch.is_ascii() && (FIRST_NAME_CHAR..b'A' + MAX_ENTRIES as u8).contains(&(ch as u8))
    }

    /// The style table for FLTK's `set_highlight_data`.
    pub fn entries(&self) -> &[StyleTableEntry] {
        &self.entries
    }

    /// True once per batch of newly created styles; the caller re-issues
    /// `set_highlight_data` when this reports a change.
    pub fn take_table_changed(&mut self) -> bool {
        let changed = self.table_changed;
        self.table_changed = false;
        changed
    }

    /// Update font info for all entries.
    pub fn update_font(&mut self, font: Font, size: i32) {
        self.font = font;
        self.font_size = size;
        for entry in &mut self.entries {
            entry.font = font;
            entry.size = size;
        }
        self.table_changed = true;
    }

    pub fn style_count(&self) -> usize {
        self.entries.len()
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::from_rgb(r, g, b)
}

fn palette_rgb(label: &str) -> (u8, u8, u8) {
    NAME_PALETTE
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_NAME_RGB)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> StyleMap {
        StyleMap::new(Font::Courier, 16)
    }

    #[test]
    fn test_task_styles_preregistered() {
        let m = map();
        assert_eq!(m.style_count(), 5);
        assert_eq!(m.task_char(TaskState::Plain), None);
        assert_eq!(m.task_char(TaskState::Open), Some('B'));
        assert_eq!(m.task_char(TaskState::Completed), Some('C'));
        assert_eq!(m.task_char(TaskState::CompletedWithCaveat), Some('D'));
        assert_eq!(m.task_char(TaskState::MaybeCompleted), Some('E'));
    }

    #[test]
    fn test_ensure_style_is_idempotent() {
        let mut m = map();
        let first = m.ensure_style("llm-name-blue", (0x8a, 0xc4, 0xf0));
        let count = m.style_count();
        let second = m.ensure_style("llm-name-blue", (0x8a, 0xc4, 0xf0));
        assert_eq!(first, second);
        assert_eq!(m.style_count(), count);
    }

    #[test]
    fn test_name_style_label_case_folds() {
        let mut m = map();
        let a = m.ensure_name_style("Blue");
        let b = m.ensure_name_style("blue");
        let c = m.ensure_name_style("BLUE");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(m.style_count(), 6);
    }

    #[test]
    fn test_unknown_label_falls_back() {
        assert_eq!(palette_rgb("chartreuse"), FALLBACK_NAME_RGB);
        assert_eq!(palette_rgb("teal"), (0xb3, 0xff, 0xf6));
    }

    #[test]
    fn test_char_class_boundaries() {
        assert!(!StyleMap::is_task_char('A'));
        assert!(StyleMap::is_task_char('B'));
        assert!(StyleMap::is_task_char('E'));
        assert!(!StyleMap::is_task_char('F'));
        assert!(!StyleMap::is_name_char('E'));
        assert!(StyleMap::is_name_char('F'));
        assert!(StyleMap::is_name_char('Z'));
        assert!(!StyleMap::is_name_char('['));
        assert!(!StyleMap::is_name_char('é'));
    }

    #[test]
    fn test_table_capacity_cap() {
        let mut m = map();
        for i in 0..30 {
            m.ensure_name_style(&format!("color-{}", i));
        }
        assert_eq!(m.style_count(), MAX_ENTRIES);
        // Overflow reuses the last addressable char.
        assert_eq!(m.ensure_name_style("one-more"), 'Z');
    }

    #[test]
    fn test_table_changed_flag() {
        let mut m = map();
        assert!(m.take_table_changed());
        assert!(!m.take_table_changed());
        m.ensure_name_style("green");
        assert!(m.take_table_changed());
        // An idempotent hit does not mark the table dirty.
        m.ensure_name_style("green");
        assert!(!m.take_table_changed());
    }

    #[test]
    fn test_update_font_rewrites_entries() {
        let mut m = map();
        m.update_font(Font::ScreenBold, 20);
        assert!(m.entries().iter().all(|e| e.font == Font::ScreenBold && e.size == 20));
    }
}
