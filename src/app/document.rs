use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use fltk::app::Sender;
use fltk::enums::Font;
use fltk::text::TextBuffer;

use super::extractor::NamePair;
use super::messages::Message;
use super::task::default_style_string;
use super::task::style_map::StyleMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

/// One open document: the text buffer, its parallel style buffer, and the
/// per-document half of the extraction pipeline.
///
/// `styles`, `name_pairs` and `last_dispatch` are only ever touched from
/// the event loop; background threads report through the channel instead.
pub struct Document {
    pub id: DocumentId,
    pub buffer: TextBuffer,
    pub style_buffer: TextBuffer,
    pub file_path: Option<String>,
    pub has_unsaved_changes: Rc<Cell<bool>>,
    pub display_name: String,
    pub cursor_position: i32,
    /// Per-document style registry; each named style is created at most once.
    pub styles: StyleMap,
    /// Latest extraction result, replaced wholesale on every completion.
    pub name_pairs: Vec<NamePair>,
    /// When the last extraction was dispatched for this document.
    pub last_dispatch: Option<Instant>,
}

impl Document {
    pub fn new_untitled(
        id: DocumentId,
        counter: u32,
        sender: Sender<Message>,
        font: Font,
        font_size: i32,
    ) -> Self {
        let display_name = if counter == 1 {
            "Untitled".to_string()
        } else {
            format!("Untitled {}", counter)
        };

        let mut buffer = TextBuffer::default();
        let style_buffer = TextBuffer::default();
        let has_unsaved_changes = Rc::new(Cell::new(false));
        wire_modify_callback(&mut buffer, &style_buffer, &has_unsaved_changes, id, sender);

        Self {
            id,
            buffer,
            style_buffer,
            file_path: None,
            has_unsaved_changes,
            display_name,
            cursor_position: 0,
            styles: StyleMap::new(font, font_size),
            name_pairs: Vec::new(),
            last_dispatch: None,
        }
    }

    pub fn new_from_file(
        id: DocumentId,
        path: String,
        content: &str,
        sender: Sender<Message>,
        font: Font,
        font_size: i32,
    ) -> Self {
        let mut buffer = TextBuffer::default();
        let mut style_buffer = TextBuffer::default();
        let has_unsaved_changes = Rc::new(Cell::new(false));
        wire_modify_callback(&mut buffer, &style_buffer, &has_unsaved_changes, id, sender);

        buffer.set_text(content);
        style_buffer.set_text(&default_style_string(content.len()));
        has_unsaved_changes.set(false);

        Self {
            id,
            buffer,
            style_buffer,
            display_name: extract_filename(&path),
            file_path: Some(path),
            has_unsaved_changes,
            cursor_position: 0,
            styles: StyleMap::new(font, font_size),
            name_pairs: Vec::new(),
            last_dispatch: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.has_unsaved_changes.get()
    }

    pub fn mark_clean(&self) {
        self.has_unsaved_changes.set(false);
    }

    pub fn update_display_name(&mut self) {
        if let Some(ref path) = self.file_path {
            self.display_name = extract_filename(path);
        }
    }

    /// Release buffer memory immediately when the document is closed.
    pub fn cleanup(&mut self) {
        self.buffer.set_text("");
        self.style_buffer.set_text("");
    }
}

/// Keep the style buffer length-synced with every edit (filler chars on
/// insert, matching removal on delete) and notify the dispatch loop.
fn wire_modify_callback(
    buffer: &mut TextBuffer,
    style_buffer: &TextBuffer,
    has_unsaved_changes: &Rc<Cell<bool>>,
    id: DocumentId,
    sender: Sender<Message>,
) {
    let changes = has_unsaved_changes.clone();
    let mut style_buf = style_buffer.clone();
    buffer.add_modify_callback(move |pos, inserted, deleted, _restyled, _deleted_text| {
        if inserted > 0 || deleted > 0 {
            changes.set(true);
            if inserted > 0 {
                style_buf.insert(pos, &default_style_string(inserted as usize));
            }
            if deleted > 0 {
                style_buf.remove(pos, pos + deleted);
            }
            sender.send(Message::BufferModified(id, pos));
        }
    });
}

fn extract_filename(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_filename() {
        assert_eq!(extract_filename("/home/me/notes/today.txt"), "today.txt");
        assert_eq!(extract_filename("today.txt"), "today.txt");
        assert_eq!(extract_filename("/"), "/");
    }
}
