use fltk::prelude::*;
use fltk::text::TextEditor;

use super::buffer_utils::document_text;
use super::document::Document;
use super::task;

/// Glue between the pure painting functions and live widgets: re-reads the
/// document, writes the resulting style string into the style buffer, and
/// keeps the editor's highlight data in step with the document's style
/// table.
pub struct HighlightController {
    pub highlighting_enabled: bool,
}

impl HighlightController {
    pub fn new(highlighting_enabled: bool) -> Self {
        Self { highlighting_enabled }
    }

    /// Synchronous pass for one change event: task styling rebuilt from the
    /// current text, then the cached name pairs painted back on top.
    pub fn apply_task_styles(&self, doc: &mut Document, editor: &mut TextEditor, is_active: bool) {
        if !self.highlighting_enabled {
            return;
        }
        let text = document_text(&doc.buffer);
        let current = document_text(&doc.style_buffer);
        let styled = task::apply_task_styles(&text, &current, &doc.styles);
        let styled = task::apply_name_styles(&text, &styled, &doc.name_pairs, &mut doc.styles);
        doc.style_buffer.set_text(&styled);
        self.refresh_editor(doc, editor, is_active);
    }

    /// Repaint name styling only, against the latest text. Runs when an
    /// extraction completes; the text may have changed since the request
    /// was dispatched, which is accepted.
    pub fn apply_name_styles(&self, doc: &mut Document, editor: &mut TextEditor, is_active: bool) {
        if !self.highlighting_enabled {
            return;
        }
        let text = document_text(&doc.buffer);
        let current = document_text(&doc.style_buffer);
        let styled = task::apply_name_styles(&text, &current, &doc.name_pairs, &mut doc.styles);
        doc.style_buffer.set_text(&styled);
        self.refresh_editor(doc, editor, is_active);
    }

    /// Re-issue the editor's highlight data for a freshly bound document.
    pub fn bind_editor(&self, doc: &Document, editor: &mut TextEditor) {
        editor.set_highlight_data(doc.style_buffer.clone(), doc.styles.entries().to_vec());
    }

    fn refresh_editor(&self, doc: &mut Document, editor: &mut TextEditor, is_active: bool) {
        if !is_active {
            return;
        }
        if doc.styles.take_table_changed() {
            self.bind_editor(doc, editor);
        }
        editor.redraw();
    }

    /// Reset every document to unstyled text (highlighting turned off).
    pub fn clear_all(&self, docs: &mut [Document]) {
        for doc in docs {
            let len = doc.buffer.length() as usize;
            doc.style_buffer.set_text(&task::default_style_string(len));
        }
    }
}
