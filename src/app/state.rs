use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use fltk::{
    app::Sender,
    dialog,
    enums::Font,
    menu::MenuBar,
    prelude::*,
    text::{TextBuffer, TextEditor, WrapMode},
    window::Window,
};

use super::buffer_utils::document_text;
use super::document::DocumentId;
use super::extraction_controller::ExtractionController;
use super::extractor::NamePair;
use super::highlight_controller::HighlightController;
use super::messages::Message;
use super::platform::detect_system_dark_mode;
use super::settings::{AppSettings, FontChoice, ThemeMode};
use super::tab_manager::TabManager;
use crate::ui::dialogs::settings_dialog::show_settings_dialog;
use crate::ui::file_dialogs::{native_open_dialog, native_save_dialog};
use crate::ui::theme::apply_theme;

pub struct AppState {
    pub tab_manager: TabManager,
    pub editor: TextEditor,
    pub window: Window,
    pub menu: MenuBar,
    pub sender: Sender<Message>,
    pub settings: Rc<RefCell<AppSettings>>,
    pub dark_mode: bool,
    pub show_linenumbers: bool,
    pub word_wrap: bool,
    pub font: Font,
    pub font_size: i32,
    pub highlight: HighlightController,
    pub extraction: ExtractionController,
    /// Last directory used in a file open/save dialog.
    pub last_open_directory: Option<String>,
}

impl AppState {
    pub fn new(
        editor: TextEditor,
        window: Window,
        menu: MenuBar,
        sender: Sender<Message>,
        settings: Rc<RefCell<AppSettings>>,
        dark_mode: bool,
    ) -> Self {
        let (font, font_size, show_linenumbers, word_wrap, highlighting_enabled, extraction) = {
            let s = settings.borrow();
            (
                font_for(s.font),
                s.font_size as i32,
                s.line_numbers_enabled,
                s.word_wrap_enabled,
                s.highlighting_enabled,
                ExtractionController::new(&s),
            )
        };

        let mut tab_manager = TabManager::new(sender);
        tab_manager.add_untitled(font, font_size);

        Self {
            tab_manager,
            editor,
            window,
            menu,
            sender,
            settings,
            dark_mode,
            show_linenumbers,
            word_wrap,
            font,
            font_size,
            highlight: HighlightController::new(highlighting_enabled),
            extraction,
            last_open_directory: None,
        }
    }

    /// Get the active document's buffer
    pub fn active_buffer(&self) -> Option<TextBuffer> {
        self.tab_manager.active_buffer()
    }

    /// Bind the active document's buffer and highlight data to the editor
    pub fn bind_active_buffer(&mut self) {
        if let Some(doc) = self.tab_manager.active_doc() {
            self.editor.set_buffer(doc.buffer.clone());
            self.highlight.bind_editor(doc, &mut self.editor);
        }
        self.update_linenumber_width();
    }

    pub fn update_window_title(&mut self) {
        if let Some(doc) = self.tab_manager.active_doc() {
            let prefix = if doc.is_dirty() { "*" } else { "" };
            self.window
                .set_label(&format!("{}{} - TaskFlow", prefix, doc.display_name));
        } else {
            self.window.set_label("Untitled - TaskFlow");
        }
    }

    /// Switch the editor to display a different document
    pub fn switch_to_document(&mut self, id: DocumentId) {
        if let Some(current) = self.tab_manager.active_doc_mut() {
            current.cursor_position = self.editor.insert_position();
        }

        self.tab_manager.set_active(id);

        if let Some(doc) = self.tab_manager.active_doc() {
            let buffer = doc.buffer.clone();
            let cursor = doc.cursor_position;
            self.editor.set_buffer(buffer);
            self.highlight.bind_editor(doc, &mut self.editor);
            self.editor.set_insert_position(cursor);
            self.editor.show_insert_position();
        }

        self.update_linenumber_width();
        self.update_window_title();
    }

    pub fn switch_to_next_tab(&mut self) {
        if let Some(next_id) = self.tab_manager.next_doc_id() {
            self.switch_to_document(next_id);
        }
    }

    pub fn switch_to_previous_tab(&mut self) {
        if let Some(prev_id) = self.tab_manager.prev_doc_id() {
            self.switch_to_document(prev_id);
        }
    }

    /// Close the active tab. Returns true if the app should exit (no tabs
    /// remaining).
    pub fn close_active_tab(&mut self) -> bool {
        let Some(id) = self.tab_manager.active_id() else {
            return false;
        };

        if let Some(doc) = self.tab_manager.doc_by_id(id) {
            if doc.is_dirty() {
                let name = doc.display_name.clone();
                let choice = dialog::choice2_default(
                    &format!("\"{}\" has unsaved changes.", name),
                    "Save",
                    "Discard",
                    "Cancel",
                );
                match choice {
                    Some(0) => {
                        self.file_save();
                        if self.tab_manager.doc_by_id(id).is_some_and(|d| d.is_dirty()) {
                            return false;
                        }
                    }
                    Some(1) => {}
                    _ => return false,
                }
            }
        }

        // An extraction may still be in flight for this document; its
        // completion will fail the id lookup and be discarded.
        self.tab_manager.remove(id);

        if self.tab_manager.count() == 0 {
            return true;
        }
        if let Some(active_id) = self.tab_manager.active_id() {
            self.switch_to_document(active_id);
        }
        false
    }

    // --- File operations ---

    pub fn open_file(&mut self, path: String) {
        if let Some(parent) = std::path::Path::new(&path).parent() {
            self.last_open_directory = Some(parent.to_string_lossy().to_string());
        }
        match fs::read_to_string(&path) {
            Ok(content) => {
                if let Some(existing_id) = self.tab_manager.find_by_path(&path) {
                    self.switch_to_document(existing_id);
                    return;
                }
                let id = self
                    .tab_manager
                    .add_from_file(path, &content, self.font, self.font_size);
                self.connect_document(id);
                self.switch_to_document(id);
            }
            Err(e) => dialog::alert_default(&format!("Error opening file: {}", e)),
        }
    }

    pub fn file_new(&mut self) {
        let id = self.tab_manager.add_untitled(self.font, self.font_size);
        self.switch_to_document(id);
    }

    pub fn file_open(&mut self) {
        if let Some(path) = native_open_dialog(self.last_open_directory.as_deref()) {
            self.open_file(path);
        }
    }

    pub fn file_save(&mut self) {
        let (file_path, text) = {
            if let Some(doc) = self.tab_manager.active_doc() {
                (doc.file_path.clone(), document_text(&doc.buffer))
            } else {
                return;
            }
        };

        if let Some(ref path) = file_path {
            match fs::write(path, &text) {
                Ok(_) => {
                    if let Some(doc) = self.tab_manager.active_doc_mut() {
                        doc.mark_clean();
                    }
                    self.update_window_title();
                }
                Err(e) => dialog::alert_default(&format!("Error saving file: {}", e)),
            }
        } else {
            self.file_save_as();
        }
    }

    pub fn file_save_as(&mut self) {
        let text = {
            if let Some(doc) = self.tab_manager.active_doc() {
                document_text(&doc.buffer)
            } else {
                return;
            }
        };

        if let Some(path) = native_save_dialog(self.last_open_directory.as_deref()) {
            if let Some(parent) = std::path::Path::new(&path).parent() {
                self.last_open_directory = Some(parent.to_string_lossy().to_string());
            }
            match fs::write(&path, &text) {
                Ok(_) => {
                    if let Some(doc) = self.tab_manager.active_doc_mut() {
                        doc.file_path = Some(path);
                        doc.update_display_name();
                        doc.mark_clean();
                    }
                    self.update_window_title();
                }
                Err(e) => dialog::alert_default(&format!("Error saving file: {}", e)),
            }
        }
    }

    /// Handle quit request. Returns `true` if the app should exit.
    pub fn file_quit(&mut self) -> bool {
        let dirty_docs: Vec<DocumentId> = self
            .tab_manager
            .documents()
            .iter()
            .filter(|d| d.is_dirty())
            .map(|d| d.id)
            .collect();

        if dirty_docs.is_empty() {
            return true;
        }

        let choice = dialog::choice2_default(
            "You have unsaved changes in one or more tabs.",
            "Save All",
            "Quit Without Saving",
            "Cancel",
        );

        match choice {
            Some(0) => {
                for id in dirty_docs {
                    self.switch_to_document(id);
                    self.file_save();
                    if self.tab_manager.doc_by_id(id).is_some_and(|d| d.is_dirty()) {
                        return false;
                    }
                }
                true
            }
            Some(1) => true,
            _ => false,
        }
    }

    // --- Highlighting pipeline ---

    /// A document was connected or loaded: run the synchronous task pass
    /// and let the throttle decide about an initial extraction.
    fn connect_document(&mut self, id: DocumentId) {
        let is_active = self.tab_manager.active_id() == Some(id);
        let Some(doc) = self.tab_manager.doc_by_id_mut(id) else {
            return;
        };
        self.highlight.apply_task_styles(doc, &mut self.editor, is_active);
        let text = document_text(&doc.buffer);
        self.extraction.maybe_dispatch(doc, text, &self.sender);
    }

    /// Change event: task styling is synchronous and unconditional; name
    /// extraction goes through the throttle and runs in the background.
    pub fn buffer_modified(&mut self, id: DocumentId) {
        let is_active = self.tab_manager.active_id() == Some(id);
        let Some(doc) = self.tab_manager.doc_by_id_mut(id) else {
            return;
        };
        self.highlight.apply_task_styles(doc, &mut self.editor, is_active);
        let text = document_text(&doc.buffer);
        self.extraction.maybe_dispatch(doc, text, &self.sender);
        if is_active {
            self.update_window_title();
            self.update_linenumber_width();
        }
    }

    /// Background extraction finished. The document may have been closed in
    /// the meantime; then the result is dropped silently. Otherwise the
    /// cached pairs are replaced wholesale and painted against the latest
    /// text, which may differ from the dispatched snapshot.
    pub fn names_extracted(&mut self, id: DocumentId, pairs: Vec<NamePair>) {
        let is_active = self.tab_manager.active_id() == Some(id);
        let Some(doc) = self.tab_manager.doc_by_id_mut(id) else {
            return;
        };
        doc.name_pairs = pairs;
        self.highlight.apply_name_styles(doc, &mut self.editor, is_active);
    }

    fn rehighlight_all_documents(&mut self) {
        let active = self.tab_manager.active_id();
        let ids: Vec<DocumentId> = self.tab_manager.documents().iter().map(|d| d.id).collect();
        for id in ids {
            let is_active = active == Some(id);
            if let Some(doc) = self.tab_manager.doc_by_id_mut(id) {
                self.highlight.apply_task_styles(doc, &mut self.editor, is_active);
            }
        }
    }

    // --- View toggles ---

    pub fn update_linenumber_width(&mut self) {
        if !self.show_linenumbers {
            self.editor.set_linenumber_width(0);
            return;
        }
        let Some(buffer) = self.active_buffer() else {
            return;
        };
        let line_count = buffer.count_lines(0, buffer.length());
        let digits = ((line_count + 1) as f64).log10().floor() as i32 + 1;
        let width = (digits * 8 + 16).max(40);
        self.editor.set_linenumber_width(width);
    }

    pub fn toggle_line_numbers(&mut self) {
        self.show_linenumbers = !self.show_linenumbers;
        self.update_linenumber_width();
        self.editor.redraw();
    }

    pub fn toggle_word_wrap(&mut self) {
        self.word_wrap = !self.word_wrap;
        if self.word_wrap {
            self.editor.wrap_mode(WrapMode::AtBounds, 0);
        } else {
            self.editor.wrap_mode(WrapMode::None, 0);
        }
        self.editor.redraw();
    }

    pub fn toggle_dark_mode(&mut self) {
        self.dark_mode = !self.dark_mode;
        apply_theme(&mut self.editor, &mut self.window, &mut self.menu, self.dark_mode);
    }

    pub fn toggle_highlighting(&mut self) {
        self.highlight.highlighting_enabled = !self.highlight.highlighting_enabled;
        {
            let mut s = self.settings.borrow_mut();
            s.highlighting_enabled = self.highlight.highlighting_enabled;
            let _ = s.save();
        }
        if self.highlight.highlighting_enabled {
            self.rehighlight_all_documents();
        } else {
            self.highlight.clear_all(self.tab_manager.documents_mut());
        }
        self.bind_active_buffer();
        self.editor.redraw();
    }

    // --- Edit operations ---

    pub fn edit_undo(&mut self) {
        self.editor.undo();
    }

    pub fn edit_cut(&mut self) {
        self.editor.cut();
    }

    pub fn edit_copy(&mut self) {
        self.editor.copy();
    }

    pub fn edit_paste(&mut self) {
        self.editor.paste();
    }

    pub fn select_all(&mut self) {
        if let Some(mut buffer) = self.active_buffer() {
            buffer.select(0, buffer.length());
        }
    }

    // --- Format ---

    pub fn set_font(&mut self, font: Font) {
        self.font = font;
        self.editor.set_text_font(font);
        self.refresh_style_fonts();
    }

    pub fn set_font_size(&mut self, size: i32) {
        self.font_size = size;
        self.editor.set_text_size(size);
        self.refresh_style_fonts();
    }

    fn refresh_style_fonts(&mut self) {
        for doc in self.tab_manager.documents_mut() {
            doc.styles.update_font(self.font, self.font_size);
        }
        self.bind_active_buffer();
        self.editor.redraw();
    }

    // --- Settings ---

    pub fn open_settings(&mut self) {
        let current = self.settings.borrow().clone();
        if let Some(new_settings) = show_settings_dialog(&current) {
            if let Err(e) = new_settings.save() {
                dialog::alert_default(&format!("Failed to save settings: {}", e));
                return;
            }
            self.apply_settings(new_settings);
        }
    }

    pub fn apply_settings(&mut self, new_settings: AppSettings) {
        let is_dark = match new_settings.theme_mode {
            ThemeMode::Light => false,
            ThemeMode::Dark => true,
            ThemeMode::SystemDefault => detect_system_dark_mode(),
        };
        self.dark_mode = is_dark;
        apply_theme(&mut self.editor, &mut self.window, &mut self.menu, is_dark);
        self.update_menu_checkbox("View/Toggle Dark Mode", is_dark);

        self.font = font_for(new_settings.font);
        self.font_size = new_settings.font_size as i32;
        self.editor.set_text_font(self.font);
        self.editor.set_text_size(self.font_size);
        for doc in self.tab_manager.documents_mut() {
            doc.styles.update_font(self.font, self.font_size);
        }

        self.show_linenumbers = new_settings.line_numbers_enabled;
        self.update_linenumber_width();
        self.update_menu_checkbox("View/Toggle Line Numbers", self.show_linenumbers);

        self.word_wrap = new_settings.word_wrap_enabled;
        if self.word_wrap {
            self.editor.wrap_mode(WrapMode::AtBounds, 0);
        } else {
            self.editor.wrap_mode(WrapMode::None, 0);
        }
        self.update_menu_checkbox("View/Toggle Word Wrap", self.word_wrap);

        let highlighting_changed =
            self.highlight.highlighting_enabled != new_settings.highlighting_enabled;
        self.highlight.highlighting_enabled = new_settings.highlighting_enabled;
        self.update_menu_checkbox(
            "View/Toggle Task Highlighting",
            self.highlight.highlighting_enabled,
        );

        self.extraction.configure(&new_settings);

        *self.settings.borrow_mut() = new_settings;

        if highlighting_changed && !self.highlight.highlighting_enabled {
            self.highlight.clear_all(self.tab_manager.documents_mut());
        } else if self.highlight.highlighting_enabled {
            self.rehighlight_all_documents();
        }
        self.bind_active_buffer();
        self.editor.redraw();
    }

    pub fn show_about(&self) {
        dialog::message_default(&format!(
            "TaskFlow {}\n\nA task-list notepad with live highlighting.\n\
             Lines starting with -- are tasks; \"tick\", \"tick, but\" and\n\
             \"maybe\" mark their completion state. Person names are colored\n\
             by a locally hosted language model.",
            env!("CARGO_PKG_VERSION")
        ));
    }

    fn update_menu_checkbox(&self, path: &str, checked: bool) {
        let idx = self.menu.find_index(path);
        if idx >= 0 {
            if let Some(mut item) = self.menu.at(idx) {
                if checked {
                    item.set();
                } else {
                    item.clear();
                }
            }
        }
    }
}

fn font_for(choice: FontChoice) -> Font {
    match choice {
        FontChoice::ScreenBold => Font::ScreenBold,
        FontChoice::Courier => Font::Courier,
        FontChoice::HelveticaMono => Font::Screen,
    }
}
