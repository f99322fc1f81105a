use std::cell::RefCell;
use std::rc::Rc;

use fltk::{app, prelude::*};

use task_flow::app::messages::Message;
use task_flow::app::platform::detect_system_dark_mode;
use task_flow::app::settings::{AppSettings, ThemeMode};
use task_flow::app::state::AppState;
use task_flow::ui::main_window::build_main_window;
use task_flow::ui::menu::build_menu;
use task_flow::ui::theme::apply_theme;

#[cfg(not(target_os = "windows"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let settings = AppSettings::load();
    let dark_mode = match settings.theme_mode {
        ThemeMode::Light => false,
        ThemeMode::Dark => true,
        ThemeMode::SystemDefault => detect_system_dark_mode(),
    };

    let fltk_app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let mut widgets = build_main_window();
    build_menu(&mut widgets.menu, &sender, &settings, dark_mode);

    let settings = Rc::new(RefCell::new(settings));
    let mut state = AppState::new(
        widgets.text_editor,
        widgets.wind,
        widgets.menu,
        sender,
        settings,
        dark_mode,
    );

    apply_theme(&mut state.editor, &mut state.window, &mut state.menu, dark_mode);
    state.bind_active_buffer();
    state.update_window_title();

    // Route the window close button through the regular quit path so dirty
    // documents still get their confirmation dialog.
    {
        let s = sender;
        state.window.set_callback(move |_| {
            if app::event() == fltk::enums::Event::Close {
                s.send(Message::FileQuit);
            }
        });
    }

    state.window.show();

    // Open files passed on the command line.
    for path in std::env::args().skip(1) {
        state.open_file(path);
    }

    while fltk_app.wait() {
        if let Some(msg) = receiver.recv() {
            match msg {
                // File
                Message::FileNew => state.file_new(),
                Message::FileOpen => state.file_open(),
                Message::FileSave => state.file_save(),
                Message::FileSaveAs => state.file_save_as(),
                Message::TabCloseActive => {
                    if state.close_active_tab() {
                        break;
                    }
                }
                Message::TabNext => state.switch_to_next_tab(),
                Message::TabPrevious => state.switch_to_previous_tab(),
                Message::FileQuit => {
                    if state.file_quit() {
                        break;
                    }
                }

                // Edit
                Message::EditUndo => state.edit_undo(),
                Message::EditCut => state.edit_cut(),
                Message::EditCopy => state.edit_copy(),
                Message::EditPaste => state.edit_paste(),
                Message::SelectAll => state.select_all(),

                // View
                Message::ToggleLineNumbers => state.toggle_line_numbers(),
                Message::ToggleWordWrap => state.toggle_word_wrap(),
                Message::ToggleDarkMode => state.toggle_dark_mode(),
                Message::ToggleHighlighting => state.toggle_highlighting(),

                // Format
                Message::SetFont(font) => state.set_font(font),
                Message::SetFontSize(size) => state.set_font_size(size),

                // Settings & Help
                Message::OpenSettings => state.open_settings(),
                Message::ShowAbout => state.show_about(),

                // Highlighting pipeline
                Message::BufferModified(id, _pos) => state.buffer_modified(id),
                Message::NamesExtracted(id, pairs) => state.names_extracted(id, pairs),
            }
        }
    }
}
