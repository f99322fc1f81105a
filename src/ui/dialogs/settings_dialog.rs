use fltk::{
    button::{Button, CheckButton, RadioRoundButton},
    enums::Color,
    frame::Frame,
    group::Group,
    input::{Input, IntInput},
    prelude::*,
    window::Window,
};
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::settings::{AppSettings, FontChoice, ThemeMode};

/// Show settings dialog and return updated settings if the user clicked Save.
pub fn show_settings_dialog(current_settings: &AppSettings) -> Option<AppSettings> {
    let mut dialog = Window::default()
        .with_size(350, 740)
        .with_label("Settings")
        .center_screen();
    dialog.make_modal(true);

    let vpack = Group::default().with_size(320, 650).with_pos(15, 15);

    // Theme section
    Frame::default().with_pos(15, 15).with_size(320, 25).with_label("Theme:").with_align(fltk::enums::Align::Left | fltk::enums::Align::Inside);
    let theme_group = Group::default().with_pos(30, 45).with_size(280, 75);
    let mut theme_light = RadioRoundButton::default().with_pos(30, 45).with_size(280, 25).with_label("Light");
    let mut theme_dark = RadioRoundButton::default().with_pos(30, 70).with_size(280, 25).with_label("Dark");
    let mut theme_system = RadioRoundButton::default().with_pos(30, 95).with_size(280, 25).with_label("System Default");
    theme_group.end();

    match current_settings.theme_mode {
        ThemeMode::Light => theme_light.set_value(true),
        ThemeMode::Dark => theme_dark.set_value(true),
        ThemeMode::SystemDefault => theme_system.set_value(true),
    }

    // Font section
    Frame::default().with_pos(15, 130).with_size(320, 25).with_label("Font:").with_align(fltk::enums::Align::Left | fltk::enums::Align::Inside);
    let font_group = Group::default().with_pos(30, 160).with_size(280, 75);
    let mut font_screenbold = RadioRoundButton::default().with_pos(30, 160).with_size(280, 25).with_label("Screen (Bold)");
    let mut font_courier = RadioRoundButton::default().with_pos(30, 185).with_size(280, 25).with_label("Courier");
    let mut font_helvetica = RadioRoundButton::default().with_pos(30, 210).with_size(280, 25).with_label("Helvetica Mono");
    font_group.end();

    match current_settings.font {
        FontChoice::ScreenBold => font_screenbold.set_value(true),
        FontChoice::Courier => font_courier.set_value(true),
        FontChoice::HelveticaMono => font_helvetica.set_value(true),
    }

    // Font size section
    Frame::default().with_pos(15, 245).with_size(320, 25).with_label("Font Size:").with_align(fltk::enums::Align::Left | fltk::enums::Align::Inside);
    let size_group = Group::default().with_pos(30, 275).with_size(280, 75);
    let mut size_12 = RadioRoundButton::default().with_pos(30, 275).with_size(280, 25).with_label("Small (12)");
    let mut size_16 = RadioRoundButton::default().with_pos(30, 300).with_size(280, 25).with_label("Medium (16)");
    let mut size_20 = RadioRoundButton::default().with_pos(30, 325).with_size(280, 25).with_label("Large (20)");
    size_group.end();

    match current_settings.font_size {
        12 => size_12.set_value(true),
        20 => size_20.set_value(true),
        _ => size_16.set_value(true),
    }

    // View options section
    Frame::default().with_pos(15, 360).with_size(320, 25).with_label("View Options:").with_align(fltk::enums::Align::Left | fltk::enums::Align::Inside);
    let mut check_line_numbers = CheckButton::default().with_pos(30, 390).with_size(280, 25).with_label("Show Line Numbers");
    let mut check_word_wrap = CheckButton::default().with_pos(30, 415).with_size(280, 25).with_label("Word Wrap");
    let mut check_highlighting = CheckButton::default().with_pos(30, 440).with_size(280, 25).with_label("Task Highlighting");

    check_line_numbers.set_value(current_settings.line_numbers_enabled);
    check_word_wrap.set_value(current_settings.word_wrap_enabled);
    check_highlighting.set_value(current_settings.highlighting_enabled);

    // Name extraction section
    Frame::default().with_pos(15, 475).with_size(320, 25).with_label("Name Extraction:").with_align(fltk::enums::Align::Left | fltk::enums::Align::Inside);
    let mut check_extraction = CheckButton::default().with_pos(30, 505).with_size(280, 25).with_label("Color person names via local LLM");
    check_extraction.set_value(current_settings.extraction_enabled);

    Frame::default().with_pos(30, 535).with_size(120, 25).with_label("Server URL:").with_align(fltk::enums::Align::Left | fltk::enums::Align::Inside);
    let mut server_input = Input::default().with_pos(150, 535).with_size(160, 25);
    server_input.set_value(&current_settings.extraction_server_url);

    Frame::default().with_pos(30, 565).with_size(180, 25).with_label("Min seconds between runs:").with_align(fltk::enums::Align::Left | fltk::enums::Align::Inside);
    let mut interval_input = IntInput::default().with_pos(250, 565).with_size(60, 25);
    interval_input.set_value(&current_settings.extraction_interval_secs.to_string());

    Frame::default().with_pos(30, 595).with_size(180, 25).with_label("Request timeout (seconds):").with_align(fltk::enums::Align::Left | fltk::enums::Align::Inside);
    let mut timeout_input = IntInput::default().with_pos(250, 595).with_size(60, 25);
    timeout_input.set_value(&current_settings.extraction_timeout_secs.to_string());

    // Info text
    let mut info_frame = Frame::default().with_pos(30, 625).with_size(290, 35);
    info_frame.set_label("Document text is only ever sent to the local\nextraction server, never over the network.");
    info_frame.set_label_size(11);
    info_frame.set_label_color(Color::from_rgb(100, 100, 100));
    info_frame.set_align(fltk::enums::Align::Left | fltk::enums::Align::Inside | fltk::enums::Align::Wrap);

    vpack.end();

    // Buttons at bottom
    let mut save_btn = Button::default().with_pos(150, 695).with_size(90, 30).with_label("Save");
    let mut cancel_btn = Button::default().with_pos(250, 695).with_size(90, 30).with_label("Cancel");

    dialog.end();
    dialog.show();

    let result = Rc::new(RefCell::new(None));
    let result_save = result.clone();
    let result_cancel = result.clone();

    let dialog_save = dialog.clone();
    let current = current_settings.clone();
    save_btn.set_callback(move |_| {
        let new_settings = AppSettings {
            theme_mode: if theme_light.value() {
                ThemeMode::Light
            } else if theme_dark.value() {
                ThemeMode::Dark
            } else {
                ThemeMode::SystemDefault
            },
            font: if font_screenbold.value() {
                FontChoice::ScreenBold
            } else if font_helvetica.value() {
                FontChoice::HelveticaMono
            } else {
                FontChoice::Courier
            },
            font_size: if size_12.value() {
                12
            } else if size_20.value() {
                20
            } else {
                16
            },
            line_numbers_enabled: check_line_numbers.value(),
            word_wrap_enabled: check_word_wrap.value(),
            highlighting_enabled: check_highlighting.value(),
            extraction_enabled: check_extraction.value(),
            extraction_server_url: {
                let url = server_input.value().trim().to_string();
                if url.is_empty() {
                    current.extraction_server_url.clone()
                } else {
                    url
                }
            },
            extraction_interval_secs: interval_input
                .value()
                .parse()
                .unwrap_or(current.extraction_interval_secs),
            extraction_timeout_secs: timeout_input
                .value()
                .parse()
                .unwrap_or(current.extraction_timeout_secs),
        };

        *result_save.borrow_mut() = Some(new_settings);
        dialog_save.clone().hide();
    });

    let dialog_cancel = dialog.clone();
    cancel_btn.set_callback(move |_| {
        *result_cancel.borrow_mut() = None;
        dialog_cancel.clone().hide();
    });

    super::run_dialog(&dialog);

    result.borrow().clone()
}
