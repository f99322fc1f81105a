use fltk::dialog;

const FILTER: &str = "*.{txt,md}";

pub fn native_open_dialog(dir: Option<&str>) -> Option<String> {
    dialog::file_chooser("Open File", FILTER, dir.unwrap_or("."), false)
}

pub fn native_save_dialog(dir: Option<&str>) -> Option<String> {
    dialog::file_chooser("Save As", FILTER, dir.unwrap_or("."), false)
}
