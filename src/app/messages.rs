use fltk::enums::Font;

use super::document::DocumentId;
use super::extractor::NamePair;

/// All messages that can be sent through the FLTK channel.
/// Menu callbacks, buffer modify callbacks and background extraction
/// threads all send these; the dispatch loop in main handles them.
#[derive(Debug, Clone)]
pub enum Message {
    // File
    FileNew,
    FileOpen,
    FileSave,
    FileSaveAs,
    TabCloseActive,
    TabNext,
    TabPrevious,
    FileQuit,

    // Edit
    EditUndo,
    EditCut,
    EditCopy,
    EditPaste,
    SelectAll,

    // View
    ToggleLineNumbers,
    ToggleWordWrap,
    ToggleDarkMode,
    ToggleHighlighting,

    // Format
    SetFont(Font),
    SetFontSize(i32),

    // Settings & Help
    OpenSettings,
    ShowAbout,

    // Highlighting pipeline
    BufferModified(DocumentId, i32),

    // Background name extraction results
    NamesExtracted(DocumentId, Vec<NamePair>),
}
