use fltk::app::Sender;
use fltk::enums::Font;
use fltk::text::TextBuffer;

use super::document::{Document, DocumentId};
use super::messages::Message;

/// Owns the open documents. Ids are never reused, so a completion arriving
/// for a closed document simply fails the lookup.
pub struct TabManager {
    documents: Vec<Document>,
    active_id: Option<DocumentId>,
    next_id: u64,
    untitled_counter: u32,
    sender: Sender<Message>,
}

impl TabManager {
    pub fn new(sender: Sender<Message>) -> Self {
        Self {
            documents: Vec::new(),
            active_id: None,
            next_id: 1,
            untitled_counter: 0,
            sender,
        }
    }

    fn next_document_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add_untitled(&mut self, font: Font, font_size: i32) -> DocumentId {
        self.untitled_counter += 1;
        let id = self.next_document_id();
        let doc = Document::new_untitled(id, self.untitled_counter, self.sender, font, font_size);
        self.documents.push(doc);
        self.active_id = Some(id);
        id
    }

    pub fn add_from_file(
        &mut self,
        path: String,
        content: &str,
        font: Font,
        font_size: i32,
    ) -> DocumentId {
        let id = self.next_document_id();
        let doc = Document::new_from_file(id, path, content, self.sender, font, font_size);
        self.documents.push(doc);
        self.active_id = Some(id);
        id
    }

    pub fn active_doc(&self) -> Option<&Document> {
        let active_id = self.active_id?;
        self.documents.iter().find(|d| d.id == active_id)
    }

    pub fn active_doc_mut(&mut self) -> Option<&mut Document> {
        let active_id = self.active_id?;
        self.documents.iter_mut().find(|d| d.id == active_id)
    }

    pub fn active_buffer(&self) -> Option<TextBuffer> {
        self.active_doc().map(|d| d.buffer.clone())
    }

    pub fn set_active(&mut self, id: DocumentId) {
        if self.documents.iter().any(|d| d.id == id) {
            self.active_id = Some(id);
        }
    }

    /// Remove a document by id. Activates the nearest neighbor.
    pub fn remove(&mut self, id: DocumentId) {
        let idx = match self.documents.iter().position(|d| d.id == id) {
            Some(i) => i,
            None => return,
        };
        let mut doc = self.documents.remove(idx);
        doc.cleanup();

        if self.active_id == Some(id) {
            if self.documents.is_empty() {
                self.active_id = None;
            } else {
                let new_idx = idx.min(self.documents.len() - 1);
                self.active_id = Some(self.documents[new_idx].id);
            }
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut [Document] {
        &mut self.documents
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active_id
    }

    pub fn find_by_path(&self, path: &str) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|d| d.file_path.as_deref() == Some(path))
            .map(|d| d.id)
    }

    pub fn doc_by_id(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn doc_by_id_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    /// Next document id for tab cycling, if there is more than one.
    pub fn next_doc_id(&self) -> Option<DocumentId> {
        self.neighbor(1)
    }

    pub fn prev_doc_id(&self) -> Option<DocumentId> {
        self.neighbor(self.documents.len().saturating_sub(1))
    }

    fn neighbor(&self, step: usize) -> Option<DocumentId> {
        if self.documents.len() < 2 {
            return None;
        }
        let active = self.active_id?;
        let idx = self.documents.iter().position(|d| d.id == active)?;
        Some(self.documents[(idx + step) % self.documents.len()].id)
    }
}
