//! Interactive browse state: query text, the visible subset and a clamped cursor.
//! Rendering and key handling live in the caller; every query change refilters synchronously.

use crate::FileRecord;
use crate::filter::filter_indices;

pub struct Session {
    files: Vec<FileRecord>,
    query: String,
    visible: Vec<usize>,
    cursor: Option<usize>,
}

impl Session {
    /// Start with an empty query, so nothing is visible until the user types.
    pub fn new(files: Vec<FileRecord>) -> Self {
        Self {
            files,
            query: String::new(),
            visible: Vec::new(),
            cursor: None,
        }
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Visible records in input order.
    pub fn visible(&self) -> impl Iterator<Item = &FileRecord> + '_ {
        self.visible.iter().map(|&i| &self.files[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Cursor position within the visible list; None when nothing is visible.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn selected(&self) -> Option<&FileRecord> {
        self.cursor
            .and_then(|c| self.visible.get(c))
            .map(|&i| &self.files[i])
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refilter();
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn pop_char(&mut self) {
        if self.query.pop().is_some() {
            self.refilter();
        }
    }

    pub fn cursor_down(&mut self) {
        if let Some(c) = self.cursor
            && c + 1 < self.visible.len()
        {
            self.cursor = Some(c + 1);
        }
    }

    pub fn cursor_up(&mut self) {
        if let Some(c) = self.cursor {
            self.cursor = Some(c.saturating_sub(1));
        }
    }

    fn refilter(&mut self) {
        self.visible = filter_indices(&self.files, &self.query);
        self.cursor = match self.visible.len() {
            0 => None,
            len => Some(self.cursor.unwrap_or(0).min(len - 1)),
        };
    }
}
