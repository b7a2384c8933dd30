use log::warn;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{Extractor, Lines};
use crate::{MatchKind, MatchRecord};

/// Emits a [`MatchRecord`] for every line containing the query, case-insensitively.
#[derive(Clone, Debug)]
pub struct LineMatchExtractor {
    query: String,
    query_lower: String,
}

impl LineMatchExtractor {
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        let query_lower = query.to_lowercase();
        Self { query, query_lower }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Match one line. None when the lowercase line does not contain the lowercase query.
    pub fn match_line(&self, line: &str) -> Option<MatchKind> {
        if !line.to_lowercase().contains(&self.query_lower) {
            return None;
        }
        Some(classify_match(line, &self.query))
    }
}

/// `Exact` when `line` contains `query` verbatim, `Partial` when only a case-folded match exists.
pub fn classify_match(line: &str, query: &str) -> MatchKind {
    if line.contains(query) {
        MatchKind::Exact
    } else {
        MatchKind::Partial
    }
}

impl Extractor for LineMatchExtractor {
    type Record = MatchRecord;

    fn extract(&self, path: &Path, emit: &mut dyn FnMut(MatchRecord) -> bool) {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("error opening file {}: {}", path.display(), e);
                return;
            }
        };
        for (idx, line) in Lines::new(BufReader::new(file)).enumerate() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!("error reading file {} at line {}: {}", path.display(), idx + 1, e);
                    return;
                }
            };
            let Some(match_kind) = self.match_line(&line) else {
                continue;
            };
            let record = MatchRecord {
                file_path: path.to_path_buf(),
                line_number: idx as u64 + 1,
                match_text: line,
                match_kind,
            };
            if !emit(record) {
                return;
            }
        }
    }
}
