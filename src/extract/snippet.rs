use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use super::{Extractor, Lines};
use crate::FileRecord;
use crate::utils::config::{Sentinels, SnippetConsts};

/// One [`FileRecord`] per file with a space-joined preview of its first lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnippetExtractor;

impl Extractor for SnippetExtractor {
    type Record = FileRecord;

    fn extract(&self, path: &Path, emit: &mut dyn FnMut(FileRecord) -> bool) {
        let snippet = match File::open(path) {
            Ok(file) => match snippet_from_reader(BufReader::new(file)) {
                Ok(s) => s,
                Err(e) => {
                    log::warn!("{}: read failed: {}", path.display(), e);
                    Sentinels::READ_FAILED.to_string()
                }
            },
            Err(e) => {
                log::warn!("{}: open failed: {}", path.display(), e);
                Sentinels::OPEN_FAILED.to_string()
            }
        };
        emit(FileRecord {
            path: path.to_path_buf(),
            snippet,
        });
    }
}

/// Build a snippet from `reader`, reading at most [`SnippetConsts::MAX_LINE_BYTES`] per line.
/// The cut is reached long before a newline-free file is read to the end.
pub fn snippet_from_reader<R: BufRead>(reader: R) -> io::Result<String> {
    build_snippet(Lines::with_max_line_bytes(
        reader,
        SnippetConsts::MAX_LINE_BYTES,
    ))
}

/// Join lines with a single space until more than [`SnippetConsts::MAX_CHARS`] characters have
/// accumulated, then cut to that many characters and append the ellipsis. Stops reading at the cut.
pub fn build_snippet<I>(lines: I) -> io::Result<String>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut snippet = String::new();
    let mut chars = 0_usize;
    for (i, line) in lines.into_iter().enumerate() {
        let line = line?;
        if i > 0 {
            snippet.push_str(SnippetConsts::LINE_SEPARATOR);
            chars += SnippetConsts::LINE_SEPARATOR.chars().count();
        }
        snippet.push_str(&line);
        chars += line.chars().count();
        if chars > SnippetConsts::MAX_CHARS {
            if let Some((cut, _)) = snippet.char_indices().nth(SnippetConsts::MAX_CHARS) {
                snippet.truncate(cut);
            }
            snippet.push_str(SnippetConsts::ELLIPSIS);
            break;
        }
    }
    Ok(snippet)
}
