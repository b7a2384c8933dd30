//! Plain-text and JSON rendering of scan results for the CLI.

use colored::{ColoredString, Colorize};
use std::io::{self, Write};

use crate::MatchRecord;
use crate::session::Session;

/// Frames each match block.
pub const BLOCK_RULE: &str = "###############################";

/// Colour roles for the browse list.
pub struct Colors;

impl Colors {
    pub const PATH: &'static str = "cyan";
    pub const CURSOR: &'static str = "green";
    pub const DIM: &'static str = "bright black";

    pub fn colorize(color: &str, text: &str) -> ColoredString {
        text.color(color)
    }
}

/// Human-readable block for one match: path, line number, line text, framed by rules.
pub fn format_match_block(m: &MatchRecord) -> String {
    format!(
        "{rule}\nFile Path: {}\nLine Num: {}\nMatching text: {}\n{rule}\n",
        m.file_path.display(),
        m.line_number,
        m.match_text,
        rule = BLOCK_RULE
    )
}

/// Write one match as a text block (followed by a blank line) or as a JSON line.
pub fn write_match<W: Write>(w: &mut W, m: &MatchRecord, json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer(&mut *w, m)?;
        writeln!(w)
    } else {
        writeln!(w, "{}", format_match_block(m))
    }
}

/// Print the visible list with the cursor marker, each path followed by its indented snippet.
pub fn render_session<W: Write>(w: &mut W, session: &Session) -> io::Result<()> {
    writeln!(
        w,
        "{}",
        Colors::colorize(
            Colors::DIM,
            &format!(
                "{} of {} files match {:?}",
                session.visible_len(),
                session.files().len(),
                session.query()
            )
        )
    )?;
    for (i, file) in session.visible().enumerate() {
        let marker = if session.cursor() == Some(i) {
            Colors::colorize(Colors::CURSOR, ">").to_string()
        } else {
            " ".to_string()
        };
        writeln!(
            w,
            "{} {}",
            marker,
            Colors::colorize(Colors::PATH, &file.path.display().to_string())
        )?;
        writeln!(w, "    {}", file.snippet)?;
    }
    w.flush()
}
