//! Terminal rendering of the widget.
//!
//! `render_lines` produces the plain-text layout used by tests and non-TTY
//! output; `draw` paints the same rows in place on stderr, redrawing over the
//! rows painted last time.

use std::io::{self, Write};

use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::style::{Color, Print, PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;

use super::widget::{Focus, Widget};
use super::{Notice, NoticeLevel};

const COLOR_TITLE: Color = Color::Cyan;
const COLOR_MUTED: Color = Color::DarkGrey;
const COLOR_FOCUS: Color = Color::Yellow;
const COLOR_SELECTED: Color = Color::Green;
const COLOR_ERROR: Color = Color::Red;

/// One rendered row plus its styling role.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    text: String,
    color: Option<Color>,
    bold: bool,
}

impl Row {
    fn plain(text: String) -> Self {
        Self {
            text,
            color: None,
            bold: false,
        }
    }

    fn colored(text: String, color: Color) -> Self {
        Self {
            text,
            color: Some(color),
            bold: false,
        }
    }
}

fn rows(widget: &Widget, notice: Option<&Notice>) -> Vec<Row> {
    let mut out = Vec::new();
    let arrow = if widget.toggle.expanded { "▾" } else { "▸" };
    let toggle_text = format!(
        "{arrow} {} {}",
        widget.toggle.icon, widget.toggle.label
    );
    out.push(Row {
        text: toggle_text,
        color: Some(if widget.focus == Focus::Toggle {
            COLOR_FOCUS
        } else {
            COLOR_TITLE
        }),
        bold: true,
    });

    if widget.options_visible {
        for (idx, option) in widget.options.iter().enumerate() {
            let focused = widget.focus == Focus::Option(idx);
            let marker = if focused { "▶" } else { "·" };
            let check = if option.selected { " ✓" } else { "" };
            let mut text = format!("  {marker} {} {}", option.icon, option.name);
            if !option.description.is_empty() {
                text.push_str(&format!(" - {}", option.description));
            }
            text.push_str(check);
            let row = if focused {
                Row::colored(text, COLOR_FOCUS)
            } else if option.selected {
                Row::colored(text, COLOR_SELECTED)
            } else {
                Row::plain(text)
            };
            out.push(row);
        }
        out.push(Row::colored(
            format!(
                "  {}  {} reset  {} close",
                widget.footer.version, widget.footer.reset_label, widget.footer.close_label
            ),
            COLOR_MUTED,
        ));
    }

    if let Some(notice) = notice.filter(|notice| notice.visible) {
        let color = match notice.level {
            NoticeLevel::Success => COLOR_SELECTED,
            NoticeLevel::Error => COLOR_ERROR,
        };
        out.push(Row::colored(format!("  {}", notice.message), color));
    }
    out
}

/// Plain-text rows for `widget` and an optional notice.
pub fn render_lines(widget: &Widget, notice: Option<&Notice>) -> Vec<String> {
    rows(widget, notice).into_iter().map(|row| row.text).collect()
}

/// Paint the widget over the rows painted previously and return the number
/// of rows to move up before the next redraw.
pub fn draw(
    out: &mut impl Write,
    widget: &Widget,
    notice: Option<&Notice>,
    color: bool,
    previous_rows: usize,
) -> io::Result<usize> {
    clear_rows(out, previous_rows)?;
    let rows = rows(widget, notice);
    for (idx, row) in rows.iter().enumerate() {
        if idx > 0 {
            out.queue(Print("\r\n"))?;
        }
        match (color, row.color) {
            (true, Some(fg)) if row.bold => {
                out.queue(PrintStyledContent(row.text.as_str().with(fg).bold()))?;
            }
            (true, Some(fg)) => {
                out.queue(PrintStyledContent(row.text.as_str().with(fg)))?;
            }
            _ => {
                out.queue(Print(&row.text))?;
            }
        }
    }
    out.flush()?;
    Ok(rows.len().saturating_sub(1))
}

/// Clear rows previously painted by `draw`.
pub fn clear_rows(out: &mut impl Write, previous_rows: usize) -> io::Result<()> {
    if previous_rows > 0 {
        out.queue(MoveUp(previous_rows as u16))?;
    }
    out.queue(MoveToColumn(0))?;
    out.queue(Clear(ClearType::FromCursorDown))?;
    out.flush()
}
