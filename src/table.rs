//! Fixed-width table used by the list screens and the dashboard.
//!
//! Cells are padded or truncated to their column width using display width,
//! so wide characters and styled text line up.

use lipgloss_extras::prelude::*;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header text.
    pub title: String,
    /// Width in terminal cells.
    pub width: usize,
}

impl Column {
    /// A column of `width` cells.
    pub fn new(title: impl Into<String>, width: usize) -> Self {
        Self {
            title: title.into(),
            width,
        }
    }
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Cell texts, one per column.
    pub cells: Vec<String>,
}

impl Row {
    /// A row from its cells.
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }
}

/// Styles for the table parts.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Header row.
    pub header: Style,
    /// Unselected rows.
    pub cell: Style,
    /// The selected row.
    pub selected: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            header: Style::new().bold(true).foreground(Color::from("#7D56F4")),
            cell: Style::new(),
            selected: Style::new()
                .bold(true)
                .foreground(Color::from("#EE6FF8")),
        }
    }
}

/// A read-only table with a row cursor.
///
/// The cursor wraps around at both ends.
#[derive(Debug, Clone)]
pub struct Model {
    columns: Vec<Column>,
    rows: Vec<Row>,
    cursor: usize,
    focused: bool,
    /// Part styles.
    pub styles: Styles,
}

impl Model {
    /// An empty, focused table.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            cursor: 0,
            focused: true,
            styles: Styles::default(),
        }
    }

    /// Sets the initial rows.
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.set_rows(rows);
        self
    }

    /// Draws the table without a selection marker.
    pub fn without_focus(mut self) -> Self {
        self.focused = false;
        self
    }

    /// Replaces all rows, keeping the cursor inside the new bounds.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        if self.cursor >= self.rows.len() {
            self.cursor = self.rows.len().saturating_sub(1);
        }
    }

    /// All rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// All columns.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Index of the selected row.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor, clamped to the last row.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.rows.len().saturating_sub(1));
    }

    /// The row under the cursor.
    pub fn selected_row(&self) -> Option<&Row> {
        self.rows.get(self.cursor)
    }

    /// Selects the next row, wrapping to the first.
    pub fn select_next(&mut self) {
        if !self.rows.is_empty() {
            self.cursor = (self.cursor + 1) % self.rows.len();
        }
    }

    /// Selects the previous row, wrapping to the last.
    pub fn select_prev(&mut self) {
        if !self.rows.is_empty() {
            self.cursor = if self.cursor == 0 {
                self.rows.len() - 1
            } else {
                self.cursor - 1
            };
        }
    }

    /// Renders the header, a rule and every row.
    pub fn view(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);

        let header = self
            .columns
            .iter()
            .map(|c| fit(&c.title, c.width))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(self.styles.header.render(&format!("  {}", header)));

        let rule = self
            .columns
            .iter()
            .map(|c| "─".repeat(c.width))
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("  {}", rule));

        for (index, row) in self.rows.iter().enumerate() {
            let line = self
                .columns
                .iter()
                .enumerate()
                .map(|(i, c)| fit(row.cells.get(i).map(String::as_str).unwrap_or(""), c.width))
                .collect::<Vec<_>>()
                .join(" ");

            if self.focused && index == self.cursor {
                lines.push(self.styles.selected.render(&format!("> {}", line)));
            } else {
                lines.push(self.styles.cell.render(&format!("  {}", line)));
            }
        }

        lines.join("\n")
    }
}

/// Pads or truncates `s` to exactly `width` display columns. Truncated text
/// ends with an ellipsis.
pub fn fit(s: &str, width: usize) -> String {
    let plain = strip_ansi_escapes::strip_str(s);
    let current = UnicodeWidthStr::width(plain.as_str());

    if current <= width {
        return format!("{}{}", plain, " ".repeat(width - current));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for g in plain.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        if used + w > width - 1 {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
