use std::fmt;

/// Convert a 1-based column index to its A1 letter form
/// (1 → "A", 26 → "Z", 27 → "AA").
pub fn col_letters(col: u32) -> String {
    debug_assert!(col >= 1, "column indices are 1-based");
    let mut col = col;
    let mut letters = Vec::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        letters.push(b'A' + rem);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Convert an A1 column letter form back to its 1-based index
/// ("A" → 1, "AA" → 27). `None` for anything but ASCII letters.
pub fn col_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for c in letters.chars() {
        let c = c.to_ascii_uppercase();
        if !c.is_ascii_uppercase() {
            return None;
        }
        col = col.checked_mul(26)?.checked_add(c as u32 - 'A' as u32 + 1)?;
    }
    Some(col)
}

/// Parse a bare `B7`-style coordinate into `(col, row)`.
pub fn parse_coord(s: &str) -> Option<(u32, u32)> {
    let s = s.trim();
    let split = s.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = s.split_at(split);
    let col = col_index(letters)?;
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((col, row))
}

/// A single cell address (`sheet!B7`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRef {
    pub sheet: String,
    pub col: u32,
    pub row: u32,
}

impl CellRef {
    pub fn new(sheet: &str, col: u32, row: u32) -> Self {
        Self {
            sheet: sheet.to_string(),
            col,
            row,
        }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}{}", self.sheet, col_letters(self.col), self.row)
    }
}

/// A rectangular range address (`sheet!A4:A60`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRef {
    pub sheet: String,
    pub start_col: u32,
    pub start_row: u32,
    pub end_col: u32,
    pub end_row: u32,
}

impl RangeRef {
    pub fn new(sheet: &str, start_col: u32, start_row: u32, end_col: u32, end_row: u32) -> Self {
        Self {
            sheet: sheet.to_string(),
            start_col,
            start_row,
            end_col,
            end_row,
        }
    }

    /// A vertical single-column slice.
    pub fn column(sheet: &str, col: u32, first_row: u32, last_row: u32) -> Self {
        Self::new(sheet, col, first_row, col, last_row)
    }

    /// Number of rows covered by the range.
    pub fn row_count(&self) -> usize {
        (self.end_row.saturating_sub(self.start_row) + 1) as usize
    }
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}!{}{}:{}{}",
            self.sheet,
            col_letters(self.start_col),
            self.start_row,
            col_letters(self.end_col),
            self.end_row
        )
    }
}

impl From<CellRef> for RangeRef {
    fn from(cell: CellRef) -> Self {
        RangeRef {
            start_col: cell.col,
            start_row: cell.row,
            end_col: cell.col,
            end_row: cell.row,
            sheet: cell.sheet,
        }
    }
}
