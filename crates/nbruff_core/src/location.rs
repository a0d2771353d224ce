//! Row/column to offset conversion.

use nbruff_engine::{PositionEncoding, SourceLocation};

/// Line index over a text buffer.
///
/// Entry `i` is the byte offset just past the line feed that ends line `i`
/// (0-indexed), which is also where line `i + 1` starts.
#[derive(Debug, Clone)]
pub struct LocationIndex<'a> {
    text: &'a str,
    line_ends: Vec<usize>,
}

impl<'a> LocationIndex<'a> {
    /// Builds the index for `text`.
    pub fn new(text: &'a str) -> Self {
        let line_ends = text
            .match_indices('\n')
            .map(|(offset, _)| offset + 1)
            .collect();
        Self { text, line_ends }
    }

    /// Number of lines (a trailing line feed starts an empty last line).
    pub fn line_count(&self) -> usize {
        self.line_ends.len() + 1
    }

    /// Offset one past the last character.
    pub fn max_position(&self) -> usize {
        self.text.len()
    }

    /// Byte offset where 1-indexed `row` starts.
    ///
    /// Rows before the first clamp to `0`, rows after the last clamp to
    /// [`max_position`](Self::max_position).
    pub fn line_start(&self, row: u32) -> usize {
        match (row as usize).checked_sub(2) {
            None => 0,
            Some(index) => self
                .line_ends
                .get(index)
                .copied()
                .unwrap_or_else(|| self.max_position()),
        }
    }

    /// Byte offset of 1-indexed (`row`, `column`), with the column counted in
    /// `encoding` units.
    ///
    /// The result is always a character boundary: columns past the end of
    /// the line clamp to the end of the line, columns that land inside a
    /// character move to the next boundary.
    pub fn offset_of(&self, row: u32, column: u32, encoding: PositionEncoding) -> usize {
        let start = self.line_start(row);
        let end = self.text[start..]
            .find('\n')
            .map_or(self.text.len(), |index| start + index);
        let units = column.saturating_sub(1) as usize;

        start + column_to_byte(&self.text[start..end], units, encoding)
    }

    /// Byte offset of an engine location.
    pub fn offset(&self, location: SourceLocation, encoding: PositionEncoding) -> usize {
        self.offset_of(location.row, location.column, encoding)
    }
}

fn column_to_byte(line: &str, units: usize, encoding: PositionEncoding) -> usize {
    if encoding == PositionEncoding::Utf8 || line.is_ascii() {
        let mut offset = units.min(line.len());
        while !line.is_char_boundary(offset) {
            offset += 1;
        }
        return offset;
    }

    let mut consumed = 0;
    for (offset, ch) in line.char_indices() {
        if consumed >= units {
            return offset;
        }
        consumed += encoding.width(ch);
    }
    line.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const UTF16: PositionEncoding = PositionEncoding::Utf16;

    #[test]
    fn test_first_position_is_zero() {
        for text in ["", "a", "\n", "ab\ncd", "🎉"] {
            assert_eq!(LocationIndex::new(text).offset_of(1, 1, UTF16), 0, "{text:?}");
        }
    }

    #[test]
    fn test_line_ends() {
        let index = LocationIndex::new("ab\ncde\n\nf");

        assert_eq!(index.line_ends, vec![3, 7, 8]);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.max_position(), 9);
    }

    #[rstest]
    #[case(1, 1, 0)]
    #[case(1, 3, 2)]
    #[case(2, 1, 3)]
    #[case(2, 4, 6)]
    #[case(3, 1, 7)]
    #[case(4, 1, 8)]
    #[case(4, 2, 9)]
    fn test_ascii_offsets(#[case] row: u32, #[case] column: u32, #[case] expected: usize) {
        let index = LocationIndex::new("ab\ncde\n\nf");
        assert_eq!(index.offset_of(row, column, UTF16), expected);
    }

    #[test]
    fn test_offsets_round_trip_at_every_boundary() {
        let text = "def f():\n    return 'é🎉'\n\nx = 1";
        let index = LocationIndex::new(text);

        for (row, line) in text.split('\n').enumerate() {
            let start = index.line_start(row as u32 + 1);
            let mut column = 1;
            for (offset, ch) in line.char_indices() {
                assert_eq!(index.offset_of(row as u32 + 1, column, UTF16), start + offset);
                column += ch.len_utf16() as u32;
            }
            assert_eq!(index.offset_of(row as u32 + 1, column, UTF16), start + line.len());
        }
    }

    #[rstest]
    #[case::utf8(PositionEncoding::Utf8, 6)]
    #[case::utf16(PositionEncoding::Utf16, 4)]
    #[case::utf32(PositionEncoding::Utf32, 3)]
    fn test_column_after_emoji(#[case] encoding: PositionEncoding, #[case] column: u32) {
        // "x🎉y": the emoji is 4 bytes, 2 UTF-16 units, 1 scalar.
        let index = LocationIndex::new("x🎉y");
        assert_eq!(index.offset_of(1, column, encoding), 5);
    }

    #[test]
    fn test_column_inside_surrogate_pair_moves_forward() {
        let index = LocationIndex::new("🎉x");
        assert_eq!(index.offset_of(1, 2, UTF16), 4);
    }

    #[test]
    fn test_utf8_column_inside_character_moves_forward() {
        let index = LocationIndex::new("éx");
        assert_eq!(index.offset_of(1, 2, PositionEncoding::Utf8), 2);
    }

    #[test]
    fn test_column_past_line_end_clamps_before_newline() {
        let index = LocationIndex::new("ab\ncd");
        assert_eq!(index.offset_of(1, 10, UTF16), 2);
    }

    #[test]
    fn test_row_past_end_clamps_to_max_position() {
        let index = LocationIndex::new("ab\ncd");
        assert_eq!(index.offset_of(7, 1, UTF16), 5);
    }

    #[test]
    fn test_row_zero_is_first_line() {
        let index = LocationIndex::new("ab\ncd");
        assert_eq!(index.offset_of(0, 2, UTF16), 1);
    }

    #[test]
    fn test_offset_from_source_location() {
        let index = LocationIndex::new("ab\ncd");
        assert_eq!(index.offset(SourceLocation::new(2, 2), UTF16), 4);
    }
}
