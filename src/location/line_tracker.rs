// src/location/line_tracker.rs
use crate::location::{source_location::SourceLocation, source_span::SourceSpan};
use std::sync::Arc;

/// Resolves byte offsets from the lexer into `SourceLocation`s, built once
/// per file and shared by `ErrorReporter` for printing the offending line.
///
/// Line starts are precomputed at construction so `location_for` is a binary
/// search rather than a rescan; lines and columns are both 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTracker {
    source: Arc<str>,
    line_starts: Vec<usize>,
    file_path: Arc<str>,
}

impl LineTracker {
    /// # Examples
    /// ```
    /// use cflow::location::line_tracker::LineTracker;
    /// let tracker = LineTracker::new("main.c", "int main() {\n  return 0;\n}".to_string());
    /// ```
    pub fn new(file_path: &str, source: String) -> Self {
        let line_starts = std::iter::once(0).chain(source.match_indices('\n').map(|(pos, _)| pos + 1)).collect();
        Self { line_starts, file_path: Arc::from(file_path), source: source.into() }
    }

    /// # Panics
    /// Panics if `offset` exceeds the source length; offsets come from the
    /// lexer's own token spans, so an out-of-bounds offset means the lexer
    /// and tracker disagree about the source text.
    ///
    /// # Examples
    /// ```
    /// use cflow::location::line_tracker::LineTracker;
    /// let tracker = LineTracker::new("main.c", "int x;\nint y;".to_string());
    /// let loc = tracker.location_for(7);
    /// assert_eq!(loc.line, 2);
    /// assert_eq!(loc.column, 1);
    /// ```
    pub fn location_for(&self, offset: usize) -> SourceLocation {
        if offset > self.source.len() {
            panic!("offset {} out of bounds for source of length {}", offset, self.source.len());
        }

        match self.line_starts.binary_search(&offset) {
            Ok(line) => SourceLocation::new(line + 1, 1, offset),
            Err(line) => {
                let line_index = line.saturating_sub(1);
                let column = offset - self.line_starts[line_index] + 1;
                SourceLocation::new(line_index + 1, column, offset)
            }
        }
    }

    /// # Examples
    /// ```
    /// use cflow::location::line_tracker::LineTracker;
    /// let tracker = LineTracker::new("main.c", "int main() { return 0; }".to_string());
    /// let span = tracker.span_for(4..8);
    /// assert_eq!(span.start.column, 5);
    /// ```
    #[inline]
    pub fn span_for(&self, range: std::ops::Range<usize>) -> SourceSpan {
        SourceSpan::new(self.file_path.clone(), self.location_for(range.start), self.location_for(range.end))
    }

    /// The 1-indexed source line, for printing under an error's underline.
    pub fn get_line(&self, line_number: usize) -> Option<&str> {
        let start_index = *self.line_starts.get(line_number.checked_sub(1)?)?;
        let end_index = self.source[start_index..].find('\n').map(|rel| start_index + rel).unwrap_or(self.source.len());
        Some(&self.source[start_index..end_index])
    }
}
