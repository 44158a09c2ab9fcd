// src/location/source_span.rs
use crate::location::source_location::SourceLocation;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A half-open range `[start, end)` within one source file, attached to
/// every `Token`, AST node, and `CompileError` so a diagnostic can point
/// back at the exact text that produced it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceSpan {
    pub file_path: Arc<str>,
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use cflow::location::source_location::SourceLocation;
    /// use cflow::location::source_span::SourceSpan;
    /// let start = SourceLocation::new(1, 1, 0);
    /// let end = SourceLocation::new(1, 5, 4);
    /// let span = SourceSpan::new(Arc::from("main.c"), start, end);
    /// ```
    pub fn new(file_path: Arc<str>, start: SourceLocation, end: SourceLocation) -> Self {
        Self { file_path, start, end }
    }

    /// Widens this span in place to cover `other` too. A no-op across files,
    /// since a span from `main.c` has nothing meaningful to merge with one
    /// from a different translation unit.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use cflow::location::source_location::SourceLocation;
    /// use cflow::location::source_span::SourceSpan;
    /// let mut span1 = SourceSpan::new(Arc::from("main.c"), SourceLocation::new(1, 1, 0), SourceLocation::new(1, 5, 4));
    /// let span2 = SourceSpan::new(Arc::from("main.c"), SourceLocation::new(1, 3, 2), SourceLocation::new(1, 8, 7));
    /// span1.merge(&span2);
    /// assert_eq!(span1.start, SourceLocation::new(1, 1, 0));
    /// assert_eq!(span1.end, SourceLocation::new(1, 8, 7));
    /// ```
    pub fn merge(&mut self, other: &SourceSpan) {
        if self.file_path == other.file_path {
            self.start = self.start.min(other.start);
            self.end = self.end.max(other.end);
        }
    }

    /// The non-mutating counterpart of [`merge`](Self::merge): used when
    /// building the span of a parent AST node from its children's spans,
    /// where none of the children's own spans should be touched.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use cflow::location::source_location::SourceLocation;
    /// use cflow::location::source_span::SourceSpan;
    /// let span1 = SourceSpan::new(Arc::from("main.c"), SourceLocation::new(1, 1, 0), SourceLocation::new(1, 5, 4));
    /// let span2 = SourceSpan::new(Arc::from("main.c"), SourceLocation::new(1, 3, 2), SourceLocation::new(2, 5, 8));
    /// let merged = span1.merged(&span2).unwrap();
    /// assert_eq!(merged.start, SourceLocation::new(1, 1, 0));
    /// assert_eq!(merged.end, SourceLocation::new(2, 5, 8));
    /// ```
    pub fn merged(&self, other: &SourceSpan) -> Option<Self> {
        (self.file_path == other.file_path)
            .then(|| Self { file_path: self.file_path.clone(), start: self.start.min(other.start), end: self.end.max(other.end) })
    }
}

impl Default for SourceSpan {
    /// A placeholder span for diagnostics synthesized outside of any
    /// concrete token or AST node, e.g. `CompileError::Optimizer`.
    fn default() -> Self {
        SourceSpan { file_path: Arc::from(""), start: SourceLocation::default(), end: SourceLocation::default() }
    }
}

impl std::fmt::Display for SourceSpan {
    /// `path:line L:column C - line L:column C`, path truncated to its last
    /// two components so nested fixture paths don't dominate the message.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let truncated_path = truncate_path(Path::new(&*self.file_path), 2);
        write!(
            f,
            "{}:line {}:column {} - line {}:column {}",
            truncated_path, self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

/// Keeps only the last `depth` path components, prefixed with `..` if any
/// were dropped.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use cflow::location::source_span::truncate_path;
/// let path = Path::new("/project/src/module/file.c");
/// let expected = if cfg!(unix) { "../module/file.c" } else { "..\\module\\file.c" };
/// assert_eq!(truncate_path(path, 2), expected);
/// ```
pub fn truncate_path(path: &Path, depth: usize) -> String {
    let components: Vec<_> = path.components().collect();
    let len = components.len();

    let truncated = if len <= depth {
        PathBuf::from_iter(&components)
    } else {
        let tail = &components[len - depth..];
        PathBuf::from("..").join(PathBuf::from_iter(tail))
    };

    truncated.display().to_string()
}

pub trait HasSpan {
    fn span(&self) -> &SourceSpan;
}
