use console::style;
use crate::error::compile_error::CompileError;
use crate::location::line_tracker::LineTracker;
use crate::location::source_span::SourceSpan;

/// Prints the `Vec<CompileError>` that any pipeline stage can return,
/// pairing each one with the source line it points at.
///
/// Holds the `LineTracker` built from the file actually being compiled, so
/// every diagnostic this session reports resolves spans against the same
/// source text the lexer tokenized.
pub struct ErrorReporter {
    line_tracker: LineTracker,
}

impl ErrorReporter {
    pub fn new(line_tracker: LineTracker) -> Self {
        Self { line_tracker }
    }

    /// Dispatches each error to the category-specific renderer. `LexerError`,
    /// `SyntaxError`, and `SemanticError` carry a span into this crate's own
    /// source and get the underlined-source view; `IoError` and `Optimizer`
    /// fail before or after that source is in scope (a missing file, a
    /// runaway SCCP fixpoint), so they print as a plain one-liner instead.
    pub fn report_errors(&self, errors: Vec<CompileError>) {
        for error in errors {
            match error {
                CompileError::LexerError { message, span } => self.print_error("LEX", &message, &span),
                CompileError::SyntaxError { message, span } => self.print_error("SYNTAX", &message, &span),
                CompileError::SemanticError { message, span } => self.print_error("SEMANTIC", &message, &span),
                CompileError::IoError(e) => Self::print_plain_error("I/O", e),
                CompileError::Optimizer(e) => Self::print_plain_error("OPTIMIZER", e),
            }
        }
    }

    fn print_plain_error(category: &str, detail: impl std::fmt::Display) {
        eprintln!("{} {}: {}", style("ERROR:").red().bold(), style(category).red(), style(detail).yellow());
    }

    /// Prints the header line, the source line the span starts on, and a
    /// `^^^` underline beneath the offending columns.
    fn print_error(&self, category: &str, message: &str, span: &SourceSpan) {
        let start_line = span.start.line;
        let start_col = span.start.column;
        let end_line = span.end.line;
        let end_col = span.end.column;

        let source_line = self.line_tracker.get_line(start_line).unwrap_or_default();

        eprintln!(
            "{} {}: {}\n{} {}",
            style("ERROR").red().bold(),
            style(category).red(),
            style(message).yellow(),
            style("Location:").blue(),
            style(span).cyan()
        );

        if source_line.is_empty() {
            return;
        }

        eprintln!("{:4} │ {}", start_line, source_line);

        let underline = if start_line == end_line {
            let length = (end_col - start_col).max(1);
            " ".repeat(start_col - 1) + &"^".repeat(length)
        } else {
            " ".repeat(start_col - 1) + "^"
        };
        eprintln!("     │ {}", style(underline).red().bold());

        if start_line != end_line {
            eprintln!("     │ {} (error spans lines {}-{})", style("...").blue(), start_line, end_line);
        }
    }
}
