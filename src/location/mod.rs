//! Source position tracking shared by every pipeline stage: [`source_location`]
//! (a single line/column/offset triple), [`source_span`] (a range of those,
//! attached to every token, AST node, and `CompileError`), and
//! [`line_tracker`] (the offset-to-location index built once per source file).
pub mod line_tracker;
pub mod source_location;
pub mod source_span;
