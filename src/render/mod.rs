//! LaTeX output for comment records, dispatched by declaration kind.

pub mod document;
pub mod latex;

use crate::model::{CommentRecord, DeclKind};

pub use latex::{render_function, render_struct, render_variable};

/// How much of a record one render operation released.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Drained {
    /// Parameter records handed to the list destructor
    pub params: usize,
    /// Detail lines handed to the list destructor
    pub detail_lines: usize,
    /// Single-valued fields: brief, return, author, version
    pub fields: usize,
}

/// Render `record` as the documentation of `name`, leaving the record empty.
pub fn render(kind: DeclKind, name: &str, record: &mut CommentRecord, out: &mut String) -> Drained {
    match kind {
        DeclKind::Function => render_function(name, record, out),
        DeclKind::Struct => render_struct(name, record, out),
        DeclKind::Variable => render_variable(name, record, out),
    }
}
