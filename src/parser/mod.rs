//! Comment grammars that feed the render pipeline.

pub mod c;

use crate::model::{CommentRecord, DeclKind, Tag};
use thiserror::Error;

/// Receives everything a grammar recognizes in one source file.
///
/// A grammar clears the record before each block, fills it through the
/// record's setters, and finishes the block with exactly one call to
/// [`DocSink::declaration`].
pub trait DocSink {
    fn record(&mut self) -> &mut CommentRecord;

    /// A documented declaration is complete; render and release the record.
    fn declaration(&mut self, kind: DeclKind, name: &str);

    /// A quoted `#include` target, as written in the source.
    fn include(&mut self, target: &str);
}

/// A source grammar that recognizes documentation blocks.
pub trait Grammar {
    fn parse(&self, source: &str, sink: &mut dyn DocSink) -> Result<(), ParseError>;
}

/// Malformed input. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: documentation comment is never closed")]
    UnterminatedComment { line: usize },

    #[error("line {line}: documentation comment is not followed by a declaration")]
    MissingDeclaration { line: usize },

    #[error("line {line}: unknown tag @{tag}")]
    UnknownTag { line: usize, tag: String },

    #[error("line {line}: {tag} given more than once")]
    DuplicateTag { line: usize, tag: Tag },

    #[error("line {line}: {tag} needs a value")]
    EmptyTag { line: usize, tag: Tag },

    #[error("line {line}: function prototype is never closed")]
    UnterminatedPrototype { line: usize },
}
