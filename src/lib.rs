//! texdoc: LaTeX documentation from annotated C sources.
//!
//! A [`parser::Grammar`] scans a source file and fills one
//! [`model::CommentRecord`] per `/** ... */` block; the [`render`] pipeline
//! turns each completed record into a LaTeX subsection and releases it. The
//! [`driver`] runs that loop over a batch of files.

pub mod driver;
pub mod list;
pub mod model;
pub mod parser;
pub mod path;
pub mod render;
