//! Data model for one documentation comment block, independent of the output format.

use crate::list::{ListSlot, OwnershipList};
use std::fmt;

/// Kind of declaration a comment block documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Function,
    Struct,
    Variable,
}

impl DeclKind {
    /// Heading label used in the rendered subsection.
    pub fn label(self) -> &'static str {
        match self {
            DeclKind::Function => "Function",
            DeclKind::Struct => "Structure",
            DeclKind::Variable => "Variable",
        }
    }
}

/// The fixed tag vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Brief,
    Details,
    Param,
    Return,
    Author,
    Version,
}

impl Tag {
    pub fn from_name(name: &str) -> Option<Tag> {
        match name {
            "brief" => Some(Tag::Brief),
            "details" => Some(Tag::Details),
            "param" => Some(Tag::Param),
            "return" => Some(Tag::Return),
            "author" => Some(Tag::Author),
            "version" => Some(Tag::Version),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Brief => "brief",
            Tag::Details => "details",
            Tag::Param => "param",
            Tag::Return => "return",
            Tag::Author => "author",
            Tag::Version => "version",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name())
    }
}

/// A once-only tag was set a second time within one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateTag(pub Tag);

/// One `@param` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Type and name as written in the prototype, e.g. `char* argv[]`
    pub signature: String,
    pub description: String,
}

impl Parameter {
    pub fn new(signature: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            description: description.into(),
        }
    }
}

/// The `@return` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTag {
    pub ty: String,
    pub description: String,
}

impl ReturnTag {
    pub fn new(ty: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            description: description.into(),
        }
    }
}

/// Everything collected from one documentation comment.
///
/// Filled field by field by the grammar, consumed by exactly one render
/// operation, which leaves it empty again.
#[derive(Debug, Default)]
pub struct CommentRecord {
    pub params: Option<OwnershipList<Parameter>>,
    pub brief: Option<String>,
    pub details: Option<OwnershipList<String>>,
    pub return_tag: Option<ReturnTag>,
    pub version_tag: Option<String>,
    pub author_tag: Option<String>,
}

impl CommentRecord {
    /// Reset every field to absent, releasing whatever was still held.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_none()
            && self.brief.is_none()
            && self.details.is_none()
            && self.return_tag.is_none()
            && self.version_tag.is_none()
            && self.author_tag.is_none()
    }

    pub fn set_brief(&mut self, text: impl Into<String>) -> Result<(), DuplicateTag> {
        set_once(&mut self.brief, text.into(), Tag::Brief)
    }

    pub fn push_detail(&mut self, line: impl Into<String>) {
        self.details.push_or_create(line.into());
    }

    pub fn push_param(&mut self, param: Parameter) {
        self.params.push_or_create(param);
    }

    pub fn set_return(&mut self, ret: ReturnTag) -> Result<(), DuplicateTag> {
        set_once(&mut self.return_tag, ret, Tag::Return)
    }

    pub fn set_author(&mut self, text: impl Into<String>) -> Result<(), DuplicateTag> {
        set_once(&mut self.author_tag, text.into(), Tag::Author)
    }

    pub fn set_version(&mut self, text: impl Into<String>) -> Result<(), DuplicateTag> {
        set_once(&mut self.version_tag, text.into(), Tag::Version)
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, tag: Tag) -> Result<(), DuplicateTag> {
    if slot.is_some() {
        return Err(DuplicateTag(tag));
    }
    *slot = Some(value);
    Ok(())
}
