//! C documentation comment grammar, as a line-by-line state machine.
//!
//! Recognizes `/** ... */` blocks tagged with `@brief`, `@details`, `@param`,
//! `@return`, `@author` and `@version`, and classifies the declaration that
//! follows each block as a function, a structure or a variable.

use super::{DocSink, Grammar, ParseError};
use crate::model::{CommentRecord, DeclKind, DuplicateTag, Parameter, ReturnTag, Tag};
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

// `/**` but not `/**/` or a `/*****` banner
static RE_BLOCK_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:blank:]]*/\*\*($|[^*/].*$)").unwrap());

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([[:alpha:]]+)(?:[[:blank:]]+(.*))?$").unwrap());

static RE_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[[:blank:]]*#[[:blank:]]*include[[:blank:]]*"([^"]+)""#).unwrap());

static RE_PREPROCESSOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:blank:]]*#").unwrap());

static RE_STRUCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:typedef[[:space:]]+)?struct(?:[[:space:]]+([A-Za-z_][A-Za-z0-9_]*))?$")
        .unwrap()
});

static RE_TYPEDEF_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:space:]]*([A-Za-z_][A-Za-z0-9_]*)").unwrap());

// -- Parser state -------------------------------------------------------------

#[derive(Debug, Default)]
enum Mode {
    /// Outside any documentation block
    #[default]
    Code,
    /// Inside `/** ... */`
    Comment {
        start: usize,
        cont: Option<Tag>,
        seen_text: bool,
    },
    /// Block closed, collecting the declaration up to `{` or `;`
    Declaration { start: usize, text: String },
    /// Anonymous `typedef struct { ... } name;`, waiting for the name
    TypedefName {
        start: usize,
        depth: usize,
        closed: bool,
    },
}

enum Declared {
    Named(DeclKind, String),
    AnonymousStruct,
}

/// Grammar for `/** ... */` comments in C sources and headers.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommentGrammar;

impl Grammar for CommentGrammar {
    fn parse(&self, source: &str, sink: &mut dyn DocSink) -> Result<(), ParseError> {
        let mut mode = Mode::default();
        for (index, line) in source.lines().enumerate() {
            process_line(&mut mode, sink, line, index + 1)?;
        }
        finish(mode)
    }
}

// -- Line processing ----------------------------------------------------------

fn process_line(
    mode: &mut Mode,
    sink: &mut dyn DocSink,
    line: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    match mode {
        Mode::Code => code_line(mode, sink, line, line_no),
        Mode::Comment { .. } => comment_line(mode, sink, line, line_no),
        Mode::Declaration { .. } => declaration_line(mode, sink, line, line_no),
        Mode::TypedefName { .. } => typedef_line(mode, sink, line),
    }
}

fn code_line(
    mode: &mut Mode,
    sink: &mut dyn DocSink,
    line: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    if let Some(caps) = RE_INCLUDE.captures(line) {
        sink.include(&caps[1]);
        return Ok(());
    }
    let Some(caps) = RE_BLOCK_START.captures(line) else {
        return Ok(());
    };
    sink.record().clear();
    *mode = Mode::Comment {
        start: line_no,
        cont: None,
        seen_text: false,
    };
    comment_line(mode, sink, caps.get(1).map_or("", |m| m.as_str()), line_no)
}

fn comment_line(
    mode: &mut Mode,
    sink: &mut dyn DocSink,
    line: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    let (text, rest) = match line.find("*/") {
        Some(pos) => (&line[..pos], Some(&line[pos + 2..])),
        None => (line, None),
    };
    if let Mode::Comment {
        cont, seen_text, ..
    } = mode
    {
        comment_text(sink.record(), strip_comment_star(text), line_no, cont, seen_text)?;
    }

    let Some(rest) = rest else {
        return Ok(());
    };
    *mode = Mode::Declaration {
        start: line_no,
        text: String::new(),
    };
    if rest.trim().is_empty() {
        Ok(())
    } else {
        declaration_line(mode, sink, rest, line_no)
    }
}

/// Apply one line of comment text to the record.
///
/// `cont` is the field an untagged line continues; a blank line resets it.
fn comment_text(
    record: &mut CommentRecord,
    text: &str,
    line: usize,
    cont: &mut Option<Tag>,
    seen_text: &mut bool,
) -> Result<(), ParseError> {
    if text.is_empty() {
        *cont = None;
        return Ok(());
    }
    let first_text = !std::mem::replace(seen_text, true);

    if let Some(caps) = RE_TAG.captures(text) {
        let name = &caps[1];
        let tag = Tag::from_name(name).ok_or_else(|| ParseError::UnknownTag {
            line,
            tag: name.to_string(),
        })?;
        let body = caps.get(2).map_or("", |m| m.as_str()).trim();
        apply_tag(record, tag, body, line)?;
        *cont = Some(tag);
        return Ok(());
    }

    match *cont {
        Some(Tag::Details) => record.push_detail(text),
        Some(Tag::Brief) => extend(record.brief.as_mut(), text),
        Some(Tag::Param) => extend(
            record
                .params
                .as_mut()
                .and_then(|params| params.last_mut())
                .map(|param| &mut param.description),
            text,
        ),
        Some(Tag::Return) => extend(
            record.return_tag.as_mut().map(|ret| &mut ret.description),
            text,
        ),
        Some(Tag::Author) => extend(record.author_tag.as_mut(), text),
        Some(Tag::Version) => extend(record.version_tag.as_mut(), text),
        None => {
            // The very first line of an untagged block is its brief.
            if first_text {
                record.brief = Some(text.to_string());
            } else {
                record.push_detail(text);
            }
            *cont = Some(Tag::Details);
        }
    }
    Ok(())
}

fn apply_tag(
    record: &mut CommentRecord,
    tag: Tag,
    body: &str,
    line: usize,
) -> Result<(), ParseError> {
    match tag {
        Tag::Brief => record.set_brief(body).map_err(duplicate(line)),
        Tag::Details => {
            if !body.is_empty() {
                record.push_detail(body);
            }
            Ok(())
        }
        Tag::Param => {
            let (signature, description) =
                split_term(body, 2).ok_or(ParseError::EmptyTag { line, tag })?;
            record.push_param(Parameter::new(signature, description));
            Ok(())
        }
        Tag::Return => {
            let (ty, description) =
                split_term(body, 1).ok_or(ParseError::EmptyTag { line, tag })?;
            record
                .set_return(ReturnTag::new(ty, description))
                .map_err(duplicate(line))
        }
        Tag::Author => record.set_author(body).map_err(duplicate(line)),
        Tag::Version => record.set_version(body).map_err(duplicate(line)),
    }
}

fn duplicate(line: usize) -> impl Fn(DuplicateTag) -> ParseError {
    move |DuplicateTag(tag)| ParseError::DuplicateTag { line, tag }
}

fn declaration_line(
    mode: &mut Mode,
    sink: &mut dyn DocSink,
    line: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    let Mode::Declaration { start, text } = mode else {
        return Ok(());
    };
    let start = *start;
    let code = strip_line_comment(line).trim();

    if text.is_empty() {
        if code.is_empty() {
            return Ok(());
        }
        if RE_BLOCK_START.is_match(line) {
            return Err(ParseError::MissingDeclaration { line: start });
        }
        if RE_PREPROCESSOR.is_match(line) {
            log::debug!("line {start}: comment block before a preprocessor directive discarded");
            sink.record().clear();
            *mode = Mode::Code;
            return code_line(mode, sink, line, line_no);
        }
    }

    if !text.is_empty() {
        text.push(' ');
    }
    text.push_str(code);
    let Some(end) = unquoted(text)
        .find(|&(_, c)| c == '{' || c == ';')
        .map(|(index, _)| index)
    else {
        return Ok(());
    };
    let head = collapse_whitespace(&text[..end]);
    let tail = text[end..].to_string();

    match classify(&head, tail.starts_with('{'), start)? {
        Declared::Named(kind, name) => {
            sink.declaration(kind, &name);
            *mode = Mode::Code;
            Ok(())
        }
        Declared::AnonymousStruct => {
            *mode = Mode::TypedefName {
                start,
                depth: 0,
                closed: false,
            };
            typedef_line(mode, sink, &tail)
        }
    }
}

/// Track braces of an anonymous struct body and pick up the typedef name after it.
fn typedef_line(mode: &mut Mode, sink: &mut dyn DocSink, line: &str) -> Result<(), ParseError> {
    let Mode::TypedefName {
        start,
        depth,
        closed,
    } = mode
    else {
        return Ok(());
    };
    let start = *start;

    let after_body = if *closed {
        line
    } else {
        let mut close = None;
        for (index, c) in line.char_indices() {
            match c {
                '{' => *depth += 1,
                '}' => {
                    *depth = depth.saturating_sub(1);
                    if *depth == 0 {
                        close = Some(index);
                        break;
                    }
                }
                _ => {}
            }
        }
        let Some(close) = close else {
            return Ok(());
        };
        *closed = true;
        &line[close + 1..]
    };

    if after_body.trim().is_empty() {
        return Ok(());
    }
    let name = RE_TYPEDEF_NAME
        .captures(after_body)
        .map(|caps| caps[1].to_string())
        .ok_or(ParseError::MissingDeclaration { line: start })?;
    sink.declaration(DeclKind::Struct, &name);
    *mode = Mode::Code;
    Ok(())
}

fn classify(head: &str, opens_body: bool, start: usize) -> Result<Declared, ParseError> {
    if head.is_empty() || head.starts_with('}') {
        return Err(ParseError::MissingDeclaration { line: start });
    }

    if opens_body {
        if let Some(caps) = RE_STRUCT.captures(head) {
            return Ok(match caps.get(1) {
                Some(name) => Declared::Named(DeclKind::Struct, name.as_str().to_string()),
                None => Declared::AnonymousStruct,
            });
        }
    }

    let assign = head.find('=');
    if let Some(open) = head.find('(') {
        if assign.map_or(true, |eq| open < eq) {
            return match head.rfind(')') {
                Some(close) if close > open => Ok(Declared::Named(
                    DeclKind::Function,
                    head[..=close].to_string(),
                )),
                _ => Err(ParseError::UnterminatedPrototype { line: start }),
            };
        }
    }

    let name = head[..assign.unwrap_or(head.len())].trim();
    if name.is_empty() {
        return Err(ParseError::MissingDeclaration { line: start });
    }
    Ok(Declared::Named(DeclKind::Variable, name.to_string()))
}

fn finish(mode: Mode) -> Result<(), ParseError> {
    match mode {
        Mode::Code => Ok(()),
        Mode::Comment { start, .. } => Err(ParseError::UnterminatedComment { line: start }),
        Mode::Declaration { start, text } if text.contains('(') => {
            Err(ParseError::UnterminatedPrototype { line: start })
        }
        Mode::Declaration { start, .. } | Mode::TypedefName { start, .. } => {
            Err(ParseError::MissingDeclaration { line: start })
        }
    }
}

// -- Text helpers -------------------------------------------------------------

/// Drop the leading `*` of a comment line and surrounding blanks.
fn strip_comment_star(text: &str) -> &str {
    let trimmed = text.trim_start();
    trimmed.strip_prefix('*').unwrap_or(trimmed).trim()
}

fn extend(field: Option<&mut String>, text: &str) {
    if let Some(field) = field {
        if !field.is_empty() {
            field.push(' ');
        }
        field.push_str(text);
    }
}

/// Characters of `text` outside string and character literals.
fn unquoted(text: &str) -> impl Iterator<Item = (usize, char)> + '_ {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    text.char_indices().filter(move |&(_, c)| match quote {
        Some(q) => {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            false
        }
        None if c == '"' || c == '\'' => {
            quote = Some(c);
            false
        }
        None => true,
    })
}

/// Cut a trailing `//` comment, ignoring `//` inside literals.
fn strip_line_comment(line: &str) -> &str {
    let mut slash = None;
    for (index, c) in unquoted(line) {
        if c == '/' {
            if slash == Some(index.wrapping_sub(1)) {
                return &line[..index - 1];
            }
            slash = Some(index);
        } else {
            slash = None;
        }
    }
    line
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `@param` / `@return` text into the code term and its description.
///
/// The description starts at the first capitalized word outside brackets.
/// Without one, the first `fallback` words are the term.
fn split_term(body: &str, fallback: usize) -> Option<(String, String)> {
    let words: Vec<&str> = body.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let mut depth = 0i32;
    let mut split = None;
    for (index, word) in words.iter().enumerate() {
        if index > 0 && depth <= 0 && word.chars().next().is_some_and(char::is_uppercase) {
            split = Some(index);
            break;
        }
        for c in word.chars() {
            match c {
                '(' | '[' => depth += 1,
                ')' | ']' => depth -= 1,
                _ => {}
            }
        }
    }

    let split = split.unwrap_or_else(|| fallback.min(words.len()));
    Some((words[..split].join(" "), words[split..].join(" ")))
}
