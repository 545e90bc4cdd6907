//! File driver: runs the grammar over each input file and collects the output.
//!
//! All run-wide state lives in [`RunContext`]: the output buffer, the exit
//! status, the directory of the file being parsed and the list of files
//! already seen (used to follow `#include` directives once each).

use crate::list::OwnershipList;
use crate::model::{CommentRecord, DeclKind};
use crate::parser::{DocSink, Grammar, ParseError};
use crate::path;
use crate::render::{self, document};
use log::{debug, error, info, warn};
use std::collections::VecDeque;
use std::fs;
use std::io;
use thiserror::Error;

/// Overall outcome of a run, ordered by severity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunStatus {
    #[default]
    Success,
    /// At least one input could not be read
    OpenFailure,
    /// At least one input was malformed
    ParseFailure,
}

impl RunStatus {
    /// Process exit code.
    pub fn code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::OpenFailure => 2,
            RunStatus::ParseFailure => 3,
        }
    }

    fn escalate(&mut self, other: RunStatus) {
        *self = (*self).max(other);
    }
}

/// Failure to document one file. Never fatal to the batch.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("can't open file {path}: {source}")]
    Open { path: String, source: io::Error },

    #[error("parsing failed {path}: {source}")]
    Parse { path: String, source: ParseError },
}

impl DriverError {
    pub fn status(&self) -> RunStatus {
        match self {
            DriverError::Open { .. } => RunStatus::OpenFailure,
            DriverError::Parse { .. } => RunStatus::ParseFailure,
        }
    }
}

/// State shared by every file of one run.
#[derive(Debug, Default)]
pub struct RunContext {
    out: String,
    status: RunStatus,
    current_dir: Option<String>,
    follow_includes: bool,
    seen: Option<OwnershipList<String>>,
    pending: VecDeque<String>,
}

impl RunContext {
    pub fn new(follow_includes: bool) -> Self {
        Self {
            follow_includes,
            ..Self::default()
        }
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Markup produced so far.
    pub fn output(&self) -> &str {
        &self.out
    }

    pub fn into_output(self) -> String {
        self.out
    }

    /// Record `path` as seen; `false` if it already was under any spelling.
    fn remember(&mut self, path: &str) -> bool {
        let key = path::normalize(path);
        match self.seen.as_mut() {
            Some(seen) => seen.add_unique(key, |a, b| a == b),
            None => {
                self.seen = Some(OwnershipList::new(key));
                true
            }
        }
    }

    fn queue_include(&mut self, target: &str) {
        if !self.follow_includes {
            return;
        }
        let full = path::join(self.current_dir.as_deref(), target);
        if self.remember(&full) {
            debug!("queued include {full}");
            self.pending.push_back(full);
        }
    }
}

/// Document every file in order, then every include discovered on the way.
pub fn run<G: Grammar + ?Sized>(ctx: &mut RunContext, grammar: &G, files: &[String]) {
    for file in files {
        ctx.remember(file);
    }

    for file in files {
        if let Err(err) = process_file(ctx, grammar, file) {
            error!("{err}");
            ctx.status.escalate(err.status());
        }
    }

    while let Some(include) = ctx.pending.pop_front() {
        match process_file(ctx, grammar, &include) {
            Ok(_) => {}
            // Headers outside the tree (generated, system) are not our inputs.
            Err(err @ DriverError::Open { .. }) => warn!("skipping include: {err}"),
            Err(err) => {
                error!("{err}");
                ctx.status.escalate(err.status());
            }
        }
    }
}

/// Document one file, returning how many declarations were rendered.
pub fn process_file<G: Grammar + ?Sized>(
    ctx: &mut RunContext,
    grammar: &G,
    path: &str,
) -> Result<usize, DriverError> {
    info!("Parsing: {path}");
    ctx.current_dir = path::directory_of(path);
    let result = parse_into(ctx, grammar, path);
    ctx.current_dir = None;

    if let Ok(count) = &result {
        info!("Parsing complete: {path} ({count} declarations)");
    }
    result
}

fn parse_into<G: Grammar + ?Sized>(
    ctx: &mut RunContext,
    grammar: &G,
    path: &str,
) -> Result<usize, DriverError> {
    let source = fs::read_to_string(path).map_err(|source| DriverError::Open {
        path: path.to_string(),
        source,
    })?;

    ctx.out.push_str(&document::file_section(path));
    let mut session = FileSession {
        ctx,
        record: CommentRecord::default(),
        declarations: 0,
    };
    grammar
        .parse(&source, &mut session)
        .map_err(|source| DriverError::Parse {
            path: path.to_string(),
            source,
        })?;
    Ok(session.declarations)
}

/// Grammar callbacks for one file.
struct FileSession<'a> {
    ctx: &'a mut RunContext,
    record: CommentRecord,
    declarations: usize,
}

impl DocSink for FileSession<'_> {
    fn record(&mut self) -> &mut CommentRecord {
        &mut self.record
    }

    fn declaration(&mut self, kind: DeclKind, name: &str) {
        let drained = render::render(kind, name, &mut self.record, &mut self.ctx.out);
        debug!(
            "{} {name}: released {} parameters, {} detail lines, {} fields",
            kind.label(),
            drained.params,
            drained.detail_lines,
            drained.fields
        );
        self.declarations += 1;
    }

    fn include(&mut self, target: &str) {
        self.ctx.queue_include(target);
    }
}
