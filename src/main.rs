//! texdoc: generate LaTeX documentation from annotated C sources.
//!
//! `texdoc -o docs.tex --standalone src/*.h src/*.c`
//!
//! Every input becomes one `\subsection`; every documented function, struct
//! or variable inside it becomes a `\subsubsection`. A file that cannot be
//! read or parsed is reported and skipped, and the exit status records it.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use texdoc::driver::{self, RunContext};
use texdoc::parser::c::CommentGrammar;
use texdoc::render::document;

#[derive(Parser)]
#[command(
    name = "texdoc",
    about = "Generate LaTeX documentation from annotated C source files"
)]
struct Cli {
    /// Input files (glob patterns and directories supported)
    #[arg(required = true)]
    files: Vec<String>,

    /// Output file. Writes to stdout when omitted.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Wrap the output in a complete LaTeX document
    #[arg(long)]
    standalone: bool,

    /// Document title (with --standalone)
    #[arg(long, requires = "standalone")]
    title: Option<String>,

    /// Also document files pulled in with #include "..."
    #[arg(long)]
    follow_includes: bool,

    /// Log every rendered declaration
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let files = expand_globs(&cli.files)?;

    let mut ctx = RunContext::new(cli.follow_includes);
    driver::run(&mut ctx, &CommentGrammar, &files);
    let status = ctx.status();

    let mut output = String::new();
    if cli.standalone {
        output.push_str(&document::preamble(cli.title.as_deref()));
    }
    output.push_str(&ctx.into_output());
    if cli.standalone {
        output.push_str(document::postamble());
    }

    match &cli.output {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{output}"),
    }

    Ok(ExitCode::from(status.code()))
}

/// Progress goes to stderr; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// File extensions picked up when a directory is given.
const SUPPORTED_EXTENSIONS: &[&str] = &["c", "h"];

/// Expand glob patterns and directories into a list of paths.
///
/// Plain paths are kept as given, even when they do not exist, so that the
/// driver reports them. Order follows the arguments; duplicates are dropped.
fn expand_globs(patterns: &[String]) -> Result<Vec<String>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            let mut found: Vec<PathBuf> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|p| p.is_file() && has_supported_extension(p))
                .collect();
            found.sort();
            files.extend(found);
            continue;
        }
        if !is_glob(pattern) {
            files.push(path.to_path_buf());
            continue;
        }
        let mut matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            log::warn!("no files matched: {}", pattern);
        }
        matches.sort();
        files.extend(matches);
    }

    let mut unique: Vec<String> = Vec::with_capacity(files.len());
    for file in files {
        let file = file.to_string_lossy().to_string();
        if !unique.contains(&file) {
            unique.push(file);
        }
    }
    Ok(unique)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(|c: char| matches!(c, '*' | '?' | '['))
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn plain_paths_kept_in_order() {
        let files = expand_globs(&["b.h".to_string(), "a.h".to_string(), "b.h".to_string()]).unwrap();
        assert_eq!(files, ["b.h", "a.h"]);
    }

    #[test]
    fn directory_expands_to_c_sources() {
        let dir = TempDir::new().unwrap();
        for name in ["z.c", "a.h", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let files = expand_globs(&[dir.path().to_string_lossy().to_string()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| Path::new(f).file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.h", "z.c"]);
    }

    #[test]
    fn glob_matches_are_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["b.h", "a.h", "c.c"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let pattern = format!("{}/*.h", dir.path().display());
        let files = expand_globs(&[pattern]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.h"));
        assert!(files[1].ends_with("b.h"));
    }

    #[test]
    fn glob_detection() {
        assert!(is_glob("src/*.h"));
        assert!(is_glob("file?.c"));
        assert!(!is_glob("src/list.h"));
    }
}
