//! Include-graph driven restyling
//!
//! The orchestrator owns the worklist and the visited set. Files are processed
//! one at a time, breadth-first in order of first discovery:
//! read -> inject method ids -> tokenize -> collect includes -> rewrite -> write.

use std::{
    borrow::Cow,
    collections::VecDeque,
    fs,
    hash::BuildHasherDefault,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use indexmap::IndexSet;
use log::{debug, info, trace};
use rustc_hash::{FxHashSet, FxHasher};

use crate::{
    comments,
    config::Config,
    method_id,
    naming::Renamer,
    resolver::IncludeResolver,
    tokenizer::{self, Token},
    types::Direction,
    util::absolute_path,
};

type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;

/// One file handled by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Include targets named by this file, in source order
    pub includes: Vec<PathBuf>,
}

/// Outcome of a run, files in processing order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub direction: Direction,
    pub output_root: PathBuf,
    pub dry_run: bool,
    pub files: Vec<ProcessedFile>,
}

/// Quoted include arguments naming source files, in order of appearance
///
/// Tracks whether we are between an `#include` keyword and the `;` that ends
/// the directive, so several arguments (or stray tokens) in one directive are
/// all picked up.
pub fn include_targets<'t>(
    tokens: &'t [Token<'_>],
    is_source_file: impl Fn(&str) -> bool,
) -> Vec<&'t str> {
    let mut targets = Vec::new();
    let mut inside_include_directive = false;
    for token in tokens {
        if inside_include_directive {
            if let Some(target) = token.string_content().filter(|name| is_source_file(name)) {
                targets.push(target);
            } else if token.is_statement_end() {
                inside_include_directive = false;
            }
        }
        if token.is_include_directive() {
            inside_include_directive = true;
        }
    }
    targets
}

/// Restyle a single token; kinds other than names and comments pass through
pub fn rewrite_token<'src>(
    token: Token<'src>,
    renamer: &Renamer,
    direction: Direction,
) -> Token<'src> {
    let replacement = {
        let kind = token.kind();
        let text = token.text();
        let rewritten = if kind.is_name() {
            renamer.transform(text, direction)
        } else if kind.is_comment() {
            comments::transform(text, direction)
        } else {
            Cow::Borrowed(text)
        };
        match rewritten {
            Cow::Owned(text) => Some(text),
            Cow::Borrowed(_) => None,
        }
    };
    match replacement {
        Some(text) => token.with_text(text),
        None => token,
    }
}

/// Restyle a token stream and join it back into source text
pub fn rewrite_tokens(tokens: Vec<Token<'_>>, renamer: &Renamer, direction: Direction) -> String {
    let rewritten: Vec<Token<'_>> = tokens
        .into_iter()
        .map(|token| rewrite_token(token, renamer, direction))
        .collect();
    tokenizer::detokenize(&rewritten)
}

/// Full single-file pipeline without any file system access
pub fn restyle_source(source: &str, renamer: &Renamer, direction: Direction) -> String {
    let injected = method_id::inject(source);
    let tokens = tokenizer::tokenize(&injected);
    rewrite_tokens(tokens, renamer, direction)
}

/// Drives the restyling of an entry file and everything it includes
#[derive(Debug)]
pub struct Orchestrator {
    direction: Direction,
    dry_run: bool,
    renamer: Renamer,
    resolver: IncludeResolver,
    /// Files waiting to be processed, in discovery order
    worklist: VecDeque<PathBuf>,
    /// Every file ever enqueued; also the processing order
    visited: FxIndexSet<PathBuf>,
    /// Output paths produced so far
    written: FxHashSet<PathBuf>,
}

impl Orchestrator {
    /// Prepare a run seeded with `entry_file`
    pub fn new(config: &Config, entry_file: &Path) -> Result<Self> {
        let renamer = config.renamer()?;
        let resolver = match &config.root {
            Some(root) => IncludeResolver::new(root, &config.output, config.extensions.clone())?,
            None => IncludeResolver::for_entry_file(
                entry_file,
                &config.output,
                config.extensions.clone(),
            )?,
        };

        let entry = absolute_path(entry_file)?;
        // Fail early with a clear message rather than at write time
        resolver.relative_path(&entry)?;

        let mut visited = FxIndexSet::default();
        visited.insert(entry.clone());
        Ok(Self {
            direction: config.mode,
            dry_run: config.dry_run,
            renamer,
            resolver,
            worklist: VecDeque::from([entry]),
            visited,
            written: FxHashSet::default(),
        })
    }

    /// Process the worklist until it is empty
    ///
    /// Any read, resolve or write failure aborts the run.
    pub fn run(mut self) -> Result<RunReport> {
        info!(
            "Restyling {} ({}) into {}",
            self.resolver.root().display(),
            self.direction,
            self.resolver.output_root().display()
        );

        let mut files = Vec::new();
        while let Some(path) = self.worklist.pop_front() {
            files.push(self.process_file(&path)?);
        }

        info!(
            "{} {} file(s) under {}",
            if self.dry_run { "Checked" } else { "Restyled" },
            files.len(),
            self.resolver.output_root().display()
        );
        debug_assert_eq!(files.len(), self.visited.len());

        Ok(RunReport {
            direction: self.direction,
            output_root: self.resolver.output_root().to_path_buf(),
            dry_run: self.dry_run,
            files,
        })
    }

    fn process_file(&mut self, path: &Path) -> Result<ProcessedFile> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let injected = method_id::inject(&source);
        let tokens = tokenizer::tokenize(&injected);
        trace!("{}: {} tokens", path.display(), tokens.len());

        let includes = self.enqueue_includes(path, &tokens)?;
        let output = self.resolver.output_path(path)?;
        let restyled = rewrite_tokens(tokens, &self.renamer, self.direction);
        self.write_output(path, &output, &restyled)?;

        Ok(ProcessedFile {
            input: path.to_path_buf(),
            output,
            includes,
        })
    }

    fn enqueue_includes(&mut self, path: &Path, tokens: &[Token<'_>]) -> Result<Vec<PathBuf>> {
        let mut includes = Vec::new();
        for target in include_targets(tokens, |name| self.resolver.is_source_file(name)) {
            let resolved = self.resolver.resolve_include(target, path)?;
            if self.written.contains(&resolved) {
                bail!(
                    "{} is included from {} but was already overwritten by restyled output",
                    resolved.display(),
                    path.display()
                );
            }
            if self.visited.insert(resolved.clone()) {
                debug!("Discovered include {} from {}", resolved.display(), path.display());
                self.worklist.push_back(resolved.clone());
            } else {
                debug!("Skipping already queued include {}", resolved.display());
            }
            includes.push(resolved);
        }
        Ok(includes)
    }

    fn write_output(&mut self, input: &Path, output: &Path, contents: &str) -> Result<()> {
        if self.visited.contains(output) {
            bail!(
                "Refusing to overwrite source file {} with the restyled {}",
                output.display(),
                input.display()
            );
        }

        if self.dry_run {
            info!("Would write {}", output.display());
        } else {
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
            fs::write(output, contents)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Wrote {}", output.display());
        }
        self.written.insert(output.to_path_buf());
        Ok(())
    }
}
