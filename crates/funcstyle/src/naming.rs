//! Identifier transformer
//!
//! Maps a single identifier between FunC `snake_case?` style and `camelCase`
//! style. The mapping is checked in a fixed order:
//! - identifiers not in the source form are left alone
//! - builtins are left alone
//! - the exception dictionary wins over every heuristic
//! - otherwise the marker rules (`?` -> `is`, `!` -> `force`, `'` -> `modified`)
//!   run in sequence, followed by the generic case conversion
//!
//! The heuristics are not a bijection for names that combine several markers
//! (`ready!?` and friends); such names convert one way only.

use std::borrow::Cow;

use anyhow::Result;
use cow_utils::CowUtils;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::types::Direction;

mod tables;

pub use tables::{BUILTINS, EXCEPTIONS, ExceptionDictionary};

/// Characters allowed in a snake-form identifier besides lowercase letters and digits
pub const SNAKE_MARKS: &str = "_?!:";

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("camel boundary regex is valid"));

static DEFAULT_RENAMER: Lazy<Renamer> = Lazy::new(Renamer::new);

/// Transform `identifier` with the built-in tables
pub fn transform(identifier: &str, direction: Direction) -> String {
    DEFAULT_RENAMER.transform(identifier, direction).into_owned()
}

/// Every character is lowercase, a digit, or one of [`SNAKE_MARKS`]
pub fn is_snake_case(identifier: &str) -> bool {
    identifier
        .chars()
        .all(|c| c.is_lowercase() || c.is_ascii_digit() || SNAKE_MARKS.contains(c))
}

/// Starts with a lowercase letter and contains at least one uppercase letter
pub fn is_camel_case(identifier: &str) -> bool {
    identifier.chars().next().is_some_and(char::is_lowercase)
        && identifier.chars().any(char::is_uppercase)
}

/// Identifier transformer bound to a concrete exception dictionary and builtin set
///
/// Built once per run and shared read-only by every file of the run.
#[derive(Debug, Clone)]
pub struct Renamer {
    exceptions: Cow<'static, ExceptionDictionary>,
    builtins: FxHashSet<String>,
}

impl Default for Renamer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renamer {
    /// Renamer using only the built-in tables
    pub fn new() -> Self {
        Self {
            exceptions: Cow::Borrowed(ExceptionDictionary::builtin()),
            builtins: tables::builtin_set(std::iter::empty()),
        }
    }

    /// Renamer with user-supplied exceptions and builtins layered over the built-in ones
    pub fn with_overrides<'a, E, B>(exceptions: E, builtins: B) -> Result<Self>
    where
        E: IntoIterator<Item = (&'a str, &'a str)>,
        B: IntoIterator<Item = &'a str>,
    {
        let mut dictionary = ExceptionDictionary::builtin().clone();
        dictionary.extend(exceptions)?;
        Ok(Self {
            exceptions: Cow::Owned(dictionary),
            builtins: tables::builtin_set(builtins),
        })
    }

    pub fn is_builtin(&self, identifier: &str) -> bool {
        self.builtins.contains(identifier)
    }

    /// Rewrite one identifier in the given direction
    pub fn transform<'a>(&self, identifier: &'a str, direction: Direction) -> Cow<'a, str> {
        match direction {
            Direction::ToCamel => self.to_camel(identifier),
            Direction::ToSnake => self.to_snake(identifier),
        }
    }

    fn to_camel<'a>(&self, identifier: &'a str) -> Cow<'a, str> {
        if !is_snake_case(identifier) || self.is_builtin(identifier) {
            return Cow::Borrowed(identifier);
        }
        if let Some(camel) = self.exceptions.lookup(identifier, Direction::ToCamel) {
            return Cow::Owned(camel.to_owned());
        }

        let question = expand_question_mark(identifier);
        let exclamation = expand_suffix(&question, '!', "force_");
        let apostrophe = expand_suffix(&exclamation, '\'', "modified_");
        Cow::Owned(snake_to_camel(&apostrophe))
    }

    fn to_snake<'a>(&self, identifier: &'a str) -> Cow<'a, str> {
        if !is_camel_case(identifier) || self.is_builtin(identifier) {
            return Cow::Borrowed(identifier);
        }
        if let Some(snake) = self.exceptions.lookup(identifier, Direction::ToSnake) {
            return Cow::Owned(snake.to_owned());
        }

        let is_word = collapse_is_prefix(identifier);
        let force_word = collapse_prefix(&is_word, "force", '!');
        let modified_word = collapse_prefix(&force_word, "modified", '\'');
        Cow::Owned(camel_to_snake(&modified_word))
    }
}

/// `ready?` -> `is_ready`, `dict_get?` -> `dict_get`
fn expand_question_mark(input: &str) -> Cow<'_, str> {
    match input.strip_suffix('?') {
        // Underscored names are fallible operations, not predicates
        Some(rest) if rest.contains('_') => Cow::Borrowed(rest),
        Some(rest) => Cow::Owned(format!("is_{rest}")),
        None => Cow::Borrowed(input),
    }
}

/// `touch!` -> `force_touch`, `data'` -> `modified_data`
fn expand_suffix<'a>(input: &'a str, marker: char, prefix: &str) -> Cow<'a, str> {
    match input.strip_suffix(marker) {
        Some(rest) => Cow::Owned(format!("{prefix}{rest}")),
        None => Cow::Borrowed(input),
    }
}

/// `isReady` -> `Ready?`, but only when the name has a single word boundary
fn collapse_is_prefix(input: &str) -> Cow<'_, str> {
    if input.starts_with("is") && lower_upper_transitions(input) == 1 {
        Cow::Owned(format!("{}?", &input["is".len()..]))
    } else {
        Cow::Borrowed(input)
    }
}

/// `forceTouch` -> `Touch!`, `modifiedData` -> `Data'`
fn collapse_prefix<'a>(input: &'a str, prefix: &str, marker: char) -> Cow<'a, str> {
    match input.strip_prefix(prefix) {
        Some(rest) if rest.starts_with(char::is_uppercase) => {
            Cow::Owned(format!("{rest}{marker}"))
        }
        _ => Cow::Borrowed(input),
    }
}

fn lower_upper_transitions(input: &str) -> usize {
    input
        .as_bytes()
        .windows(2)
        .filter(|pair| pair[0].is_ascii_lowercase() && pair[1].is_ascii_uppercase())
        .count()
}

fn snake_to_camel(input: &str) -> String {
    let mut words = input.split('_');
    let mut result = String::with_capacity(input.len());
    if let Some(first) = words.next() {
        result.push_str(&first.cow_to_lowercase());
    }
    for word in words {
        let mut chars = word.chars();
        if let Some(head) = chars.next() {
            result.extend(head.to_uppercase());
            result.push_str(&chars.as_str().cow_to_lowercase());
        }
    }
    result
}

fn camel_to_snake(input: &str) -> String {
    let separated = CAMEL_BOUNDARY.replace_all(input, "${1}_${2}");
    separated.cow_to_lowercase().into_owned()
}
