//! Comment delimiter restyling
//!
//! FunC comments use `;;` and `{- -}`; the camel style uses `//` and `/* */`.
//! Only the delimiters are rewritten: the comment body is passed through
//! as-is, so a round trip in both directions restores the original text.
//! Block comments whose body cannot be carried over intact keep their
//! original delimiters.

use std::borrow::Cow;

use log::debug;

use crate::{
    tokenizer::{Token, tokenize},
    types::Direction,
};

/// Delimiters of one comment style, longest-first where one is a prefix of another
#[derive(Debug, Clone, Copy)]
struct CommentStyle {
    doc_line: &'static str,
    line: &'static str,
    doc_block_open: &'static str,
    block_open: &'static str,
    block_close: &'static str,
}

const SNAKE: CommentStyle = CommentStyle {
    doc_line: ";;;",
    line: ";;",
    doc_block_open: "{--",
    block_open: "{-",
    block_close: "-}",
};

const CAMEL: CommentStyle = CommentStyle {
    doc_line: "///",
    line: "//",
    doc_block_open: "/**",
    block_open: "/*",
    block_close: "*/",
};

/// Rewrite the delimiters of a comment token
///
/// Text that does not start with a delimiter of the source style is returned
/// unchanged, which also covers comments already written in the target style.
pub fn transform(comment: &str, direction: Direction) -> Cow<'_, str> {
    let (from, to) = match direction {
        Direction::ToCamel => (SNAKE, CAMEL),
        Direction::ToSnake => (CAMEL, SNAKE),
    };

    if comment.starts_with(from.block_open) {
        return match rewrite_block(comment, from, to) {
            Some(rewritten) => Cow::Owned(rewritten),
            None => {
                debug!("Block comment body clashes with the target delimiters, kept: {comment:?}");
                Cow::Borrowed(comment)
            }
        };
    }
    if let Some(rest) = comment.strip_prefix(from.doc_line) {
        return Cow::Owned(format!("{}{rest}", to.doc_line));
    }
    if let Some(rest) = comment.strip_prefix(from.line) {
        return Cow::Owned(format!("{}{rest}", to.line));
    }
    Cow::Borrowed(comment)
}

/// Swap the delimiters of a block comment, or `None` when the result would
/// not lex as the same single comment and convert back to `comment`
///
/// FunC blocks nest and C-style blocks do not, so a body such as
/// `{- see a */ b -}` has no faithful counterpart in the other style.
fn rewrite_block(comment: &str, from: CommentStyle, to: CommentStyle) -> Option<String> {
    let (rewritten, terminated) = swap_block_delimiters(comment, from, to);
    let restored = swap_block_delimiters(&rewritten, to, from).0;
    (restored == comment && lexes_as_one_comment(&rewritten, terminated)).then_some(rewritten)
}

fn swap_block_delimiters(comment: &str, from: CommentStyle, to: CommentStyle) -> (String, bool) {
    // The closing delimiter goes first so that `/**/` is read as open + close
    let (body, close) = match comment.strip_suffix(from.block_close) {
        Some(body) if body.len() >= from.block_open.len() => (body, to.block_close),
        _ => (comment, ""),
    };

    let (open, inner) = if let Some(inner) = body.strip_prefix(from.doc_block_open) {
        (to.doc_block_open, inner)
    } else {
        (to.block_open, body.get(from.block_open.len()..).unwrap_or_default())
    };

    (format!("{open}{inner}{close}"), !close.is_empty())
}

/// A terminated comment must end exactly at its close, even with text after it
fn lexes_as_one_comment(text: &str, terminated: bool) -> bool {
    let followed = if terminated {
        format!("{text}\n")
    } else {
        text.to_owned()
    };
    matches!(
        tokenize(&followed).first(),
        Some(Token::MultiLineComment(comment)) if comment == text
    )
}
