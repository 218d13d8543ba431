//! FunC tokenizer
//!
//! Raw tokenization is handled entirely by logos; a small classification step
//! then sorts words into keywords, identifiers and plain text. The tokenizer is
//! lossless: every byte of the input ends up in exactly one token, and bytes no
//! rule recognizes become [`Token::PlainText`]. Concatenating the token texts
//! with [`detokenize`] reproduces the input.
//!
//! Both comment styles are recognized (`;;`, `{- -}` and `//`, `/* */`) so the
//! same tokenizer serves both conversion directions.

use std::borrow::Cow;

use logos::{Lexer, Logos};
use once_cell::sync::Lazy;
use regex::Regex;

/// Keywords whose spelling is restyled along with identifiers
const KEYWORDS: &[&str] = &[
    "if", "ifnot", "else", "elseif", "elseifnot", "while", "do", "until", "repeat", "return",
    "impure", "method_id", "forall", "asm", "inline", "inline_ref", "#include", "#pragma",
];

/// Types and constants, kept verbatim
const RESERVED: &[&str] = &[
    "var", "int", "slice", "tuple", "cell", "builder", "cont", "_", "true", "false", "global",
    "const",
];

const OPERATORS: &[&str] = &[
    "<=>", ">=", "<=", "!=", "==", "^>>", "~>>", ">>", "<<", "/%", "^%", "~%", "^/", "~/", "+=",
    "-=", "*=", "/=", "~/=", "^/=", "%=", "^%=", "<<=", ">>=", "~>>=", "^>>=", "&=", "|=", "^=",
    "^", "=", "~", "/", "%", "-", "*", "+", ">", "<", "&", "|", ":", "?",
];

pub const INCLUDE_DIRECTIVE: &str = "#include";

static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(?:0x[0-9a-fA-F_]+|0b[01_]+|[0-9][0-9_]*)$").expect("number regex is valid")
});

/// Token classes produced by logos before word classification
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"\s+")]
    Whitespace,

    #[regex(r";;[^\n]*")]
    LineComment,

    #[regex(r"//[^\n]*")]
    SlashLineComment,

    #[token("{-", nested_block_comment)]
    BlockComment,

    #[token("/*", slash_block_comment)]
    SlashBlockComment,

    #[regex(r#""[^"\n]*"[Hhcusa]?"#)]
    String,

    #[regex(r"`[^`]+`")]
    QuotedIdentifier,

    #[regex(r"[;,()\[\]{}.~]")]
    Punctuation,

    /// Kept out of words so `/*` always starts a comment, even in `a/*b*/`
    #[token("/")]
    Slash,

    #[regex(r#"[^;,()\[\]{}.~\s"`/]+"#)]
    Word,
}

/// FunC block comments nest; consume up to the matching `-}` or end of input
fn nested_block_comment(lex: &mut Lexer<'_, RawToken>) {
    let rest = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut pos = 0;
    while pos < rest.len() && depth > 0 {
        if rest[pos..].starts_with(b"{-") {
            depth += 1;
            pos += 2;
        } else if rest[pos..].starts_with(b"-}") {
            depth -= 1;
            pos += 2;
        } else {
            pos += 1;
        }
    }
    lex.bump(pos);
}

/// `/* */` does not nest; consume through the first `*/` or to end of input
fn slash_block_comment(lex: &mut Lexer<'_, RawToken>) {
    let rest = lex.remainder();
    let len = rest.find("*/").map_or(rest.len(), |end| end + "*/".len());
    lex.bump(len);
}

/// Classification of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    VariableIdentifier,
    FunctionIdentifier,
    SingleLineComment,
    MultiLineComment,
    StringLiteral,
    Punctuation,
    PlainText,
}

impl TokenKind {
    /// Keywords and identifiers go through the identifier transformer
    pub fn is_name(self) -> bool {
        matches!(
            self,
            TokenKind::Keyword | TokenKind::VariableIdentifier | TokenKind::FunctionIdentifier
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(
            self,
            TokenKind::SingleLineComment | TokenKind::MultiLineComment
        )
    }
}

/// A classified slice of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    Keyword(Cow<'src, str>),
    VariableIdentifier(Cow<'src, str>),
    FunctionIdentifier(Cow<'src, str>),
    SingleLineComment(Cow<'src, str>),
    MultiLineComment(Cow<'src, str>),
    StringLiteral(Cow<'src, str>),
    Punctuation(Cow<'src, str>),
    PlainText(Cow<'src, str>),
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: impl Into<Cow<'src, str>>) -> Self {
        let text = text.into();
        match kind {
            TokenKind::Keyword => Token::Keyword(text),
            TokenKind::VariableIdentifier => Token::VariableIdentifier(text),
            TokenKind::FunctionIdentifier => Token::FunctionIdentifier(text),
            TokenKind::SingleLineComment => Token::SingleLineComment(text),
            TokenKind::MultiLineComment => Token::MultiLineComment(text),
            TokenKind::StringLiteral => Token::StringLiteral(text),
            TokenKind::Punctuation => Token::Punctuation(text),
            TokenKind::PlainText => Token::PlainText(text),
        }
    }

    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Keyword(_) => TokenKind::Keyword,
            Token::VariableIdentifier(_) => TokenKind::VariableIdentifier,
            Token::FunctionIdentifier(_) => TokenKind::FunctionIdentifier,
            Token::SingleLineComment(_) => TokenKind::SingleLineComment,
            Token::MultiLineComment(_) => TokenKind::MultiLineComment,
            Token::StringLiteral(_) => TokenKind::StringLiteral,
            Token::Punctuation(_) => TokenKind::Punctuation,
            Token::PlainText(_) => TokenKind::PlainText,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Token::Keyword(text)
            | Token::VariableIdentifier(text)
            | Token::FunctionIdentifier(text)
            | Token::SingleLineComment(text)
            | Token::MultiLineComment(text)
            | Token::StringLiteral(text)
            | Token::Punctuation(text)
            | Token::PlainText(text) => text,
        }
    }

    /// Same kind, new text
    #[must_use]
    pub fn with_text(self, text: impl Into<Cow<'src, str>>) -> Self {
        Self::new(self.kind(), text)
    }

    /// Content of a string literal without quotes and type suffix
    pub fn string_content(&self) -> Option<&str> {
        let Token::StringLiteral(text) = self else {
            return None;
        };
        let inner = text.strip_prefix('"')?;
        let end = inner.rfind('"')?;
        Some(&inner[..end])
    }

    pub fn is_include_directive(&self) -> bool {
        matches!(self, Token::Keyword(text) if text == INCLUDE_DIRECTIVE)
    }

    pub fn is_statement_end(&self) -> bool {
        matches!(self, Token::Punctuation(text) if text == ";")
    }
}

/// Tokenize FunC source
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut lexer = RawToken::lexer(source);
    let mut raw = Vec::new();
    while let Some(result) = lexer.next() {
        raw.push((result.ok(), lexer.slice()));
    }

    let mut tokens = Vec::with_capacity(raw.len());
    for (index, (kind, text)) in raw.iter().enumerate() {
        let kind = match kind {
            Some(RawToken::LineComment | RawToken::SlashLineComment) => {
                TokenKind::SingleLineComment
            }
            Some(RawToken::BlockComment | RawToken::SlashBlockComment) => {
                TokenKind::MultiLineComment
            }
            Some(RawToken::String) => TokenKind::StringLiteral,
            Some(RawToken::Punctuation) => TokenKind::Punctuation,
            Some(RawToken::QuotedIdentifier) => TokenKind::VariableIdentifier,
            Some(RawToken::Word) => {
                let before_call = matches!(raw.get(index + 1), Some((_, "(")));
                classify_word(text, before_call)
            }
            Some(RawToken::Whitespace | RawToken::Slash) | None => TokenKind::PlainText,
        };
        tokens.push(Token::new(kind, *text));
    }
    tokens
}

fn classify_word(word: &str, before_call: bool) -> TokenKind {
    if KEYWORDS.contains(&word) {
        TokenKind::Keyword
    } else if RESERVED.contains(&word) || OPERATORS.contains(&word) || NUMBER.is_match(word) {
        TokenKind::PlainText
    } else if before_call {
        TokenKind::FunctionIdentifier
    } else {
        TokenKind::VariableIdentifier
    }
}

/// Concatenate token texts back into source
pub fn detokenize(tokens: &[Token<'_>]) -> String {
    let mut source = String::with_capacity(tokens.iter().map(|t| t.text().len()).sum());
    for token in tokens {
        source.push_str(token.text());
    }
    source
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const WALLET: &str = r#"#pragma version >=0.4.0;
#include "imports/stdlib.fc";

;; storage: seqno, public key
{- layout {- nested -} -}
(int, int) load_data() inline {
  var ds = get_data().begin_parse();
  return (ds~load_uint(32), ds.preload_uint(256));
}

() recv_internal(int balance, cell in_msg, slice in_msg_body) impure {
  if (in_msg_body.slice_empty?()) { return (); }
  int op = in_msg_body~load_uint(32);
  throw_unless(401, op == 0x1F);
}
"#;

    fn kinds_of<'a>(tokens: &'a [Token<'_>], kind: TokenKind) -> Vec<&'a str> {
        tokens
            .iter()
            .filter(|t| t.kind() == kind)
            .map(Token::text)
            .collect()
    }

    #[test]
    fn test_tokenization_is_lossless() {
        for source in [
            WALLET,
            "",
            "  \t\n",
            "\"unterminated string\nint x;",
            "`weird ident` = 1;",
            "{- never closed",
            "/* camel */ // style\nint fooBar();",
            "int ünïcödé = 1;",
        ] {
            assert_eq!(detokenize(&tokenize(source)), source);
        }
    }

    #[test]
    fn test_classifies_identifiers() {
        let tokens = tokenize(WALLET);
        assert_eq!(
            kinds_of(&tokens, TokenKind::FunctionIdentifier),
            vec![
                "load_data",
                "get_data",
                "begin_parse",
                "load_uint",
                "preload_uint",
                "recv_internal",
                "slice_empty?",
                "load_uint",
                "throw_unless",
            ]
        );
        let variables = kinds_of(&tokens, TokenKind::VariableIdentifier);
        assert!(variables.contains(&"in_msg_body"));
        assert!(variables.contains(&"ds"));
        assert!(variables.contains(&"version"));
    }

    #[test]
    fn test_classifies_keywords_and_reserved_words() {
        let tokens = tokenize(WALLET);
        let keywords = kinds_of(&tokens, TokenKind::Keyword);
        assert_eq!(
            keywords,
            vec!["#pragma", "#include", "inline", "return", "impure", "if", "return"]
        );
        let plain = kinds_of(&tokens, TokenKind::PlainText);
        for reserved in ["int", "var", "cell", "slice", "==", "=", "32", "0x1F", "401"] {
            assert!(plain.contains(&reserved), "{reserved} should be plain text");
        }
    }

    #[test]
    fn test_comments_and_strings() {
        let tokens = tokenize(WALLET);
        assert_eq!(
            kinds_of(&tokens, TokenKind::SingleLineComment),
            vec![";; storage: seqno, public key"]
        );
        assert_eq!(
            kinds_of(&tokens, TokenKind::MultiLineComment),
            vec!["{- layout {- nested -} -}"]
        );
        assert_eq!(
            kinds_of(&tokens, TokenKind::StringLiteral),
            vec!["\"imports/stdlib.fc\""]
        );
    }

    #[test]
    fn test_camel_style_comments() {
        let tokens = tokenize("/// doc\nint x; /* block */ /**/");
        assert_eq!(
            kinds_of(&tokens, TokenKind::SingleLineComment),
            vec!["/// doc"]
        );
        assert_eq!(
            kinds_of(&tokens, TokenKind::MultiLineComment),
            vec!["/* block */", "/**/"]
        );
    }

    #[test]
    fn test_slash_block_comments_without_spaces() {
        let tokens = tokenize("a/*x*/b /* multi;\n  load_data */ c /* open");
        assert_eq!(
            kinds_of(&tokens, TokenKind::MultiLineComment),
            vec!["/*x*/", "/* multi;\n  load_data */", "/* open"]
        );
        assert_eq!(
            kinds_of(&tokens, TokenKind::VariableIdentifier),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_slash_block_comments_do_not_nest() {
        let tokens = tokenize("/* a /* b */ c */");
        assert_eq!(tokens[0], Token::MultiLineComment("/* a /* b */".into()));
    }

    #[test]
    fn test_division_is_not_a_comment() {
        let tokens = tokenize("x = a / b; y /= 2; z = a~/b;");
        assert!(
            tokens
                .iter()
                .all(|t| !t.kind().is_comment())
        );
    }

    #[test]
    fn test_string_content() {
        let tokens = tokenize(r#"#include "lib/op-codes.func"; asm "ONE"c"#);
        let strings: Vec<_> = tokens.iter().filter_map(Token::string_content).collect();
        assert_eq!(strings, vec!["lib/op-codes.func", "ONE"]);
    }

    #[test]
    fn test_include_and_statement_markers() {
        let tokens = tokenize("#include \"a.fc\";");
        assert!(tokens[0].is_include_directive());
        assert!(tokens.last().is_some_and(Token::is_statement_end));
    }

    #[test]
    fn test_with_text_keeps_kind() {
        let token = Token::new(TokenKind::FunctionIdentifier, "load_data");
        let renamed = token.with_text("loadData".to_owned());
        assert_eq!(renamed, Token::FunctionIdentifier(Cow::Borrowed("loadData")));
    }
}
