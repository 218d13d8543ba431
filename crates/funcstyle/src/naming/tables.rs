//! Curated name tables for the identifier transformer
//!
//! The exception dictionary lists stdlib names whose generic conversion would
//! be ambiguous or unidiomatic (mostly the dictionary API, where a trailing `?`
//! means "may fail" rather than "is a predicate"). The builtin set lists
//! operators and primitives that keep their spelling in both styles.

use anyhow::{Result, bail};
use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::types::Direction;

/// Identifiers that are never renamed in either direction
pub const BUILTINS: &[&str] = &[
    "divmod", "~divmod", "moddiv", "~moddiv", "muldiv", "muldivc", "muldivr", "muldivmod",
    "true", "false", "null", "nil", "Nil", "throw", "at",
    "touch", "~touch", "touch2", "~touch2", "~dump", "~strdump",
    "run_method0", "run_method1", "run_method2", "run_method3", "->",
];

/// Snake-form name to camel-form name
///
/// `~`-prefixed modifying variants are not listed: the tokenizer splits the
/// `~` off, so the plain entry already covers them.
pub const EXCEPTIONS: &[(&str, &str)] = &[
    ("recv_internal", "receiveInternalMessage"),
    ("recv_external", "receiveExternalMessage"),
    ("slice_empty?", "isSliceEmpty"),
    ("slice_data_empty?", "isSliceDataEmpty"),
    ("slice_refs_empty?", "isSliceRefsEmpty"),
    ("dict_empty?", "isDictEmpty"),
    ("cell_null?", "isCellNull"),
    ("tryComputeDataSize", "tryComputeDataSize"),
    ("trySliceComputeDataSize", "trySliceComputeDataSize"),
    ("idict_get_ref?", "tryIdictGetRef"),
    ("udict_get_ref?", "tryUdictGetRef"),
    ("idict_delete?", "tryIdictDelete"),
    ("udict_delete?", "tryUdictDelete"),
    ("idict_get?", "tryIdictGet"),
    ("udict_get?", "tryUdictGet"),
    ("idict_delete_get?", "tryIdictDeleteGet"),
    ("udict_delete_get?", "tryUdictDeleteGet"),
    ("udict_add?", "tryUdictAdd"),
    ("udict_replace?", "tryUdictReplace"),
    ("idict_add?", "tryIdictAdd"),
    ("idict_replace?", "tryIdictReplace"),
    ("udict_add_builder?", "tryUdictAddBuilder"),
    ("udict_replace_builder?", "tryUdictReplaceBuilder"),
    ("idict_add_builder?", "tryIdictAddBuilder"),
    ("idict_replace_builder?", "tryIdictReplaceBuilder"),
    ("udict_get_min?", "tryUdictGetMin"),
    ("udict_get_max?", "tryUdictGetMax"),
    ("udict_get_min_ref?", "tryUdictGetMinRef"),
    ("udict_get_max_ref?", "tryUdictGetMaxRef"),
    ("idict_get_min?", "tryIdictGetMin"),
    ("idict_get_max?", "tryIdictGetMax"),
    ("idict_get_min_ref?", "tryIdictGetMinRef"),
    ("idict_get_max_ref?", "tryIdictGetMaxRef"),
    ("udict_get_next?", "tryUdictGetNext"),
    ("udict_get_nexteq?", "tryUdictGetNexteq"),
    ("udict_get_prev?", "tryUdictGetPrev"),
    ("udict_get_preveq?", "tryUdictGetPreveq"),
    ("idict_get_next?", "tryIdictGetNext"),
    ("idict_get_nexteq?", "tryIdictGetNexteq"),
    ("idict_get_prev?", "tryIdictGetPrev"),
    ("idict_get_preveq?", "tryIdictGetPreveq"),
    ("pfxdict_get?", "tryPfxdictGet"),
    ("pfxdict_set?", "tryPfxdictSet"),
    ("pfxdict_delete?", "tryPfxdictDelete"),
];

static BUILTIN_EXCEPTIONS: Lazy<ExceptionDictionary> = Lazy::new(|| {
    let mut dictionary = ExceptionDictionary::default();
    for (snake, camel) in EXCEPTIONS {
        dictionary.insert_unchecked(snake, camel);
    }
    dictionary
});

/// Bidirectional snake/camel override table
///
/// Both directions are materialized up front so that lookups stay O(1) and
/// the inverse can never drift from the forward mapping.
#[derive(Debug, Clone, Default)]
pub struct ExceptionDictionary {
    to_camel: FxHashMap<String, String>,
    to_snake: FxHashMap<String, String>,
}

impl ExceptionDictionary {
    /// The built-in table, initialized on first use
    pub fn builtin() -> &'static Self {
        &BUILTIN_EXCEPTIONS
    }

    /// Layer extra `(snake, camel)` pairs over this table
    ///
    /// An existing snake key may be redirected to a new camel name, but two
    /// snake names can never share one camel name.
    pub fn extend<'a, I>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (snake, camel) in pairs {
            if let Some(owner) = self.to_snake.get(camel) {
                if owner != snake {
                    bail!(
                        "exception '{snake}' -> '{camel}' conflicts with '{owner}' -> '{camel}'"
                    );
                }
            }
            self.insert_unchecked(snake, camel);
        }
        Ok(())
    }

    fn insert_unchecked(&mut self, snake: &str, camel: &str) {
        if let Some(previous) = self.to_camel.insert(snake.to_owned(), camel.to_owned()) {
            self.to_snake.remove(&previous);
        }
        self.to_snake.insert(camel.to_owned(), snake.to_owned());
    }

    /// Look up the override for `identifier` in the given direction
    pub fn lookup(&self, identifier: &str, direction: Direction) -> Option<&str> {
        let table = match direction {
            Direction::ToCamel => &self.to_camel,
            Direction::ToSnake => &self.to_snake,
        };
        table.get(identifier).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.to_camel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_camel.is_empty()
    }
}

/// Build the default builtin set, optionally extended with extra names
pub(crate) fn builtin_set<'a>(extra: impl IntoIterator<Item = &'a str>) -> FxHashSet<String> {
    BUILTINS
        .iter()
        .copied()
        .chain(extra)
        .map(str::to_owned)
        .collect()
}
