//! Best-effort repair of model replies into JSON-shaped text.
//!
//! Generative models are asked for a JSON object but frequently answer with
//! something close to one: unquoted keys, a key sitting next to its value with
//! no colon, bare single-word values, missing braces. [`normalize`] runs a
//! fixed pipeline of textual repairs over the reply and returns whatever text
//! results. It never fails, and the output is not guaranteed to parse.
//!
//! # Stages
//!
//! 1. `collapse_lines`: every line break becomes a single space, then trim.
//! 2. `quote_bare_keys`: `word:` becomes `"word":`.
//! 3. `insert_missing_separators`: `word "Value` becomes `"word": "Value`.
//! 4. `quote_bare_values`: `: word` becomes `: "word"`.
//! 5. `balance_braces`: prepend `{` / append `}` when missing.
//!
//! # Known misfires
//!
//! The stages are pattern substitutions, not a parser. They do not know
//! whether they are inside a quoted string, so a value such as
//! `"Time: 10am"` gets its `Time` quoted as a key. Keys containing spaces
//! (`Brief description`) cannot be repaired because every stage works on
//! single words, and only the first word of a multi-word bare value is
//! quoted. Callers must parse the result and handle failure.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

/// A single named repair step.
#[derive(Clone, Copy)]
pub struct Stage {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// The repair pipeline, in application order.
pub const STAGES: &[Stage] = &[
    Stage {
        name: "collapse_lines",
        apply: collapse_lines,
    },
    Stage {
        name: "quote_bare_keys",
        apply: quote_bare_keys,
    },
    Stage {
        name: "insert_missing_separators",
        apply: insert_missing_separators,
    },
    Stage {
        name: "quote_bare_values",
        apply: quote_bare_values,
    },
    Stage {
        name: "balance_braces",
        apply: balance_braces,
    },
];

static BARE_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+):").expect("bare key pattern is valid"));

// The word character after the quote restricts matches to opening quotes,
// which keeps well-formed JSON untouched.
static MISSING_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)\s*"(\w)"#).expect("missing separator pattern is valid")
});

static BARE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r": (\w+)").expect("bare value pattern is valid"));

/// Run every stage of [`STAGES`] over `raw` and return the repaired text.
pub fn normalize(raw: &str) -> String {
    STAGES.iter().fold(raw.to_string(), |text, stage| {
        let out = (stage.apply)(&text);
        trace!(stage = stage.name, changed = (out != text), "normalize stage");
        out
    })
}

/// Replace line breaks with single spaces and trim the ends.
pub fn collapse_lines(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}

/// Wrap a word that is directly followed by a colon in quotes.
pub fn quote_bare_keys(text: &str) -> String {
    BARE_KEY.replace_all(text, r#""${1}":"#).into_owned()
}

/// Rebuild `"key": "` where a bare word runs straight into a quoted value.
pub fn insert_missing_separators(text: &str) -> String {
    MISSING_SEPARATOR
        .replace_all(text, r#""${1}": "${2}"#)
        .into_owned()
}

/// Quote the first bare word after `": "`.
pub fn quote_bare_values(text: &str) -> String {
    BARE_VALUE.replace_all(text, r#": "${1}""#).into_owned()
}

/// Ensure the text opens with `{` and closes with `}`.
pub fn balance_braces(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    if !text.starts_with('{') {
        out.push('{');
    }
    out.push_str(text);
    if !text.ends_with('}') {
        out.push('}');
    }
    out
}
