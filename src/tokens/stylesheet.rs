//! Custom-property statements in a stylesheet: scan, classify, match, splice.
//!
//! Scanning never alters the input. [`apply_tokens`] returns a new string in
//! which only the value ranges of changed variables differ.

use regex::Regex;
use serde::Serialize;
use std::ops::Range;
use std::sync::OnceLock;
use tracing::{debug, info};

use super::heuristics::{
    has_color_keyword, has_font_keyword, has_line_height_keyword, has_shadow_keyword,
    has_size_keyword, value_shape, ValueShape,
};
use super::map::{TokenKind, TokenSet};
use super::slug::build_var_slug_candidates;

/// One `--name: value;` statement found in the stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetVariable {
    pub name: String,
    /// Trimmed value text as written.
    pub declared_value: String,
    /// Byte range of the trimmed value in the source text.
    pub value_range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableChange {
    pub name: String,
    pub kind: TokenKind,
    pub slug: String,
    pub previous: String,
    pub value: String,
}

/// Result of matching a token set against a stylesheet.
#[derive(Debug, Clone, Default)]
pub struct StylesheetUpdate {
    pub text: String,
    pub changes: Vec<VariableChange>,
    /// Classified variables with no candidate in the token map.
    pub unmatched: Vec<String>,
    pub unclassified: Vec<String>,
    pub scanned: usize,
}

impl StylesheetUpdate {
    pub fn changed_count(&self) -> usize {
        self.changes.len()
    }
}

fn declaration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"--[A-Za-z0-9_-]+\s*:").expect("declaration pattern"))
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Byte ranges of `/* ... */` block comments and SCSS `//` line comments.
/// Quoted strings and unquoted `url(...)` bodies are not searched, so
/// `url(https://...)` is not a comment. An unterminated block comment runs to
/// the end.
fn comment_ranges(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut ranges = Vec::new();
    let mut quote: Option<u8> = None;
    let mut in_url = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            match b {
                b'\\' => i += 1,
                _ if b == q => quote = None,
                _ => {}
            }
            i += 1;
            continue;
        }
        match b {
            b'\\' => i += 1,
            b'"' | b'\'' => quote = Some(b),
            b'(' if i >= 3 && bytes[i - 3..i].eq_ignore_ascii_case(b"url") => in_url = true,
            b')' => in_url = false,
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = text[i + 2..]
                    .find("*/")
                    .map(|e| i + 2 + e + 2)
                    .unwrap_or(text.len());
                ranges.push(i..end);
                i = end;
                continue;
            }
            b'/' if !in_url && bytes.get(i + 1) == Some(&b'/') => {
                let end = text[i..].find('\n').map(|e| i + e).unwrap_or(text.len());
                ranges.push(i..end);
                i = end;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    ranges
}

/// End of a declared value starting at `start`: the next `;` outside quotes,
/// braces, parentheses and backslash escapes. `None` when the statement never
/// ends or a block closes first.
fn value_end(text: &str, start: usize) -> Option<usize> {
    let mut braces = 0usize;
    let mut parens = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = text[start..].char_indices();
    while let Some((offset, c)) = chars.next() {
        if let Some(q) = quote {
            match c {
                '\\' => {
                    chars.next();
                }
                _ if c == q => quote = None,
                _ => {}
            }
            continue;
        }
        match c {
            '\\' => {
                chars.next();
            }
            '"' | '\'' => quote = Some(c),
            '{' => braces += 1,
            '}' if braces == 0 => return None,
            '}' => braces -= 1,
            '(' => parens += 1,
            ')' => parens = parens.saturating_sub(1),
            ';' if braces == 0 && parens == 0 => return Some(start + offset),
            _ => {}
        }
    }
    None
}

/// Every custom-property statement in textual order.
pub fn parse_variables(text: &str) -> Vec<StylesheetVariable> {
    let comments = comment_ranges(text);
    let in_comment = |pos: usize| comments.iter().any(|r| r.contains(&pos));

    let mut variables = Vec::new();
    let mut pos = 0;
    while let Some(m) = declaration_re().find_at(text, pos) {
        pos = m.end();
        if in_comment(m.start()) {
            continue;
        }
        if text[..m.start()].chars().next_back().is_some_and(is_ident_char) {
            continue;
        }
        let Some(end) = value_end(text, m.end()) else {
            continue;
        };

        let raw = &text[m.end()..end];
        let leading = raw.len() - raw.trim_start().len();
        let value_start = m.end() + leading;
        let value_stop = value_start + raw.trim().len();
        let name = m.as_str().trim_end_matches(':').trim_end().to_string();

        variables.push(StylesheetVariable {
            name,
            declared_value: text[value_start..value_stop].to_string(),
            value_range: value_start..value_stop,
        });
        pos = end + 1;
    }
    variables
}

/// Token kind of a variable, judged by value shape before name.
pub fn classify_variable(name: &str, value: &str) -> Option<TokenKind> {
    let shape = value_shape(value);
    match shape {
        ValueShape::Color => return Some(TokenKind::Color),
        ValueShape::Shadow => return Some(TokenKind::Shadow),
        _ => {}
    }
    if has_line_height_keyword(name) {
        return Some(TokenKind::LineHeight);
    }
    if shape == ValueShape::WrappedLength
        || (shape == ValueShape::PxLength && has_size_keyword(name))
    {
        return Some(TokenKind::FontSize);
    }

    // A length is never a color or a shadow, whatever the name says.
    if matches!(shape, ValueShape::PxLength | ValueShape::WrappedLength) {
        return has_font_keyword(name).then_some(TokenKind::FontSize);
    }

    if has_color_keyword(name) {
        Some(TokenKind::Color)
    } else if has_shadow_keyword(name) {
        Some(TokenKind::Shadow)
    } else if has_font_keyword(name) {
        Some(TokenKind::FontSize)
    } else {
        None
    }
}

/// Candidates for a variable name, minus purely numeric ones such as `900`
/// that would match any scale step.
fn match_candidates(name: &str, max_tokens: usize) -> Vec<String> {
    build_var_slug_candidates(name, max_tokens)
        .into_iter()
        .filter(|slug| !slug.chars().all(|c| c.is_ascii_digit() || c == '-'))
        .collect()
}

/// Match every classified variable against `tokens` and splice new values.
pub fn apply_tokens(text: &str, tokens: &TokenSet, max_tokens: usize) -> StylesheetUpdate {
    let variables = parse_variables(text);
    let mut update = StylesheetUpdate {
        scanned: variables.len(),
        ..Default::default()
    };
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;

    for variable in &variables {
        let Some(kind) = classify_variable(&variable.name, &variable.declared_value) else {
            update.unclassified.push(variable.name.clone());
            continue;
        };
        let candidates = match_candidates(&variable.name, max_tokens);
        let Some((slug, value)) = tokens.lookup(kind, &candidates) else {
            debug!(variable = %variable.name, %kind, "no token for variable");
            update.unmatched.push(variable.name.clone());
            continue;
        };
        let value = value.trim();
        if value == variable.declared_value.trim() {
            continue;
        }

        output.push_str(&text[cursor..variable.value_range.start]);
        output.push_str(value);
        cursor = variable.value_range.end;
        update.changes.push(VariableChange {
            name: variable.name.clone(),
            kind,
            slug: slug.to_string(),
            previous: variable.declared_value.clone(),
            value: value.to_string(),
        });
    }
    output.push_str(&text[cursor..]);
    update.text = output;

    info!(
        scanned = update.scanned,
        changed = update.changed_count(),
        unmatched = update.unmatched.len(),
        unclassified = update.unclassified.len(),
        "matched stylesheet variables"
    );
    update
}
