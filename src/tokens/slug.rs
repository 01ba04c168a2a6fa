//! Slug candidates: comparable identities for design-tool names and
//! stylesheet variable names.
//!
//! Both sides are reduced to lowercase alphanumeric tokens and expanded into
//! the same candidate space (contiguous runs plus non-adjacent pairs), so
//! `Typography / Desktop / H1` and `--h1-desktop-size` can meet on `h-1` or
//! `desktop-h-1`.

use std::collections::HashSet;

/// Default cap on the number of tokens fed into candidate expansion.
pub const DEFAULT_MAX_TOKENS: usize = 8;

/// Generic layer names that carry no design meaning on their own.
const STRUCTURAL_NAMES: &[&str] = &[
    "rectangle",
    "frame",
    "group",
    "vector",
    "instance",
    "component",
    "mask",
    "layer",
    "union",
    "subtract",
    "intersect",
    "exclude",
    "path",
    "arrow",
    "icon",
    "background",
    "bg",
    "ellipse",
    "line",
    "polygon",
    "star",
    "shape",
    "container",
    "wrapper",
    "auto layout",
    "slot",
    "content",
];

/// Trim and collapse runs of whitespace to single spaces.
pub fn normalize_segment(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a name segment into alphanumeric sub-tokens.
///
/// Boundaries are non-alphanumeric characters, lower→upper case changes and
/// letter/digit changes: `H1` → `H`,`1`; `Body2` → `Body`,`2`;
/// `primaryButton` → `primary`,`Button`.
pub fn split_into_tokens(segment: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for ch in segment.chars() {
        if !ch.is_alphanumeric() {
            flush(&mut current, &mut tokens);
            prev = None;
            continue;
        }
        if let Some(p) = prev {
            let boundary = (p.is_alphabetic() && ch.is_numeric())
                || (p.is_numeric() && ch.is_alphabetic())
                || (p.is_lowercase() && ch.is_uppercase());
            if boundary {
                flush(&mut current, &mut tokens);
            }
        }
        current.push(ch);
        prev = Some(ch);
    }
    flush(&mut current, &mut tokens);

    if tokens.is_empty() {
        let trimmed = segment.trim();
        if !trimmed.is_empty() {
            tokens.push(trimmed.to_string());
        }
    }
    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

/// Whether a segment is a generic layer name such as `Group` or `Frame 12`.
pub fn is_structural_name(segment: &str) -> bool {
    let normalized = normalize_segment(segment).to_lowercase();
    if normalized.is_empty() {
        return false;
    }
    if STRUCTURAL_NAMES.contains(&normalized.as_str()) {
        return true;
    }

    // Figma's default names: "Frame 12", "Rectangle 4", "Group 7".
    let tokens = split_into_tokens(&normalized);
    match tokens.split_first() {
        Some((head, rest)) if !rest.is_empty() => {
            STRUCTURAL_NAMES.contains(&head.as_str())
                && rest.iter().all(|t| t.chars().all(|c| c.is_numeric()))
        }
        _ => false,
    }
}

/// Candidates for a design-tool name path, most specific first.
///
/// Each element may itself contain `/`-separated segments (Figma's naming
/// convention for style and component hierarchies). Structural segments are
/// dropped when anything else is available; a path made only of structural or
/// empty segments has no usable identity and yields no candidates.
pub fn build_slug_candidates<S: AsRef<str>>(path: &[S], max_tokens: usize) -> Vec<String> {
    let segments: Vec<String> = path
        .iter()
        .flat_map(|s| s.as_ref().split('/').map(normalize_segment).collect::<Vec<_>>())
        .filter(|s| !s.is_empty())
        .collect();

    let informative: Vec<&String> = segments.iter().filter(|s| !is_structural_name(s)).collect();
    if informative.is_empty() {
        return Vec::new();
    }

    let tokens: Vec<String> = informative
        .into_iter()
        .flat_map(|s| split_into_tokens(s))
        .filter_map(|t| sanitize_token(&t))
        .collect();
    candidates_from_tokens(&tokens, max_tokens)
}

/// Candidates for a stylesheet variable name such as `--greyscale--900`.
pub fn build_var_slug_candidates(name: &str, max_tokens: usize) -> Vec<String> {
    let stripped = name.trim().trim_start_matches(['-', '$']);
    let tokens: Vec<String> = stripped
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|piece| !piece.is_empty())
        .flat_map(split_into_tokens)
        .filter_map(|t| sanitize_token(&t))
        .collect();
    candidates_from_tokens(&tokens, max_tokens)
}

fn sanitize_token(token: &str) -> Option<String> {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Contiguous runs and non-adjacent pairs, deduplicated, longest first.
///
/// Only the last `max_tokens` tokens are expanded; the leaf end of a path is
/// the most specific part of it.
fn candidates_from_tokens(tokens: &[String], max_tokens: usize) -> Vec<String> {
    let start = tokens.len().saturating_sub(max_tokens.max(1));
    let tokens = &tokens[start..];
    let n = tokens.len();

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut push = |candidate: String| {
        if !candidate.is_empty() && seen.insert(candidate.clone()) {
            out.push(candidate);
        }
    };

    for i in 0..n {
        for j in i + 1..=n {
            push(tokens[i..j].join("-"));
        }
    }
    for i in 0..n {
        for j in i + 2..n {
            push(format!("{}-{}", tokens[i], tokens[j]));
        }
    }

    // Stable: equal lengths keep generation order.
    out.sort_by(|a, b| b.len().cmp(&a.len()));
    out
}
