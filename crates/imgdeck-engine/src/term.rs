//! Search terms and query templating.
//!
//! A term is a single line of user input, optionally split into segments by
//! tab characters. A query template turns a term into the string actually
//! sent to the search backend:
//!
//! - `%0` expands to the whole term (tabs included)
//! - `%1`, `%2`, ... expand to the first, second, ... tab-delimited segment
//! - placeholders with no matching segment are deleted
//! - a placeholder preceded by an extra `%` is left untouched
//!
//! The template `%0` is the identity for tab-free terms.

use imgdeck::Match;

/// A term queued for image search, together with its results.
#[derive(Debug, Clone, Default)]
pub struct Term {
    text: String,
    /// Matches produced by the last run, in backend order. Only matches
    /// with a downloaded file survive the download phase.
    pub matches: Vec<Match>,
}

impl Term {
    /// Create a term with no results yet.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            matches: Vec::new(),
        }
    }

    /// The raw term line.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render the search query for this term from a template.
    pub fn query(&self, template: &str) -> String {
        render_query(template, &self.text)
    }

    /// Matches the user selected that also have a downloaded file.
    pub fn selected_matches(&self) -> impl Iterator<Item = &Match> {
        self.matches
            .iter()
            .filter(|m| m.selected && m.file().is_some())
    }
}

/// Parse one term per line, trimming whitespace and dropping blank lines.
pub fn parse_terms(input: &str) -> Vec<Term> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Term::new)
        .collect()
}

/// Expand `%N` placeholders in `template` from the tab-delimited segments
/// of `term`.
///
/// A placeholder is a `%` followed by a maximal run of digits, and is only
/// recognized when the `%` is not itself preceded by a `%`. Unrecognized
/// indices (out of range, or written with leading zeros) expand to nothing.
pub fn render_query(template: &str, term: &str) -> String {
    let segments: Vec<&str> = term.split('\t').collect();
    let chars: Vec<char> = template.chars().collect();
    let mut out = String::with_capacity(template.len() + term.len());

    let mut i = 0;
    while i < chars.len() {
        let escaped = i > 0 && chars[i - 1] == '%';
        if chars[i] == '%'
            && !escaped
            && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
        {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            let index: String = chars[i + 1..j].iter().collect();
            out.push_str(placeholder_value(&index, term, &segments));
            i = j;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}

fn placeholder_value<'a>(index: &str, term: &'a str, segments: &[&'a str]) -> &'a str {
    if index == "0" {
        return term;
    }
    match index.parse::<usize>() {
        // Leading zeros never name a segment.
        Ok(n) if n >= 1 && index == n.to_string() => segments.get(n - 1).copied().unwrap_or(""),
        _ => "",
    }
}
