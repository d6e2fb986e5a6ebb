//! Search term parsing.
//!
//! A search string is split on whitespace, double quotes grouping words
//! into one term. Terms may carry an operator prefix:
//!
//! - `intitle:rust` matches the title only
//! - `author:ann` matches the author
//! - `inurl:example.com` matches the link
//! - `#news` requires the entry to carry the tag `news`
//!
//! Bare terms must each occur in the title or the content. Matching is
//! case-insensitive substring matching.

/// Longest search string considered; the rest is ignored.
pub const MAX_QUERY_LENGTH: usize = 256;

/// A parsed search string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Terms matched against title or content.
    pub words: Vec<String>,
    /// Terms matched against the title.
    pub intitle: Vec<String>,
    /// Terms matched against the author.
    pub author: Vec<String>,
    /// Terms matched against the link.
    pub inurl: Vec<String>,
    /// Tag names the entry must carry.
    pub tags: Vec<String>,
}

impl SearchQuery {
    /// Parse a search string.
    pub fn parse(raw: &str) -> Self {
        let raw = truncate_chars(raw.trim(), MAX_QUERY_LENGTH);
        let mut query = SearchQuery::default();

        for term in tokenize(raw) {
            if let Some(rest) = term.strip_prefix("intitle:") {
                push_nonempty(&mut query.intitle, rest);
            } else if let Some(rest) = term.strip_prefix("author:") {
                push_nonempty(&mut query.author, rest);
            } else if let Some(rest) = term.strip_prefix("inurl:") {
                push_nonempty(&mut query.inurl, rest);
            } else if let Some(rest) = term.strip_prefix('#') {
                push_nonempty(&mut query.tags, rest);
            } else {
                push_nonempty(&mut query.words, &term);
            }
        }

        query
    }

    /// Whether the query filters nothing.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
            && self.intitle.is_empty()
            && self.author.is_empty()
            && self.inurl.is_empty()
            && self.tags.is_empty()
    }
}

/// Build a `LIKE` pattern matching `term` anywhere, escaping wildcards.
///
/// The pattern must be used with `ESCAPE '\'`.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_nonempty(terms: &mut Vec<String>, term: &str) {
    if !term.is_empty() {
        terms.push(term.to_string());
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Split on whitespace outside double quotes. Quotes are removed; an
/// unterminated quote runs to the end of the input.
fn tokenize(raw: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in raw.chars() {
        match c {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        terms.push(current);
    }

    terms
}
