//! Fuzzy search over lexicon entities
//!
//! Substring containment wins outright (score 1.0, with a highlight of the
//! first occurrence); otherwise a normalized Levenshtein similarity must
//! strictly exceed the acceptance threshold. Queries under three characters
//! never search — the gate lives here, not in the caller.
//!
//! Each call recomputes matches from scratch over the entity list; nothing is
//! retained between calls.

use std::cmp::Ordering;

use serde::Serialize;

use crate::lexicon::{DataGroup, LexiconClass, LexiconProperty, Relationship};

/// Queries shorter than this return no results
pub const MIN_QUERY_LEN: usize = 3;

/// Normalized similarity must strictly exceed 70/100
const FUZZY_THRESHOLD_NUM: usize = 70;
const FUZZY_THRESHOLD_DEN: usize = 100;

const MARK_OPEN: &str = "<mark>";
const MARK_CLOSE: &str = "</mark>";

/// What part of an entity a match came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Class,
    Property,
    Relationship,
}

/// A single match against one field of an entity
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    pub kind: MatchKind,
    /// Which field matched (e.g., "type", "first_name", "enum")
    pub field: String,
    /// The matched value
    pub value: String,
    /// Relevance in (0, 1]; substring matches score exactly 1.0
    pub score: f64,
    /// Pre-rendered highlight, only for substring matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<String>,
}

/// Outcome of a single query/target comparison
#[derive(Debug, Clone)]
pub struct MatchScore {
    pub score: f64,
    pub highlight: Option<String>,
}

/// A matched entity with its match annotations, transient per search
#[derive(Debug)]
pub struct SearchHit<'a, E> {
    pub entity: &'a E,
    pub matches: Vec<SearchMatch>,
    pub has_property_matches: bool,
    pub has_relationship_matches: bool,
}

impl<E> SearchHit<'_, E> {
    /// Best score across all matches; hits always carry at least one match
    pub fn best_score(&self) -> f64 {
        self.matches.iter().map(|m| m.score).fold(0.0, f64::max)
    }
}

/// An entity the search engine can rank
pub trait Searchable {
    fn type_name(&self) -> &str;
    fn collect_matches(&self, query: &str) -> Vec<SearchMatch>;
}

/// Rank entities against a free-text query.
///
/// Entities with zero matches are dropped. Order is descending by best match
/// score; ties keep encounter order (the sort is stable). The minimum-length
/// gate counts the query as given, whitespace included.
pub fn filter_for_search<'a, E: Searchable>(
    entities: &'a [E],
    query: &str,
) -> Vec<SearchHit<'a, E>> {
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit<'a, E>> = entities
        .iter()
        .filter_map(|entity| {
            let matches = entity.collect_matches(query);
            if matches.is_empty() {
                return None;
            }
            let has_property_matches = matches.iter().any(|m| m.kind == MatchKind::Property);
            let has_relationship_matches =
                matches.iter().any(|m| m.kind == MatchKind::Relationship);
            Some(SearchHit {
                entity,
                matches,
                has_property_matches,
                has_relationship_matches,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.best_score()
            .partial_cmp(&a.best_score())
            .unwrap_or(Ordering::Equal)
    });
    hits
}

/// Compare a query against a single target string.
///
/// Substring containment (case-insensitive) is an automatic match with score
/// 1.0 and a `<mark>`-wrapped highlight preserving the target's casing.
/// Otherwise the normalized Levenshtein similarity must strictly exceed 0.70;
/// the boundary comparison is done in integers so exactly 0.70 never matches.
pub fn fuzzy_match(query: &str, target: &str) -> Option<MatchScore> {
    if query.is_empty() || target.is_empty() {
        return None;
    }

    if let Some((start, end)) = find_case_insensitive(target, query) {
        let highlight = format!(
            "{}{}{}{}{}",
            &target[..start],
            MARK_OPEN,
            &target[start..end],
            MARK_CLOSE,
            &target[end..]
        );
        return Some(MatchScore {
            score: 1.0,
            highlight: Some(highlight),
        });
    }

    let q: Vec<char> = query.to_lowercase().chars().collect();
    let t: Vec<char> = target.to_lowercase().chars().collect();
    let max_len = q.len().max(t.len());
    let dist = levenshtein(&q, &t);

    // similarity > 70/100  <=>  den*(max-dist) > num*max
    if FUZZY_THRESHOLD_DEN * (max_len - dist) > FUZZY_THRESHOLD_NUM * max_len {
        Some(MatchScore {
            score: 1.0 - dist as f64 / max_len as f64,
            highlight: None,
        })
    } else {
        None
    }
}

/// Byte range of the first case-insensitive occurrence of `query` in
/// `target`. The walk stays on the original target's byte offsets, so
/// characters whose lowercase form expands (e.g. 'İ') cannot skew the span.
fn find_case_insensitive(target: &str, query: &str) -> Option<(usize, usize)> {
    let query_lower: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if query_lower.is_empty() {
        return None;
    }

    for (start, _) in target.char_indices() {
        let mut qi = 0;
        for (offset, ch) in target[start..].char_indices() {
            let mut matched = true;
            for lc in ch.to_lowercase() {
                if qi == query_lower.len() {
                    break;
                }
                if lc != query_lower[qi] {
                    matched = false;
                    break;
                }
                qi += 1;
            }
            if !matched {
                break;
            }
            if qi == query_lower.len() {
                return Some((start, start + offset + ch.len_utf8()));
            }
        }
    }
    None
}

/// Classic single-character insert/delete/substitute edit distance
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn match_value(
    kind: MatchKind,
    field: &str,
    value: &str,
    query: &str,
    out: &mut Vec<SearchMatch>,
) {
    if let Some(scored) = fuzzy_match(query, value) {
        out.push(SearchMatch {
            kind,
            field: field.to_string(),
            value: scored.highlight.clone().unwrap_or_else(|| value.to_string()),
            score: scored.score,
            highlighted: scored.highlight,
        });
    }
}

fn match_property(name: &str, prop: &LexiconProperty, query: &str, out: &mut Vec<SearchMatch>) {
    match_value(MatchKind::Property, "name", name, query, out);
    if let Some(type_field) = &prop.type_field {
        for kind in type_field.kinds() {
            match_value(MatchKind::Property, name, kind, query, out);
        }
    }
    if let Some(comment) = &prop.comment {
        match_value(MatchKind::Property, name, comment, query, out);
    }
    if let Some(values) = &prop.enum_values {
        for value in values.iter().flatten() {
            match_value(MatchKind::Property, name, value, query, out);
        }
    }
}

fn match_relationship(name: &str, rel: &Relationship, query: &str, out: &mut Vec<SearchMatch>) {
    match_value(MatchKind::Relationship, "name", name, query, out);
    for target in &rel.targets {
        match_value(MatchKind::Relationship, name, target, query, out);
    }
    if let Some(comment) = &rel.comment {
        match_value(MatchKind::Relationship, name, comment, query, out);
    }
}

impl Searchable for LexiconClass {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn collect_matches(&self, query: &str) -> Vec<SearchMatch> {
        let mut out = Vec::new();
        match_value(MatchKind::Class, "type", &self.type_name, query, &mut out);
        for (name, prop) in self.active_properties() {
            match_property(name, prop, query, &mut out);
        }
        for (name, rel) in self.active_relationships() {
            match_relationship(name, rel, query, &mut out);
        }
        out
    }
}

impl Searchable for DataGroup {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn collect_matches(&self, query: &str) -> Vec<SearchMatch> {
        let mut out = Vec::new();
        match_value(MatchKind::Class, "type", &self.type_name, query, &mut out);
        for (name, prop) in self.active_properties() {
            match_property(name, prop, query, &mut out);
        }
        out
    }
}
