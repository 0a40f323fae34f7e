//! Keyword-overlap document selection.
//!
//! A deliberately simple relevance filter: the query is split on
//! whitespace, and a document scores one point per distinct query token
//! that occurs anywhere in its content (case-sensitive substring match).
//! Ranking is stable, so equal scores keep their original order.

use crate::knowledge::Document;

/// Select up to `top_k` documents relevant to `query`.
///
/// - Documents scoring zero are dropped from the ranking.
/// - When nothing scores, the first `top_k` documents are returned in
///   their original order.
/// - An empty document list always yields an empty result.
pub fn select<'a>(documents: &'a [Document], query: &str, top_k: usize) -> Vec<&'a Document> {
    let mut tokens: Vec<&str> = query.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.dedup();

    let mut scored: Vec<(usize, &Document)> = documents
        .iter()
        .filter_map(|document| {
            let score = score(document, &tokens);
            (score > 0).then_some((score, document))
        })
        .collect();

    if scored.is_empty() {
        return documents.iter().take(top_k).collect();
    }

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(top_k)
        .map(|(_, document)| document)
        .collect()
}

/// Number of distinct tokens contained in the document.
fn score(document: &Document, tokens: &[&str]) -> usize {
    tokens
        .iter()
        .filter(|token| document.content.contains(**token))
        .count()
}
