//! Tag enrichment: problem/solution markers, technology keywords and
//! product mentions.

use std::collections::HashSet;

use novascan_core::Post;

use crate::heuristics::Heuristics;

pub const PROBLEM_TAG: &str = "problem";
pub const SOLUTION_TAG: &str = "solution";

/// Ordered, case-insensitively unique tag list.
struct TagSet {
    tags: Vec<String>,
    seen: HashSet<String>,
}

impl TagSet {
    fn new() -> Self {
        Self {
            tags: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn push(&mut self, tag: &str) {
        let lowered = tag.to_lowercase();
        if self.seen.insert(lowered.clone()) {
            self.tags.push(lowered);
        }
    }

    fn into_capped(mut self, cap: usize) -> Vec<String> {
        self.tags.truncate(cap);
        self.tags
    }
}

/// Compute the enriched tag list for a post.
///
/// Existing tags come first (lowercased, deduplicated), followed by
/// `problem`, `solution`, matched technology keywords and product mentions,
/// in that order. The result is capped at the configured maximum (20).
#[must_use]
pub fn extract_enhanced_tags(post: &Post, heuristics: &Heuristics) -> Vec<String> {
    let rules = &heuristics.tables().tags;
    let text = post.full_text().to_lowercase();
    let mentions = |keywords: &[String]| keywords.iter().any(|k| text.contains(&k.to_lowercase()));

    let mut tags = TagSet::new();
    for tag in &post.tags {
        tags.push(tag);
    }

    if mentions(&rules.problem) {
        tags.push(PROBLEM_TAG);
    }
    if mentions(&rules.solution) {
        tags.push(SOLUTION_TAG);
    }

    for keyword in &rules.technology {
        let keyword = keyword.to_lowercase();
        if text.contains(&keyword) {
            tags.push(&keyword.split_whitespace().collect::<Vec<_>>().join("-"));
        }
    }

    for product in extract_product_mentions(&text, heuristics) {
        tags.push(&product);
    }

    tags.into_capped(rules.max_tags)
}

/// Pull short product-name candidates out of lowercased text.
///
/// Each pattern's first capture group is a candidate; candidates no longer
/// than the minimum length are skipped. At most the configured number of
/// mentions (5) is returned, in pattern order.
#[must_use]
pub fn extract_product_mentions(text: &str, heuristics: &Heuristics) -> Vec<String> {
    let rules = &heuristics.tables().tags;
    heuristics
        .product_patterns
        .iter()
        .flat_map(|re| re.captures_iter(text))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|candidate| candidate.chars().count() > rules.min_product_len)
        .take(rules.max_product_mentions)
        .map(str::to_string)
        .collect()
}

/// Replace every post's tags with its enriched tag list.
#[must_use]
pub fn enrich_tags(mut posts: Vec<Post>, heuristics: &Heuristics) -> Vec<Post> {
    for post in &mut posts {
        post.tags = extract_enhanced_tags(post, heuristics);
    }
    posts
}
