//! Cross-source deduplication by normalized URL and title.

use std::collections::HashMap;

use novascan_core::Post;

/// Normalized titles are truncated to this many characters.
const TITLE_KEY_LEN: usize = 100;

/// Normalize a URL into a dedup key.
///
/// Lowercases, drops the scheme and a leading `www.`, and strips any query
/// string or fragment. YouTube watch URLs keep their query because the video
/// id lives there.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let lowered = url.to_lowercase();
    let mut rest = lowered.trim();
    for scheme in ["https://", "http://"] {
        if let Some(stripped) = rest.strip_prefix(scheme) {
            rest = stripped;
            break;
        }
    }
    let rest = rest.strip_prefix("www.").unwrap_or(rest);

    if rest.contains("youtube.com/watch") {
        return rest.to_string();
    }

    match rest.find(['?', '#']) {
        Some(idx) => rest[..idx].to_string(),
        None => rest.to_string(),
    }
}

/// Normalize a title into a dedup key: lowercase, punctuation removed,
/// whitespace collapsed, at most 100 characters.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(TITLE_KEY_LEN)
        .collect()
}

/// Collapse posts that share a normalized URL or title.
///
/// Posts are processed in arrival order. When a post's URL key (checked
/// first) or title key already maps to a representative, the one with
/// strictly higher engagement wins and both of the winner's keys point at
/// it; ties keep the earlier post. Empty keys (no URL, or a title without
/// letters or digits) never match. Survivors are returned sorted by
/// engagement, highest first, with arrival order breaking ties.
///
/// Only the first matching representative is reconciled. A post whose URL
/// matches one survivor and whose title matches another leaves the second
/// one in place.
#[must_use]
pub fn deduplicate(posts: Vec<Post>) -> Vec<Post> {
    let input_len = posts.len();

    // Replaced representatives stay in `slots` so later lookups through
    // stale keys still compare against their engagement.
    let mut slots: Vec<Post> = Vec::with_capacity(input_len);
    let mut alive: Vec<bool> = Vec::with_capacity(input_len);
    let mut by_url: HashMap<String, usize> = HashMap::new();
    let mut by_title: HashMap<String, usize> = HashMap::new();

    for post in posts {
        let url_key = normalize_url(&post.url);
        let title_key = normalize_title(&post.title);

        let existing = lookup(&by_url, &url_key).or_else(|| lookup(&by_title, &title_key));

        if let Some(idx) = existing {
            if post.engagement() <= slots[idx].engagement() {
                continue;
            }
            alive[idx] = false;
        }

        let new_idx = slots.len();
        slots.push(post);
        alive.push(true);
        if !url_key.is_empty() {
            by_url.insert(url_key, new_idx);
        }
        if !title_key.is_empty() {
            by_title.insert(title_key, new_idx);
        }
    }

    let mut result: Vec<Post> = slots
        .into_iter()
        .zip(alive)
        .filter_map(|(post, keep)| keep.then_some(post))
        .collect();
    result.sort_by_key(|p| std::cmp::Reverse(p.engagement()));

    let removed = input_len - result.len();
    if removed > 0 {
        tracing::info!(
            removed,
            total = input_len,
            "removed duplicate posts"
        );
    }

    result
}

fn lookup(keys: &HashMap<String, usize>, key: &str) -> Option<usize> {
    if key.is_empty() {
        None
    } else {
        keys.get(key).copied()
    }
}
