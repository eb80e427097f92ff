//! Heuristic tables used by the analyzers and enrichment stages.
//!
//! [`HeuristicTables`] is plain data that can be loaded from YAML and tuned
//! without touching control flow. [`Heuristics`] is the compiled form the
//! stages consume: word sets normalized for lookup and regex patterns built
//! once up front.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentLexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    /// Double the weight of the following token.
    pub intensifiers: Vec<String>,
    /// Invert the polarity of the following token.
    pub negations: Vec<String>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self {
            positive: words(&[
                "good", "great", "excellent", "amazing", "awesome", "fantastic", "wonderful",
                "love", "best", "perfect", "happy", "thanks", "thank", "solved", "working",
                "success", "useful", "helpful", "easy", "simple", "better", "improved",
                "innovative", "excited", "brilliant", "outstanding", "recommend", "win",
            ]),
            negative: words(&[
                "bad", "terrible", "awful", "horrible", "worst", "hate", "sucks", "poor",
                "broken", "fail", "failed", "error", "bug", "issue", "problem", "struggling",
                "frustrated", "annoying", "difficult", "hard", "impossible", "slow",
                "confusing", "complicated", "useless", "waste", "disappointed", "wrong",
            ]),
            intensifiers: words(&["very", "really", "extremely", "absolutely", "totally"]),
            negations: words(&[
                "not", "no", "never", "none", "nobody", "nothing", "don't", "doesn't", "didn't",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpamRules {
    /// Regexes that each count as one spam indicator when they match.
    pub patterns: Vec<String>,
    /// A run of this many identical characters counts as one indicator.
    pub repeated_char_run: usize,
    /// Links beyond this count add one indicator each.
    pub max_links: usize,
    pub max_link_penalty: usize,
    pub max_emoji: usize,
    /// Texts shorter than this many words are length outliers.
    pub min_words: usize,
    /// Texts longer than this with no line break are length outliers.
    pub max_words_without_breaks: usize,
}

impl Default for SpamRules {
    fn default() -> Self {
        Self {
            patterns: words(&[
                r"(?i)\b(buy now|click here|limited time|act now|free money|earn \$|make money fast)\b",
                r"(?i)\b(viagra|casino|lottery|prize|winner)\b",
                r"!!!",
            ]),
            repeated_char_run: 5,
            max_links: 3,
            max_link_penalty: 3,
            max_emoji: 5,
            min_words: 10,
            max_words_without_breaks: 500,
        }
    }
}

/// One topic bucket for domain classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainBucket {
    pub name: String,
    pub keywords: Vec<String>,
}

fn bucket(name: &str, keywords: &[&str]) -> DomainBucket {
    DomainBucket {
        name: name.to_string(),
        keywords: words(keywords),
    }
}

fn default_domains() -> Vec<DomainBucket> {
    vec![
        bucket(
            "remote_work",
            &["remote", "work from home", "wfh", "distributed", "async", "remote team"],
        ),
        bucket(
            "saas",
            &["saas", "subscription", "b2b", "software as a service", "cloud"],
        ),
        bucket(
            "ai_tools",
            &["ai", "machine learning", "gpt", "llm", "chatbot", "artificial intelligence"],
        ),
        bucket(
            "developer_tools",
            &["api", "sdk", "cli", "developer", "code", "github", "programming"],
        ),
        bucket(
            "productivity",
            &["productivity", "workflow", "automation", "efficiency", "task management"],
        ),
        bucket(
            "marketing",
            &["marketing", "seo", "content", "social media", "email marketing", "growth"],
        ),
        bucket(
            "ecommerce",
            &["ecommerce", "shopify", "online store", "dropshipping", "marketplace"],
        ),
        bucket(
            "fintech",
            &["fintech", "banking", "payment", "crypto", "blockchain", "finance"],
        ),
        bucket(
            "health_tech",
            &["health", "medical", "healthcare", "fitness", "wellness", "mental health"],
        ),
        bucket(
            "education",
            &["education", "learning", "course", "teaching", "student", "edtech"],
        ),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagRules {
    pub problem: Vec<String>,
    pub solution: Vec<String>,
    /// Each match becomes its own tag, spaces replaced with hyphens.
    pub technology: Vec<String>,
    /// Regexes with one capture group naming a product.
    pub product_patterns: Vec<String>,
    pub max_product_mentions: usize,
    /// Captured product tokens must be longer than this.
    pub min_product_len: usize,
    pub max_tags: usize,
}

impl Default for TagRules {
    fn default() -> Self {
        Self {
            problem: words(&[
                "problem", "issue", "challenge", "difficult", "struggle", "pain", "frustration",
                "broken", "slow", "expensive", "waste", "inefficient", "annoying", "confusing",
                "lacking", "missing", "need", "want", "wish", "hope", "better", "improve",
            ]),
            solution: words(&[
                "solution", "tool", "app", "platform", "service", "software", "product",
                "alternative", "replacement", "instead", "better than", "competitor",
            ]),
            technology: words(&[
                "ai", "ml", "machine learning", "saas", "api", "sdk", "cloud", "mobile", "web",
                "desktop", "automation", "analytics", "data", "remote", "virtual", "distributed",
                "async", "realtime",
            ]),
            product_patterns: words(&[
                r"using (\w+)",
                r"with (\w+)",
                r"(\w+) is",
                r"(\w+) has",
                r"alternative to (\w+)",
                r"instead of (\w+)",
            ]),
            max_product_mentions: 5,
            min_product_len: 3,
            max_tags: 20,
        }
    }
}

/// Every tunable table, in the shape of the YAML override file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicTables {
    pub sentiment: SentimentLexicon,
    pub spam: SpamRules,
    /// Declaration order breaks classification ties.
    pub domains: Vec<DomainBucket>,
    pub tags: TagRules,
}

impl Default for HeuristicTables {
    fn default() -> Self {
        Self {
            sentiment: SentimentLexicon::default(),
            spam: SpamRules::default(),
            domains: default_domains(),
            tags: TagRules::default(),
        }
    }
}

/// Compiled heuristic tables.
#[derive(Debug, Clone)]
pub struct Heuristics {
    tables: HeuristicTables,
    pub(crate) positive: HashSet<String>,
    pub(crate) negative: HashSet<String>,
    pub(crate) intensifiers: HashSet<String>,
    pub(crate) negations: HashSet<String>,
    pub(crate) spam_patterns: Vec<Regex>,
    pub(crate) product_patterns: Vec<Regex>,
}

impl Heuristics {
    /// Compile a set of tables.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidPattern`] if a spam or product regex
    /// does not compile.
    pub fn new(tables: HeuristicTables) -> Result<Self, PipelineError> {
        let word_set = |list: &[String]| -> HashSet<String> {
            list.iter()
                .map(|w| normalize_token(&w.to_lowercase()))
                .filter(|w| !w.is_empty())
                .collect()
        };

        let compile = |patterns: &[String]| -> Result<Vec<Regex>, PipelineError> {
            patterns
                .iter()
                .map(|p| {
                    Regex::new(p).map_err(|source| PipelineError::InvalidPattern {
                        pattern: p.clone(),
                        source,
                    })
                })
                .collect()
        };

        Ok(Self {
            positive: word_set(&tables.sentiment.positive),
            negative: word_set(&tables.sentiment.negative),
            intensifiers: word_set(&tables.sentiment.intensifiers),
            negations: word_set(&tables.sentiment.negations),
            spam_patterns: compile(&tables.spam.patterns)?,
            product_patterns: compile(&tables.tags.product_patterns)?,
            tables,
        })
    }

    /// Parse and compile tables from a YAML document. Missing sections keep
    /// their built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::HeuristicsParse`] on malformed YAML, or
    /// [`PipelineError::InvalidPattern`] on a bad regex.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PipelineError> {
        let tables: HeuristicTables = serde_yaml::from_str(yaml)?;
        Self::new(tables)
    }

    /// Load and compile tables from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::HeuristicsIo`] if the file cannot be read,
    /// otherwise the same errors as [`Heuristics::from_yaml_str`].
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::HeuristicsIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    #[must_use]
    pub fn tables(&self) -> &HeuristicTables {
        &self.tables
    }
}

impl Default for Heuristics {
    fn default() -> Self {
        Self::new(HeuristicTables::default()).expect("built-in heuristic patterns compile")
    }
}

/// Strip everything but ASCII word characters, mirroring how lexicon tokens
/// are compared (`"great!"` -> `"great"`, `"don't"` -> `"dont"`).
pub(crate) fn normalize_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}
