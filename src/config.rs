/// User settings, persisted under the `settings` storage key
use crate::capture::SiteRule;
use serde::{Deserialize, Serialize};

/// Root settings object. Every section falls back to its defaults when absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: BoardSettings,
    pub capture: CaptureSettings,
}

impl Settings {
    /// Validates settings and returns a list of problems.
    /// Returns empty vec if settings are valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.board.inbox_limit == 0 {
            errors.push("inboxLimit must be at least 1".to_string());
        }

        if self.board.archive_limit == 0 {
            errors.push("archiveLimit must be at least 1".to_string());
        }

        if self.capture.title_separators.iter().any(|s| s.is_empty()) {
            errors.push("titleSeparators must not contain empty strings".to_string());
        }

        for rule in &self.capture.sites {
            if rule.title_selectors.is_empty() && rule.company_selectors.is_empty() {
                errors.push(format!("site rule '{}' has no selectors", rule.name));
            }
        }

        errors
    }

    /// Returns validated settings, replacing invalid values with defaults.
    pub fn with_defaults_for_invalid(&self) -> Self {
        let defaults = Self::default();

        let board = BoardSettings {
            inbox_limit: if self.board.inbox_limit == 0 {
                defaults.board.inbox_limit
            } else {
                self.board.inbox_limit
            },
            archive_limit: if self.board.archive_limit == 0 {
                defaults.board.archive_limit
            } else {
                self.board.archive_limit
            },
        };

        let mut capture = self.capture.clone();
        capture.title_separators.retain(|s| !s.is_empty());
        if capture.title_separators.is_empty() {
            capture.title_separators = defaults.capture.title_separators;
        }
        capture
            .sites
            .retain(|r| !(r.title_selectors.is_empty() && r.company_selectors.is_empty()));
        if capture.sites.is_empty() {
            capture.sites = defaults.capture.sites;
        }

        Self { board, capture }
    }
}

/// Column caps on the board
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardSettings {
    pub inbox_limit: usize,
    pub archive_limit: usize,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            inbox_limit: 10,
            archive_limit: 20,
        }
    }
}

/// Tuning for the capture heuristic
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureSettings {
    /// Wait after a navigation completes before probing the page
    pub navigation_delay_ms: u32,
    /// Site-chrome phrases that disqualify a short scraped title
    pub junk_phrases: Vec<String>,
    /// Titles longer than this are never treated as junk
    pub junk_max_len: usize,
    pub title_separators: Vec<String>,
    /// Hostnames of job boards, never used as a company name
    pub company_denylist: Vec<String>,
    pub sites: Vec<SiteRule>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            navigation_delay_ms: 1000,
            junk_phrases: vec!["LinkedIn".to_string(), "Top job picks".to_string()],
            junk_max_len: 40,
            title_separators: vec![" | ".to_string(), " - ".to_string()],
            company_denylist: vec![
                "linkedin".to_string(),
                "indeed".to_string(),
                "glassdoor".to_string(),
                "greenhouse".to_string(),
                "lever".to_string(),
            ],
            sites: SiteRule::defaults(),
        }
    }
}
