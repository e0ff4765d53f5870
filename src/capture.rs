/// Job capture heuristic: selector cascade, per-frame probe and reduction
///
/// The in-page probe only collects raw text (the user's selection plus the
/// text of the first element matching each selector). Everything that
/// decides what that text means happens here, on plain data:
///
/// 1. `SelectorCascade::for_url` orders selectors, site-specific rules first
/// 2. `probe_frame` picks a title/company per frame, first match wins
/// 3. `reduce_frames` picks one frame: selection > non-junk title > nothing
/// 4. `resolve_capture` post-processes and adds the URL/document fallbacks

use crate::config::CaptureSettings;
use crate::domain::{company_from_url, host_matches};
use crate::job::{JobDraft, TabInfo};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static FEED_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)top job picks for you").expect("valid noise regex"));

/// One entry of the selector cascade
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRule {
    pub name: String,
    /// Only applies on this host and its subdomains; `None` applies everywhere
    #[serde(default)]
    pub host_suffix: Option<String>,
    #[serde(default)]
    pub title_selectors: Vec<String>,
    #[serde(default)]
    pub company_selectors: Vec<String>,
}

impl SiteRule {
    fn new(name: &str, host_suffix: Option<&str>, titles: &[&str], companies: &[&str]) -> Self {
        SiteRule {
            name: name.to_string(),
            host_suffix: host_suffix.map(str::to_string),
            title_selectors: titles.iter().map(|s| s.to_string()).collect(),
            company_selectors: companies.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn defaults() -> Vec<SiteRule> {
        vec![
            SiteRule::new(
                "linkedin",
                Some("linkedin.com"),
                &[
                    ".job-details-jobs-unified-top-card__job-title",
                    ".jobs-unified-top-card__job-title",
                ],
                &[
                    ".job-details-jobs-unified-top-card__company-name",
                    ".jobs-unified-top-card__company-name",
                ],
            ),
            SiteRule::new("greenhouse", Some("greenhouse.io"), &[".app-title"], &[".company-name"]),
            SiteRule::new(
                "generic",
                None,
                &["[class*=\"job-title\"]", "h1"],
                &["[class*=\"company-name\"]", "a[href*=\"/company/\"]"],
            ),
        ]
    }

    fn is_generic(&self) -> bool {
        self.host_suffix.is_none()
    }

    fn applies_to(&self, url: &str) -> bool {
        match &self.host_suffix {
            Some(suffix) => host_matches(url, suffix),
            None => true,
        }
    }
}

/// Flattened, ordered selectors handed to the in-page probe
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorCascade {
    pub title_selectors: Vec<String>,
    pub company_selectors: Vec<String>,
}

impl SelectorCascade {
    /// Rules matching the page's host come first, generic rules last
    pub fn for_url(rules: &[SiteRule], url: &str) -> Self {
        let site_specific = rules.iter().filter(|r| !r.is_generic() && r.applies_to(url));
        let generic = rules.iter().filter(|r| r.is_generic());

        let mut cascade = SelectorCascade::default();
        for rule in site_specific.chain(generic) {
            cascade.title_selectors.extend(rule.title_selectors.iter().cloned());
            cascade.company_selectors.extend(rule.company_selectors.iter().cloned());
        }
        cascade
    }
}

/// Raw output of the in-page probe for one frame.
///
/// `title_matches[i]` is the text of the first element matching
/// `title_selectors[i]`, or `None` when nothing matched.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameSnapshot {
    #[serde(default)]
    pub selection: Option<String>,
    #[serde(default)]
    pub title_matches: Vec<Option<String>>,
    #[serde(default)]
    pub company_matches: Vec<Option<String>>,
}

/// One frame's answer from the bridge: a snapshot or the reason it failed
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    #[serde(default)]
    pub frame_id: i32,
    #[serde(default)]
    pub snapshot: Option<FrameSnapshot>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FrameReport {
    pub fn into_result(self) -> Result<FrameSnapshot, String> {
        match (self.snapshot, self.error) {
            (_, Some(error)) => Err(error),
            (Some(snapshot), None) => Ok(snapshot),
            (None, None) => Err(format!("frame {} returned no result", self.frame_id)),
        }
    }
}

/// A frame's best guess
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameResult {
    pub title: Option<String>,
    pub company: Option<String>,
    pub is_selection: bool,
}

fn first_match(matches: &[Option<String>]) -> Option<String> {
    matches
        .iter()
        .flatten()
        .map(|text| text.trim())
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// Decide what a single frame contributes
pub fn probe_frame(snapshot: &FrameSnapshot) -> FrameResult {
    if let Some(selection) = snapshot.selection.as_deref().map(str::trim) {
        if !selection.is_empty() {
            return FrameResult {
                title: Some(selection.to_string()),
                company: Some(String::new()),
                is_selection: true,
            };
        }
    }

    FrameResult {
        title: first_match(&snapshot.title_matches),
        company: first_match(&snapshot.company_matches),
        is_selection: false,
    }
}

/// Short titles containing a site-chrome phrase ("LinkedIn", feed headers)
pub fn is_junk_title(title: &str, settings: &CaptureSettings) -> bool {
    if title.chars().count() > settings.junk_max_len {
        return false;
    }
    let lowered = title.to_lowercase();
    settings
        .junk_phrases
        .iter()
        .any(|phrase| !phrase.is_empty() && lowered.contains(&phrase.to_lowercase()))
}

/// Pick one frame result: a selection wins outright, then the first
/// non-junk title, in frame order
pub fn reduce_frames<'a>(results: &'a [FrameResult], settings: &CaptureSettings) -> Option<&'a FrameResult> {
    if let Some(selected) = results.iter().find(|r| r.is_selection) {
        return Some(selected);
    }

    results.iter().find(|r| match r.title.as_deref() {
        Some(title) => !title.trim().is_empty() && !is_junk_title(title, settings),
        None => false,
    })
}

/// Cut a title at the earliest separator, dropping site suffix noise
pub fn truncate_at_separator(title: &str, separators: &[String]) -> String {
    let cut = separators
        .iter()
        .filter(|sep| !sep.is_empty())
        .filter_map(|sep| title.find(sep.as_str()))
        .min();

    match cut {
        Some(pos) if !title[..pos].trim().is_empty() => title[..pos].trim().to_string(),
        _ => title.trim().to_string(),
    }
}

/// Normalise an auto-scraped title
pub fn clean_title(raw: &str, settings: &CaptureSettings) -> String {
    let collapsed = WHITESPACE.replace_all(raw.trim(), " ");
    let truncated = truncate_at_separator(&collapsed, &settings.title_separators);
    FEED_NOISE.replace_all(&truncated, "").trim().to_string()
}

/// Where a guessed value came from
#[derive(Clone, Debug, PartialEq)]
pub enum Guess {
    /// Read from the page (or the user's selection)
    Scraped(String),
    /// Derived from the tab title or URL; only fills empty form fields
    Fallback(String),
}

impl Guess {
    pub fn value(&self) -> &str {
        match self {
            Guess::Scraped(v) | Guess::Fallback(v) => v,
        }
    }
}

/// Final outcome of a capture for one tab
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptureGuess {
    pub url: String,
    pub title: Option<Guess>,
    pub company: Option<Guess>,
    pub from_selection: bool,
}

impl CaptureGuess {
    /// Merge into the form, keeping user input where the guess is weak
    pub fn apply_to(&self, draft: &mut JobDraft) {
        draft.url = self.url.clone();

        match &self.title {
            Some(Guess::Scraped(title)) => draft.title = title.clone(),
            Some(Guess::Fallback(title)) if draft.title.is_empty() => draft.title = title.clone(),
            _ => {}
        }

        match &self.company {
            Some(Guess::Scraped(company)) => draft.company = company.clone(),
            Some(Guess::Fallback(company)) if draft.company.is_empty() => draft.company = company.clone(),
            _ => {}
        }
    }
}

/// Reduce all frame reports for `tab` into one guess.
///
/// Failed frames are logged and skipped.
pub fn resolve_capture(
    reports: Vec<Result<FrameSnapshot, String>>,
    tab: &TabInfo,
    settings: &CaptureSettings,
) -> CaptureGuess {
    let results: Vec<FrameResult> = reports
        .into_iter()
        .filter_map(|report| match report {
            Ok(snapshot) => Some(probe_frame(&snapshot)),
            Err(e) => {
                log::warn!("frame probe failed: {}", e);
                None
            }
        })
        .collect();

    let best = reduce_frames(&results, settings);
    log::debug!("{} frame results, best: {:?}", results.len(), best);

    let title = match best {
        Some(result) => result.title.as_deref().map(|t| {
            if result.is_selection {
                Guess::Scraped(t.trim().to_string())
            } else {
                Guess::Scraped(clean_title(t, settings))
            }
        }),
        None => Some(Guess::Fallback(clean_title(&tab.title, settings))),
    }
    .filter(|g| !g.value().is_empty());

    let scraped_company = best
        .and_then(|r| r.company.as_deref())
        .map(|c| WHITESPACE.replace_all(c.trim(), " ").to_string())
        .filter(|c| !c.is_empty());

    let company = match scraped_company {
        Some(company) => Some(Guess::Scraped(company)),
        None => company_from_url(&tab.url, &settings.company_denylist).map(Guess::Fallback),
    };

    CaptureGuess {
        url: tab.url.clone(),
        title,
        company,
        from_selection: best.is_some_and(|r| r.is_selection),
    }
}

/// What caused a capture to run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureTrigger {
    Initial,
    Refresh,
    Navigated,
    Activated,
}

impl CaptureTrigger {
    /// Client-side rendered pages need a moment after navigation completes
    pub fn delay_ms(self, settings: &CaptureSettings) -> u32 {
        match self {
            CaptureTrigger::Navigated => settings.navigation_delay_ms,
            _ => 0,
        }
    }
}

/// Monotonic capture counter so a slow, stale probe cannot overwrite a newer one
#[derive(Debug, Default)]
pub struct CaptureGenerations {
    latest: u64,
}

impl CaptureGenerations {
    pub fn start(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CaptureSettings {
        CaptureSettings::default()
    }

    fn scraped(title: &str) -> FrameResult {
        FrameResult {
            title: Some(title.to_string()),
            company: None,
            is_selection: false,
        }
    }

    fn selection(title: &str) -> FrameResult {
        FrameResult {
            title: Some(title.to_string()),
            company: Some(String::new()),
            is_selection: true,
        }
    }

    fn tab(url: &str, title: &str) -> TabInfo {
        TabInfo {
            id: Some(7),
            url: url.to_string(),
            title: title.to_string(),
        }
    }

    fn snapshot(titles: &[Option<&str>], companies: &[Option<&str>]) -> FrameSnapshot {
        FrameSnapshot {
            selection: None,
            title_matches: titles.iter().map(|t| t.map(str::to_string)).collect(),
            company_matches: companies.iter().map(|c| c.map(str::to_string)).collect(),
        }
    }

    #[test]
    fn test_cascade_site_specific_first() {
        let cascade = SelectorCascade::for_url(&SiteRule::defaults(), "https://www.linkedin.com/jobs/view/1");

        assert_eq!(cascade.title_selectors[0], ".job-details-jobs-unified-top-card__job-title");
        assert_eq!(cascade.title_selectors.last().map(String::as_str), Some("h1"));
        assert!(!cascade.title_selectors.contains(&".app-title".to_string()));
        assert_eq!(cascade.company_selectors.len(), 4);
    }

    #[test]
    fn test_cascade_unknown_site_is_generic_only() {
        let cascade = SelectorCascade::for_url(&SiteRule::defaults(), "https://www.spotify.com/jobs/123");

        assert_eq!(cascade.title_selectors, vec!["[class*=\"job-title\"]", "h1"]);
    }

    #[test]
    fn test_cascade_is_extendable() {
        let mut rules = SiteRule::defaults();
        rules.insert(0, SiteRule::new("lever", Some("lever.co"), &[".posting-headline h2"], &[]));

        let cascade = SelectorCascade::for_url(&rules, "https://jobs.lever.co/acme/1");
        assert_eq!(cascade.title_selectors[0], ".posting-headline h2");
    }

    #[test]
    fn test_probe_selection_wins() {
        let mut snap = snapshot(&[Some("Staff Engineer")], &[Some("Acme")]);
        snap.selection = Some("  Backend Engineer \n".to_string());

        let result = probe_frame(&snap);
        assert_eq!(result, selection("Backend Engineer"));
    }

    #[test]
    fn test_probe_first_non_empty_match() {
        let snap = snapshot(&[None, Some("  "), Some("Data Scientist"), Some("Page H1")], &[None, Some("Acme")]);

        let result = probe_frame(&snap);
        assert_eq!(result.title.as_deref(), Some("Data Scientist"));
        assert_eq!(result.company.as_deref(), Some("Acme"));
        assert!(!result.is_selection);
    }

    #[test]
    fn test_probe_no_match() {
        let mut snap = snapshot(&[None, None], &[None]);
        snap.selection = Some(String::new());

        assert_eq!(probe_frame(&snap), FrameResult::default());
    }

    #[test]
    fn test_reduce_selection_beats_scraped() {
        let results = vec![scraped("LinkedIn"), selection("Backend Engineer")];

        let best = reduce_frames(&results, &settings()).unwrap();
        assert_eq!(best.title.as_deref(), Some("Backend Engineer"));
    }

    #[test]
    fn test_reduce_skips_junk() {
        let results = vec![
            FrameResult::default(),
            scraped("LinkedIn"),
            scraped("Senior PM - Acme - job post"),
        ];

        let best = reduce_frames(&results, &settings()).unwrap();
        assert_eq!(best.title.as_deref(), Some("Senior PM - Acme - job post"));
        assert_eq!(clean_title(best.title.as_deref().unwrap(), &settings()), "Senior PM");
    }

    #[test]
    fn test_reduce_nothing_usable() {
        let results = vec![scraped("LinkedIn"), FrameResult::default()];
        assert!(reduce_frames(&results, &settings()).is_none());
        assert!(reduce_frames(&[], &settings()).is_none());
    }

    #[test]
    fn test_junk_only_applies_to_short_titles() {
        assert!(is_junk_title("linkedin", &settings()));
        assert!(is_junk_title("Top job picks for you", &settings()));
        assert!(!is_junk_title(
            "Senior Software Engineer, Growth Platform at LinkedIn Corporation",
            &settings()
        ));
        assert!(!is_junk_title("Product Designer", &settings()));
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("Product Designer | LinkedIn", &settings()), "Product Designer");
        assert_eq!(clean_title("  Data\n   Engineer  ", &settings()), "Data Engineer");
        assert_eq!(clean_title("Top job picks for you Rust Developer", &settings()), "Rust Developer");
        assert_eq!(clean_title("A | B - C", &settings()), "A");
        assert_eq!(clean_title("Designer - Acme | Careers", &settings()), "Designer");
    }

    #[test]
    fn test_truncate_keeps_title_when_prefix_empty() {
        let seps = vec!["|".to_string()];
        assert_eq!(truncate_at_separator("| Careers", &seps), "| Careers");
    }

    #[test]
    fn test_resolve_company_url_fallback() {
        let reports = vec![Ok(snapshot(&[None, None], &[None, None]))];

        let guess = resolve_capture(reports, &tab("https://www.spotify.com/jobs/123", "Spotify Jobs"), &settings());

        assert_eq!(guess.company, Some(Guess::Fallback("Spotify".to_string())));
        assert_eq!(guess.title, Some(Guess::Fallback("Spotify Jobs".to_string())));
    }

    #[test]
    fn test_resolve_selection_keeps_text_and_derives_company() {
        let mut snap = snapshot(&[Some("H1 text")], &[]);
        snap.selection = Some("Backend Engineer - Payments".to_string());

        let guess = resolve_capture(vec![Ok(snap)], &tab("https://acme.io/careers", "Careers"), &settings());

        assert!(guess.from_selection);
        assert_eq!(guess.title, Some(Guess::Scraped("Backend Engineer - Payments".to_string())));
        assert_eq!(guess.company, Some(Guess::Fallback("Acme".to_string())));
    }

    #[test]
    fn test_resolve_skips_failed_frames() {
        let reports = vec![
            Err("frame inaccessible".to_string()),
            Ok(snapshot(&[Some("Senior PM - Acme - job post")], &[Some("Acme Inc")])),
        ];

        let guess = resolve_capture(reports, &tab("https://www.linkedin.com/jobs/1", "LinkedIn"), &settings());

        assert_eq!(guess.title, Some(Guess::Scraped("Senior PM".to_string())));
        assert_eq!(guess.company, Some(Guess::Scraped("Acme Inc".to_string())));
    }

    #[test]
    fn test_resolve_denylisted_board_has_no_company() {
        let reports = vec![Ok(snapshot(&[Some("Rust Engineer")], &[None]))];

        let guess = resolve_capture(reports, &tab("https://www.linkedin.com/jobs/1", "LinkedIn"), &settings());

        assert_eq!(guess.company, None);
    }

    #[test]
    fn test_resolve_hosted_board_selection_has_no_company() {
        let mut snap = snapshot(&[None], &[None]);
        snap.selection = Some("Platform Engineer".to_string());

        let guess = resolve_capture(vec![Ok(snap)], &tab("https://boards.greenhouse.io/acme/jobs/42", "Job Application"), &settings());

        assert_eq!(guess.title, Some(Guess::Scraped("Platform Engineer".to_string())));
        assert_eq!(guess.company, None);
    }

    #[test]
    fn test_apply_to_scraped_overwrites() {
        let mut draft = JobDraft {
            title: "Old".to_string(),
            company: "Old Co".to_string(),
            ..JobDraft::default()
        };
        let guess = CaptureGuess {
            url: "https://acme.com/1".to_string(),
            title: Some(Guess::Scraped("New".to_string())),
            company: Some(Guess::Scraped("New Co".to_string())),
            from_selection: false,
        };

        guess.apply_to(&mut draft);

        assert_eq!(draft.title, "New");
        assert_eq!(draft.company, "New Co");
        assert_eq!(draft.url, "https://acme.com/1");
    }

    #[test]
    fn test_apply_to_fallback_only_fills_empty() {
        let mut draft = JobDraft {
            title: "Typed by user".to_string(),
            note: "keep me".to_string(),
            ..JobDraft::default()
        };
        let guess = CaptureGuess {
            url: "https://acme.com/1".to_string(),
            title: Some(Guess::Fallback("Tab title".to_string())),
            company: Some(Guess::Fallback("Acme".to_string())),
            from_selection: false,
        };

        guess.apply_to(&mut draft);

        assert_eq!(draft.title, "Typed by user");
        assert_eq!(draft.company, "Acme");
        assert_eq!(draft.note, "keep me");
    }

    #[test]
    fn test_frame_report_into_result() {
        let ok = FrameReport {
            frame_id: 0,
            snapshot: Some(FrameSnapshot::default()),
            error: None,
        };
        assert!(ok.into_result().is_ok());

        let failed = FrameReport {
            frame_id: 3,
            snapshot: None,
            error: Some("denied".to_string()),
        };
        assert_eq!(failed.into_result(), Err("denied".to_string()));

        let empty = FrameReport::default();
        assert!(empty.into_result().is_err());
    }

    #[test]
    fn test_trigger_delay() {
        assert_eq!(CaptureTrigger::Navigated.delay_ms(&settings()), 1000);
        assert_eq!(CaptureTrigger::Activated.delay_ms(&settings()), 0);
        assert_eq!(CaptureTrigger::Refresh.delay_ms(&settings()), 0);
    }

    #[test]
    fn test_capture_generations() {
        let mut generations = CaptureGenerations::default();
        let first = generations.start();
        let second = generations.start();

        assert!(!generations.is_current(first));
        assert!(generations.is_current(second));
    }
}
