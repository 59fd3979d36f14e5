use regex::Regex;
use std::sync::OnceLock;

/// Default reporting window in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 10;

fn days_pattern() -> &'static Regex {
    static DAYS: OnceLock<Regex> = OnceLock::new();
    DAYS.get_or_init(|| Regex::new(r"(\d+)\s+day").expect("days pattern compiles"))
}

/// Decides whether a listing's free-text age falls within the reporting
/// window. Job boards phrase age in coarse buckets ("Added 3 days ago",
/// "Posted today", "2 hours ago"), so this is an ordered substring
/// heuristic, not a timestamp comparison.
///
/// The matching is deliberately loose and carried over from the reference
/// rules unchanged: a stray "hour" or "today" anywhere in the card text
/// (a company named "24-hour support", say) counts as recent, and ages
/// phrased in unrecognized ways are excluded. Accepted approximation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecencyFilter {
    window_days: u32,
}

impl RecencyFilter {
    pub fn new(window_days: u32) -> Self {
        Self { window_days }
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// First match wins: "hour" and "today"/"yesterday" are always within
    /// the window; "<N> day" compares N against the window; anything else
    /// is out.
    pub fn within_window(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        if text.contains("hour") {
            return true;
        }
        if text.contains("today") || text.contains("yesterday") {
            return true;
        }
        match days_pattern().captures(&text) {
            Some(captures) => captures
                .get(1)
                .and_then(|days| days.as_str().parse::<u32>().ok())
                .map(|days| days <= self.window_days)
                .unwrap_or(false),
            None => false,
        }
    }
}

impl Default for RecencyFilter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_DAYS)
    }
}
