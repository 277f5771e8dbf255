//! Fetch request model shared by all source adapters.

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Parameters of a single fetch against a preprint source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Category filter or query terms (source-specific semantics)
    pub categories: Vec<String>,

    /// Maximum number of papers to return
    pub limit: usize,

    /// Lookback window in days
    pub days_back: u32,

    /// OR-matched keyword filter over title and abstract
    pub keywords: Vec<String>,

    /// Reference date the lookback window ends on
    pub today: NaiveDate,
}

impl Default for FetchRequest {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            limit: 10,
            days_back: 1,
            keywords: Vec::new(),
            today: Utc::now().date_naive(),
        }
    }
}

impl FetchRequest {
    /// Create a request for `limit` papers
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    /// Set the lookback window
    pub fn days_back(mut self, days: u32) -> Self {
        self.days_back = days;
        self
    }

    /// Set the category filter
    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set the keyword filter
    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Pin the reference date
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// First day of the lookback window, saturating at the earliest date
    pub fn window_start(&self) -> NaiveDate {
        self.today
            .checked_sub_days(Days::new(u64::from(self.days_back)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Whether `date` falls inside `[today - days_back, today]`
    pub fn in_window(&self, date: NaiveDate) -> bool {
        date >= self.window_start() && date <= self.today
    }

    /// Whether a keyword filter was requested
    pub fn has_keywords(&self) -> bool {
        !self.keywords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_inclusive() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let request = FetchRequest::new(5).days_back(2).today(today);

        assert_eq!(request.window_start(), NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
        assert!(request.in_window(today));
        assert!(request.in_window(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()));
        assert!(!request.in_window(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()));
        assert!(!request.in_window(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()));
    }

    #[test]
    fn test_zero_day_window() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let request = FetchRequest::new(5).days_back(0).today(today);
        assert_eq!(request.window_start(), today);
        assert!(request.in_window(today));
    }

    #[test]
    fn test_huge_window_saturates() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        let request = FetchRequest::new(5).days_back(u32::MAX).today(today);
        assert_eq!(request.window_start(), NaiveDate::MIN);
        assert!(request.in_window(today));
        assert!(request.in_window(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()));
        assert!(!request.in_window(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()));

        let request = FetchRequest::new(5).days_back(100_000_000).today(today);
        assert!(request.in_window(today));
    }
}
