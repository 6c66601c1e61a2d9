use anyhow::Result;
use std::str::FromStr;

use crate::models::{Category, PrayerRequest};

/// Search box plus the category and member pickers. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestFilter {
    pub search: String,
    pub category: Option<Category>,
    pub member: Option<String>,
}

impl RequestFilter {
    pub fn matches(&self, request: &PrayerRequest) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = request.mentions(&needle);
        let matches_category = self.category.is_none_or(|c| request.category == c);
        let matches_member = self
            .member
            .as_deref()
            .is_none_or(|m| request.member_name == m);

        matches_search && matches_category && matches_member
    }

    pub fn apply<'a>(&self, requests: &'a [PrayerRequest]) -> Vec<&'a PrayerRequest> {
        requests.iter().filter(|r| self.matches(r)).collect()
    }

    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.category.is_some() || self.member.is_some()
    }
}

/// Parse a category picker value; "all" clears the filter.
pub fn parse_category_filter(s: &str) -> Result<Option<Category>> {
    if s.eq_ignore_ascii_case("all") {
        Ok(None)
    } else {
        Category::from_str(s).map(Some)
    }
}

/// Only a lowercase "all" clears the filter, so a member named "All" stays
/// selectable.
pub fn parse_member_filter(s: &str) -> Option<String> {
    if s == "all" {
        None
    } else {
        Some(s.to_string())
    }
}
