use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc, Weekday};
use std::str::FromStr;

use crate::models::{Category, PrayerRequest, RequestStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    ThisWeek,
    Praying,
    Answered,
    Praises,
    Archived,
}

impl Tab {
    pub fn all() -> [Tab; 5] {
        [
            Tab::ThisWeek,
            Tab::Praying,
            Tab::Answered,
            Tab::Praises,
            Tab::Archived,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::ThisWeek => "this-week",
            Tab::Praying => "praying",
            Tab::Answered => "answered",
            Tab::Praises => "praises",
            Tab::Archived => "archived",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::ThisWeek => "This Week",
            Tab::Praying => "Praying",
            Tab::Answered => "Answered",
            Tab::Praises => "Praises",
            Tab::Archived => "Archived",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            Tab::ThisWeek => "No new requests this week",
            Tab::Praying => "No active prayer requests",
            Tab::Answered => "No answered prayers yet",
            Tab::Praises => "No praises to share yet",
            Tab::Archived => "No archived requests",
        }
    }

    /// Praises overlaps with Answered: an answered request shows in both.
    pub fn includes(&self, request: &PrayerRequest, week_start: DateTime<Utc>) -> bool {
        match self {
            Tab::ThisWeek => {
                request.status == RequestStatus::Praying && request.date_added >= week_start
            }
            Tab::Praying => request.status == RequestStatus::Praying,
            Tab::Answered => request.status == RequestStatus::Answered,
            Tab::Praises => {
                request.category == Category::Praise || request.status == RequestStatus::Answered
            }
            Tab::Archived => request.status == RequestStatus::Archived,
        }
    }

    pub fn next(&self) -> Tab {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| t == self).unwrap_or(0);
        tabs[(idx + 1) % tabs.len()]
    }

    pub fn prev(&self) -> Tab {
        let tabs = Tab::all();
        let idx = tabs.iter().position(|t| t == self).unwrap_or(0);
        tabs[(idx + tabs.len() - 1) % tabs.len()]
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tab {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', ' '], "-").as_str() {
            "this-week" | "week" => Ok(Tab::ThisWeek),
            "praying" => Ok(Tab::Praying),
            "answered" => Ok(Tab::Answered),
            "praises" | "praise" => Ok(Tab::Praises),
            "archived" => Ok(Tab::Archived),
            _ => Err(anyhow!(
                "Unknown tab '{}'. Use: this-week, praying, answered, praises, archived",
                s
            )),
        }
    }
}

/// The filtered list split into tabs.
#[derive(Debug, Clone, Default)]
pub struct RequestGroups<'a> {
    pub this_week: Vec<&'a PrayerRequest>,
    pub praying: Vec<&'a PrayerRequest>,
    pub answered: Vec<&'a PrayerRequest>,
    pub praises: Vec<&'a PrayerRequest>,
    pub archived: Vec<&'a PrayerRequest>,
}

impl<'a> RequestGroups<'a> {
    pub fn build(requests: &[&'a PrayerRequest], week_start: DateTime<Utc>) -> Self {
        let pick = |tab: Tab| -> Vec<&'a PrayerRequest> {
            requests
                .iter()
                .copied()
                .filter(|r| tab.includes(r, week_start))
                .collect()
        };
        Self {
            this_week: pick(Tab::ThisWeek),
            praying: pick(Tab::Praying),
            answered: pick(Tab::Answered),
            praises: pick(Tab::Praises),
            archived: pick(Tab::Archived),
        }
    }

    pub fn get(&self, tab: Tab) -> &[&'a PrayerRequest] {
        match tab {
            Tab::ThisWeek => &self.this_week,
            Tab::Praying => &self.praying,
            Tab::Answered => &self.answered,
            Tab::Praises => &self.praises,
            Tab::Archived => &self.archived,
        }
    }
}

/// First day of the week containing `date`.
pub fn week_start_date(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let back = (date.weekday().num_days_from_sunday() + 7 - first_day.num_days_from_sunday()) % 7;
    date - Duration::days(back as i64)
}

/// Midnight at the start of the current week, in `tz`.
pub fn week_start_in<Tz: TimeZone>(now: &DateTime<Tz>, first_day: Weekday) -> DateTime<Utc> {
    let start = week_start_date(now.date_naive(), first_day);
    let midnight = start.and_hms_opt(0, 0, 0).unwrap_or_default();
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

pub fn current_week_start(first_day: Weekday) -> DateTime<Utc> {
    week_start_in(&Local::now(), first_day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewRequest;

    fn req_at(category: Category, added: DateTime<Utc>) -> PrayerRequest {
        NewRequest::validated("Ruth", "Healing", category, None)
            .unwrap()
            .into_request("pr_1".to_string(), added)
    }

    #[test]
    fn week_start_respects_first_day() {
        // 2024-06-12 is a Wednesday
        let wed = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        assert_eq!(
            week_start_date(wed, Weekday::Sun),
            NaiveDate::from_ymd_opt(2024, 6, 9).unwrap()
        );
        assert_eq!(
            week_start_date(wed, Weekday::Mon),
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        );
        assert_eq!(week_start_date(wed, Weekday::Wed), wed);
    }

    #[test]
    fn week_start_is_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 6, 12, 17, 45, 0).unwrap();
        assert_eq!(
            week_start_in(&now, Weekday::Sun),
            Utc.with_ymd_and_hms(2024, 6, 9, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn new_praying_request_is_in_this_week_and_praying() {
        let now = Utc.with_ymd_and_hms(2024, 6, 12, 9, 0, 0).unwrap();
        let week_start = week_start_in(&now, Weekday::Sun);
        let mut request = req_at(Category::Health, now);

        let list = [&request];
        let groups = RequestGroups::build(&list, week_start);
        assert_eq!(groups.this_week.len(), 1);
        assert_eq!(groups.praying.len(), 1);
        assert!(groups.archived.is_empty());

        request.status = RequestStatus::Archived;
        let list = [&request];
        let groups = RequestGroups::build(&list, week_start);
        assert!(groups.this_week.is_empty());
        assert!(groups.praying.is_empty());
        assert_eq!(groups.archived.len(), 1);
    }

    #[test]
    fn request_from_last_week_is_not_this_week() {
        let now = Utc.with_ymd_and_hms(2024, 6, 12, 9, 0, 0).unwrap();
        let week_start = week_start_in(&now, Weekday::Sun);
        let old = req_at(Category::Health, Utc.with_ymd_and_hms(2024, 6, 8, 23, 59, 0).unwrap());
        assert!(!Tab::ThisWeek.includes(&old, week_start));
        assert!(Tab::Praying.includes(&old, week_start));
    }

    #[test]
    fn praise_category_is_a_praise_while_praying() {
        let now = Utc::now();
        let request = req_at(Category::Praise, now);
        assert!(Tab::Praises.includes(&request, now));
        assert!(!Tab::Answered.includes(&request, now));
    }

    #[test]
    fn answered_shows_in_answered_and_praises() {
        let now = Utc::now();
        let mut request = req_at(Category::Work, now);
        request.status = RequestStatus::Answered;

        let list = [&request];
        let groups = RequestGroups::build(&list, now);
        assert_eq!(groups.answered.len(), 1);
        assert_eq!(groups.praises.len(), 1);
        assert!(groups.praying.is_empty());
    }

    #[test]
    fn live_clock_request_added_now_is_this_week() {
        let request = req_at(Category::Other, Utc::now());
        assert!(Tab::ThisWeek.includes(&request, current_week_start(Weekday::Sun)));
    }

    #[test]
    fn tab_cycles_and_parses() {
        assert_eq!(Tab::Archived.next(), Tab::ThisWeek);
        assert_eq!(Tab::ThisWeek.prev(), Tab::Archived);
        assert_eq!("this_week".parse::<Tab>().unwrap(), Tab::ThisWeek);
        assert_eq!("Praises".parse::<Tab>().unwrap(), Tab::Praises);
        assert!("later".parse::<Tab>().is_err());
    }
}
