use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Health,
    Family,
    Work,
    Spiritual,
    Praise,
    Other,
}

impl Category {
    pub fn all() -> Vec<Category> {
        vec![
            Category::Health,
            Category::Family,
            Category::Work,
            Category::Spiritual,
            Category::Praise,
            Category::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Family => "family",
            Category::Work => "work",
            Category::Spiritual => "spiritual",
            Category::Praise => "praise",
            Category::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Health => "Health",
            Category::Family => "Family",
            Category::Work => "Work",
            Category::Spiritual => "Spiritual",
            Category::Praise => "Praise",
            Category::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Health => "🏥",
            Category::Family => "👪",
            Category::Work => "💼",
            Category::Spiritual => "✝",
            Category::Praise => "🙌",
            Category::Other => "💭",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "health" => Ok(Category::Health),
            "family" => Ok(Category::Family),
            "work" => Ok(Category::Work),
            "spiritual" => Ok(Category::Spiritual),
            "praise" => Ok(Category::Praise),
            "other" => Ok(Category::Other),
            _ => Err(anyhow!("Unknown category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Praying,
    Answered,
    Archived,
}

impl RequestStatus {
    pub fn all() -> Vec<RequestStatus> {
        vec![
            RequestStatus::Praying,
            RequestStatus::Answered,
            RequestStatus::Archived,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Praying => "praying",
            RequestStatus::Answered => "answered",
            RequestStatus::Archived => "archived",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RequestStatus::Praying => "🙏",
            RequestStatus::Answered => "✅",
            RequestStatus::Archived => "📁",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "praying" => Ok(RequestStatus::Praying),
            "answered" => Ok(RequestStatus::Answered),
            "archived" => Ok(RequestStatus::Archived),
            _ => Err(anyhow!("Unknown status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerRequest {
    pub id: String,
    pub member_name: String,
    pub category: Category,
    pub details: String,
    pub date_added: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: RequestStatus,
    /// Marked for sharing with the group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<bool>,
}

impl PrayerRequest {
    /// Build the patch for moving this request to `status`.
    ///
    /// Answering stamps `answer_date` unless one is already recorded; any
    /// other status clears it.
    pub fn status_patch(&self, status: RequestStatus, now: DateTime<Utc>) -> RequestPatch {
        let answer_date = match status {
            RequestStatus::Answered if self.answer_date.is_none() => Some(Some(now)),
            RequestStatus::Answered => None,
            _ => Some(None),
        };
        RequestPatch {
            status: Some(status),
            answer_date,
            ..RequestPatch::default()
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlight == Some(true)
    }

    /// Case-insensitive match against member name, details and notes.
    pub fn mentions(&self, needle_lower: &str) -> bool {
        self.member_name.to_lowercase().contains(needle_lower)
            || self.details.to_lowercase().contains(needle_lower)
            || self
                .notes
                .as_deref()
                .map(|n| n.to_lowercase().contains(needle_lower))
                .unwrap_or(false)
    }
}

/// A request as entered, before it has an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRequest {
    pub member_name: String,
    pub category: Category,
    pub details: String,
    pub notes: Option<String>,
}

impl NewRequest {
    /// Trim the input and reject a blank member name or blank details.
    pub fn validated(
        member_name: &str,
        details: &str,
        category: Category,
        notes: Option<&str>,
    ) -> Result<Self> {
        let member_name = member_name.trim();
        let details = details.trim();
        if member_name.is_empty() || details.is_empty() {
            return Err(anyhow!(
                "Please provide both member name and prayer details"
            ));
        }
        let notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Ok(Self {
            member_name: member_name.to_string(),
            category,
            details: details.to_string(),
            notes,
        })
    }

    pub fn into_request(self, id: String, now: DateTime<Utc>) -> PrayerRequest {
        PrayerRequest {
            id,
            member_name: self.member_name,
            category: self.category,
            details: self.details,
            date_added: now,
            answer_date: None,
            notes: self.notes,
            status: RequestStatus::Praying,
            highlight: None,
        }
    }
}

/// Partial update. `None` leaves a field alone; for the optional fields
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestPatch {
    pub member_name: Option<String>,
    pub category: Option<Category>,
    pub details: Option<String>,
    pub notes: Option<Option<String>>,
    pub status: Option<RequestStatus>,
    pub answer_date: Option<Option<DateTime<Utc>>>,
    pub highlight: Option<Option<bool>>,
}

impl RequestPatch {
    pub fn is_empty(&self) -> bool {
        *self == RequestPatch::default()
    }

    pub fn apply_to(&self, request: &mut PrayerRequest) {
        if let Some(name) = &self.member_name {
            request.member_name = name.clone();
        }
        if let Some(category) = self.category {
            request.category = category;
        }
        if let Some(details) = &self.details {
            request.details = details.clone();
        }
        if let Some(notes) = &self.notes {
            request.notes = notes.clone();
        }
        if let Some(status) = self.status {
            request.status = status;
        }
        if let Some(answer_date) = self.answer_date {
            request.answer_date = answer_date;
        }
        if let Some(highlight) = self.highlight {
            request.highlight = highlight;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerData {
    pub requests: Vec<PrayerRequest>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl Default for PrayerData {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            members: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

impl PrayerData {
    /// Append `name` to the member list unless it is already there.
    pub fn register_member(&mut self, name: &str) -> bool {
        if self.members.iter().any(|m| m == name) {
            return false;
        }
        self.members.push(name.to_string());
        true
    }

    pub fn find(&self, id: &str) -> Option<&PrayerRequest> {
        self.requests.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> PrayerRequest {
        NewRequest::validated("Ruth", "Recovery after surgery", Category::Health, None)
            .unwrap()
            .into_request(
                "pr_1_abc".to_string(),
                Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            )
    }

    #[test]
    fn validated_trims_and_drops_blank_notes() {
        let req = NewRequest::validated("  Ruth ", " Job interview ", Category::Work, Some("   "))
            .unwrap();
        assert_eq!(req.member_name, "Ruth");
        assert_eq!(req.details, "Job interview");
        assert_eq!(req.notes, None);
    }

    #[test]
    fn validated_rejects_missing_fields() {
        assert!(NewRequest::validated("", "details", Category::Other, None).is_err());
        assert!(NewRequest::validated("Ruth", "  ", Category::Other, None).is_err());
    }

    #[test]
    fn answering_stamps_answer_date_once() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        let mut req = sample();

        let patch = req.status_patch(RequestStatus::Answered, now);
        patch.apply_to(&mut req);
        assert_eq!(req.status, RequestStatus::Answered);
        assert_eq!(req.answer_date, Some(now));

        let later = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        req.status_patch(RequestStatus::Answered, later).apply_to(&mut req);
        assert_eq!(req.answer_date, Some(now));

        req.status_patch(RequestStatus::Archived, later).apply_to(&mut req);
        assert_eq!(req.status, RequestStatus::Archived);
        assert_eq!(req.answer_date, None);
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut req = sample();
        let patch = RequestPatch {
            notes: Some(Some("Surgery went well".to_string())),
            ..RequestPatch::default()
        };
        patch.apply_to(&mut req);
        assert_eq!(req.notes.as_deref(), Some("Surgery went well"));
        assert_eq!(req.member_name, "Ruth");
        assert_eq!(req.details, "Recovery after surgery");
        assert_eq!(req.status, RequestStatus::Praying);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["memberName"], "Ruth");
        assert_eq!(json["category"], "health");
        assert_eq!(json["status"], "praying");
        assert!(json.get("dateAdded").is_some());
        assert!(json.get("answerDate").is_none());
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn parses_browser_style_timestamps() {
        let raw = r#"{
            "id": "pr_1700000000000_k3j2h1g0f",
            "memberName": "Ana",
            "category": "praise",
            "details": "New baby",
            "dateAdded": "2024-01-14T18:22:05.123Z",
            "status": "answered",
            "answerDate": "2024-01-20T08:00:00.000Z",
            "highlight": true
        }"#;
        let req: PrayerRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.category, Category::Praise);
        assert_eq!(req.highlight, Some(true));
        assert!(req.answer_date.is_some());
    }

    #[test]
    fn register_member_is_append_only() {
        let mut data = PrayerData::default();
        assert!(data.register_member("Ruth"));
        assert!(!data.register_member("Ruth"));
        assert!(data.register_member("ruth"));
        assert_eq!(data.members, vec!["Ruth", "ruth"]);
    }

    #[test]
    fn mentions_checks_notes_case_insensitively() {
        let mut req = sample();
        req.notes = Some("Pray for the Doctors".to_string());
        assert!(req.mentions("doctors"));
        assert!(req.mentions("ruth"));
        assert!(!req.mentions("family"));
    }
}
