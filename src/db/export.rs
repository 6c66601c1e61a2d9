use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ImportError;
use crate::models::{PrayerData, PrayerRequest, RequestStatus};
use crate::utils::format::format_date;

/// Render the plain-text report, grouped by status.
///
/// Dates are shown in `tz`; `today` goes in the title line.
pub fn render_text_report<Tz: TimeZone>(data: &PrayerData, tz: &Tz, today: NaiveDate) -> String {
    let mut text = format!("Prayer Tracker Export - {}\n\n", format_date(today));

    for status in RequestStatus::all() {
        let requests: Vec<&PrayerRequest> = data
            .requests
            .iter()
            .filter(|r| r.status == status)
            .collect();
        if requests.is_empty() {
            continue;
        }

        text.push_str(&format!("{} REQUESTS:\n", status.as_str().to_uppercase()));
        text.push_str(&"=".repeat(20));
        text.push_str("\n\n");

        for request in requests {
            text.push_str(&format!("{} - {}\n", request.member_name, request.category));
            text.push_str(&format!("Added: {}\n", local_date(&request.date_added, tz)));
            text.push_str(&format!("Request: {}\n", request.details));
            if let Some(answered) = &request.answer_date {
                text.push_str(&format!("Answered: {}\n", local_date(answered, tz)));
            }
            if let Some(notes) = request.notes.as_deref().filter(|n| !n.is_empty()) {
                text.push_str(&format!("Notes: {}\n", notes));
            }
            text.push_str("\n---\n\n");
        }
    }

    text
}

fn local_date<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> String {
    format_date(at.with_timezone(tz).date_naive())
}

/// Validate an import blob and turn it into typed data.
///
/// Only the top-level shape and each request record are checked; members
/// are taken as given and `lastUpdated` falls back to now.
pub fn parse_import(raw: &str) -> Result<PrayerData, ImportError> {
    let value: Value = serde_json::from_str(raw).map_err(ImportError::Malformed)?;
    let object = value.as_object().ok_or(ImportError::NotAnObject)?;

    let requests = object
        .get("requests")
        .ok_or(ImportError::MissingRequests)?
        .as_array()
        .ok_or(ImportError::RequestsNotArray)?
        .iter()
        .enumerate()
        .map(|(index, record)| {
            PrayerRequest::deserialize(record)
                .map_err(|source| ImportError::InvalidRequest { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let members = match object.get("members") {
        None | Some(Value::Null) => Vec::new(),
        Some(members) => {
            Vec::<String>::deserialize(members).map_err(ImportError::InvalidMembers)?
        }
    };

    let last_updated = object
        .get("lastUpdated")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    Ok(PrayerData {
        requests,
        members,
        last_updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, NewRequest};

    fn request(id: &str, member: &str, status: RequestStatus) -> PrayerRequest {
        let mut req = NewRequest::validated(member, "Safe travels", Category::Family, None)
            .unwrap()
            .into_request(
                id.to_string(),
                Utc.with_ymd_and_hms(2024, 6, 2, 15, 0, 0).unwrap(),
            );
        req.status = status;
        req
    }

    #[test]
    fn report_groups_by_status_and_skips_empty_groups() {
        let mut answered = request("pr_2", "Beth", RequestStatus::Answered);
        answered.answer_date = Some(Utc.with_ymd_and_hms(2024, 6, 9, 10, 0, 0).unwrap());
        answered.notes = Some("Arrived home".to_string());

        let data = PrayerData {
            requests: vec![request("pr_1", "Abe", RequestStatus::Praying), answered],
            members: vec!["Abe".into(), "Beth".into()],
            last_updated: Utc::now(),
        };

        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let text = render_text_report(&data, &Utc, today);

        assert!(text.starts_with("Prayer Tracker Export - 6/10/2024\n\n"));
        assert!(text.contains("PRAYING REQUESTS:\n====================\n\nAbe - family\n"));
        assert!(text.contains("Added: 6/2/2024\n"));
        assert!(text.contains("Request: Safe travels\n"));
        assert!(text.contains("ANSWERED REQUESTS:"));
        assert!(text.contains("Answered: 6/9/2024\nNotes: Arrived home\n\n---\n\n"));
        assert!(!text.contains("ARCHIVED"));
        assert!(text.find("PRAYING").unwrap() < text.find("ANSWERED").unwrap());
    }

    #[test]
    fn import_rejects_wrong_shapes() {
        assert!(matches!(parse_import("not json"), Err(ImportError::Malformed(_))));
        assert!(matches!(parse_import("[]"), Err(ImportError::NotAnObject)));
        assert!(matches!(parse_import("{}"), Err(ImportError::MissingRequests)));
        assert!(matches!(
            parse_import(r#"{"requests": "not-an-array"}"#),
            Err(ImportError::RequestsNotArray)
        ));
        assert!(matches!(
            parse_import(r#"{"requests": [], "members": [1, 2]}"#),
            Err(ImportError::InvalidMembers(_))
        ));
    }

    #[test]
    fn import_reports_the_bad_record() {
        let raw = r#"{"requests": [
            {"id": "pr_1", "memberName": "A", "category": "work", "details": "x",
             "dateAdded": "2024-01-01T00:00:00.000Z", "status": "praying"},
            {"id": "pr_2", "memberName": "B", "category": "hobbies", "details": "y",
             "dateAdded": "2024-01-01T00:00:00.000Z", "status": "praying"}
        ]}"#;
        match parse_import(raw) {
            Err(ImportError::InvalidRequest { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn import_defaults_missing_members() {
        let data = parse_import(r#"{"requests": []}"#).unwrap();
        assert!(data.requests.is_empty());
        assert!(data.members.is_empty());
    }
}
