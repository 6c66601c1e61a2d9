use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, Utc, Weekday};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::AppConfig;
use crate::db::{KvStore, PrayerStorage};
use crate::models::{Category, NewRequest, PrayerRequest, RequestPatch, RequestStats, RequestStatus};
use crate::utils::format::{format_short, plural, progress_bar, truncate};
use crate::views::{
    current_week_start, parse_category_filter, parse_member_filter, RequestFilter, RequestGroups,
    Tab,
};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const BLUE: &str = "\x1b[38;2;96;140;196m";

fn status_color(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Praying => BLUE,
        RequestStatus::Answered => GREEN,
        RequestStatus::Archived => DIM,
    }
}

// ─── Add ─────────────────────────────────────────────────────────────────────

pub fn handle_add<S: KvStore>(
    storage: &PrayerStorage<S>,
    config: &AppConfig,
    member: &str,
    details: &str,
    category: Option<&str>,
    notes: Option<&str>,
) -> Result<PrayerRequest> {
    let category = match category {
        Some(c) => Category::from_str(c).map_err(|_| {
            anyhow!(
                "Unknown category '{}'. Use: health, family, work, spiritual, praise, other",
                c
            )
        })?,
        None => config.tracker.default_category()?,
    };
    let new_request = NewRequest::validated(member, details, category, notes)?;
    let request = storage.add_request(new_request);

    println_colored!(
        GREEN,
        "  ✓ Prayer request for {} has been added ({})",
        request.member_name,
        request.id
    );
    Ok(request)
}

// ─── List ────────────────────────────────────────────────────────────────────

pub fn handle_list<S: KvStore>(
    storage: &PrayerStorage<S>,
    config: &AppConfig,
    tab: &str,
    search: Option<&str>,
    category: &str,
    member: &str,
) -> Result<()> {
    let tab = Tab::from_str(tab)?;
    let filter = RequestFilter {
        search: search.unwrap_or_default().to_string(),
        category: parse_category_filter(category)?,
        member: parse_member_filter(member),
    };
    let week_start = current_week_start(first_weekday(config));

    let data = storage.get_data();
    let filtered = filter.apply(&data.requests);
    let groups = RequestGroups::build(&filtered, week_start);
    let shown = groups.get(tab);

    println!();
    println_colored!(
        BOLD,
        "  {}  ({})",
        tab.title(),
        plural(shown.len(), "request")
    );
    if filter.is_active() {
        println_colored!(DIM, "  {} match the filter", plural(filtered.len(), "result"));
    }
    println!();

    if shown.is_empty() {
        println_colored!(DIM, "  {}", tab.empty_message());
        println!();
        return Ok(());
    }

    for request in shown {
        print_request(request);
    }
    Ok(())
}

fn print_request(request: &PrayerRequest) {
    let mark = if request.is_highlighted() { " ★" } else { "" };
    println_colored!(
        status_color(request.status),
        "  {} {}{}  ·  {} {}  ·  {}",
        request.status.icon(),
        request.member_name,
        mark,
        request.category.icon(),
        request.category.display_name(),
        request.status
    );
    println!("    {}", truncate(&request.details, 72));
    if let Some(notes) = &request.notes {
        println_colored!(DIM, "    Notes: {}", truncate(notes, 65));
    }
    let mut dates = format!("Added {}", format_short(&request.date_added));
    if let Some(answered) = &request.answer_date {
        dates.push_str(&format!("  ·  Answered {}", format_short(answered)));
    }
    println_colored!(DIM, "    {}  ·  {}", dates, request.id);
    println!();
}

// ─── Edit ────────────────────────────────────────────────────────────────────

pub struct EditArgs<'a> {
    pub member: Option<&'a str>,
    pub category: Option<&'a str>,
    pub details: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub clear_notes: bool,
    pub status: Option<&'a str>,
    pub highlight: Option<bool>,
}

/// Turn edit flags into a patch against `current`.
pub fn build_edit_patch(current: &PrayerRequest, args: &EditArgs) -> Result<RequestPatch> {
    let mut patch = match args.status {
        Some(s) => current.status_patch(RequestStatus::from_str(s)?, Utc::now()),
        None => RequestPatch::default(),
    };

    if let Some(member) = args.member {
        let member = member.trim();
        if member.is_empty() {
            return Err(anyhow!("Member name cannot be empty"));
        }
        patch.member_name = Some(member.to_string());
    }
    if let Some(category) = args.category {
        patch.category = Some(Category::from_str(category)?);
    }
    if let Some(details) = args.details {
        let details = details.trim();
        if details.is_empty() {
            return Err(anyhow!("Prayer details cannot be empty"));
        }
        patch.details = Some(details.to_string());
    }
    if args.clear_notes {
        patch.notes = Some(None);
    } else if let Some(notes) = args.notes {
        let notes = notes.trim();
        patch.notes = Some((!notes.is_empty()).then(|| notes.to_string()));
    }

    if let Some(on) = args.highlight {
        patch.highlight = Some(on.then_some(true));
    }

    if patch.is_empty() {
        return Err(anyhow!("Nothing to change. Pass at least one field to edit"));
    }
    Ok(patch)
}

pub fn handle_edit<S: KvStore>(
    storage: &PrayerStorage<S>,
    id: &str,
    args: &EditArgs,
) -> Result<()> {
    let data = storage.get_data();
    let current = data
        .find(id)
        .ok_or_else(|| anyhow!("No prayer request with id '{}'", id))?;

    let patch = build_edit_patch(current, args)?;
    if storage.update_request(id, &patch) {
        println_colored!(GREEN, "  ✓ Updated request for {}", current.member_name);
    }
    Ok(())
}

// ─── Delete ──────────────────────────────────────────────────────────────────

pub fn handle_delete<S: KvStore>(storage: &PrayerStorage<S>, id: &str) -> Result<()> {
    if storage.delete_request(id) {
        println_colored!(GREEN, "  ✓ Deleted {}", id);
    } else {
        println_colored!(AMBER, "  No prayer request with id '{}'", id);
    }
    Ok(())
}

// ─── Members ─────────────────────────────────────────────────────────────────

pub fn handle_members<S: KvStore>(storage: &PrayerStorage<S>) -> Result<()> {
    let data = storage.get_data();
    println!();
    if data.members.is_empty() {
        println_colored!(DIM, "  No members yet");
    } else {
        println_colored!(BOLD, "  Members ({})", data.members.len());
        println!();
        for member in &data.members {
            let open = data
                .requests
                .iter()
                .filter(|r| &r.member_name == member && r.status == RequestStatus::Praying)
                .count();
            println!("  {:<24}  {}", member, plural(open, "open request"));
        }
    }
    println!();
    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats<S: KvStore>(storage: &PrayerStorage<S>, config: &AppConfig) -> Result<()> {
    let data = storage.get_data();
    let all: Vec<&PrayerRequest> = data.requests.iter().collect();
    let groups = RequestGroups::build(&all, current_week_start(first_weekday(config)));
    let stats = RequestStats::compute(&data.requests, groups.this_week.len());

    println!();
    println_colored!(BOLD, "  Prayer Tracker");
    println!();
    println!("  Total requests:    {}", stats.total);
    println_colored!(BLUE, "  Actively praying:  {}", stats.praying);
    println_colored!(
        GREEN,
        "  Answered:          {}  {} {:.0}%",
        stats.answered,
        progress_bar(stats.answered, stats.total, 12),
        stats.answered_ratio() * 100.0
    );
    println_colored!(AMBER, "  This week:         {}", stats.this_week);
    println!();
    for tab in Tab::all() {
        println_colored!(DIM, "  {:<10} {}", tab.title(), groups.get(tab).len());
    }
    println!();
    Ok(())
}

// ─── Export / import ─────────────────────────────────────────────────────────

/// Write an export. Without `output` it lands in `prayer-tracker-<date>.<ext>`
/// in the current directory; an output of `-` prints to stdout.
pub fn handle_export<S: KvStore>(
    storage: &PrayerStorage<S>,
    format: &str,
    output: Option<&Path>,
) -> Result<()> {
    let (content, ext) = match format.to_lowercase().as_str() {
        "json" => (storage.export_data(), "json"),
        "text" | "txt" => (storage.export_as_text(), "txt"),
        other => return Err(anyhow!("Unknown export format '{}'. Use: json, text", other)),
    };

    let path = match output {
        Some(path) if path == Path::new("-") => {
            print!("{}", content);
            return Ok(());
        }
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(default_export_name(Local::now().date_naive(), ext)),
    };

    std::fs::write(&path, &content).with_context(|| format!("Writing {:?}", path))?;
    println_colored!(
        GREEN,
        "  ✓ Prayer data exported as {} to {}",
        ext.to_uppercase(),
        path.display()
    );
    Ok(())
}

pub fn default_export_name(today: NaiveDate, ext: &str) -> String {
    format!("prayer-tracker-{}.{}", today.format("%Y-%m-%d"), ext)
}

pub fn handle_import<S: KvStore>(storage: &PrayerStorage<S>, file: &str) -> Result<()> {
    let raw = if file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Reading {}", file))?
    };

    match storage.import_data(&raw) {
        Ok(summary) => {
            println_colored!(
                GREEN,
                "  ✓ Imported {} and {}",
                plural(summary.requests, "request"),
                plural(summary.members, "member")
            );
            Ok(())
        }
        Err(e) => {
            println_colored!(RED, "  ✗ Import failed. Please check your data format and try again.");
            Err(e).context("Importing prayer data")
        }
    }
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path()?;
    if init {
        if path.exists() {
            println_colored!(AMBER, "  Config already exists at {}", path.display());
        } else {
            config.save()?;
            println_colored!(GREEN, "  ✓ Wrote default config to {}", path.display());
        }
    }

    println!();
    println_colored!(BOLD, "  Config: {}", path.display());
    println!();
    println!("  week_start         {}", config.tracker.week_start);
    println!("  default_category   {}", config.tracker.default_category);
    println!("  tick_rate_ms       {}", config.tui.tick_rate_ms);
    println!();
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn first_weekday(config: &AppConfig) -> Weekday {
    config.tracker.first_weekday().unwrap_or_else(|e| {
        log::warn!("{:#}, using Sunday", e);
        Weekday::Sun
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use tempfile::tempdir;

    fn storage() -> PrayerStorage<MemoryStore> {
        PrayerStorage::new(MemoryStore::new())
    }

    fn no_edits() -> EditArgs<'static> {
        EditArgs {
            member: None,
            category: None,
            details: None,
            notes: None,
            clear_notes: false,
            status: None,
            highlight: None,
        }
    }

    #[test]
    fn add_uses_configured_default_category() {
        let storage = storage();
        let mut config = AppConfig::default();
        config.tracker.default_category = "spiritual".to_string();

        let req = handle_add(&storage, &config, "Ruth", "Peace", None, None).unwrap();
        assert_eq!(req.category, Category::Spiritual);

        let req = handle_add(&storage, &config, "Ruth", "Job", Some("work"), Some("  ")).unwrap();
        assert_eq!(req.category, Category::Work);
        assert_eq!(req.notes, None);
    }

    #[test]
    fn add_rejects_blank_and_unknown_input() {
        let storage = storage();
        let config = AppConfig::default();
        assert!(handle_add(&storage, &config, " ", "Peace", None, None).is_err());
        assert!(handle_add(&storage, &config, "Ruth", "Peace", Some("hobby"), None).is_err());
        assert!(storage.get_data().requests.is_empty());
    }

    #[test]
    fn edit_patch_requires_a_change() {
        let storage = storage();
        let req = handle_add(&storage, &AppConfig::default(), "Ruth", "Peace", None, None).unwrap();
        assert!(build_edit_patch(&req, &no_edits()).is_err());
    }

    #[test]
    fn edit_to_answered_stamps_answer_date() {
        let storage = storage();
        let req = handle_add(&storage, &AppConfig::default(), "Ruth", "Peace", None, None).unwrap();

        let args = EditArgs {
            status: Some("answered"),
            notes: Some("Found peace"),
            ..no_edits()
        };
        handle_edit(&storage, &req.id, &args).unwrap();

        let data = storage.get_data();
        let stored = data.find(&req.id).unwrap();
        assert_eq!(stored.status, RequestStatus::Answered);
        assert!(stored.answer_date.is_some());
        assert_eq!(stored.notes.as_deref(), Some("Found peace"));
        assert_eq!(stored.details, "Peace");
    }

    #[test]
    fn edit_clear_notes() {
        let storage = storage();
        let req =
            handle_add(&storage, &AppConfig::default(), "Ruth", "Peace", None, Some("x")).unwrap();
        let args = EditArgs {
            clear_notes: true,
            ..no_edits()
        };
        handle_edit(&storage, &req.id, &args).unwrap();
        assert_eq!(storage.get_data().find(&req.id).unwrap().notes, None);
    }

    #[test]
    fn edit_highlight_sets_and_clears_the_mark() {
        let storage = storage();
        let req = handle_add(&storage, &AppConfig::default(), "Ruth", "Peace", None, None).unwrap();

        let on = EditArgs {
            highlight: Some(true),
            ..no_edits()
        };
        handle_edit(&storage, &req.id, &on).unwrap();
        let data = storage.get_data();
        let stored = data.find(&req.id).unwrap();
        assert_eq!(stored.highlight, Some(true));
        assert_eq!(stored.status, RequestStatus::Praying);

        let off = EditArgs {
            highlight: Some(false),
            ..no_edits()
        };
        handle_edit(&storage, &req.id, &off).unwrap();
        assert_eq!(storage.get_data().find(&req.id).unwrap().highlight, None);
    }

    #[test]
    fn edit_unknown_id_is_an_error() {
        let storage = storage();
        let args = EditArgs {
            details: Some("x"),
            ..no_edits()
        };
        assert!(handle_edit(&storage, "pr_missing", &args).is_err());
    }

    #[test]
    fn list_rejects_unknown_tab() {
        let storage = storage();
        let config = AppConfig::default();
        assert!(handle_list(&storage, &config, "later", None, "all", "all").is_err());
        assert!(handle_list(&storage, &config, "praises", Some("x"), "praise", "Ruth").is_ok());
    }

    #[test]
    fn export_file_then_import_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prayer-tracker.json");

        let source = storage();
        handle_add(&source, &AppConfig::default(), "Ruth", "Peace", None, None).unwrap();
        handle_export(&source, "json", Some(&path)).unwrap();

        let target = storage();
        handle_import(&target, path.to_str().unwrap()).unwrap();
        assert_eq!(target.get_data().requests, source.get_data().requests);
    }

    #[test]
    fn import_of_bad_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{}").unwrap();
        assert!(handle_import(&storage(), path.to_str().unwrap()).is_err());
        assert!(handle_export(&storage(), "pdf", None).is_err());
    }

    #[test]
    fn default_export_name_carries_date_and_extension() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(default_export_name(day, "json"), "prayer-tracker-2024-03-07.json");
        assert_eq!(default_export_name(day, "txt"), "prayer-tracker-2024-03-07.txt");
    }

    #[test]
    fn export_text_to_named_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let storage = storage();
        handle_add(&storage, &AppConfig::default(), "Ruth", "Peace", None, None).unwrap();

        handle_export(&storage, "text", Some(&path)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Prayer Tracker Export - "));
        assert!(text.contains("Ruth"));
    }

    #[test]
    fn export_dash_goes_to_stdout() {
        assert!(handle_export(&storage(), "json", Some(Path::new("-"))).is_ok());
        assert!(!Path::new("-").exists());
    }
}
