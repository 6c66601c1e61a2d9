pub mod request;
pub mod stats;

pub use request::{Category, NewRequest, PrayerData, PrayerRequest, RequestPatch, RequestStatus};
pub use stats::RequestStats;
