pub mod filter;
pub mod groups;

pub use filter::{parse_category_filter, parse_member_filter, RequestFilter};
pub use groups::{current_week_start, RequestGroups, Tab};
