pub mod detail;
pub mod header;
pub mod requests;
pub mod statusbar;
pub mod tabs;
