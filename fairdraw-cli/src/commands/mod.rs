pub mod admin;
pub mod draw;
pub mod history;

pub use admin::{handle_admin_command, AdminCommands};
pub use draw::{check_draw, create_draw, verify_draw};
pub use history::show_history;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

pub(crate) fn format_time(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format(TIME_FORMAT).to_string()
}
