/// Remaining-time label for timed sessions.
#[must_use]
pub fn format_timer(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{minutes}:{remainder:02}")
}
