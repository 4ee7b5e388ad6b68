/// Format a millisecond game-time offset as the scoreboard "M:SS" string.
///
/// Absent input renders the placeholder "0:00" so display layers never have
/// to special-case missing data.
pub fn millis_to_clock(millis: Option<u64>) -> String {
    match millis {
        Some(ms) => {
            let total_seconds = ms / 1000;
            format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
        }
        None => "0:00".to_string(),
    }
}
