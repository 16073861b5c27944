//! Countdown display formatting

/// Format remaining seconds as zero padded `mm:ss`
pub fn format_countdown(remaining_seconds: u64) -> String {
    let minutes = remaining_seconds / 60;
    let seconds = remaining_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}
