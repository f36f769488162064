//! Shared helpers for tuxlab.

use chrono::{DateTime, Utc};

/// Basic heuristic for flagging destructive example commands.
///
/// Display surfaces badge matching examples with a warning; the check is a
/// signal list, not a parser, and errs on the side of flagging.
pub fn is_destructive_command(command: &str) -> bool {
    let lowered = command.to_lowercase();
    let signals = [
        "rm -rf",
        "rm -fr",
        "mkfs",
        "dd if=",
        "dd of=/dev/",
        "> /dev/sd",
        "chmod -r 777 /",
        "chown -r / ",
        ":(){",
        "shred",
        "wipefs",
    ];
    signals.iter().any(|signal| lowered.contains(signal))
}

/// Render a timestamp relative to `now`, e.g. `2 hours ago`.
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed.num_seconds() < 60 {
        return "just now".to_string();
    }
    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }
    let days = elapsed.num_days();
    if days < 30 {
        return plural(days, "day");
    }
    let months = days / 30;
    if months < 12 {
        return plural(months, "month");
    }
    plural(months / 12, "year")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn flags_recursive_delete() {
        assert!(is_destructive_command("rm -rf /tmp/junk/"));
        assert!(is_destructive_command("sudo MKFS.ext4 /dev/sdb1"));
    }

    #[test]
    fn leaves_ordinary_commands_alone() {
        assert!(!is_destructive_command("ls -la"));
        assert!(!is_destructive_command("rm file.txt"));
    }

    #[test]
    fn relative_times() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let two_hours = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        assert_eq!(format_relative(two_hours, now), "2 hours ago");

        let one_day = Utc.with_ymd_and_hms(2024, 5, 31, 11, 0, 0).unwrap();
        assert_eq!(format_relative(one_day, now), "1 day ago");

        let moments = Utc.with_ymd_and_hms(2024, 6, 1, 11, 59, 30).unwrap();
        assert_eq!(format_relative(moments, now), "just now");
    }
}
