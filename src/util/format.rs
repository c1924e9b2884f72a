// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use std::time::Duration;

/// Formats an elapsed time as `MM:SS`, minutes carrying on past the hour.
///
/// # Arguments
///
/// * `elapsed` - The duration to format. Sub-second parts are dropped.
///
/// # Examples
///
/// ```
/// assert_eq!(format_time(Duration::from_secs(65)), "01:05");
/// assert_eq!(format_time(Duration::from_secs(3600)), "60:00");
/// ```
pub(crate) fn format_time(elapsed: Duration) -> String {
    let total_seconds = elapsed.as_secs();
    let mins = total_seconds / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Formats a buzzer frequency, or a rest marker when nothing sounds.
pub(crate) fn format_tone(tone: Option<u32>) -> String {
    match tone {
        Some(hz) => format!("{} Hz", hz),
        None => "silent".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Duration::from_secs(65)), "01:05");
        assert_eq!(format_time(Duration::from_millis(3_600_999)), "60:00");
    }

    #[test]
    fn test_format_tone() {
        assert_eq!(format_tone(Some(440)), "440 Hz");
        assert_eq!(format_tone(None), "silent");
    }
}
