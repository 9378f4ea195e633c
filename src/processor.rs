use crate::srt::{ParseOptions, SubtitleEntry};

use log::debug;

/// Entries closer together than this are considered one utterance.
pub const MERGE_GAP_MS: i64 = 2000;

pub fn process(entries: Vec<SubtitleEntry>, opts: &ParseOptions) -> Vec<SubtitleEntry> {
    if opts.merge_consecutive_lines {
        merge_consecutive(&entries)
    } else {
        entries
    }
}

/// Collapses runs of consecutive same-speaker entries whose gap is under
/// [`MERGE_GAP_MS`].
///
/// A merged entry keeps the index and start time of the first entry of its
/// run and takes the end time of the last. Gaps are not checked for sign, so
/// overlapping or out-of-order timestamps still merge. Entries lacking a
/// timestamp on either side of a gap never merge across it.
pub fn merge_consecutive(entries: &[SubtitleEntry]) -> Vec<SubtitleEntry> {
    let mut iter = entries.iter();
    let mut current = match iter.next() {
        Some(first) => first.clone(),
        None => return Vec::new(),
    };

    let mut merged = Vec::with_capacity(entries.len());
    for next in iter {
        if current.speaker == next.speaker && is_adjacent(&current, next) {
            debug!(
                "Merging entry {:?} into entry {:?}",
                next.index, current.index
            );
            current.text.push(' ');
            current.text.push_str(&next.text);
            current.end_time = next.end_time.clone();
        } else {
            merged.push(std::mem::replace(&mut current, next.clone()));
        }
    }
    merged.push(current);

    debug!("Merged {} entries into {}", entries.len(), merged.len());
    merged
}

fn is_adjacent(current: &SubtitleEntry, next: &SubtitleEntry) -> bool {
    let end = current.end_time.as_deref().and_then(timestamp_millis);
    let start = next.start_time.as_deref().and_then(timestamp_millis);
    match (end, start) {
        (Some(end), Some(start)) => start.saturating_sub(end) < MERGE_GAP_MS,
        _ => false,
    }
}

/// Converts an `HH:MM:SS,mmm` timestamp to milliseconds.
///
/// Returns `None` if the string does not have three colon-separated numeric
/// fields, or if the result does not fit in an `i64`.
pub fn timestamp_millis(timestamp: &str) -> Option<i64> {
    let parts: Vec<&str> = timestamp.trim().split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let hours: i64 = parts[0].parse().ok()?;
    let minutes: i64 = parts[1].parse().ok()?;
    // The fractional part uses a comma in SRT.
    let seconds: f64 = parts[2].replace(',', ".").parse().ok()?;
    if !seconds.is_finite() {
        return None;
    }

    let millis = (seconds * 1000.0).round();
    if millis.abs() >= i64::MAX as f64 {
        return None;
    }

    hours
        .checked_mul(60)?
        .checked_add(minutes)?
        .checked_mul(60 * 1000)?
        .checked_add(millis as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(start: &str, end: &str, text: &str, speaker: Option<&str>) -> SubtitleEntry {
        SubtitleEntry {
            index: None,
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            text: text.to_string(),
            speaker: speaker.map(String::from),
        }
    }

    macro_rules! test_millis {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                assert_eq!(timestamp_millis(input), expected);
            }
        )*
        }
    }

    test_millis! {
        test_millis_0: ("00:00:00,000", Some(0)),
        test_millis_1: ("00:00:01,200", Some(1200)),
        test_millis_2: ("00:00:02,999", Some(2999)),
        test_millis_3: ("00:01:00,001", Some(60_001)),
        test_millis_4: ("01:01:01,200", Some(3_661_200)),
        test_millis_5: ("02:02:06,159", Some(7_326_159)),
        test_millis_6: ("", None),
        test_millis_7: ("00:00", None),
        test_millis_8: ("aa:00:01,000", None),
        test_millis_9: ("9223372036854775807:00:00,000", None),
        test_millis_10: ("00:9223372036854775807:00,000", None),
        test_millis_11: ("00:00:1e300", None),
    }

    #[test]
    fn test_empty_sequence() {
        assert!(merge_consecutive(&[]).is_empty());
    }

    #[test]
    fn test_gap_boundary() {
        let merged = merge_consecutive(&[
            entry("00:00:00,000", "00:00:01,000", "a", None),
            entry("00:00:02,999", "00:00:04,000", "b", None),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "a b");
        assert_eq!(merged[0].start_time.as_deref(), Some("00:00:00,000"));
        assert_eq!(merged[0].end_time.as_deref(), Some("00:00:04,000"));

        let merged = merge_consecutive(&[
            entry("00:00:00,000", "00:00:01,000", "a", None),
            entry("00:00:03,000", "00:00:04,000", "b", None),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "a");
        assert_eq!(merged[1].text, "b");
    }

    #[test]
    fn test_negative_gap_merges() {
        let merged = merge_consecutive(&[
            entry("00:00:05,000", "00:00:08,000", "late", None),
            entry("00:00:01,000", "00:00:02,000", "early", None),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "late early");
        assert_eq!(merged[0].start_time.as_deref(), Some("00:00:05,000"));
        assert_eq!(merged[0].end_time.as_deref(), Some("00:00:02,000"));
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let merged = merge_consecutive(&[
            entry("00:00:00,000", "-2562047:00:00,000", "a", None),
            entry("2562047:00:00,000", "2562047:00:01,000", "b", None),
            entry("99999999999999999:00:00,000", "00:00:01,000", "c", None),
        ]);

        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_speaker_change_splits() {
        let merged = merge_consecutive(&[
            entry("00:00:00,000", "00:00:01,000", "hi", Some("Ann")),
            entry("00:00:01,100", "00:00:02,000", "hey", Some("Bob")),
            entry("00:00:02,100", "00:00:03,000", "how are you", Some("Bob")),
            entry("00:00:03,100", "00:00:04,000", "unknown", None),
        ]);

        let texts: Vec<&str> = merged.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["hi", "hey how are you", "unknown"]);
        assert_eq!(merged[1].speaker.as_deref(), Some("Bob"));
    }

    #[test]
    fn test_missing_timestamps_never_merge() {
        let mut first = entry("00:00:00,000", "00:00:01,000", "a", None);
        first.end_time = None;
        let second = entry("00:00:01,000", "00:00:02,000", "b", None);
        let mut third = entry("00:00:02,000", "00:00:03,000", "c", None);
        third.start_time = None;

        let merged = merge_consecutive(&[first, second, third]);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_run_keeps_first_index() {
        let mut first = entry("00:00:00,000", "00:00:01,000", "one", None);
        first.index = Some(7);
        let mut second = entry("00:00:01,500", "00:00:02,000", "two", None);
        second.index = Some(8);
        let mut third = entry("00:00:03,000", "00:00:04,000", "three", None);
        third.index = Some(9);

        let merged = merge_consecutive(&[first, second, third]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].index, Some(7));
        assert_eq!(merged[0].text, "one two three");
        assert_eq!(merged[0].end_time.as_deref(), Some("00:00:04,000"));
    }

    #[test]
    fn test_input_not_mutated() {
        let input = vec![
            entry("00:00:00,000", "00:00:01,000", "a", None),
            entry("00:00:01,000", "00:00:02,000", "b", None),
        ];
        let snapshot = input.clone();

        let merged = merge_consecutive(&input);
        assert_eq!(merged.len(), 1);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let input = vec![
            entry("00:00:00,000", "00:00:01,000", "a", None),
            entry("00:00:05,000", "00:00:06,000", "b", None),
            entry("00:00:10,000", "00:00:11,000", "c", None),
        ];

        let once = merge_consecutive(&input);
        let twice = merge_consecutive(&once);
        assert_eq!(once, input);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_process_respects_option() {
        let input = vec![
            entry("00:00:00,000", "00:00:01,000", "a", None),
            entry("00:00:01,000", "00:00:02,000", "b", None),
        ];

        let opts = ParseOptions {
            merge_consecutive_lines: false,
            ..ParseOptions::default()
        };
        assert_eq!(process(input.clone(), &opts).len(), 2);
        assert_eq!(process(input, &ParseOptions::default()).len(), 1);
    }
}
