//! Task-notation highlighting.
//!
//! Pure building blocks for the live pipeline: `classifier` turns document
//! text into per-line task states, `style_map` owns the per-document style
//! table, and the painting functions here produce the style strings that
//! back FLTK's highlight data (one style char per text byte).

pub mod classifier;
pub mod style_map;

use regex_lite::Regex;

use self::classifier::classify;
use self::style_map::{DEFAULT_STYLE, StyleMap};
use super::extractor::NamePair;

/// All-default style string for `len` bytes of text.
pub fn default_style_string(len: usize) -> String {
    std::iter::repeat(DEFAULT_STYLE).take(len).collect()
}

/// Rebuild task styling over `current`, returning the new style string.
///
/// Stale task chars are reset first, then every task line is repainted over
/// its visible span (terminator excluded). Name chars are left in place so
/// name styling stays on top of task lines; the change path repaints the
/// current name set right after this.
pub fn apply_task_styles(text: &str, current: &str, styles: &StyleMap) -> String {
    let mut style = resync(current, text.len());
    for b in style.iter_mut() {
        if StyleMap::is_task_char(*b as char) {
            *b = DEFAULT_STYLE as u8;
        }
    }
    for line in classify(text) {
        let Some(ch) = styles.task_char(line.state) else {
            continue;
        };
        for b in &mut style[line.start..line.content_end] {
            if !StyleMap::is_name_char(*b as char) {
                *b = ch as u8;
            }
        }
    }
    finish(style, text.len())
}

/// Paint every case-insensitive occurrence of each extracted name.
///
/// Matching is a literal substring scan, so occurrences inside longer words
/// are painted too. Previous name styling is deliberately not cleared
/// first: the name set is replaced wholesale upstream, and paint left
/// behind by a name that dropped out of the set persists until something
/// overwrites it.
pub fn apply_name_styles(
    text: &str,
    current: &str,
    pairs: &[NamePair],
    styles: &mut StyleMap,
) -> String {
    let mut style = resync(current, text.len());
    for pair in pairs {
        if pair.name.is_empty() {
            continue;
        }
        let ch = styles.ensure_name_style(&pair.color);
        let pattern = format!("(?i){}", regex_lite::escape(&pair.name));
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        for m in re.find_iter(text) {
            for b in &mut style[m.start()..m.end()] {
                *b = ch as u8;
            }
        }
    }
    finish(style, text.len())
}

// The style string must stay byte-for-byte parallel to the text; if it ever
// drifts (e.g. a pass raced a programmatic buffer replacement) start over
// from all-default rather than paint at wrong offsets.
fn resync(current: &str, len: usize) -> Vec<u8> {
    if current.len() == len {
        current.as_bytes().to_vec()
    } else {
        vec![DEFAULT_STYLE as u8; len]
    }
}

fn finish(style: Vec<u8>, len: usize) -> String {
    String::from_utf8(style).unwrap_or_else(|_| default_style_string(len))
}

#[cfg(test)]
mod tests {
    use super::classifier::TaskState;
    use super::*;
    use fltk::enums::Font;

    fn map() -> StyleMap {
        StyleMap::new(Font::Courier, 16)
    }

    fn pair(name: &str, color: &str) -> NamePair {
        NamePair {
            name: name.to_string(),
            color: color.to_string(),
        }
    }

    fn chr(styles: &StyleMap, state: TaskState) -> char {
        styles.task_char(state).unwrap()
    }

    #[test]
    fn test_task_pass_paints_visible_span_only() {
        let styles = map();
        let text = "-- tick\nplain";
        let styled = apply_task_styles(text, &default_style_string(text.len()), &styles);
        let c = chr(&styles, TaskState::Completed);
        assert_eq!(styled, format!("{}A{}", c.to_string().repeat(7), "A".repeat(5)));
    }

    #[test]
    fn test_task_pass_is_idempotent() {
        let styles = map();
        let text = "-- tick\n-- maybe\nnothing\n-- plain task";
        let once = apply_task_styles(text, &default_style_string(text.len()), &styles);
        let twice = apply_task_styles(text, &once, &styles);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_task_pass_clears_stale_styling() {
        let styles = map();
        let before = "-- tick";
        let styled = apply_task_styles(before, &default_style_string(before.len()), &styles);
        // Same length, but no longer a task line: every char must reset.
        let after = "x- tick";
        let restyled = apply_task_styles(after, &styled, &styles);
        assert_eq!(restyled, "A".repeat(7));
    }

    #[test]
    fn test_name_pass_matches_case_insensitively_and_inside_words() {
        let mut styles = map();
        let text = "Bob met BOB and Bobby";
        let styled = apply_name_styles(
            text,
            &default_style_string(text.len()),
            &[pair("Bob", "green")],
            &mut styles,
        );
        let g = styles.ensure_name_style("green");
        let painted: Vec<usize> = styled
            .char_indices()
            .filter(|(_, c)| *c == g)
            .map(|(i, _)| i)
            .collect();
        // "Bob" at 0, "BOB" at 8, and the prefix of "Bobby" at 16.
        assert_eq!(painted, vec![0, 1, 2, 8, 9, 10, 16, 17, 18]);
    }

    #[test]
    fn test_name_pass_does_not_clear_stale_names() {
        let mut styles = map();
        let text = "Alice and Bob";
        let styled = apply_name_styles(
            text,
            &default_style_string(text.len()),
            &[pair("Alice", "blue"), pair("Bob", "green")],
            &mut styles,
        );
        // Bob drops out of the next result set; his paint stays.
        let restyled = apply_name_styles(text, &styled, &[pair("Alice", "blue")], &mut styles);
        assert_eq!(restyled, styled);
    }

    #[test]
    fn test_name_paint_survives_task_pass() {
        let mut styles = map();
        let text = "-- tick Alice\nAlice alone";
        let styled = apply_task_styles(text, &default_style_string(text.len()), &styles);
        let styled = apply_name_styles(text, &styled, &[pair("Alice", "blue")], &mut styles);
        // An edit re-runs the task pass; name chars must stay put.
        let repainted = apply_task_styles(text, &styled, &styles);
        assert_eq!(repainted, styled);
    }

    #[test]
    fn test_length_mismatch_resyncs_from_default() {
        let styles = map();
        let text = "-- tick";
        let styled = apply_task_styles(text, "BB", &styles);
        assert_eq!(styled.len(), text.len());
        assert_eq!(styled, chr(&styles, TaskState::Completed).to_string().repeat(7));
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut styles = map();
        let text = "-- tick, but Alice helped\n-- maybe Bob\nplain text";
        let styled = apply_task_styles(text, &default_style_string(text.len()), &styles);
        let styled = apply_name_styles(
            text,
            &styled,
            &[pair("Alice", "blue"), pair("Bob", "green")],
            &mut styles,
        );
        let bytes = styled.as_bytes();

        let caveat = chr(&styles, TaskState::CompletedWithCaveat) as u8;
        let maybe = chr(&styles, TaskState::MaybeCompleted) as u8;
        let blue = styles.ensure_name_style("blue") as u8;
        let green = styles.ensure_name_style("green") as u8;

        let alice = text.find("Alice").unwrap();
        assert!(bytes[alice..alice + 5].iter().all(|&b| b == blue));
        let bob = text.find("Bob").unwrap();
        assert!(bytes[bob..bob + 3].iter().all(|&b| b == green));

        // Line 1 is caveat-colored outside the name span.
        assert!(bytes[..alice].iter().all(|&b| b == caveat));
        let line1_end = text.find('\n').unwrap();
        assert!(bytes[alice + 5..line1_end].iter().all(|&b| b == caveat));
        assert_eq!(bytes[line1_end], b'A');

        // Line 2 is maybe-colored outside "Bob".
        let line2_start = line1_end + 1;
        assert!(bytes[line2_start..bob].iter().all(|&b| b == maybe));

        // Line 3 carries no task styling.
        let line3_start = text.rfind('\n').unwrap() + 1;
        assert!(bytes[line3_start..].iter().all(|&b| b == b'A'));
    }
}
