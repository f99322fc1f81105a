/// Completion state of a single document line.
///
/// A line whose trimmed content starts with `--` is a task line; everything
/// else is `Plain` and receives no styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Plain,
    Open,
    Completed,
    CompletedWithCaveat,
    MaybeCompleted,
}

/// A classified line as byte offsets into the document text.
///
/// `end` includes the trailing newline when one is present, so consecutive
/// spans tile the whole text; `content_end` stops before the terminator and
/// is the span styling gets applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub start: usize,
    pub content_end: usize,
    pub end: usize,
    pub state: TaskState,
}

/// Classify every line of `text`, in document order.
///
/// Split semantics match `str::split('\n')`: an empty document yields one
/// empty line, and a trailing newline yields a final empty line. Pure, no
/// I/O.
pub fn classify(text: &str) -> Vec<ClassifiedLine> {
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut iter = text.split('\n').peekable();
    while let Some(line) = iter.next() {
        let content_end = start + line.len();
        let end = if iter.peek().is_some() {
            content_end + 1
        } else {
            content_end
        };
        lines.push(ClassifiedLine {
            start,
            content_end,
            end,
            state: classify_line(line),
        });
        start = end;
    }
    lines
}

/// Marker checks run in fixed priority order because the substrings overlap:
/// "tick, but" must win over "tick", and "tick" over "maybe".
fn classify_line(line: &str) -> TaskState {
    if !line.trim().starts_with("--") {
        return TaskState::Plain;
    }
    let lower = line.to_lowercase();
    if lower.contains("tick, but") {
        TaskState::CompletedWithCaveat
    } else if lower.contains("tick") {
        TaskState::Completed
    } else if lower.contains("maybe") {
        TaskState::MaybeCompleted
    } else {
        TaskState::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(text: &str) -> Vec<TaskState> {
        classify(text).into_iter().map(|l| l.state).collect()
    }

    #[test]
    fn test_marker_cases() {
        assert_eq!(states("-- tick, but done"), vec![TaskState::CompletedWithCaveat]);
        assert_eq!(states("-- tick"), vec![TaskState::Completed]);
        assert_eq!(states("-- maybe"), vec![TaskState::MaybeCompleted]);
        assert_eq!(states("-- plain"), vec![TaskState::Open]);
        assert_eq!(states("not a task"), vec![TaskState::Plain]);
    }

    #[test]
    fn test_marker_priority_order() {
        // "tick, but" contains "tick"; "maybe" loses to both.
        assert_eq!(states("-- tick, but maybe"), vec![TaskState::CompletedWithCaveat]);
        assert_eq!(states("-- maybe tick"), vec![TaskState::Completed]);
    }

    #[test]
    fn test_markers_are_case_insensitive() {
        assert_eq!(states("-- TICK"), vec![TaskState::Completed]);
        assert_eq!(states("-- Tick, But later"), vec![TaskState::CompletedWithCaveat]);
        assert_eq!(states("-- MayBe"), vec![TaskState::MaybeCompleted]);
    }

    #[test]
    fn test_indented_task_line() {
        let lines = classify("   -- call Sam");
        assert_eq!(lines[0].state, TaskState::Open);
        // The span still covers the whole line, indentation included.
        assert_eq!(lines[0].start, 0);
        assert_eq!(lines[0].content_end, 14);
    }

    #[test]
    fn test_empty_document() {
        let lines = classify("");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], ClassifiedLine {
            start: 0,
            content_end: 0,
            end: 0,
            state: TaskState::Plain,
        });
    }

    #[test]
    fn test_one_entry_per_line() {
        assert_eq!(classify("a\nb\nc").len(), 3);
        // Trailing newline produces a final empty line.
        assert_eq!(classify("a\nb\n").len(), 3);
    }

    #[test]
    fn test_spans_reconstruct_text_length() {
        for text in ["", "x", "-- tick\n-- maybe Bob\nplain", "a\n\n\nb\n", "héllo\n-- tick ünïcode"] {
            let lines = classify(text);
            let mut expected_start = 0;
            for line in &lines {
                assert_eq!(line.start, expected_start);
                assert!(line.content_end <= line.end);
                expected_start = line.end;
            }
            assert_eq!(expected_start, text.len());
        }
    }

    #[test]
    fn test_no_trailing_newline() {
        let lines = classify("-- tick");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].content_end, 7);
        assert_eq!(lines[0].end, 7);
    }

    #[test]
    fn test_content_end_excludes_terminator() {
        let lines = classify("-- tick\nrest");
        assert_eq!(lines[0].content_end, 7);
        assert_eq!(lines[0].end, 8);
        assert_eq!(lines[1].start, 8);
    }
}
