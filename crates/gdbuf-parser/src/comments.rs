//! Doc comment extraction from schema source text
//!
//! The grammar discards comments, so documentation is recovered from the raw
//! source by line: a run of `//` lines (or one `/* */` block) directly above a
//! declaration is its leading comment; a `//` comment after the declaration on
//! the same line is its trailing comment.

pub(crate) struct SourceComments<'s> {
    lines: Vec<&'s str>,
}

impl<'s> SourceComments<'s> {
    pub(crate) fn new(source: &'s str) -> Self {
        Self {
            lines: source.lines().collect(),
        }
    }

    /// Comment block ending on the line directly above `line` (1-based)
    pub(crate) fn leading(&self, line: usize) -> Option<String> {
        let mut collected: Vec<String> = Vec::new();
        let mut index = line.checked_sub(1)?;

        while index > 0 {
            index -= 1;
            let text = self.lines.get(index)?.trim();

            if let Some(comment) = text.strip_prefix("//") {
                collected.push(strip_line_marker(comment));
                continue;
            }

            if collected.is_empty() && text.ends_with("*/") {
                return self.block_ending_at(index);
            }
            break;
        }

        if collected.is_empty() {
            return None;
        }
        collected.reverse();
        normalize(collected)
    }

    /// `//` comment following a statement on its last line
    ///
    /// `rest` is the remainder of the line after the statement ends.
    pub(crate) fn trailing(rest: &str) -> Option<String> {
        let comment = rest.trim_start().strip_prefix("//")?;
        normalize(vec![strip_line_marker(comment)])
    }

    fn block_ending_at(&self, end: usize) -> Option<String> {
        let mut start = end;
        while !self.lines.get(start)?.contains("/*") {
            start = start.checked_sub(1)?;
        }

        let mut text = self.lines[start..=end].join("\n");
        if let Some(open) = text.find("/*") {
            text = text[open + 2..].to_string();
        }
        if let Some(close) = text.rfind("*/") {
            text.truncate(close);
        }

        let lines = text
            .lines()
            .map(|line| {
                let line = line.trim();
                let line = line.strip_prefix('*').unwrap_or(line);
                line.strip_prefix(' ').unwrap_or(line).trim_end().to_string()
            })
            .collect();
        normalize(lines)
    }
}

fn strip_line_marker(comment: &str) -> String {
    // `///` doc style is treated like `//`
    let comment = comment.trim_start_matches('/');
    comment
        .strip_prefix(' ')
        .unwrap_or(comment)
        .trim_end()
        .to_string()
}

/// Drop blank leading/trailing lines; `None` when nothing remains
fn normalize(mut lines: Vec<String>) -> Option<String> {
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
