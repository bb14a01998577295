//! The Markdown note thoughts are merged into.
//!
//! ```text
//! ## 2026-01-22
//! - 09:15 – idea about client presentation
//! - 14:32 – remember to check that cycling route
//!   second line of a multi-line thought
//! ```
//!
//! Dates run newest first; entries inside a date run oldest first.

use std::collections::BTreeMap;

use quickthoughts_core::types::Thought;

const HEADING: &str = "## ";
const BULLET: &str = "- ";
const CONTINUATION_INDENT: &str = "  ";

/// One bullet plus its continuation lines.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    lines: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Journal {
    /// Lines above the first heading, kept as written.
    preamble: Vec<String>,
    /// Heading text (normally `YYYY-MM-DD`) to entries.
    sections: BTreeMap<String, Vec<Entry>>,
}

impl Journal {
    pub fn parse(text: &str) -> Self {
        let mut journal = Journal::default();
        let mut current: Option<String> = None;

        for line in text.lines() {
            if let Some(heading) = line.strip_prefix(HEADING) {
                let key = heading.trim().to_string();
                journal.sections.entry(key.clone()).or_default();
                current = Some(key);
                continue;
            }

            let Some(ref key) = current else {
                journal.preamble.push(line.to_string());
                continue;
            };
            if line.trim().is_empty() {
                continue;
            }

            let entries = journal.sections.entry(key.clone()).or_default();
            match entries.last_mut() {
                Some(last) if !line.starts_with(BULLET) => last.lines.push(line.to_string()),
                _ => entries.push(Entry {
                    lines: vec![line.to_string()],
                }),
            }
        }

        while journal.preamble.last().is_some_and(|l| l.trim().is_empty()) {
            journal.preamble.pop();
        }
        journal
    }

    /// File `thought` under its UTC date. Every call adds an entry, even
    /// when one with the same minute and text already exists.
    pub fn add(&mut self, thought: &Thought) {
        let date = thought.timestamp.format("%Y-%m-%d").to_string();
        self.sections
            .entry(date)
            .or_default()
            .push(format_entry(thought));
    }

    pub fn entry_count(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    pub fn render(&self) -> String {
        let mut out: Vec<&str> = Vec::new();
        let headings: Vec<String> = self
            .sections
            .keys()
            .rev()
            .map(|k| format!("{HEADING}{k}"))
            .collect();

        if !self.preamble.is_empty() {
            out.extend(self.preamble.iter().map(String::as_str));
            out.push("");
        }

        for (heading, entries) in headings.iter().zip(self.sections.values().rev()) {
            out.push(heading);
            let mut sorted: Vec<&Entry> = entries.iter().collect();
            sorted.sort();
            for entry in sorted {
                out.extend(entry.lines.iter().map(String::as_str));
            }
            out.push("");
        }

        out.join("\n")
    }
}

fn format_entry(thought: &Thought) -> Entry {
    let time = thought.timestamp.format("%H:%M");
    let mut parts = thought.text.lines().map(str::trim_end);
    let first = parts.next().unwrap_or_default();

    let mut lines = vec![format!("{BULLET}{time} – {first}")];
    lines.extend(
        parts
            .filter(|l| !l.trim().is_empty())
            .map(|l| format!("{CONTINUATION_INDENT}{}", l.trim_start())),
    );
    Entry { lines }
}
