//! `[group]` / `key=value` files (GKeyFile dialect)
//!
//! Lines are kept verbatim; only an entry that is actually set is rewritten,
//! so comments, blank lines, ordering and foreign keys survive a save.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Comment, blank or unparseable line
    Other(String),
    Group(String),
    Entry { key: String, value: String, raw: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFile {
    lines: Vec<Line>,
    newline: &'static str,
}

impl Default for KeyFile {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            newline: "\n",
        }
    }
}

impl KeyFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        let lines = text
            .lines()
            .map(|line| {
                let trimmed = line.trim();
                if trimmed.starts_with('#') || trimmed.is_empty() {
                    return Line::Other(line.to_string());
                }
                if let Some(name) = trimmed
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                {
                    return Line::Group(name.to_string());
                }
                match line.split_once('=') {
                    Some((key, value)) if !key.trim().is_empty() => Line::Entry {
                        key: key.trim().to_string(),
                        value: value.trim_start().to_string(),
                        raw: line.to_string(),
                    },
                    _ => Line::Other(line.to_string()),
                }
            })
            .collect();
        Self {
            lines,
            newline: super::line_ending(text),
        }
    }

    /// Load a file; a missing or unreadable file yields an empty document
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Key file not readable, starting empty");
                Self::new()
            }
        }
    }

    /// Load the first readable source, or an empty document
    pub fn load_first<P: AsRef<Path>>(sources: impl IntoIterator<Item = P>) -> Self {
        sources
            .into_iter()
            .find(|path| path.as_ref().is_file())
            .map(|path| Self::load(path.as_ref()))
            .unwrap_or_default()
    }

    /// Index of the last entry for `key` inside any `[group]` section
    fn find(&self, group: &str, key: &str) -> Option<usize> {
        let mut current: Option<&str> = None;
        let mut found = None;
        for (idx, line) in self.lines.iter().enumerate() {
            match line {
                Line::Group(name) => current = Some(name.as_str()),
                Line::Entry { key: k, .. } if current == Some(group) && k == key => {
                    found = Some(idx)
                }
                _ => {}
            }
        }
        found
    }

    /// Raw value as written in the file
    pub fn get(&self, group: &str, key: &str) -> Option<&str> {
        self.find(group, key).and_then(|idx| match &self.lines[idx] {
            Line::Entry { value, .. } => Some(value.as_str()),
            _ => None,
        })
    }

    /// Value with GKeyFile escapes resolved
    pub fn get_string(&self, group: &str, key: &str) -> Option<String> {
        self.get(group, key).map(unescape)
    }

    /// Set a raw value, replacing the existing entry in place or inserting it
    /// after the last entry of the group (creating the group if needed)
    pub fn set(&mut self, group: &str, key: &str, value: &str) {
        let entry = Line::Entry {
            key: key.to_string(),
            value: value.to_string(),
            raw: format!("{key}={value}"),
        };

        if let Some(idx) = self.find(group, key) {
            if let Line::Entry { value: old, .. } = &self.lines[idx] {
                if old == value {
                    return;
                }
            }
            self.lines[idx] = entry;
            return;
        }

        let mut current: Option<&str> = None;
        let mut insert_at = None;
        for (idx, line) in self.lines.iter().enumerate() {
            match line {
                Line::Group(name) => {
                    current = Some(name.as_str());
                    if name == group {
                        insert_at = Some(idx + 1);
                    }
                }
                Line::Entry { .. } if current == Some(group) => insert_at = Some(idx + 1),
                _ => {}
            }
        }

        match insert_at {
            Some(idx) => self.lines.insert(idx, entry),
            None => {
                let needs_gap = matches!(
                    self.lines.last(),
                    Some(line) if *line != Line::Other(String::new())
                );
                if needs_gap {
                    self.lines.push(Line::Other(String::new()));
                }
                self.lines.push(Line::Group(group.to_string()));
                self.lines.push(entry);
            }
        }
    }

    pub fn set_string(&mut self, group: &str, key: &str, value: &str) {
        self.set(group, key, &escape(value));
    }

    pub fn set_integer(&mut self, group: &str, key: &str, value: i64) {
        self.set(group, key, &value.to_string());
    }

    /// `0` / `1` as used by pcmanfm
    pub fn set_flag(&mut self, group: &str, key: &str, value: bool) {
        self.set(group, key, if value { "1" } else { "0" });
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Other(text) | Line::Entry { raw: text, .. } => out.push_str(text),
                Line::Group(name) => {
                    out.push('[');
                    out.push_str(name);
                    out.push(']');
                }
            }
            out.push_str(self.newline);
        }
        out
    }

    /// Write the whole file, creating parent directories. Returns false when
    /// the file already had this content.
    pub fn save(&self, path: &Path) -> Result<bool> {
        super::write_if_changed(path, &self.to_text())
            .with_context(|| format!("Failed to save key file {}", path.display()))
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('s') => out.push(' '),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (idx, c) in value.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            // leading space would be stripped on read
            ' ' if idx == 0 => out.push_str("\\s"),
            _ => out.push(c),
        }
    }
    out
}
