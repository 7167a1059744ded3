//! Line-oriented files without a structured parser
//!
//! Covers shell-style `key=value` files, themerc `key: value` overrides,
//! xsettingsd `Name value` lines, lxpanel `Block { key=value }` stanzas and
//! GTK CSS (`@define-color name value;`, `selector { prop: value; }`).
//!
//! A patch is: find the block (or top level), find the key inside it, replace
//! the value on that line only; otherwise insert the key before the block's
//! closing brace, or append a fresh minimal block. Re-applying a patch with
//! the same value never changes the file.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::debug;

/// How a key and its value are joined on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syntax {
    /// Separator written for new lines
    pub assign: &'static str,
    /// Separator accepted when matching existing lines
    pub assign_re: &'static str,
    /// Written after the value (`;` for CSS)
    pub terminator: &'static str,
}

/// `key=value` (lxpanel, labwc environment)
pub const SHELL: Syntax = Syntax {
    assign: "=",
    assign_re: r"\s*=\s*",
    terminator: "",
};

/// `key: value` (labwc themerc-override)
pub const COLON: Syntax = Syntax {
    assign: ": ",
    assign_re: r"\s*:\s*",
    terminator: "",
};

/// `Name value` (xsettingsd)
pub const SPACED: Syntax = Syntax {
    assign: " ",
    assign_re: r"\s+",
    terminator: "",
};

/// `prop: value;` inside a CSS rule
pub const CSS_PROPERTY: Syntax = Syntax {
    assign: ": ",
    assign_re: r"\s*:\s*",
    terminator: ";",
};

/// `@define-color name value;`
pub const CSS_DEFINE: Syntax = Syntax {
    assign: " ",
    assign_re: r"\s+",
    terminator: ";",
};

/// Where a key is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    /// Lines outside any `{ }` block
    TopLevel,
    /// Direct children of the first top-level block with this header
    Block(&'a str),
    /// Any line in the file
    Anywhere,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFile {
    lines: Vec<String>,
    trailing_newline: bool,
    newline: &'static str,
}

impl Default for LineFile {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            trailing_newline: true,
            newline: "\n",
        }
    }
}

impl LineFile {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            trailing_newline: text.is_empty() || text.ends_with('\n'),
            newline: super::line_ending(text),
        }
    }

    /// Load a file; a missing or unreadable file yields an empty document
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Line file not readable, starting empty");
                Self::default()
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

    /// Brace depth in effect at the start of each line
    fn depths(&self) -> Vec<usize> {
        let mut depth = 0usize;
        self.lines
            .iter()
            .map(|line| {
                let at_start = depth;
                for c in line.chars() {
                    match c {
                        '{' => depth += 1,
                        '}' => depth = depth.saturating_sub(1),
                        _ => {}
                    }
                }
                at_start
            })
            .collect()
    }

    /// Header line index and closing line index of a top-level block. The
    /// closing index is `lines.len()` when the block is unterminated.
    fn find_block(&self, header: &str) -> Option<(usize, usize)> {
        let header_re = Regex::new(&format!(r"^\s*{}\s*\{{\s*$", regex::escape(header))).ok()?;
        let depths = self.depths();
        let start = (0..self.lines.len())
            .find(|&idx| depths[idx] == 0 && header_re.is_match(&self.lines[idx]))?;
        let end = (start + 1..self.lines.len())
            .find(|&idx| depths[idx] == 1 && self.lines[idx].trim_start().starts_with('}'))
            .unwrap_or(self.lines.len());
        Some((start, end))
    }

    fn key_regex(syntax: &Syntax, key: &str) -> Option<Regex> {
        let terminator = if syntax.terminator.is_empty() {
            String::new()
        } else {
            format!(r"(?P<term>\s*{})?", regex::escape(syntax.terminator))
        };
        Regex::new(&format!(
            r"^(?P<lead>\s*){}(?P<sep>{})(?P<value>.*?){}\s*$",
            regex::escape(key),
            syntax.assign_re,
            terminator
        ))
        .ok()
    }

    /// Indices of lines eligible for a key lookup in `scope`
    fn scope_lines(&self, scope: Scope<'_>) -> Vec<usize> {
        let depths = self.depths();
        match scope {
            Scope::Anywhere => (0..self.lines.len()).collect(),
            Scope::TopLevel => (0..self.lines.len())
                .filter(|&idx| depths[idx] == 0 && !self.lines[idx].contains('{'))
                .collect(),
            Scope::Block(header) => match self.find_block(header) {
                Some((start, end)) => (start + 1..end)
                    .filter(|&idx| depths[idx] == 1 && !self.lines[idx].contains('{'))
                    .collect(),
                None => Vec::new(),
            },
        }
    }

    fn find_key(&self, syntax: &Syntax, scope: Scope<'_>, key: &str) -> Option<(usize, Regex)> {
        let re = Self::key_regex(syntax, key)?;
        let idx = self
            .scope_lines(scope)
            .into_iter()
            .find(|&idx| re.is_match(&self.lines[idx]))?;
        Some((idx, re))
    }

    /// Value of the first matching key line, without terminator
    pub fn get(&self, syntax: &Syntax, scope: Scope<'_>, key: &str) -> Option<String> {
        let (idx, re) = self.find_key(syntax, scope, key)?;
        let caps = re.captures(&self.lines[idx])?;
        Some(caps["value"].trim().to_string())
    }

    /// Replace the value of an existing key line, leaving leading whitespace
    /// and separator untouched. Returns false when no such line exists.
    pub fn replace(&mut self, syntax: &Syntax, scope: Scope<'_>, key: &str, value: &str) -> bool {
        let Some((idx, re)) = self.find_key(syntax, scope, key) else {
            return false;
        };
        let Some(caps) = re.captures(&self.lines[idx]) else {
            return false;
        };
        let replacement = format!(
            "{}{}{}{}{}",
            &caps["lead"],
            key,
            &caps["sep"],
            value,
            syntax.terminator
        );
        if self.lines[idx] != replacement {
            self.lines[idx] = replacement;
        }
        true
    }

    /// Find-or-insert a key in `scope`
    pub fn set(&mut self, syntax: &Syntax, scope: Scope<'_>, key: &str, value: &str) {
        if self.replace(syntax, scope, key, value) {
            return;
        }
        let entry = format!("{key}{}{value}{}", syntax.assign, syntax.terminator);

        match scope {
            Scope::TopLevel | Scope::Anywhere => self.lines.push(entry),
            Scope::Block(header) => match self.find_block(header) {
                Some((start, end)) => {
                    let indent = (start + 1..end)
                        .map(|idx| &self.lines[idx])
                        .find(|line| !line.trim().is_empty())
                        .map(|line| leading_whitespace(line).to_string())
                        .unwrap_or_else(|| format!("{}  ", leading_whitespace(&self.lines[start])));
                    self.lines.insert(end, format!("{indent}{entry}"));
                    if end == self.lines.len() - 1 {
                        // unterminated block; close it so the next lookup is stable
                        self.lines.push("}".to_string());
                    }
                }
                None => self.append_block(header, &[entry]),
            },
        }
    }

    /// Append `header {` + indented body + `}` at the end of the file
    pub fn append_block(&mut self, header: &str, body: &[String]) {
        if self.lines.last().is_some_and(|line| !line.trim().is_empty()) {
            self.lines.push(String::new());
        }
        self.lines.push(format!("{header} {{"));
        self.lines.extend(body.iter().map(|line| format!("  {line}")));
        self.lines.push("}".to_string());
    }

    pub fn to_text(&self) -> String {
        let mut out = self.lines.join(self.newline);
        if self.trailing_newline && !self.lines.is_empty() {
            out.push_str(self.newline);
        }
        out
    }

    /// Write the whole file, creating parent directories. Returns false when
    /// the file already had this content.
    pub fn save(&self, path: &Path) -> Result<bool> {
        super::write_if_changed(path, &self.to_text())
            .with_context(|| format!("Failed to save {}", path.display()))
    }
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

/// Wrap in double quotes (xsettingsd strings)
pub fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Strip one pair of surrounding double quotes
pub fn unquote(value: &str) -> String {
    let value = value.trim();
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL: &str = "# lxpanel <profile> config file\nGlobal {\n  edge=bottom\n  iconsize=36\n}\nPlugin {\n  type=taskbar\n  Config {\n    MaxTaskWidth=200\n  }\n}\n";

    #[test]
    fn test_get_in_block() {
        let file = LineFile::parse(PANEL);
        assert_eq!(file.get(&SHELL, Scope::Block("Global"), "edge").as_deref(), Some("bottom"));
        assert_eq!(file.get(&SHELL, Scope::Block("Global"), "MaxTaskWidth"), None);
        assert_eq!(
            file.get(&SHELL, Scope::Anywhere, "MaxTaskWidth").as_deref(),
            Some("200")
        );
    }

    #[test]
    fn test_replace_in_block_is_local() {
        let mut file = LineFile::parse(PANEL);
        file.set(&SHELL, Scope::Block("Global"), "edge", "top");
        assert_eq!(file.to_text(), PANEL.replace("edge=bottom", "edge=top"));
    }

    #[test]
    fn test_insert_missing_key_before_close() {
        let mut file = LineFile::parse(PANEL);
        file.set(&SHELL, Scope::Block("Global"), "monitor", "1");
        assert!(file
            .to_text()
            .contains("  iconsize=36\n  monitor=1\n}\nPlugin {"));
    }

    #[test]
    fn test_missing_block_is_appended() {
        let mut file = LineFile::parse("");
        file.set(&SHELL, Scope::Block("Global"), "edge", "top");
        assert_eq!(file.to_text(), "Global {\n  edge=top\n}\n");
    }

    #[test]
    fn test_patch_is_idempotent() {
        for start in [PANEL, "", "Global {\n  edge=bottom\n"] {
            let mut once = LineFile::parse(start);
            once.set(&SHELL, Scope::Block("Global"), "edge", "top");
            once.set(&SHELL, Scope::Block("Global"), "monitor", "0");
            let first = once.to_text();

            let mut twice = LineFile::parse(&first);
            twice.set(&SHELL, Scope::Block("Global"), "edge", "top");
            twice.set(&SHELL, Scope::Block("Global"), "monitor", "0");
            assert_eq!(twice.to_text(), first);
        }
    }

    #[test]
    fn test_css_define_color() {
        let css = "@define-color theme_selected_bg_color #87919b;\nbutton { color: red; }\n";
        let mut file = LineFile::parse(css);
        assert_eq!(
            file.get(&CSS_DEFINE, Scope::TopLevel, "@define-color theme_selected_bg_color")
                .as_deref(),
            Some("#87919b")
        );
        file.set(&CSS_DEFINE, Scope::TopLevel, "@define-color theme_selected_bg_color", "#ff0000");
        file.set(&CSS_DEFINE, Scope::TopLevel, "@define-color bar_bg_color", "#000000");
        assert_eq!(
            file.to_text(),
            "@define-color theme_selected_bg_color #ff0000;\nbutton { color: red; }\n@define-color bar_bg_color #000000;\n"
        );
    }

    #[test]
    fn test_css_block_property() {
        let mut file = LineFile::parse("scrollbar slider {\n    min-width: 13px;\n}\n");
        file.set(&CSS_PROPERTY, Scope::Block("scrollbar slider"), "min-width", "17px");
        file.set(&CSS_PROPERTY, Scope::Block("scrollbar slider"), "min-height", "17px");
        assert_eq!(
            file.to_text(),
            "scrollbar slider {\n    min-width: 17px;\n    min-height: 17px;\n}\n"
        );
    }

    #[test]
    fn test_spaced_keys_do_not_match_prefixes() {
        let file = LineFile::parse("Gtk/FontNameExtra \"x\"\nGtk/FontName \"Sans 12\"\n");
        assert_eq!(
            file.get(&SPACED, Scope::TopLevel, "Gtk/FontName").map(|v| unquote(&v)).as_deref(),
            Some("Sans 12")
        );
    }

    #[test]
    fn test_top_level_ignores_block_contents() {
        let file = LineFile::parse("Global {\n  edge=top\n}\n");
        assert_eq!(file.get(&SHELL, Scope::TopLevel, "edge"), None);
    }

    #[test]
    fn test_replace_reports_missing() {
        let mut file = LineFile::parse(PANEL);
        assert!(!file.replace(&SHELL, Scope::Anywhere, "nothing", "1"));
        assert!(file.replace(&SHELL, Scope::Anywhere, "MaxTaskWidth", "300"));
        assert!(file.to_text().contains("    MaxTaskWidth=300\n"));
    }

    #[test]
    fn test_quote_round_trip() {
        assert_eq!(quote("Sans 12"), "\"Sans 12\"");
        assert_eq!(unquote(&quote("a \"b\" c")), "a \"b\" c");
        assert_eq!(unquote("24"), "24");
    }

    #[test]
    fn test_no_trailing_newline_preserved() {
        let mut file = LineFile::parse("a=1");
        file.set(&SHELL, Scope::TopLevel, "a", "2");
        assert_eq!(file.to_text(), "a=2");
    }

    #[test]
    fn test_crlf_line_endings_kept() {
        let mut file = LineFile::parse("# panel\r\nGlobal {\r\n  edge=bottom\r\n}\r\n");
        file.set(&SHELL, Scope::Block("Global"), "edge", "top");
        file.set(&SHELL, Scope::Block("Global"), "iconsize", "36");
        assert_eq!(
            file.to_text(),
            "# panel\r\nGlobal {\r\n  edge=top\r\n  iconsize=36\r\n}\r\n"
        );
    }
}
