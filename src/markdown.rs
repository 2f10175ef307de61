//! Markdown formatting for assistant replies.
//!
//! Replies are parsed with pulldown-cmark and flattened into terminal text,
//! optionally styled with ANSI escapes. Code blocks can additionally be run
//! through a small keyword highlighter; the reveal animation formats partial
//! text without it and highlights only the final frame.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_ITALIC: &str = "\x1b[3m";
const ANSI_UNDERLINE: &str = "\x1b[4m";
const ANSI_STRIKE: &str = "\x1b[9m";
const ANSI_RESET: &str = "\x1b[0m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_BLUE: &str = "\x1b[34m";
const ANSI_CYAN: &str = "\x1b[36m";

/// Indentation applied to code block lines.
const CODE_INDENT: &str = "    ";

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "case", "catch", "class", "const", "continue", "def",
    "default", "defer", "del", "elif", "else", "enum", "except", "export", "extends", "false",
    "finally", "fn", "for", "from", "func", "function", "go", "if", "impl", "import", "in",
    "interface", "let", "loop", "match", "mod", "mut", "new", "nil", "None", "null", "package",
    "pass", "pub", "raise", "return", "self", "Self", "static", "struct", "super", "switch", "this",
    "throw", "trait", "true", "True", "False", "try", "type", "use", "var", "void", "where",
    "while", "with", "yield",
];

const HASH_COMMENT_LANGUAGES: &[&str] = &[
    "bash", "python", "py", "ruby", "rb", "sh", "shell", "toml", "yaml", "yml", "zsh", "perl",
    "r", "dockerfile", "makefile",
];

/// Formats markdown for display in a terminal.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownFormatter {
    use_color: bool,
}

impl MarkdownFormatter {
    /// Create a formatter; without color the output is plain text.
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Whether the formatter emits ANSI styles.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Format `markdown`, highlighting code blocks when `highlight` is set.
    ///
    /// Soft line breaks are kept as line breaks. The result never ends in a
    /// newline.
    pub fn render(&self, markdown: &str, highlight: bool) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut writer = TerminalWriter::new(self.use_color, highlight);
        for event in Parser::new_ext(markdown, options) {
            writer.event(event);
        }
        writer.finish()
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Highlight one block of source code.
///
/// Keywords, string literals, numbers and line comments are colored. The
/// language tag only decides whether `#` starts a comment; without a tag a
/// `#` at the start of a line does.
pub fn highlight_code(code: &str, lang: Option<&str>, use_color: bool) -> String {
    if !use_color {
        return code.to_string();
    }
    let hash_comments = lang
        .map(|l| HASH_COMMENT_LANGUAGES.contains(&l.to_lowercase().as_str()))
        .unwrap_or(false);
    code.split('\n')
        .map(|line| {
            let hash_line = lang.is_none() && line.trim_start().starts_with('#');
            highlight_line(line, hash_comments || hash_line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '_'
}

fn highlight_line(line: &str, hash_comments: bool) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let line_comment =
            (c == '/' && chars.get(i + 1) == Some(&'/')) || (c == '#' && hash_comments);
        if line_comment {
            let rest: String = chars[i..].iter().collect();
            out.push_str(&format!("{ANSI_DIM}{rest}{ANSI_RESET}"));
            break;
        }
        if c == '"' || c == '\'' || c == '`' {
            let start = i;
            i += 1;
            while i < chars.len() && chars[i] != c {
                if chars[i] == '\\' {
                    i += 1;
                }
                i += 1;
            }
            let end = (i + 1).min(chars.len());
            let literal: String = chars[start..end].iter().collect();
            out.push_str(&format!("{ANSI_GREEN}{literal}{ANSI_RESET}"));
            i = end;
            continue;
        }
        if c.is_ascii_digit() {
            let start = i;
            while i < chars.len() && is_number_char(chars[i]) {
                i += 1;
            }
            let number: String = chars[start..i].iter().collect();
            out.push_str(&format!("{ANSI_YELLOW}{number}{ANSI_RESET}"));
            continue;
        }
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            if KEYWORDS.contains(&word.as_str()) {
                out.push_str(&format!("{ANSI_BLUE}{word}{ANSI_RESET}"));
            } else {
                out.push_str(&word);
            }
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

struct CodeBlock {
    lang: Option<String>,
    text: String,
}

struct TerminalWriter {
    use_color: bool,
    highlight: bool,
    out: String,
    styles: Vec<&'static str>,
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    code: Option<CodeBlock>,
    links: Vec<String>,
    at_line_start: bool,
    item_head: bool,
}

impl TerminalWriter {
    fn new(use_color: bool, highlight: bool) -> Self {
        Self {
            use_color,
            highlight,
            out: String::new(),
            styles: Vec::new(),
            lists: Vec::new(),
            quote_depth: 0,
            code: None,
            links: Vec::new(),
            at_line_start: true,
            item_head: false,
        }
    }

    fn finish(mut self) -> String {
        if self.use_color && !self.styles.is_empty() {
            self.out.push_str(ANSI_RESET);
        }
        let trimmed = self.out.trim_end_matches('\n').len();
        self.out.truncate(trimmed);
        self.out
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => {
                if let Some(code) = self.code.as_mut() {
                    code.text.push_str(&text);
                } else {
                    self.write_text(&text);
                }
            }
            Event::Code(code) => {
                if self.use_color {
                    self.write_styled(ANSI_CYAN, &code);
                } else {
                    self.write_text(&format!("`{code}`"));
                }
            }
            Event::SoftBreak | Event::HardBreak => self.newline(),
            Event::Html(html) | Event::InlineHtml(html) => self.write_text(&html),
            Event::TaskListMarker(checked) => {
                self.write_text(if checked { "[x] " } else { "[ ] " });
            }
            Event::Rule => {
                self.block_gap();
                if self.use_color {
                    self.write_styled(ANSI_DIM, "────────");
                } else {
                    self.write_text("---");
                }
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if !self.item_head {
                    self.block_gap();
                }
            }
            Tag::Heading { level, .. } => {
                self.block_gap();
                if self.use_color {
                    self.push_style(ANSI_BOLD);
                } else {
                    let marks = "#".repeat(level as usize);
                    self.write_text(&format!("{marks} "));
                }
            }
            Tag::CodeBlock(kind) => {
                self.block_gap();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|l| l.to_string())
                        .filter(|l| !l.is_empty()),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeBlock {
                    lang,
                    text: String::new(),
                });
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.block_gap();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.ensure_newlines(1);
                let depth = self.lists.len().saturating_sub(1);
                let bullet = match self.lists.last_mut() {
                    Some(Some(number)) => {
                        let bullet = format!("{number}. ");
                        *number += 1;
                        bullet
                    }
                    _ => "- ".to_string(),
                };
                let prefix = format!("{}{}{}", self.quote_prefix(), "  ".repeat(depth), bullet);
                self.out.push_str(&prefix);
                self.at_line_start = false;
                self.item_head = true;
            }
            Tag::BlockQuote(_) => {
                self.block_gap();
                self.quote_depth += 1;
            }
            Tag::Emphasis => self.push_style(ANSI_ITALIC),
            Tag::Strong => self.push_style(ANSI_BOLD),
            Tag::Strikethrough => self.push_style(ANSI_STRIKE),
            Tag::Link { dest_url, .. } => {
                self.links.push(dest_url.to_string());
                self.push_style(ANSI_UNDERLINE);
            }
            Tag::Image { .. } => self.write_text("[image] "),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                if self.use_color {
                    self.pop_style();
                }
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    self.write_code_block(code);
                }
            }
            TagEnd::List(_) => {
                self.lists.pop();
            }
            TagEnd::Item => self.item_head = false,
            TagEnd::BlockQuote(_) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.links.pop().filter(|u| !u.is_empty()) {
                    self.write_text(&format!(" ({url})"));
                }
            }
            _ => {}
        }
    }

    fn write_code_block(&mut self, code: CodeBlock) {
        let source = code.text.trim_end_matches('\n');
        let body = if self.highlight {
            highlight_code(source, code.lang.as_deref(), self.use_color)
        } else {
            source.to_string()
        };
        for (i, line) in body.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }
            self.write_text(&format!("{CODE_INDENT}{line}"));
        }
    }

    fn quote_prefix(&self) -> String {
        if self.use_color {
            format!("{ANSI_DIM}│{ANSI_RESET} ").repeat(self.quote_depth)
        } else {
            "> ".repeat(self.quote_depth)
        }
    }

    fn line_prefix(&self) -> String {
        format!("{}{}", self.quote_prefix(), "  ".repeat(self.lists.len()))
    }

    fn trailing_newlines(&self) -> usize {
        self.out.chars().rev().take_while(|c| *c == '\n').count()
    }

    fn ensure_newlines(&mut self, count: usize) {
        if self.out.is_empty() {
            return;
        }
        for _ in self.trailing_newlines()..count {
            self.out.push('\n');
        }
        self.at_line_start = true;
    }

    fn block_gap(&mut self) {
        let count = if self.lists.is_empty() { 2 } else { 1 };
        self.ensure_newlines(count);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
    }

    fn write_text(&mut self, text: &str) {
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }
            if part.is_empty() {
                continue;
            }
            if self.at_line_start {
                let prefix = self.line_prefix();
                self.out.push_str(&prefix);
                self.at_line_start = false;
            }
            self.out.push_str(part);
            self.item_head = false;
        }
    }

    fn write_styled(&mut self, style: &'static str, text: &str) {
        self.push_style(style);
        self.write_text(text);
        self.pop_style();
    }

    fn push_style(&mut self, style: &'static str) {
        if !self.use_color {
            return;
        }
        self.styles.push(style);
        self.out.push_str(style);
    }

    fn pop_style(&mut self) {
        if !self.use_color || self.styles.pop().is_none() {
            return;
        }
        self.out.push_str(ANSI_RESET);
        for style in &self.styles {
            self.out.push_str(style);
        }
    }
}

/// Wrap `text` in the error color when color is enabled.
pub(crate) fn error_text(text: &str, use_color: bool) -> String {
    if use_color {
        format!("{ANSI_RED}{text}{ANSI_RESET}")
    } else {
        text.to_string()
    }
}

/// Wrap `text` in the dim style when color is enabled.
pub(crate) fn dim_text(text: &str, use_color: bool) -> String {
    if use_color {
        format!("{ANSI_DIM}{text}{ANSI_RESET}")
    } else {
        text.to_string()
    }
}
