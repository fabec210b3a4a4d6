//! Document parser: classifies lines, drives the tokenizer and assembles a
//! [`Recipe`].

use crate::model::{Metadata, Recipe, Section, Step, Token};
use crate::tokenizer::tokenize;

/// Classification of one trimmed line in the normal (non block comment) state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `>> key: value`
    Metadata { key: String, value: &'a str },
    /// `>>` line without a `:`, dropped
    MalformedMetadata,
    /// `> text`
    Note(&'a str),
    Blank,
    /// `= Name`, `== Name ==`
    SectionHeader(&'a str),
    Step(&'a str),
}

/// Name of a section header line, if `line` is one.
fn section_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('=')?;
    let name = rest.trim_start_matches('=').trim();
    Some(name.trim_end_matches('=').trim_end())
}

/// Classify an already trimmed line.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix(">>") {
        return match rest.split_once(':') {
            Some((key, value)) => LineKind::Metadata {
                key: key.trim().to_lowercase(),
                value: value.trim(),
            },
            None => LineKind::MalformedMetadata,
        };
    }
    if let Some(rest) = line.strip_prefix('>') {
        return LineKind::Note(rest.trim());
    }
    if line.is_empty() {
        return LineKind::Blank;
    }
    if let Some(name) = section_name(line) {
        return LineKind::SectionHeader(name);
    }
    LineKind::Step(line)
}

struct DocumentBuilder {
    metadata: Metadata,
    sections: Vec<Section>,
    current: Section,
    /// Accumulated text of a block comment spanning several lines
    open_comment: Option<String>,
}

impl DocumentBuilder {
    fn new() -> Self {
        DocumentBuilder {
            metadata: Metadata::new(),
            sections: Vec::new(),
            current: Section::new(""),
            open_comment: None,
        }
    }

    fn line(&mut self, raw: &str) {
        let line = raw.trim();

        if let Some(mut comment) = self.open_comment.take() {
            match line.find("-]") {
                Some(close) => {
                    comment.push('\n');
                    comment.push_str(&line[..close]);
                    self.current
                        .steps
                        .push(Step::new(vec![Token::block_comment(comment.trim())]));

                    let remaining = line[close + 2..].trim();
                    if !remaining.is_empty() {
                        self.tokenized_step(remaining, false);
                    }
                }
                None => {
                    comment.push('\n');
                    comment.push_str(line);
                    self.open_comment = Some(comment);
                }
            }
            return;
        }

        match classify_line(line) {
            LineKind::Metadata { key, value } => self.metadata.insert(key, value),
            LineKind::MalformedMetadata | LineKind::Blank => {}
            LineKind::Note(text) => self.tokenized_step(text, true),
            LineKind::SectionHeader(name) => {
                let next = Section::new(name);
                let finished = std::mem::replace(&mut self.current, next);
                if !finished.steps.is_empty() {
                    self.sections.push(finished);
                }
            }
            LineKind::Step(text) => self.tokenized_step(text, false),
        }
    }

    /// Tokenize `text` into one step. An unclosed block comment pushes the
    /// tokens before it (if any) and switches to block comment accumulation.
    fn tokenized_step(&mut self, text: &str, is_note: bool) {
        let result = tokenize(text);
        let step = Step {
            tokens: result.tokens,
            is_note,
        };

        match result.open_block_comment {
            Some(open) => {
                if !step.tokens.is_empty() {
                    self.current.steps.push(step);
                }
                self.open_comment = Some(open);
            }
            None => self.current.steps.push(step),
        }
    }

    fn finish(mut self) -> Recipe {
        // a block comment still open at end of input keeps what was collected
        if let Some(comment) = self.open_comment.take() {
            let value = comment.trim();
            if !value.is_empty() {
                self.current
                    .steps
                    .push(Step::new(vec![Token::block_comment(value)]));
            }
        }
        if !self.current.steps.is_empty() {
            self.sections.push(self.current);
        }
        Recipe {
            metadata: self.metadata,
            sections: self.sections,
        }
    }
}

/// Parse a complete recipe document.
///
/// Every non-blank line that is not metadata or a section header becomes
/// exactly one step. Steps before the first section header belong to an
/// unnamed section. Sections without steps are dropped.
pub fn parse(text: &str) -> Recipe {
    let mut builder = DocumentBuilder::new();
    for line in text.lines() {
        builder.line(line);
    }
    builder.finish()
}
