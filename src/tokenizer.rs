//! Line tokenizer for the recipe markup.
//!
//! The tokenizer is total: every input produces a token sequence. Constructs
//! whose closing delimiter is missing fall back to literal text, with the one
//! exception of a block comment that stays open at the end of the line, which
//! is handed back to the caller through [`TokenizedLine::open_block_comment`].

use crate::model::{Ingredient, RecipeRef, Timer, Token};

/// Result of tokenizing a single line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedLine {
    pub tokens: Vec<Token>,
    /// Everything after an unclosed `[-`, untrimmed
    pub open_block_comment: Option<String>,
}

fn is_trigger(ch: char) -> bool {
    matches!(ch, '@' | '#' | '~')
}

fn ends_word(ch: char) -> bool {
    ch.is_whitespace() || ch == ',' || ch == '.'
}

/// Split brace content on the first `%` into (amount, unit).
fn split_quantity(content: &str) -> (String, String) {
    match content.split_once('%') {
        Some((amount, unit)) => (amount.to_string(), unit.to_string()),
        None => (content.to_string(), String::new()),
    }
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    text: String,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(line: &str) -> Self {
        Lexer {
            chars: line.chars().collect(),
            pos: 0,
            text: String::new(),
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> TokenizedLine {
        let mut open_block_comment = None;

        while self.pos < self.chars.len() {
            let ch = self.chars[self.pos];
            let next = self.chars.get(self.pos + 1).copied();

            match (ch, next) {
                ('[', Some('-')) => {
                    if let Some(rest) = self.block_comment() {
                        open_block_comment = Some(rest);
                        break;
                    }
                }
                ('-', Some('-')) => {
                    let value = self.slice(self.pos + 2, self.chars.len());
                    self.push(Token::inline_comment(value.trim()));
                    break;
                }
                ('@', _) => self.ingredient(),
                ('#', _) => self.equipment(),
                ('~', _) => self.timer(),
                _ => {
                    self.text.push(ch);
                    self.pos += 1;
                }
            }
        }

        self.flush_text();
        TokenizedLine {
            tokens: self.tokens,
            open_block_comment,
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    fn find(&self, needle: char, from: usize) -> Option<usize> {
        (from..self.chars.len()).find(|&i| self.chars[i] == needle)
    }

    fn find_pair(&self, first: char, second: char, from: usize) -> Option<usize> {
        (from..self.chars.len().saturating_sub(1))
            .find(|&i| self.chars[i] == first && self.chars[i + 1] == second)
    }

    /// Index of `{` between `from` and the next trigger character or end of line.
    fn brace_before_next_trigger(&self, from: usize) -> Option<usize> {
        for i in from..self.chars.len() {
            match self.chars[i] {
                '{' => return Some(i),
                ch if is_trigger(ch) => return None,
                _ => {}
            }
        }
        None
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let value = std::mem::take(&mut self.text);
            self.tokens.push(Token::Text { value });
        }
    }

    fn push(&mut self, token: Token) {
        self.flush_text();
        self.tokens.push(token);
    }

    /// The trigger at `pos` does not start a well-formed construct.
    fn literal(&mut self) {
        self.text.push(self.chars[self.pos]);
        self.pos += 1;
    }

    /// Read a bare name terminated by whitespace, comma, period or end of line.
    fn read_word(&self, start: usize) -> (String, usize) {
        let end = (start..self.chars.len())
            .find(|&i| ends_word(self.chars[i]))
            .unwrap_or(self.chars.len());
        (self.slice(start, end), end)
    }

    /// Read a bare `./path` reference. Periods are allowed inside the path,
    /// trailing ones belong to the surrounding sentence.
    fn read_ref_path(&self, start: usize) -> (String, usize) {
        let mut end = (start..self.chars.len())
            .find(|&i| self.chars[i].is_whitespace() || self.chars[i] == ',')
            .unwrap_or(self.chars.len());
        while end > start + 2 && self.chars[end - 1] == '.' {
            end -= 1;
        }
        (self.slice(start, end), end)
    }

    /// `(preparation)` directly after a closing brace, no whitespace allowed.
    fn read_preparation(&self, pos: usize) -> (String, usize) {
        if self.chars.get(pos) == Some(&'(') {
            if let Some(close) = self.find(')', pos + 1) {
                return (self.slice(pos + 1, close).trim().to_string(), close + 1);
            }
        }
        (String::new(), pos)
    }

    fn ingredient(&mut self) {
        let start = self.pos + 1;

        let Some(open) = self.brace_before_next_trigger(start) else {
            let is_ref = self.chars.get(start) == Some(&'.') && self.chars.get(start + 1) == Some(&'/');
            if is_ref {
                let (reference, end) = self.read_ref_path(start);
                self.push(Token::RecipeRef(RecipeRef {
                    reference,
                    amount: String::new(),
                    unit: String::new(),
                }));
                self.pos = end;
            } else {
                let (name, end) = self.read_word(start);
                self.push(Token::Ingredient(Ingredient::new(name)));
                self.pos = end;
            }
            return;
        };

        let Some(close) = self.find('}', open + 1) else {
            return self.literal();
        };

        let name = self.slice(start, open);
        let (amount, unit) = split_quantity(&self.slice(open + 1, close));

        if name.starts_with("./") {
            self.push(Token::RecipeRef(RecipeRef {
                reference: name,
                amount,
                unit,
            }));
            self.pos = close + 1;
            return;
        }

        let (amount, fixed) = match amount.strip_prefix('=') {
            Some(stripped) => (stripped.to_string(), true),
            None => (amount, false),
        };
        let (preparation, end) = self.read_preparation(close + 1);

        self.push(Token::Ingredient(Ingredient {
            name,
            amount,
            unit,
            preparation,
            fixed,
        }));
        self.pos = end;
    }

    fn equipment(&mut self) {
        let start = self.pos + 1;

        match self.brace_before_next_trigger(start) {
            Some(open) => {
                // brace content is ignored, `{}` only closes a multi-word name
                let Some(close) = self.find('}', open + 1) else {
                    return self.literal();
                };
                let name = self.slice(start, open);
                self.push(Token::Equipment { name });
                self.pos = close + 1;
            }
            None => {
                let (name, end) = self.read_word(start);
                self.push(Token::Equipment { name });
                self.pos = end;
            }
        }
    }

    fn timer(&mut self) {
        let start = self.pos + 1;

        let Some(open) = self.brace_before_next_trigger(start) else {
            return self.literal();
        };
        let Some(close) = self.find('}', open + 1) else {
            return self.literal();
        };

        let name = self.slice(start, open);
        let (duration, unit) = split_quantity(&self.slice(open + 1, close));
        self.push(Token::Timer(Timer {
            name,
            duration,
            unit,
        }));
        self.pos = close + 1;
    }

    /// Handle `[-` at `pos`. Returns the unclosed remainder if the comment
    /// does not end on this line.
    fn block_comment(&mut self) -> Option<String> {
        let body = self.pos + 2;
        match self.find_pair('-', ']', body) {
            Some(close) => {
                let value = self.slice(body, close);
                self.push(Token::block_comment(value.trim()));
                self.pos = close + 2;
                None
            }
            None => {
                self.flush_text();
                let rest = self.slice(body, self.chars.len());
                self.pos = self.chars.len();
                Some(rest)
            }
        }
    }
}

/// Tokenize one line of markup.
pub fn tokenize(line: &str) -> TokenizedLine {
    Lexer::new(line).run()
}
