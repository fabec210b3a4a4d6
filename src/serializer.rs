//! Renders a [`Recipe`] back to markup.
//!
//! `parse(&serialize(&recipe)) == recipe` holds for recipes made of tokens
//! the markup can express, and `serialize` output is stable under a second
//! parse/serialize cycle.

use crate::model::{Ingredient, Recipe, RecipeRef, Step, Timer, Token};

/// A name that survives the bare `@name` / `#name` form.
fn is_bare_word(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with("./")
        && !name
            .chars()
            .any(|ch| ch.is_whitespace() || matches!(ch, ',' | '.' | '{' | '(' | '@' | '#' | '~'))
}

/// A `./path` that survives the bare `@./path` form.
fn is_bare_path(path: &str) -> bool {
    !path.ends_with('.')
        && !path
            .chars()
            .any(|ch| ch.is_whitespace() || matches!(ch, ',' | '{' | '@' | '#' | '~'))
}

/// The rest of the line after a token. A bare form is only safe when
/// the tokenizer would stop reading the name where the token ends.
#[derive(Clone, Copy)]
struct Follow<'a>(&'a str);

impl Follow<'_> {
    /// A `{` before the next trigger would be read as this token's braces.
    fn brace_ahead(self) -> bool {
        self.0
            .chars()
            .take_while(|&ch| !matches!(ch, '@' | '#' | '~'))
            .any(|ch| ch == '{')
    }

    /// Ends a bare ingredient or equipment name.
    fn ends_word(self) -> bool {
        let breaks = self
            .0
            .chars()
            .next()
            .map_or(true, |ch| ch.is_whitespace() || ch == ',' || ch == '.');
        breaks && !self.brace_ahead()
    }

    /// Ends a bare `./path`. A period only ends it before a word break,
    /// so it is not accepted here.
    fn ends_path(self) -> bool {
        let breaks = self
            .0
            .chars()
            .next()
            .map_or(true, |ch| ch.is_whitespace() || ch == ',');
        breaks && !self.brace_ahead()
    }
}

fn quantity(amount: &str, unit: &str) -> String {
    if unit.is_empty() {
        amount.to_string()
    } else {
        format!("{amount}%{unit}")
    }
}

fn ingredient(ingredient: &Ingredient, follow: Follow<'_>) -> String {
    let Ingredient {
        name,
        amount,
        unit,
        preparation,
        fixed,
    } = ingredient;

    let bare = amount.is_empty() && unit.is_empty() && !fixed && preparation.is_empty();
    if bare && is_bare_word(name) && follow.ends_word() {
        return format!("@{name}");
    }

    let marker = if *fixed { "=" } else { "" };
    let mut out = format!("@{name}{{{marker}{}}}", quantity(amount, unit));
    if !preparation.is_empty() {
        out.push_str(&format!("({preparation})"));
    }
    out
}

fn recipe_ref(reference: &RecipeRef, follow: Follow<'_>) -> String {
    let RecipeRef {
        reference,
        amount,
        unit,
    } = reference;

    if amount.is_empty() && unit.is_empty() {
        if is_bare_path(reference) && follow.ends_path() {
            format!("@{reference}")
        } else {
            format!("@{reference}{{}}")
        }
    } else {
        format!("@{reference}{{{amount}%{unit}}}")
    }
}

fn timer(timer: &Timer) -> String {
    format!("~{}{{{}%{}}}", timer.name, timer.duration, timer.unit)
}

fn render(token: &Token, follow: Follow<'_>) -> String {
    match token {
        Token::Text { value } => value.clone(),
        Token::Ingredient(i) => ingredient(i, follow),
        Token::Equipment { name } if is_bare_word(name) && follow.ends_word() => {
            format!("#{name}")
        }
        Token::Equipment { name } => format!("#{name}{{}}"),
        Token::Timer(t) => timer(t),
        Token::InlineComment { value } => format!("-- {value}"),
        Token::BlockComment { value } => format!("[- {value} -]"),
        Token::RecipeRef(r) => recipe_ref(r, follow),
    }
}

/// Render a single token as if it ended the line.
pub fn serialize_token(token: &Token) -> String {
    render(token, Follow(""))
}

/// Render a step as one line, `> ` prefixed for notes.
pub fn serialize_step(step: &Step) -> String {
    // right to left, so every token sees the rest of its line
    let mut body = String::new();
    for token in step.tokens.iter().rev() {
        let rendered = render(token, Follow(&body));
        body.insert_str(0, &rendered);
    }
    if step.is_note {
        format!("> {body}")
    } else {
        body
    }
}

/// Render a whole recipe.
pub fn serialize(recipe: &Recipe) -> String {
    let mut lines: Vec<String> = recipe
        .metadata
        .iter()
        .map(|(key, value)| format!(">> {key}: {value}"))
        .collect();

    if !lines.is_empty() && !recipe.sections.is_empty() {
        lines.push(String::new());
    }

    for (index, section) in recipe.sections.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        // an unnamed section after the first needs a bare `=` to stay separate
        if !section.name.is_empty() || index > 0 {
            lines.push(format!("= {}", section.name).trim_end().to_string());
            if !section.steps.is_empty() {
                lines.push(String::new());
            }
        }
        lines.extend(section.steps.iter().map(serialize_step));
    }

    lines.join("\n")
}
