//! Generator-driven checks for the tokenizer, parser and serializer.
//!
//! Recipes are generated from the tokens the markup can express: names and
//! free text avoid the trigger and bracket characters, comments carry no
//! `-`, and adjacent text runs are merged the way the tokenizer emits them.

use kochbuch::{
    parse, serialize, tokenize, Ingredient, Metadata, Recipe, RecipeRef, Section, Step, Timer,
    Token,
};
use proptest::prelude::*;

fn text_token() -> impl Strategy<Value = Token> {
    "[ ,.]?[A-Za-zäöüß0-9][A-Za-zäöüß0-9 ,.]{0,12}".prop_map(Token::text)
}

fn quantity() -> impl Strategy<Value = (String, String)> {
    ("([0-9]{1,3}(/[1-9]|-[0-9]{1,2}|\\.[0-9])?)?", "[A-Za-z]{0,4}")
}

fn words() -> impl Strategy<Value = String> {
    "([a-zäöü]{1,6}( [a-zäöü]{1,6}){0,2})?"
}

fn ingredient_token() -> impl Strategy<Value = Token> {
    ("[A-Za-zäöü .,]{0,10}", quantity(), words(), any::<bool>()).prop_map(
        |(name, (amount, unit), preparation, fixed)| {
            Token::Ingredient(Ingredient {
                name,
                amount,
                unit,
                preparation,
                fixed,
            })
        },
    )
}

fn recipe_ref_token() -> impl Strategy<Value = Token> {
    ("\\./[A-Za-zäöü][A-Za-zäöü /]{0,10}", quantity()).prop_map(|(reference, (amount, unit))| {
        Token::RecipeRef(RecipeRef {
            reference,
            amount,
            unit,
        })
    })
}

fn timer_token() -> impl Strategy<Value = Token> {
    ("[A-Za-zäöü ]{0,8}", quantity()).prop_map(|(name, (duration, unit))| {
        Token::Timer(Timer {
            name,
            duration,
            unit,
        })
    })
}

fn inline_token() -> impl Strategy<Value = Token> {
    prop_oneof![
        3 => text_token(),
        2 => ingredient_token(),
        1 => "[A-Za-zäöü .,]{0,10}".prop_map(Token::equipment),
        1 => timer_token(),
        1 => recipe_ref_token(),
        1 => words().prop_map(Token::block_comment),
    ]
}

/// Merge adjacent text and trim the ends of the line, as `parse` would.
fn normalize_line(tokens: Vec<Token>, comment: Option<String>) -> Vec<Token> {
    let mut line: Vec<Token> = Vec::new();
    for token in tokens {
        if let Token::Text { value: next } = &token {
            if let Some(Token::Text { value }) = line.last_mut() {
                value.push_str(next);
                continue;
            }
        }
        line.push(token);
    }
    if let Some(Token::Text { value }) = line.first_mut() {
        *value = value.trim_start().to_string();
    }
    if comment.is_none() {
        if let Some(Token::Text { value }) = line.last_mut() {
            *value = value.trim_end().to_string();
        }
    }
    line.retain(|token| !matches!(token, Token::Text { value } if value.is_empty()));
    line.extend(comment.map(Token::inline_comment));
    line
}

fn step() -> impl Strategy<Value = Step> {
    (
        prop::collection::vec(inline_token(), 1..6),
        prop::option::of(words()),
        any::<bool>(),
    )
        .prop_map(|(tokens, comment, is_note)| Step {
            tokens: normalize_line(tokens, comment),
            is_note,
        })
        .prop_filter("step renders to a non-blank line", |step| {
            !step.tokens.is_empty()
        })
}

fn section() -> impl Strategy<Value = Section> {
    (
        prop_oneof![Just(String::new()), "[A-Za-zäöü]{1,8}( [A-Za-zäöü]{1,8})?"],
        prop::collection::vec(step(), 1..4),
    )
        .prop_map(|(name, steps)| Section::with_steps(name, steps))
}

fn recipe() -> impl Strategy<Value = Recipe> {
    (
        prop::collection::vec(
            (
                "[a-z]{1,6}( [a-z]{1,6})?",
                "[A-Za-z0-9äöü]{1,6}([ ,:][A-Za-z0-9äöü]{1,6})?",
            ),
            0..4,
        ),
        prop::collection::vec(section(), 0..4),
    )
        .prop_map(|(metadata, sections)| Recipe {
            metadata: metadata.into_iter().collect::<Metadata>(),
            sections,
        })
}

proptest! {
    #[test]
    fn test_tokenize_never_panics(line in any::<String>()) {
        let _ = tokenize(&line);
    }

    #[test]
    fn test_parse_never_panics(text in any::<String>()) {
        let recipe = parse(&text);
        let _ = serialize(&recipe);
    }

    #[test]
    fn test_parse_never_panics_on_markup_soup(text in "[@#~{}()%=\\[\\]> a-zäß./,\n-]{0,80}") {
        let recipe = parse(&text);
        let _ = serialize(&recipe);
    }

    #[test]
    fn test_parse_of_serialize_is_identity(recipe in recipe()) {
        let text = serialize(&recipe);
        prop_assert_eq!(parse(&text), recipe, "markup was {:?}", text);
    }

    #[test]
    fn test_serialize_is_idempotent(recipe in recipe()) {
        let once = serialize(&recipe);
        let twice = serialize(&parse(&once));
        prop_assert_eq!(twice, once);
    }
}
