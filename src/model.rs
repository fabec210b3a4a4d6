use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An ingredient reference inside a step, e.g. `@Hackfleisch{500%g}(angebraten)`.
///
/// `amount`, `unit` and `preparation` are kept as raw strings. Numeric
/// interpretation only happens when scaling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
    pub unit: String,
    pub preparation: String,
    /// Exempt from serving-based scaling (`@Salz{=1%TL}`)
    #[serde(default)]
    pub fixed: bool,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Ingredient {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_amount(mut self, amount: impl Into<String>, unit: impl Into<String>) -> Self {
        self.amount = amount.into();
        self.unit = unit.into();
        self
    }

    pub fn with_preparation(mut self, preparation: impl Into<String>) -> Self {
        self.preparation = preparation.into();
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub name: String,
    /// A single number or a range such as `5-7`
    pub duration: String,
    pub unit: String,
}

/// A reference to another recipe used in ingredient position (`@./Hollandaise{150%g}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRef {
    /// Relative identifier, always starting with `./`
    #[serde(rename = "ref")]
    pub reference: String,
    pub amount: String,
    pub unit: String,
}

impl RecipeRef {
    /// The referenced recipe id without the `./` prefix.
    pub fn target(&self) -> &str {
        self.reference
            .strip_prefix("./")
            .unwrap_or(&self.reference)
    }
}

/// Smallest classified unit of a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Token {
    Text { value: String },
    Ingredient(Ingredient),
    Equipment { name: String },
    Timer(Timer),
    InlineComment { value: String },
    /// May contain embedded newlines when the comment spanned several lines
    BlockComment { value: String },
    RecipeRef(RecipeRef),
}

impl Token {
    pub fn text(value: impl Into<String>) -> Self {
        Token::Text {
            value: value.into(),
        }
    }

    pub fn equipment(name: impl Into<String>) -> Self {
        Token::Equipment { name: name.into() }
    }

    pub fn inline_comment(value: impl Into<String>) -> Self {
        Token::InlineComment {
            value: value.into(),
        }
    }

    pub fn block_comment(value: impl Into<String>) -> Self {
        Token::BlockComment {
            value: value.into(),
        }
    }
}

/// One markup line worth of tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub tokens: Vec<Token>,
    /// An aside, never itself a preparation instruction
    #[serde(rename = "isNote", default)]
    pub is_note: bool,
}

impl Step {
    pub fn new(tokens: Vec<Token>) -> Self {
        Step {
            tokens,
            is_note: false,
        }
    }

    pub fn note(tokens: Vec<Token>) -> Self {
        Step {
            tokens,
            is_note: true,
        }
    }
}

/// A named or unnamed (`name == ""`) group of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Section {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn with_steps(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Section {
            name: name.into(),
            steps,
        }
    }
}

/// Recipe metadata: lowercase keys mapped to values, in insertion order.
///
/// Inserting an existing key replaces its value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut metadata = Metadata::new();
        for (key, value) in iter {
            metadata.insert(key, value);
        }
        metadata
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct MetadataVisitor;

impl<'de> Visitor<'de> for MetadataVisitor {
    type Value = Metadata;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of metadata keys to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut metadata = Metadata::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            metadata.insert(key, value);
        }
        Ok(metadata)
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MetadataVisitor)
    }
}

/// A parsed recipe document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub metadata: Metadata,
    pub sections: Vec<Section>,
}

impl Recipe {
    fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sections
            .iter()
            .flat_map(|section| section.steps.iter())
            .flat_map(|step| step.tokens.iter())
    }

    /// All ingredient tokens in document order.
    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.tokens().filter_map(|token| match token {
            Token::Ingredient(ingredient) => Some(ingredient),
            _ => None,
        })
    }

    pub fn recipe_refs(&self) -> impl Iterator<Item = &RecipeRef> {
        self.tokens().filter_map(|token| match token {
            Token::RecipeRef(reference) => Some(reference),
            _ => None,
        })
    }

    pub fn equipment(&self) -> impl Iterator<Item = &str> {
        self.tokens().filter_map(|token| match token {
            Token::Equipment { name } => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn timers(&self) -> impl Iterator<Item = &Timer> {
        self.tokens().filter_map(|token| match token {
            Token::Timer(timer) => Some(timer),
            _ => None,
        })
    }

    /// Leading integer of the `servings` metadata value, if there is one.
    pub fn servings(&self) -> Option<u32> {
        self.metadata
            .get("servings")
            .and_then(crate::scale::leading_integer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_overwrite_keeps_position() {
        let mut metadata = Metadata::new();
        metadata.insert("servings", "2");
        metadata.insert("course", "Hauptgericht");
        metadata.insert("servings", "4");

        let entries: Vec<_> = metadata.iter().collect();
        assert_eq!(entries, vec![("servings", "4"), ("course", "Hauptgericht")]);
    }

    #[test]
    fn test_token_json_shape() {
        let token = Token::Ingredient(Ingredient::new("Mehl").with_amount("500", "g"));
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["type"], "ingredient");
        assert_eq!(json["name"], "Mehl");
        assert_eq!(json["amount"], "500");
        assert_eq!(json["fixed"], false);

        let reference = Token::RecipeRef(RecipeRef {
            reference: "./Hollandaise".to_string(),
            amount: "150".to_string(),
            unit: "g".to_string(),
        });
        let json = serde_json::to_value(&reference).unwrap();
        assert_eq!(json["type"], "recipeRef");
        assert_eq!(json["ref"], "./Hollandaise");
    }

    #[test]
    fn test_recipe_json_keeps_metadata_order() {
        let recipe = Recipe {
            metadata: [("time required", "10 Minuten"), ("servings", "2")]
                .into_iter()
                .collect(),
            sections: vec![],
        };
        let json = serde_json::to_string(&recipe).unwrap();
        assert_eq!(
            json,
            r#"{"metadata":{"time required":"10 Minuten","servings":"2"},"sections":[]}"#
        );

        let back: Recipe = serde_json::from_str(&json).unwrap();
        assert_eq!(back, recipe);
    }

    #[test]
    fn test_recipe_ref_target() {
        let reference = RecipeRef {
            reference: "./Teig/Mürbeteig".to_string(),
            ..Default::default()
        };
        assert_eq!(reference.target(), "Teig/Mürbeteig");
    }
}
