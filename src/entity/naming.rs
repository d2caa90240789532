use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use super::EntityType;

/// Derives a table name for entity types without an explicit mapping.
pub trait NamingConvention: Send + Sync {
    fn table_name(&self, entity: &EntityType) -> String;
}

/// Built-in conventions, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStyle {
    /// The type's own name; generic arguments are joined with `_`
    /// (`Wrapper<Inner>` -> `Wrapper_Inner`).
    #[default]
    TypeName,
    /// `OrderLine` -> `order_line`
    SnakeCase,
    /// `OrderLine` -> `order_lines`
    SnakePlural,
}

impl NamingConvention for NamingStyle {
    fn table_name(&self, entity: &EntityType) -> String {
        let name = flatten_generics(entity.name());
        match self {
            Self::TypeName => name,
            Self::SnakeCase => sanitize_identifier(&name.to_case(Case::Snake)),
            Self::SnakePlural => pluralize(&sanitize_identifier(&name.to_case(Case::Snake))),
        }
    }
}

/// Joins the identifiers of a generic type name with single underscores.
fn flatten_generics(name: &str) -> String {
    name.split(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Replaces anything that is not alphanumeric with `_` and lowercases the result.
fn sanitize_identifier(input: &str) -> String {
    input
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        let before = stem.chars().last();
        if before.is_some_and(|ch| !"aeiou".contains(ch)) {
            return format!("{}ies", stem);
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| word.ends_with(suffix)) {
        return format!("{}es", word);
    }
    format!("{}s", word)
}
