//! Normalization of raw model output into the stable analysis schema.
//!
//! The model is instructed to reply with a single JSON object, but the
//! reply is untrusted: it may be fenced, wrapped in prose, or missing
//! fields. This module is permissive about missing data and strict only
//! about being unable to recover a JSON object at all — a reply of `{}`
//! normalizes to an all-defaults [`NormalizedAnalysis`], which is a
//! legitimate outcome ("no themes detected"), not an error.
//!
//! Expected reply shape (every key optional):
//!
//! ```json
//! {
//!   "title": "...", "author": "...",
//!   "characters": [{
//!     "name": "...", "importance": 0.9, "description": "...",
//!     "moral_category": "...",
//!     "relationships": [{"character": "...", "relationship": "..."}]
//!   }],
//!   "themes": ["..."],
//!   "plot_summary": "...",
//!   "key_events": [{
//!     "event": "...", "significance": "...", "characters_involved": ["..."]
//!   }]
//! }
//! ```
//!
//! `characters` entries may also be bare name strings (a legacy prompt
//! shape); they are lifted into the rich shape with default fields.

mod extract;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Summary placeholder used when the model supplies none.
pub const NO_SUMMARY: &str = "No summary available";

/// Relationship strength bucket.
///
/// Currently always [`Strength::Moderate`]: the model is not asked to rate
/// strength, and the value is a fixed placeholder rather than derived from
/// text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Moderate,
    Weak,
}

/// One edge in the character relationship graph.
///
/// `character2` is a name reference, not a validated foreign key; an edge
/// may point at a character absent from `key_characters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRelationship {
    pub character1: String,
    pub character2: String,
    pub relationship: String,
    pub strength: Strength,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyCharacter {
    pub name: String,
    pub importance: f64,
    pub description: String,
    pub moral_category: String,
}

impl KeyCharacter {
    /// Lift a character entry into the rich shape. Bare strings are the
    /// legacy name-only form.
    fn from_entry(entry: &Value) -> Self {
        match entry {
            Value::String(name) => Self {
                name: name.clone(),
                importance: 0.0,
                description: String::new(),
                moral_category: String::new(),
            },
            _ => Self {
                name: str_field(entry, "name"),
                importance: entry
                    .get("importance")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0),
                description: str_field(entry, "description"),
                moral_category: str_field(entry, "moral_category"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub event: String,
    pub significance: String,
    pub characters_involved: Vec<String>,
}

/// The stable UI-facing analysis schema.
///
/// Invariant: every field is present and type-correct even when the raw
/// model response omits it — empty list, placeholder string, or zero,
/// never absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAnalysis {
    pub title: String,
    pub author: String,
    #[serde(rename = "characterRelationships")]
    pub character_relationships: Vec<CharacterRelationship>,
    #[serde(rename = "keyCharacters")]
    pub key_characters: Vec<KeyCharacter>,
    pub themes: Vec<String>,
    pub summary: String,
    #[serde(rename = "wordCount")]
    pub word_count: u64,
    #[serde(rename = "keyEvents")]
    pub key_events: Vec<KeyEvent>,
}

/// Convert a raw model reply into a [`NormalizedAnalysis`].
///
/// `source_word_count` is the caller-computed word count of the analyzed
/// text; a count reported by the model is never trusted.
///
/// Fails with [`Error::UnparsableResponse`] only when no JSON object can
/// be recovered from `raw`.
pub fn normalize(raw: &str, source_word_count: u64) -> Result<NormalizedAnalysis> {
    let value = extract::recover_json_object(raw).ok_or(Error::UnparsableResponse)?;
    if !value.is_object() {
        return Err(Error::UnparsableResponse);
    }

    let characters = value
        .get("characters")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut character_relationships = Vec::new();
    let mut key_characters = Vec::with_capacity(characters.len());
    for entry in characters {
        let character = KeyCharacter::from_entry(entry);
        let relationships = entry
            .get("relationships")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for relation in relationships {
            character_relationships.push(CharacterRelationship {
                character1: character.name.clone(),
                character2: str_field(relation, "character"),
                relationship: str_field(relation, "relationship"),
                strength: Strength::Moderate,
            });
        }
        key_characters.push(character);
    }

    let key_events = value
        .get("key_events")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .map(|entry| KeyEvent {
            event: str_field(entry, "event"),
            significance: str_field(entry, "significance"),
            characters_involved: string_list(entry.get("characters_involved")),
        })
        .collect();

    Ok(NormalizedAnalysis {
        title: str_field(&value, "title"),
        author: str_field(&value, "author"),
        character_relationships,
        key_characters,
        themes: string_list(value.get("themes")),
        summary: value
            .get("plot_summary")
            .and_then(Value::as_str)
            .unwrap_or(NO_SUMMARY)
            .to_string(),
        word_count: source_word_count,
        key_events,
    })
}

fn str_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
