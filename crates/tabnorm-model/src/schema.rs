//! Target schema: the caller's list of required output columns.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// One required output column and its natural-language meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaField {
    pub column_name: String,
    pub description: String,
}

impl SchemaField {
    pub fn new(column_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            description: description.into(),
        }
    }

    /// Semantic kind inferred from the column name and description.
    pub fn kind(&self) -> FieldKind {
        FieldKind::classify(&self.column_name, &self.description)
    }

    /// Whether the description asks for values that are never negative.
    pub fn requires_non_negative(&self) -> bool {
        let description = Description::new(&self.description);
        description.mentions(NON_NEGATIVE_WORDS) || description.raw.contains(">= 0")
    }
}

/// Semantic category of a schema field, used by output validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Identity column: every row needs a value.
    Identifier,
    /// Date or timestamp: every row needs a parseable value.
    Date,
    /// Numeric measure: populated values must parse as numbers.
    Numeric,
    /// Free text, no content checks.
    Text,
}

const IDENTIFIER_TOKENS: &[&str] = &["id", "uuid", "guid"];
const DATE_TOKENS: &[&str] = &["date", "dt", "dob", "datetime", "timestamp"];
const NUMERIC_TOKENS: &[&str] = &["amount", "amt", "qty", "quantity", "price", "total"];

const IDENTIFIER_WORDS: &[&str] = &["identifier", "unique id", "primary key"];
const DATE_WORDS: &[&str] = &["date", "datetime", "timestamp", "yyyy mm dd"];
const NUMERIC_WORDS: &[&str] = &[
    "numeric", "amount", "float", "integer", "decimal", "quantity", "price", "count of",
];
const TEXT_WORDS: &[&str] = &["free text"];
const TEXT_MARKER: &str = "(string)";
const NON_NEGATIVE_WORDS: &[&str] = &["non negative", "nonnegative", "positive"];

/// Lowercased description, plus its alphanumeric words joined by single
/// spaces for whole-word phrase matching.
struct Description {
    raw: String,
    words: String,
}

impl Description {
    fn new(text: &str) -> Self {
        let raw = text.to_lowercase();
        let joined = raw
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            raw,
            words: format!(" {joined} "),
        }
    }

    /// Whether any phrase occurs as a run of whole words.
    fn mentions(&self, phrases: &[&str]) -> bool {
        phrases
            .iter()
            .any(|phrase| self.words.contains(&format!(" {phrase} ")))
    }
}

impl FieldKind {
    /// Classify a field from its name and description.
    ///
    /// Name tokens win over description keywords, and an explicit "(string)"
    /// marker in the description suppresses numeric classification.
    pub fn classify(column_name: &str, description: &str) -> Self {
        let tokens: Vec<String> = column_name
            .split(|ch: char| !ch.is_ascii_alphanumeric())
            .filter(|token| !token.is_empty())
            .map(str::to_lowercase)
            .collect();
        let has_token = |set: &[&str]| tokens.iter().any(|token| set.contains(&token.as_str()));
        let description = Description::new(description);
        let mentions = |set: &[&str]| description.mentions(set);

        if has_token(IDENTIFIER_TOKENS) {
            return Self::Identifier;
        }
        if has_token(DATE_TOKENS) || tokens.last().is_some_and(|last| last == "at") {
            return Self::Date;
        }
        if mentions(IDENTIFIER_WORDS) {
            return Self::Identifier;
        }
        if mentions(DATE_WORDS) {
            return Self::Date;
        }
        if description.raw.contains(TEXT_MARKER) || mentions(TEXT_WORDS) {
            return Self::Text;
        }
        if has_token(NUMERIC_TOKENS) || mentions(NUMERIC_WORDS) {
            return Self::Numeric;
        }
        Self::Text
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Date => "date",
            Self::Numeric => "numeric",
            Self::Text => "text",
        }
    }
}

/// Ordered, duplicate-free list of required output columns.
///
/// The schema is the single source of truth for success and never changes
/// during a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SchemaField>", into = "Vec<SchemaField>")]
pub struct TargetSchema {
    fields: Vec<SchemaField>,
}

impl TargetSchema {
    /// Build a schema, rejecting empty schemas, blank names and duplicates.
    ///
    /// Column names are compared case-insensitively after trimming.
    pub fn new(fields: Vec<SchemaField>) -> Result<Self> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut seen = BTreeSet::new();
        let mut normalized = Vec::with_capacity(fields.len());
        for (position, field) in fields.into_iter().enumerate() {
            let name = field.column_name.trim().to_string();
            if name.is_empty() {
                return Err(SchemaError::EmptyColumnName { position });
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(SchemaError::DuplicateColumn { name });
            }
            normalized.push(SchemaField {
                column_name: name,
                description: field.description.trim().to_string(),
            });
        }
        Ok(Self { fields: normalized })
    }

    /// Convenience constructor from `(name, description)` pairs.
    pub fn from_pairs<I, N, D>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, description)| SchemaField::new(name, description))
                .collect(),
        )
    }

    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.column_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Vec<SchemaField>> for TargetSchema {
    type Error = SchemaError;

    fn try_from(fields: Vec<SchemaField>) -> Result<Self> {
        Self::new(fields)
    }
}

impl From<TargetSchema> for Vec<SchemaField> {
    fn from(schema: TargetSchema) -> Self {
        schema.fields
    }
}
