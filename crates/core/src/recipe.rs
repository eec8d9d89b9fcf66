//! Recipe composition rules.
//!
//! [`validate_recipe`] turns a loosely-typed [`RecipeDraft`] (the request body
//! for both create and update) into a [`ValidatedRecipe`] whose ingredient list
//! is non-empty, has positive amounts, and never references the same
//! ingredient twice. Every failed rule is reported, not only the first one.
//! Validation runs before any write, so a rejected draft never touches the
//! store.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::DbId;

/// Smallest accepted ingredient amount.
pub const MIN_AMOUNT: i64 = 1;

/// Largest accepted ingredient amount (fits a PostgreSQL SMALLINT).
pub const MAX_AMOUNT: i64 = 32_767;

/// Smallest accepted cooking time, in minutes.
pub const MIN_COOKING_TIME: i64 = 1;

/// Largest accepted cooking time, in minutes.
pub const MAX_COOKING_TIME: i64 = 32_767;

/// Maximum recipe name length in characters.
pub const MAX_NAME_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A number as clients actually send it: integer, decimal, or numeric string.
///
/// Any other JSON value lands in `Other` so the validator can report it
/// against the field instead of failing the whole body.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NumberInput {
    Integer(i64),
    Decimal(f64),
    Text(String),
    Other(Value),
}

impl NumberInput {
    /// The integral value, if this input denotes one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            NumberInput::Integer(n) => Some(*n),
            NumberInput::Decimal(_) | NumberInput::Other(_) => None,
            NumberInput::Text(s) => s.trim().parse().ok(),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, NumberInput::Text(s) if s.trim().is_empty())
    }
}

impl From<i64> for NumberInput {
    fn from(n: i64) -> Self {
        NumberInput::Integer(n)
    }
}

/// One `{id, amount}` entry of a submitted ingredient list.
///
/// Deserializes from any JSON value: an entry that is not an object has
/// neither field and is reported as malformed.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(from = "Value")]
pub struct IngredientDraft {
    pub id: Option<NumberInput>,
    pub amount: Option<NumberInput>,
}

impl From<Value> for IngredientDraft {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };
        Self {
            id: take_number(&mut fields, "id"),
            amount: take_number(&mut fields, "amount"),
        }
    }
}

fn take_number(fields: &mut Map<String, Value>, key: &str) -> Option<NumberInput> {
    match fields.remove(key)? {
        Value::Null => None,
        value => serde_json::from_value(value).ok(),
    }
}

impl IngredientDraft {
    pub fn new(id: DbId, amount: i64) -> Self {
        Self {
            id: Some(id.into()),
            amount: Some(amount.into()),
        }
    }
}

/// Request body for recipe create and update.
///
/// Every field is optional at the type level so that absence can be reported
/// as a structured violation instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecipeDraft {
    #[serde(default)]
    pub tags: Option<Vec<NumberInput>>,
    #[serde(default)]
    pub ingredients: Option<Vec<IngredientDraft>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub cooking_time: Option<NumberInput>,
    /// Opaque image reference (data URL or storage key). Not validated here.
    #[serde(default)]
    pub image: Option<String>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A validated ingredient association ready to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngredientAmount {
    pub ingredient_id: DbId,
    pub amount: i32,
}

/// A draft that passed every composition rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedRecipe {
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
    pub image: Option<String>,
    /// Tag ids, deduplicated, in first-seen order.
    pub tag_ids: Vec<DbId>,
    /// Ingredient entries in submission order; ids are unique.
    pub ingredients: Vec<IngredientAmount>,
}

impl ValidatedRecipe {
    pub fn ingredient_ids(&self) -> Vec<DbId> {
        self.ingredients.iter().map(|i| i.ingredient_id).collect()
    }
}

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// Which composition rule a violation broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    MissingField,
    InvalidTag,
    MalformedIngredient,
    InvalidQuantity,
    DuplicateIngredient,
    InvalidCookingTime,
    FieldTooLong,
}

/// A single rule violation, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct RecipeViolation {
    pub kind: ViolationKind,
    /// Field path, e.g. `name` or `ingredients[2].amount`.
    pub field: String,
    pub message: String,
}

impl RecipeViolation {
    fn new(kind: ViolationKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            field: field.into(),
            message: message.into(),
        }
    }

    fn missing(field: &str) -> Self {
        Self::new(
            ViolationKind::MissingField,
            field,
            format!("Field `{field}` is required"),
        )
    }
}

/// All violations found in one draft. Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("Recipe failed validation: {}", summary(.0))]
pub struct RecipeViolations(pub Vec<RecipeViolation>);

impl RecipeViolations {
    /// Whether any violation is of the given kind.
    pub fn has(&self, kind: ViolationKind) -> bool {
        self.0.iter().any(|v| v.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecipeViolation> {
        self.0.iter()
    }
}

fn summary(violations: &[RecipeViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Check a draft against the composition rules.
///
/// - `tags`, `ingredients`, `name`, `text`, `cooking_time` must be present and
///   non-empty.
/// - Each ingredient entry needs both `id` and `amount`.
/// - `amount` must be an integer in `MIN_AMOUNT..=MAX_AMOUNT`.
/// - No ingredient id may appear twice.
pub fn validate_recipe(draft: &RecipeDraft) -> Result<ValidatedRecipe, RecipeViolations> {
    let mut violations = Vec::new();

    let tag_ids = match draft.tags.as_deref() {
        Some(tags) if !tags.is_empty() => validate_tags(tags, &mut violations),
        _ => {
            violations.push(RecipeViolation::missing("tags"));
            Vec::new()
        }
    };

    let ingredients = match draft.ingredients.as_deref() {
        Some(entries) if !entries.is_empty() => validate_ingredients(entries, &mut violations),
        _ => {
            violations.push(RecipeViolation::missing("ingredients"));
            Vec::new()
        }
    };

    let name = required_text(draft.name.as_deref(), "name", &mut violations);
    if let Some(ref name) = name {
        if name.chars().count() > MAX_NAME_LEN {
            violations.push(RecipeViolation::new(
                ViolationKind::FieldTooLong,
                "name",
                format!("Name must be at most {MAX_NAME_LEN} characters"),
            ));
        }
    }

    let text = required_text(draft.text.as_deref(), "text", &mut violations);

    let cooking_time = match &draft.cooking_time {
        Some(input) if !input.is_blank() => match input.as_integer() {
            Some(t) if (MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&t) => Some(t as i32),
            _ => {
                violations.push(RecipeViolation::new(
                    ViolationKind::InvalidCookingTime,
                    "cooking_time",
                    format!(
                        "Cooking time must be a whole number of minutes between \
                         {MIN_COOKING_TIME} and {MAX_COOKING_TIME}"
                    ),
                ));
                None
            }
        },
        _ => {
            violations.push(RecipeViolation::missing("cooking_time"));
            None
        }
    };

    match (name, text, cooking_time) {
        (Some(name), Some(text), Some(cooking_time)) if violations.is_empty() => {
            Ok(ValidatedRecipe {
                name,
                text,
                cooking_time,
                image: draft.image.clone(),
                tag_ids,
                ingredients,
            })
        }
        _ => Err(RecipeViolations(violations)),
    }
}

fn required_text(
    value: Option<&str>,
    field: &str,
    violations: &mut Vec<RecipeViolation>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v.to_string()),
        _ => {
            violations.push(RecipeViolation::missing(field));
            None
        }
    }
}

fn validate_ingredients(
    entries: &[IngredientDraft],
    violations: &mut Vec<RecipeViolation>,
) -> Vec<IngredientAmount> {
    let mut seen: HashSet<DbId> = HashSet::with_capacity(entries.len());
    let mut accepted = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let id = entry.id.as_ref().filter(|v| !v.is_blank());
        let amount = entry.amount.as_ref().filter(|v| !v.is_blank());

        let (Some(id), Some(amount)) = (id, amount) else {
            violations.push(RecipeViolation::new(
                ViolationKind::MalformedIngredient,
                format!("ingredients[{index}]"),
                "Each ingredient needs both `id` and `amount`",
            ));
            continue;
        };

        let Some(ingredient_id) = id.as_integer().filter(|id| *id > 0) else {
            violations.push(RecipeViolation::new(
                ViolationKind::MalformedIngredient,
                format!("ingredients[{index}].id"),
                "Ingredient id must be a positive integer",
            ));
            continue;
        };

        let amount = match amount.as_integer() {
            Some(a) if (MIN_AMOUNT..=MAX_AMOUNT).contains(&a) => Some(a as i32),
            _ => {
                violations.push(RecipeViolation::new(
                    ViolationKind::InvalidQuantity,
                    format!("ingredients[{index}].amount"),
                    format!("Amount must be a whole number between {MIN_AMOUNT} and {MAX_AMOUNT}"),
                ));
                None
            }
        };

        if !seen.insert(ingredient_id) {
            violations.push(RecipeViolation::new(
                ViolationKind::DuplicateIngredient,
                format!("ingredients[{index}].id"),
                format!("Ingredient {ingredient_id} is listed more than once"),
            ));
            continue;
        }

        if let Some(amount) = amount {
            accepted.push(IngredientAmount {
                ingredient_id,
                amount,
            });
        }
    }

    accepted
}

/// Tag ids, deduplicated in first-seen order.
fn validate_tags(tags: &[NumberInput], violations: &mut Vec<RecipeViolation>) -> Vec<DbId> {
    let mut seen = HashSet::with_capacity(tags.len());
    let mut ids = Vec::with_capacity(tags.len());

    for (index, tag) in tags.iter().enumerate() {
        match tag.as_integer().filter(|id| *id > 0) {
            Some(id) => {
                if seen.insert(id) {
                    ids.push(id);
                }
            }
            None => violations.push(RecipeViolation::new(
                ViolationKind::InvalidTag,
                format!("tags[{index}]"),
                "Tag id must be a positive integer",
            )),
        }
    }

    ids
}

// ===========================================================================
// Tests
// ===========================================================================
