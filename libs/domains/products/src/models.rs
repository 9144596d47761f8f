use axum_helpers::FieldViolation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// Product record as exposed on the wire (camelCase, RFC 3339 timestamps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier, immutable once assigned
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    /// Set exactly once at creation
    pub created_at: DateTime<Utc>,
    /// Reset on every mutation
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

/// A fully-populated record waiting for the store to assign its id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for create and update endpoints.
///
/// Every field is optional so that the same payload type serves POST,
/// PUT, and PATCH; completeness is a validation concern, not a parsing
/// one. Wrong field types fail deserialization upstream.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPayload {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    pub price: Option<f64>,
    #[validate(custom(function = "not_blank"), length(max = 127))]
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

const REQUIRED_FIELDS: [&str; 4] = ["name", "description", "price", "category"];

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

fn violation_message(err: &ValidationError) -> String {
    match err.code.as_ref() {
        "not_blank" => "This value should not be blank.".to_string(),
        "length" => "This value is too long. It should have 127 characters or less.".to_string(),
        _ => err
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "This value is not valid.".to_string()),
    }
}

impl ProductPayload {
    /// Collect constraint violations.
    ///
    /// With `partial = false` (create, PUT) every mandatory field must
    /// be supplied; with `partial = true` (PATCH) only supplied fields
    /// are checked.
    pub fn violations(&self, partial: bool) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if !partial {
            let supplied = [
                self.name.is_some(),
                self.description.is_some(),
                self.price.is_some(),
                self.category.is_some(),
            ];
            for (field, supplied) in REQUIRED_FIELDS.iter().zip(supplied) {
                if !supplied {
                    violations.push(FieldViolation::new(*field, "This field is missing."));
                }
            }
        }

        if let Err(errors) = self.validate() {
            let mut constraint_violations: Vec<FieldViolation> = errors
                .field_errors()
                .iter()
                .flat_map(|(field, errors)| {
                    errors
                        .iter()
                        .map(|err| FieldViolation::new(field.to_string(), violation_message(err)))
                })
                .collect();
            constraint_violations.sort_by(|a, b| a.field.cmp(&b.field));
            violations.extend(constraint_violations);
        }

        violations
    }
}

/// Validated input for creating a record.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub is_active: Option<bool>,
}

impl TryFrom<ProductPayload> for CreateProduct {
    type Error = Vec<FieldViolation>;

    fn try_from(payload: ProductPayload) -> Result<Self, Self::Error> {
        let violations = payload.violations(false);
        if !violations.is_empty() {
            return Err(violations);
        }

        // All mandatory fields are present once violations(false) is empty.
        Ok(Self {
            name: payload.name.unwrap_or_default(),
            description: payload.description.unwrap_or_default(),
            price: payload.price.unwrap_or_default(),
            category: payload.category.unwrap_or_default(),
            is_active: payload.is_active,
        })
    }
}

/// Field-wise changes for an update; `None` retains the prior value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

impl From<ProductPayload> for UpdateProduct {
    fn from(payload: ProductPayload) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            price: payload.price,
            category: payload.category,
            is_active: payload.is_active,
        }
    }
}

impl Product {
    /// Apply supplied changes and reset `updated_at`.
    ///
    /// `created_at` is never touched after construction.
    pub fn apply_update(&mut self, changes: UpdateProduct) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }
}

/// Filter predicates for listing and counting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Exact category match
    pub category: Option<String>,
    /// Inclusive lower bound on price
    pub min_price: Option<f64>,
    /// Inclusive upper bound on price
    pub max_price: Option<f64>,
    /// Exact active-flag match
    pub is_active: Option<bool>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.is_active.is_none()
    }
}

/// Sortable columns; anything else falls back to `createdAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, ToSchema)]
#[strum(serialize_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Price,
    Name,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, ToSchema)]
#[strum(serialize_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

/// Sort expression for `findByCriteria`; defaults to `createdAt DESC`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    /// Parse a `field,direction` query expression.
    ///
    /// An unrecognized field discards the whole expression so that
    /// `sort=bogusField,ASC` behaves exactly like no sort parameter.
    /// The direction is `ASC` only for a case-insensitive "asc";
    /// anything else (including absence) normalizes to `DESC`.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        let mut parts = raw.splitn(2, ',');
        let field_raw = parts.next().unwrap_or("").trim();
        let Ok(field) = SortField::from_str(field_raw) else {
            return Self::default();
        };

        let direction = match parts.next().map(str::trim) {
            Some(d) if d.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        };

        Self { field, direction }
    }
}

/// Permissive truthy parsing for query-string booleans.
///
/// "true", "1", "yes", and "on" (case-insensitive) parse as true;
/// anything else, including unrecognized input, falls back to false.
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

/// Coerce a numeric query value to a price bound.
///
/// Unparseable input yields `None` and the predicate is dropped.
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a 1-based page or limit value; unparseable input and values
/// below one clamp to 1.
pub fn parse_index(raw: &str) -> u64 {
    raw.trim().parse::<u64>().unwrap_or(1).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> ProductPayload {
        ProductPayload {
            name: Some("Widget".to_string()),
            description: Some("A widget".to_string()),
            price: Some(9.99),
            category: Some("tools".to_string()),
            is_active: None,
        }
    }

    #[test]
    fn test_full_payload_has_no_violations() {
        assert!(full_payload().violations(false).is_empty());
    }

    #[test]
    fn test_missing_fields_reported_on_full_validation() {
        let payload = ProductPayload::default();
        let violations = payload.violations(false);

        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["name", "description", "price", "category"]);
        assert!(violations
            .iter()
            .all(|v| v.message == "This field is missing."));
    }

    #[test]
    fn test_partial_validation_ignores_missing_fields() {
        let payload = ProductPayload {
            price: Some(12.5),
            ..Default::default()
        };
        assert!(payload.violations(true).is_empty());
    }

    #[test]
    fn test_blank_name_is_a_violation_even_when_partial() {
        let payload = ProductPayload {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        let violations = payload.violations(true);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");
        assert_eq!(violations[0].message, "This value should not be blank.");
    }

    #[test]
    fn test_category_longer_than_127_is_rejected() {
        let payload = ProductPayload {
            category: Some("x".repeat(128)),
            ..Default::default()
        };
        let violations = payload.violations(true);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "category");
    }

    #[test]
    fn test_category_of_exactly_127_is_accepted() {
        let payload = ProductPayload {
            category: Some("x".repeat(127)),
            ..Default::default()
        };
        assert!(payload.violations(true).is_empty());
    }

    #[test]
    fn test_create_product_conversion() {
        let input = CreateProduct::try_from(full_payload()).unwrap();
        assert_eq!(input.name, "Widget");
        assert_eq!(input.price, 9.99);
        assert_eq!(input.is_active, None);
    }

    #[test]
    fn test_create_product_conversion_fails_on_missing_field() {
        let mut payload = full_payload();
        payload.description = None;
        let violations = CreateProduct::try_from(payload).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "description");
    }

    #[test]
    fn test_apply_update_changes_only_supplied_fields() {
        let mut product = Product {
            id: 1,
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: 9.99,
            category: "tools".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_active: true,
        };
        let created_at = product.created_at;

        product.apply_update(UpdateProduct {
            price: Some(29.99),
            ..Default::default()
        });

        assert_eq!(product.price, 29.99);
        assert_eq!(product.name, "Widget");
        assert_eq!(product.created_at, created_at);
        assert!(product.updated_at >= created_at);
    }

    #[test]
    fn test_sort_defaults_to_created_at_desc() {
        assert_eq!(Sort::parse(None), Sort::default());
        assert_eq!(Sort::default().field, SortField::CreatedAt);
        assert_eq!(Sort::default().direction, SortDirection::Desc);
    }

    #[test]
    fn test_sort_parses_field_and_direction() {
        let sort = Sort::parse(Some("price,ASC"));
        assert_eq!(sort.field, SortField::Price);
        assert_eq!(sort.direction, SortDirection::Asc);

        let sort = Sort::parse(Some("name,asc"));
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_without_direction_is_desc() {
        let sort = Sort::parse(Some("updatedAt"));
        assert_eq!(sort.field, SortField::UpdatedAt);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_bogus_sort_field_discards_the_expression() {
        assert_eq!(Sort::parse(Some("bogusField,ASC")), Sort::default());
    }

    #[test]
    fn test_parse_bool_truthy_table() {
        for raw in ["true", "TRUE", "1", "yes", "on", " True "] {
            assert!(parse_bool(raw), "{raw} should be truthy");
        }
        for raw in ["false", "0", "no", "off", "", "garbage", "2"] {
            assert!(!parse_bool(raw), "{raw} should be falsy");
        }
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("19.99"), Some(19.99));
        assert_eq!(parse_price(" 5 "), Some(5.0));
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("inf"), None);
    }

    #[test]
    fn test_parse_index_clamps_to_one() {
        assert_eq!(parse_index("3"), 3);
        assert_eq!(parse_index("0"), 1);
        assert_eq!(parse_index("abc"), 1);
    }

    #[test]
    fn test_product_wire_format_is_camel_case() {
        let product = Product {
            id: 7,
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: 9.99,
            category: "tools".to_string(),
            created_at: "2025-01-10T12:00:00Z".parse().unwrap(),
            updated_at: "2025-01-10T12:00:00Z".parse().unwrap(),
            is_active: true,
        };

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["isActive"], true);
        assert_eq!(value["createdAt"], "2025-01-10T12:00:00Z");
        assert!(value.get("is_active").is_none());
    }
}
