/// Request validation
///
/// Request structures declare their rules with `#[derive(validator::Validate)]`
/// and describe themselves through [`RequestRules`]. The [`Validator`] registry
/// runs those rules and reduces the outcome to a single [`FieldViolation`]:
/// the first failing field in declaration order, formatted as
/// `"<kind>: <Struct>.<Field>"`. Callers parse that text, so the format and
/// the ordering are stable.
///
/// # Example
///
/// ```
/// use taskboard_shared::validation::{RequestRules, Validator};
/// use validator::Validate;
///
/// #[derive(Validate)]
/// struct CreateUserRequest {
///     #[validate(length(min = 1, code = "required"))]
///     name: String,
///     #[validate(length(min = 1, code = "required"))]
///     password: String,
/// }
///
/// impl RequestRules for CreateUserRequest {
///     const NAME: &'static str = "CreateUserRequest";
///     const FIELDS: &'static [(&'static str, &'static str)] =
///         &[("name", "Name"), ("password", "Password")];
/// }
///
/// let validator = Validator::new();
/// let request = CreateUserRequest { name: String::new(), password: String::new() };
///
/// let violation = validator.validate(&request).unwrap_err();
/// assert_eq!(violation.to_string(), "Field is required: CreateUserRequest.Name");
/// ```

pub mod rules;

use std::collections::HashMap;
use std::fmt;
use validator::{Validate, ValidationError};

/// What kind of rule a field violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    /// Value does not match the expected shape
    InvalidFormat,

    /// Value is missing or empty
    FieldRequired,

    /// String is longer than allowed
    ExceedsMaxLength,

    /// String is shorter than allowed
    BelowMinLength,

    /// Number is larger than allowed
    ExceedsMaxValue,

    /// Number is smaller than allowed
    BelowMinValue,

    /// Value is not a base-10 integer
    InvalidIntString,

    /// Rule code not known to the registry
    Unknown,
}

impl ValidationKind {
    /// Human-readable description used as the message prefix
    pub fn description(&self) -> &'static str {
        match self {
            ValidationKind::InvalidFormat => "Invalid format",
            ValidationKind::FieldRequired => "Field is required",
            ValidationKind::ExceedsMaxLength => "Field exceeds maximum length",
            ValidationKind::BelowMinLength => "Field is below minimum length",
            ValidationKind::ExceedsMaxValue => "Field exceeds maximum value",
            ValidationKind::BelowMinValue => "Field is below minimum value",
            ValidationKind::InvalidIntString => "Invalid int format",
            ValidationKind::Unknown => "Unknown validation error",
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The first rule a request violated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {structure}.{field}")]
pub struct FieldViolation {
    /// Violated rule
    pub kind: ValidationKind,

    /// Reported name of the request structure
    pub structure: &'static str,

    /// Reported name of the field
    pub field: String,
}

impl FieldViolation {
    /// Creates a violation for a field of `T`
    pub fn of<T: RequestRules>(kind: ValidationKind, field: impl Into<String>) -> Self {
        Self {
            kind,
            structure: T::NAME,
            field: field.into(),
        }
    }
}

/// Describes a validatable request structure
///
/// `FIELDS` lists `(rust_field_name, reported_name)` pairs in declaration
/// order; that order decides which violation is reported first.
pub trait RequestRules: Validate {
    /// Structure name used in violation messages
    const NAME: &'static str;

    /// Fields in declaration order
    const FIELDS: &'static [(&'static str, &'static str)];
}

/// Validation rules registry
///
/// Maps rule error codes to [`ValidationKind`]s. Built once at startup and
/// shared read-only between handlers.
#[derive(Debug, Clone)]
pub struct Validator {
    kinds: HashMap<&'static str, ValidationKind>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Creates a registry with the built-in and custom rules registered
    pub fn new() -> Self {
        let kinds = HashMap::from([
            (rules::REQUIRED, ValidationKind::FieldRequired),
            ("email", ValidationKind::InvalidFormat),
            ("url", ValidationKind::InvalidFormat),
            ("regex", ValidationKind::InvalidFormat),
            (rules::TAG, ValidationKind::InvalidFormat),
            (rules::TASK_STATUS, ValidationKind::InvalidFormat),
            (rules::INT_STRING, ValidationKind::InvalidIntString),
        ]);

        Self { kinds }
    }

    /// Registers an additional rule code
    pub fn with_rule(mut self, code: &'static str, kind: ValidationKind) -> Self {
        self.kinds.insert(code, kind);
        self
    }

    /// Validates a request, stopping at the first failing field
    ///
    /// # Errors
    ///
    /// Returns the violation of the first field, in `T::FIELDS` order, that
    /// has any error. Within that field a required violation wins.
    pub fn validate<T: RequestRules>(&self, request: &T) -> Result<(), FieldViolation> {
        let errors = match request.validate() {
            Ok(()) => return Ok(()),
            Err(errors) => errors,
        };

        let field_errors = errors.field_errors();

        let declared = T::FIELDS.iter().find_map(|(name, reported)| {
            field_errors
                .iter()
                .find(|(field, _)| field.to_string() == *name)
                .map(|(_, errors)| (reported.to_string(), *errors))
        });

        // Fields missing from FIELDS still fail validation, under their Rust name.
        let (field, errors) = match declared {
            Some(found) => found,
            None => match field_errors.iter().next() {
                Some((field, errors)) => (field.to_string(), *errors),
                None => {
                    return Err(FieldViolation {
                        kind: ValidationKind::Unknown,
                        structure: T::NAME,
                        field: String::new(),
                    })
                }
            },
        };

        let error = errors
            .iter()
            .find(|error| error.code == rules::REQUIRED)
            .or_else(|| errors.first());

        let kind = error
            .map(|error| self.classify(error))
            .unwrap_or(ValidationKind::Unknown);

        Err(FieldViolation {
            kind,
            structure: T::NAME,
            field,
        })
    }

    fn classify(&self, error: &ValidationError) -> ValidationKind {
        match error.code.as_ref() {
            "length" => classify_bound(
                error,
                |value| value.as_str().map(|s| s.chars().count() as f64),
                ValidationKind::BelowMinLength,
                ValidationKind::ExceedsMaxLength,
            ),
            "range" => classify_bound(
                error,
                serde_json::Value::as_f64,
                ValidationKind::BelowMinValue,
                ValidationKind::ExceedsMaxValue,
            ),
            code => self
                .kinds
                .get(code)
                .copied()
                .unwrap_or(ValidationKind::Unknown),
        }
    }
}

/// Decides whether a bounded rule failed on its lower or upper bound
fn classify_bound(
    error: &ValidationError,
    measure: impl Fn(&serde_json::Value) -> Option<f64>,
    below: ValidationKind,
    above: ValidationKind,
) -> ValidationKind {
    let min = error.params.get("min").and_then(serde_json::Value::as_f64);
    let max = error.params.get("max").and_then(serde_json::Value::as_f64);
    let value = error.params.get("value").and_then(|v| measure(v));

    match (min, max, value) {
        (Some(min), _, Some(value)) if value < min => below,
        (_, Some(_), Some(_)) => above,
        (Some(_), None, _) => below,
        (None, Some(_), _) => above,
        _ => ValidationKind::Unknown,
    }
}
