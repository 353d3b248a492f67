//! Declared-type resolution into the closed parseable shape set.
//!
//! [`resolve_shape`] normalizes a field's [`DeclaredType`] into a
//! [`FieldShape`]: a two-arm union with an absence arm unwraps to its other
//! arm (boolean retained as [`FieldShape::OptionalBool`]); any other union
//! is rejected at construction time. Enumeration and list declarations are
//! structurally validated here so the compiler can assume well-formed
//! shapes.
//!
//! # Examples
//!
//! ```
//! use record_args_core::{resolve_shape, DeclaredType, FieldSpec, FieldShape, ScalarType};
//!
//! let field = FieldSpec::new("extra_data", DeclaredType::optional(DeclaredType::Str));
//! assert_eq!(resolve_shape(&field).unwrap(), FieldShape::Primitive(ScalarType::Str));
//!
//! let field = FieldSpec::new("boiq", DeclaredType::optional(DeclaredType::Bool));
//! assert_eq!(resolve_shape(&field).unwrap(), FieldShape::OptionalBool);
//!
//! // Three arms: rejected at construction, never at parse time.
//! let field = FieldSpec::new("bad", DeclaredType::Union(vec![
//!     DeclaredType::Int,
//!     DeclaredType::Str,
//!     DeclaredType::Null,
//! ]));
//! assert!(resolve_shape(&field).is_err());
//! ```

use std::collections::HashSet;

use crate::error::SchemaError;
use crate::types::{DeclaredType, FieldSpec};
use crate::value::{ArgValue, ScalarType};

/// Item type of a list-shaped field.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItem {
    /// Items coerce with a scalar rule.
    Scalar(ScalarType),
    /// Items coerce with the enumeration rule over these members.
    Enumeration(Vec<ArgValue>),
}

/// A resolved field shape, consumed by the field compiler.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape {
    /// A single scalar value (including plain `Bool`).
    Primitive(ScalarType),
    /// `Optional<bool>`, retained as its own shape.
    OptionalBool,
    /// A closed set of permitted literal scalars, in declaration order.
    Enumeration(Vec<ArgValue>),
    /// One or more values of the item type.
    List(ListItem),
}

/// Resolves a field's declared type into its parseable shape.
///
/// Rules, in order: unwrap `Union[X, Null]` and continue with `X` (bool
/// keeps its own optional shape); reject every other union; pass all other
/// types through. Enumeration members must be literal scalars with
/// pairwise-distinct string forms; list items must be scalar or
/// enumeration.
///
/// # Errors
///
/// Returns a [`SchemaError`] naming the field for unsupported unions,
/// non-scalar optionals, malformed enumerations, and invalid list items.
pub fn resolve_shape(field: &FieldSpec) -> Result<FieldShape, SchemaError> {
    match &field.declared {
        DeclaredType::Union(arms) => resolve_union(field, arms),
        DeclaredType::Null => Err(SchemaError::UnsupportedUnion {
            field: field.name.clone(),
        }),
        declared => resolve_plain(field, declared),
    }
}

fn resolve_union(field: &FieldSpec, arms: &[DeclaredType]) -> Result<FieldShape, SchemaError> {
    let null_count = arms
        .iter()
        .filter(|arm| matches!(arm, DeclaredType::Null))
        .count();
    if arms.len() != 2 || null_count != 1 {
        return Err(SchemaError::UnsupportedUnion {
            field: field.name.clone(),
        });
    }

    let inner = arms
        .iter()
        .find(|arm| !matches!(arm, DeclaredType::Null))
        .expect("one non-null arm");
    match inner {
        DeclaredType::Bool => Ok(FieldShape::OptionalBool),
        DeclaredType::Str => Ok(FieldShape::Primitive(ScalarType::Str)),
        DeclaredType::Int => Ok(FieldShape::Primitive(ScalarType::Int)),
        DeclaredType::Float => Ok(FieldShape::Primitive(ScalarType::Float)),
        // Optional is only valid over a single scalar primitive.
        DeclaredType::Choice(_) | DeclaredType::List(_) | DeclaredType::Union(_) => {
            Err(SchemaError::OptionalNonScalar {
                field: field.name.clone(),
            })
        }
        DeclaredType::Null => unreachable!("filtered above"),
    }
}

fn resolve_plain(field: &FieldSpec, declared: &DeclaredType) -> Result<FieldShape, SchemaError> {
    match declared {
        DeclaredType::Str => Ok(FieldShape::Primitive(ScalarType::Str)),
        DeclaredType::Int => Ok(FieldShape::Primitive(ScalarType::Int)),
        DeclaredType::Float => Ok(FieldShape::Primitive(ScalarType::Float)),
        DeclaredType::Bool => Ok(FieldShape::Primitive(ScalarType::Bool)),
        DeclaredType::Choice(members) => {
            validate_choices(field, members)?;
            Ok(FieldShape::Enumeration(members.clone()))
        }
        DeclaredType::List(item) => match item.as_ref() {
            DeclaredType::Str => Ok(FieldShape::List(ListItem::Scalar(ScalarType::Str))),
            DeclaredType::Int => Ok(FieldShape::List(ListItem::Scalar(ScalarType::Int))),
            DeclaredType::Float => Ok(FieldShape::List(ListItem::Scalar(ScalarType::Float))),
            DeclaredType::Bool => Ok(FieldShape::List(ListItem::Scalar(ScalarType::Bool))),
            DeclaredType::Choice(members) => {
                validate_choices(field, members)?;
                Ok(FieldShape::List(ListItem::Enumeration(members.clone())))
            }
            DeclaredType::List(_) | DeclaredType::Union(_) | DeclaredType::Null => {
                Err(SchemaError::InvalidListItem {
                    field: field.name.clone(),
                })
            }
        },
        DeclaredType::Union(_) | DeclaredType::Null => unreachable!("handled by resolve_shape"),
    }
}

fn validate_choices(field: &FieldSpec, members: &[ArgValue]) -> Result<(), SchemaError> {
    if members.is_empty() {
        return Err(SchemaError::EmptyChoices {
            field: field.name.clone(),
        });
    }

    let mut seen: HashSet<String> = HashSet::new();
    for member in members {
        if matches!(member, ArgValue::List(_)) {
            return Err(SchemaError::NonScalarChoice {
                field: field.name.clone(),
            });
        }
        let repr = member.to_string();
        if !seen.insert(repr.clone()) {
            return Err(SchemaError::DuplicateChoice {
                field: field.name.clone(),
                repr,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeclaredType;

    fn field(declared: DeclaredType) -> FieldSpec {
        FieldSpec::new("f", declared)
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(
            resolve_shape(&field(DeclaredType::Int)).unwrap(),
            FieldShape::Primitive(ScalarType::Int)
        );
        assert_eq!(
            resolve_shape(&field(DeclaredType::Bool)).unwrap(),
            FieldShape::Primitive(ScalarType::Bool)
        );
    }

    #[test]
    fn test_optional_scalar_unwraps() {
        let shape = resolve_shape(&field(DeclaredType::optional(DeclaredType::Float))).unwrap();
        assert_eq!(shape, FieldShape::Primitive(ScalarType::Float));
    }

    #[test]
    fn test_optional_bool_is_its_own_shape() {
        let shape = resolve_shape(&field(DeclaredType::optional(DeclaredType::Bool))).unwrap();
        assert_eq!(shape, FieldShape::OptionalBool);
    }

    #[test]
    fn test_three_arm_union_is_rejected() {
        let declared = DeclaredType::Union(vec![
            DeclaredType::Int,
            DeclaredType::Str,
            DeclaredType::Null,
        ]);
        assert_eq!(
            resolve_shape(&field(declared)),
            Err(SchemaError::UnsupportedUnion {
                field: "f".to_string()
            })
        );
    }

    #[test]
    fn test_two_arm_union_without_absence_is_rejected() {
        let declared = DeclaredType::Union(vec![DeclaredType::Int, DeclaredType::Str]);
        assert!(matches!(
            resolve_shape(&field(declared)),
            Err(SchemaError::UnsupportedUnion { .. })
        ));
    }

    #[test]
    fn test_optional_list_is_rejected() {
        let declared = DeclaredType::optional(DeclaredType::list(DeclaredType::Int));
        assert!(matches!(
            resolve_shape(&field(declared)),
            Err(SchemaError::OptionalNonScalar { .. })
        ));
    }

    #[test]
    fn test_choice_duplicate_string_forms_rejected() {
        // Int 1 and Str "1" collide on their string form.
        let declared = DeclaredType::choice([ArgValue::Int(1), ArgValue::Str("1".into())]);
        assert_eq!(
            resolve_shape(&field(declared)),
            Err(SchemaError::DuplicateChoice {
                field: "f".to_string(),
                repr: "1".to_string()
            })
        );
    }

    #[test]
    fn test_list_of_choices_resolves() {
        let declared = DeclaredType::list(DeclaredType::choice(["mnist", "cifar10"]));
        let shape = resolve_shape(&field(declared)).unwrap();
        assert_eq!(
            shape,
            FieldShape::List(ListItem::Enumeration(vec![
                ArgValue::Str("mnist".into()),
                ArgValue::Str("cifar10".into()),
            ]))
        );
    }

    #[test]
    fn test_nested_list_is_rejected() {
        let declared = DeclaredType::list(DeclaredType::list(DeclaredType::Int));
        assert!(matches!(
            resolve_shape(&field(declared)),
            Err(SchemaError::InvalidListItem { .. })
        ));
    }
}
