//! Field compilation: one resolved field into registered argument specs.
//!
//! [`compile_field`] maps a [`FieldSpec`] through its resolved
//! [`FieldShape`](crate::FieldShape) into one [`CompiledArgument`] — or two
//! for a boolean whose resolved default is true, where a `--no_<name>`
//! negation flag with the same destination is synthesized and registered
//! strictly after the primary flag.
//!
//! Dispatch priority: enumeration, then boolean, then list, then primitive.
//!
//! # Examples
//!
//! ```
//! use record_args_core::{compile_field, Arity, DeclaredType, FieldSpec};
//!
//! // default=true synthesizes the negated form, same destination.
//! let field = FieldSpec::new("cuda", DeclaredType::Bool).with_default(true);
//! let args = compile_field(&field).unwrap();
//! assert_eq!(args.len(), 2);
//! assert_eq!(args[1].flag, "--no_cuda");
//! assert_eq!(args[1].dest, "cuda");
//! assert!(matches!(args[1].arity, Arity::Zero { .. }));
//! ```

use crate::error::SchemaError;
use crate::resolve::{FieldShape, ListItem, resolve_shape};
use crate::types::{FieldDefault, FieldSpec};
use crate::value::{ArgValue, ScalarType};

/// How a single token coerces into a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    /// Scalar coercion rule.
    Scalar(ScalarType),
    /// Enumeration rule: map the token to the member whose string form
    /// equals it; on no match the token passes through unchanged and
    /// fails choice validation afterwards.
    Choice(Vec<ArgValue>),
}

impl Coercion {
    /// Applies the coercion to one token.
    ///
    /// The error is a description of the expected form, wrapped by the
    /// parser into a usage error naming the field.
    pub fn apply(&self, token: &str) -> Result<ArgValue, String> {
        match self {
            Coercion::Scalar(scalar) => scalar.coerce(token),
            Coercion::Choice(members) => Ok(members
                .iter()
                .find(|member| member.to_string() == token)
                .cloned()
                .unwrap_or_else(|| ArgValue::Str(token.to_string()))),
        }
    }
}

/// How many tokens a flag occurrence consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum Arity {
    /// Exactly one value token.
    ExactlyOne,
    /// Zero or one value token; the bare flag stores `bare`.
    ZeroOrOne {
        /// Value stored when the flag appears with no trailing token.
        bare: ArgValue,
    },
    /// One or more value tokens, collected into a list.
    OneOrMore,
    /// No value tokens; the flag stores `value` (negation flags).
    Zero {
        /// Value stored when the flag appears.
        value: ArgValue,
    },
}

/// A fully compiled argument, ready for registration.
#[derive(Debug, Clone)]
pub struct CompiledArgument {
    /// Primary flag string (e.g. `--epochs`).
    pub flag: String,
    /// User-declared aliases.
    pub aliases: Vec<String>,
    /// Destination key in the parsed namespace.
    pub dest: String,
    /// Per-token coercion rule.
    pub coercion: Coercion,
    /// Token consumption mode.
    pub arity: Arity,
    /// Permitted values, when the field is enumeration-backed.
    pub choices: Option<Vec<ArgValue>>,
    /// Default, produced once per parse when the flag is absent.
    pub default: FieldDefault,
    /// Whether the field must be present by end of stream.
    pub required: bool,
    /// Help text.
    pub help: Option<String>,
    /// Type tag shown in help (`INT`, `BOOL`, `{32, 16, bf16}`, ...).
    pub metavar: String,
}

impl CompiledArgument {
    /// All names this argument matches: primary flag, then aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.flag.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Compiles one field into its argument spec(s).
///
/// Returns one argument, or two when a true-default boolean synthesizes
/// its negation flag (always ordered after the primary flag — order
/// matters for arguments sharing a destination).
///
/// # Errors
///
/// Propagates shape-resolution errors and rejects aliases that do not
/// start with `-`.
pub fn compile_field(field: &FieldSpec) -> Result<Vec<CompiledArgument>, SchemaError> {
    for alias in &field.aliases {
        if !alias.starts_with('-') || alias.len() < 2 {
            return Err(SchemaError::InvalidAlias(alias.clone()));
        }
    }

    let shape = resolve_shape(field)?;
    let flag = field.flag();

    let compiled = match shape {
        FieldShape::Enumeration(members) => vec![CompiledArgument {
            flag,
            aliases: field.aliases.clone(),
            dest: field.name.clone(),
            coercion: Coercion::Choice(members.clone()),
            arity: Arity::ExactlyOne,
            metavar: choice_set_repr(&members),
            choices: Some(members),
            default: field.default.clone(),
            required: field.default.is_absent(),
            help: field.help.clone(),
        }],
        FieldShape::Primitive(ScalarType::Bool) | FieldShape::OptionalBool => {
            compile_bool(field, flag)
        }
        FieldShape::List(item) => {
            let (coercion, choices, metavar) = match item {
                ListItem::Scalar(scalar) => {
                    (Coercion::Scalar(scalar), None, scalar.type_tag().to_string())
                }
                ListItem::Enumeration(members) => (
                    Coercion::Choice(members.clone()),
                    Some(members.clone()),
                    choice_set_repr(&members),
                ),
            };
            vec![CompiledArgument {
                flag,
                aliases: field.aliases.clone(),
                dest: field.name.clone(),
                coercion,
                arity: Arity::OneOrMore,
                choices,
                default: field.default.clone(),
                required: field.default.is_absent(),
                help: field.help.clone(),
                metavar,
            }]
        }
        FieldShape::Primitive(scalar) => vec![CompiledArgument {
            flag,
            aliases: field.aliases.clone(),
            dest: field.name.clone(),
            coercion: Coercion::Scalar(scalar),
            arity: Arity::ExactlyOne,
            choices: None,
            default: field.default.clone(),
            required: field.default.is_absent(),
            help: field.help.clone(),
            metavar: scalar.type_tag().to_string(),
        }],
    };

    Ok(compiled)
}

fn compile_bool(field: &FieldSpec, flag: String) -> Vec<CompiledArgument> {
    // Omitting the flag yields the default; false unless declared.
    let resolved_default = field
        .default
        .produce()
        .unwrap_or(ArgValue::Bool(false));

    let primary = CompiledArgument {
        flag,
        aliases: field.aliases.clone(),
        dest: field.name.clone(),
        coercion: Coercion::Scalar(ScalarType::Bool),
        arity: Arity::ZeroOrOne {
            bare: ArgValue::Bool(true),
        },
        choices: None,
        default: FieldDefault::Literal(resolved_default.clone()),
        required: false,
        help: field.help.clone(),
        metavar: "BOOL".to_string(),
    };

    let mut compiled = vec![primary];
    if resolved_default == ArgValue::Bool(true) {
        // The negated form must register after the primary flag so that
        // the later occurrence wins for their shared destination.
        compiled.push(CompiledArgument {
            flag: format!("--no_{}", field.name),
            aliases: Vec::new(),
            dest: field.name.clone(),
            coercion: Coercion::Scalar(ScalarType::Bool),
            arity: Arity::Zero {
                value: ArgValue::Bool(false),
            },
            choices: None,
            default: FieldDefault::Absent,
            required: false,
            help: field.help.clone(),
            metavar: String::new(),
        });
    }
    compiled
}

/// Renders an enumeration's members as the help type tag, e.g.
/// `{32, 16, bf16}`.
pub fn choice_set_repr(members: &[ArgValue]) -> String {
    let items: Vec<String> = members.iter().map(ToString::to_string).collect();
    format!("{{{}}}", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeclaredType;

    #[test]
    fn test_required_primitive() {
        let field = FieldSpec::new("epochs", DeclaredType::Int);
        let args = compile_field(&field).unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].flag, "--epochs");
        assert!(args[0].required);
        assert_eq!(args[0].arity, Arity::ExactlyOne);
        assert_eq!(args[0].metavar, "INT");
    }

    #[test]
    fn test_defaulted_primitive_is_not_required() {
        let field = FieldSpec::new("lr", DeclaredType::Float).with_default(0.1);
        let args = compile_field(&field).unwrap();
        assert!(!args[0].required);
    }

    #[test]
    fn test_false_default_bool_has_no_negation() {
        let field = FieldSpec::new("verbose", DeclaredType::Bool);
        let args = compile_field(&field).unwrap();
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].arity, Arity::ZeroOrOne {
            bare: ArgValue::Bool(true)
        });
        assert_eq!(
            args[0].default.produce(),
            Some(ArgValue::Bool(false))
        );
    }

    #[test]
    fn test_true_default_bool_synthesizes_negation_second() {
        let field = FieldSpec::new("cuda", DeclaredType::Bool).with_default(true);
        let args = compile_field(&field).unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].flag, "--cuda");
        assert_eq!(args[1].flag, "--no_cuda");
        assert_eq!(args[1].dest, "cuda");
        assert!(args[1].default.is_absent());
    }

    #[test]
    fn test_choice_coercion_maps_by_string_form() {
        let field = FieldSpec::new(
            "precision",
            DeclaredType::choice([ArgValue::Int(32), ArgValue::Str("bf16".into())]),
        )
        .with_default(32i64);
        let args = compile_field(&field).unwrap();
        assert_eq!(args[0].coercion.apply("32"), Ok(ArgValue::Int(32)));
        assert_eq!(
            args[0].coercion.apply("bf16"),
            Ok(ArgValue::Str("bf16".into()))
        );
        // No match: the token passes through unchanged.
        assert_eq!(
            args[0].coercion.apply("64"),
            Ok(ArgValue::Str("64".into()))
        );
        assert_eq!(args[0].metavar, "{32, bf16}");
    }

    #[test]
    fn test_list_of_choices_compiles_with_choice_set() {
        let field = FieldSpec::new(
            "datasets",
            DeclaredType::list(DeclaredType::choice(["xnli", "squad"])),
        )
        .with_default(vec!["xnli"]);
        let args = compile_field(&field).unwrap();
        assert_eq!(args[0].arity, Arity::OneOrMore);
        assert!(args[0].choices.is_some());
        assert!(!args[0].required);
    }

    #[test]
    fn test_invalid_alias_rejected() {
        let field = FieldSpec::new("x", DeclaredType::Str).with_alias("x");
        assert_eq!(
            compile_field(&field).unwrap_err(),
            SchemaError::InvalidAlias("x".to_string())
        );
    }
}
