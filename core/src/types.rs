//! Field and record schema declarations.
//!
//! This module defines the caller-facing declaration surface: a
//! [`RecordSchema`] is an ordered list of [`FieldSpec`]s, each declaring a
//! name, a [`DeclaredType`], an optional default (or default factory),
//! aliases, and help text. The introspector and compiler turn these into
//! registered arguments.
//!
//! # Example
//!
//! ```
//! use record_args_core::{DeclaredType, FieldSpec, RecordSchema};
//!
//! let schema = RecordSchema::new("train")
//!     .with_field(FieldSpec::new("epochs", DeclaredType::Int).with_help("Number of epochs"))
//!     .with_field(
//!         FieldSpec::new("lr", DeclaredType::Float)
//!             .with_default(0.1)
//!             .with_alias("--lr"),
//!     )
//!     .with_field(FieldSpec::new("cuda", DeclaredType::Bool).with_default(true));
//!
//! assert_eq!(schema.fields.len(), 3);
//! assert_eq!(schema.fields[1].flag(), "--lr".to_string());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::ArgValue;

/// A declared field type, before shape resolution.
///
/// `Union` and `Null` exist to express optionality the way the declaration
/// surface sees it; the introspector normalizes them into the closed shape
/// set and rejects unsupported combinations.
///
/// # Examples
///
/// ```
/// use record_args_core::{ArgValue, DeclaredType};
///
/// // Optional<str> is a two-arm union with an absence arm.
/// let opt = DeclaredType::optional(DeclaredType::Str);
/// assert!(matches!(opt, DeclaredType::Union(_)));
///
/// // Enumerations may mix primitive literal types.
/// let precision = DeclaredType::choice([
///     ArgValue::Int(32),
///     ArgValue::Int(16),
///     ArgValue::Str("bf16".into()),
/// ]);
/// assert!(matches!(precision, DeclaredType::Choice(_)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    /// UTF-8 string.
    Str,
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// Boolean (zero-or-one-token flag with a negated form when the
    /// default is true).
    Bool,
    /// Closed set of permitted literal scalars, in declaration order.
    Choice(Vec<ArgValue>),
    /// One-or-more values of the item type.
    List(Box<DeclaredType>),
    /// Union of arms; only two arms with one [`DeclaredType::Null`] are
    /// accepted by the introspector.
    Union(Vec<DeclaredType>),
    /// The absence arm of a union.
    Null,
}

impl DeclaredType {
    /// Builds `Union([inner, Null])`, the supported optional form.
    pub fn optional(inner: DeclaredType) -> Self {
        DeclaredType::Union(vec![inner, DeclaredType::Null])
    }

    /// Builds an enumeration from literal members.
    pub fn choice<I>(members: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ArgValue>,
    {
        DeclaredType::Choice(members.into_iter().map(Into::into).collect())
    }

    /// Builds a list of the given item type.
    pub fn list(item: DeclaredType) -> Self {
        DeclaredType::List(Box::new(item))
    }
}

/// Zero-argument factory producing a default value once per parse.
pub type DefaultFactory = Arc<dyn Fn() -> ArgValue + Send + Sync>;

/// A field's default: absent (the field is required), a literal value, or
/// a factory invoked once per parse.
///
/// Container-shaped defaults must be factory-produced so parses never
/// share an underlying instance; [`FieldSpec::with_default`] redirects
/// literal lists to an implicit factory automatically.
#[derive(Clone)]
pub enum FieldDefault {
    /// No default; the field is required.
    Absent,
    /// A literal scalar default.
    Literal(ArgValue),
    /// A factory invoked once per parse.
    Factory(DefaultFactory),
}

impl FieldDefault {
    /// True when no default was declared.
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldDefault::Absent)
    }

    /// Produces the default value, invoking the factory if there is one.
    pub fn produce(&self) -> Option<ArgValue> {
        match self {
            FieldDefault::Absent => None,
            FieldDefault::Literal(value) => Some(value.clone()),
            FieldDefault::Factory(factory) => Some(factory()),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Absent => f.write_str("Absent"),
            FieldDefault::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            FieldDefault::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Declaration of one named, typed argument.
///
/// The field name is the destination key; the primary flag is derived from
/// it (`--<name>`). Builder methods chain in declaration order.
///
/// # Examples
///
/// ```
/// use record_args_core::{DeclaredType, FieldSpec};
///
/// let field = FieldSpec::new("data_path", DeclaredType::Str)
///     .with_default("./data/")
///     .with_aliases(["--data", "-d"])
///     .with_help("Where the dataset lives");
///
/// assert_eq!(field.flag(), "--data_path");
/// assert_eq!(field.aliases, vec!["--data", "-d"]);
/// ```
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Field name; doubles as the destination key.
    pub name: String,
    /// Declared type, resolved by the introspector.
    pub declared: DeclaredType,
    /// Default value or factory; absent means required.
    pub default: FieldDefault,
    /// Ordered alias list (each must start with `-`).
    pub aliases: Vec<String>,
    /// Help text shown in generated help.
    pub help: Option<String>,
}

impl FieldSpec {
    /// Creates a required field of the given declared type.
    pub fn new(name: &str, declared: DeclaredType) -> Self {
        Self {
            name: name.to_string(),
            declared,
            default: FieldDefault::Absent,
            aliases: Vec::new(),
            help: None,
        }
    }

    /// Sets a literal default.
    ///
    /// A list literal is redirected to an implicit factory so separate
    /// parses never share one container instance.
    pub fn with_default(mut self, value: impl Into<ArgValue>) -> Self {
        self.default = match value.into() {
            ArgValue::List(items) => {
                FieldDefault::Factory(Arc::new(move || ArgValue::List(items.clone())))
            }
            value => FieldDefault::Literal(value),
        };
        self
    }

    /// Sets a default factory, invoked once per parse.
    ///
    /// Mutually exclusive with [`with_default`](Self::with_default); the
    /// last call wins.
    pub fn with_default_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> ArgValue + Send + Sync + 'static,
    {
        self.default = FieldDefault::Factory(Arc::new(factory));
        self
    }

    /// Adds a single alias (e.g. `"--lr"` or `"-l"`).
    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    /// Adds several aliases at once.
    pub fn with_aliases<I>(mut self, aliases: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// The primary flag derived from the field name.
    pub fn flag(&self) -> String {
        format!("--{}", self.name)
    }
}

/// An ordered group of fields parsed into one record.
///
/// Multiple record schemas can share a single parser; each gets its own
/// assembled record, in registration order. The optional group label names
/// the section in generated help.
///
/// # Examples
///
/// ```
/// use record_args_core::{DeclaredType, FieldSpec, RecordSchema};
///
/// let logging = RecordSchema::new("logging")
///     .with_group("Logging options")
///     .with_field(FieldSpec::new("log_dir", DeclaredType::optional(DeclaredType::Str)));
///
/// assert_eq!(logging.group.as_deref(), Some("Logging options"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordSchema {
    /// Record name (used when reporting assembled results).
    pub name: String,
    /// Optional argument-group label for help output.
    pub group: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldSpec>,
}

impl RecordSchema {
    /// Creates an empty schema with the given record name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Sets the argument-group label.
    pub fn with_group(mut self, label: &str) -> Self {
        self.group = Some(label.to_string());
        self
    }

    /// Appends a field.
    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Destination keys of all fields, in declaration order.
    pub fn destinations(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_literal_default_becomes_factory() {
        let field = FieldSpec::new("bois", DeclaredType::list(DeclaredType::Int))
            .with_default(vec![2i64, 3]);
        assert!(matches!(field.default, FieldDefault::Factory(_)));

        let a = field.default.produce().unwrap();
        let b = field.default.produce().unwrap();
        assert_eq!(a, b);
        assert_eq!(a, ArgValue::from(vec![2i64, 3]));
    }

    #[test]
    fn test_scalar_default_stays_literal() {
        let field = FieldSpec::new("lr", DeclaredType::Float).with_default(0.1);
        assert!(matches!(field.default, FieldDefault::Literal(_)));
    }

    #[test]
    fn test_builder_chaining() {
        let field = FieldSpec::new("x", DeclaredType::Str)
            .with_alias("-x")
            .with_aliases(["--ex", "--igs"])
            .with_help("an x");
        assert_eq!(field.aliases, vec!["-x", "--ex", "--igs"]);
        assert_eq!(field.help.as_deref(), Some("an x"));
    }

    #[test]
    fn test_optional_helper_shape() {
        let declared = DeclaredType::optional(DeclaredType::Int);
        assert_eq!(
            declared,
            DeclaredType::Union(vec![DeclaredType::Int, DeclaredType::Null])
        );
    }
}
