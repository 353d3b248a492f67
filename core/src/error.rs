//! Error types for schema construction and parsing.
//!
//! Two failure families exist: [`SchemaError`] for construction-time
//! problems (always fatal, never silently defaulted) and [`UsageError`]
//! for parse-time problems. Both are returned as values; the core never
//! terminates the process. Non-fatal conditions (a missing config file)
//! are reported as [`MergeWarning`](crate::MergeWarning)s instead.

use thiserror::Error;

/// Construction-time schema errors.
///
/// Raised while resolving declared types and registering compiled
/// arguments; any of these aborts parser setup immediately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The same destination key appears in more than one registered field.
    #[error("duplicate destination key across schemas: {0}")]
    DuplicateDestination(String),

    /// The same flag or alias string is registered twice (`--help`/`-h`
    /// are reserved).
    #[error("duplicate flag or alias: {0}")]
    DuplicateFlag(String),

    /// A union that is not exactly `Union[X, Null]`.
    #[error(
        "only a two-arm union with an absence arm is supported; problem encountered in field '{field}'"
    )]
    UnsupportedUnion {
        /// Offending field name.
        field: String,
    },

    /// An optional wrapping a non-scalar type (list, choice, nested union).
    #[error("optional is only supported for scalar types; problem encountered in field '{field}'")]
    OptionalNonScalar {
        /// Offending field name.
        field: String,
    },

    /// An enumeration with no members.
    #[error("enumeration must have at least one member in field '{field}'")]
    EmptyChoices {
        /// Offending field name.
        field: String,
    },

    /// Two enumeration members share a string form.
    #[error("enumeration members must have distinct string forms in field '{field}': '{repr}'")]
    DuplicateChoice {
        /// Offending field name.
        field: String,
        /// The repeated string form.
        repr: String,
    },

    /// An enumeration member that is not a literal scalar.
    #[error("enumeration members must be literal scalars in field '{field}'")]
    NonScalarChoice {
        /// Offending field name.
        field: String,
    },

    /// A list whose item type is not a scalar or enumeration.
    #[error("list items must be scalar or enumeration in field '{field}'")]
    InvalidListItem {
        /// Offending field name.
        field: String,
    },

    /// An alias that does not start with `-`.
    #[error("alias must start with '-': {0}")]
    InvalidAlias(String),
}

/// Parse-time usage errors.
///
/// A parse either fully succeeds or fails with one of these; there is no
/// partial result. The embedding application decides whether to terminate
/// the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UsageError {
    /// Required fields absent at end of stream.
    #[error("the following arguments are required: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    /// A token failed scalar coercion.
    #[error("invalid value for {field}: '{token}' (expected {expected})")]
    InvalidValue {
        /// Flag whose value failed to coerce.
        field: String,
        /// The offending token.
        token: String,
        /// Description of the expected form.
        expected: String,
    },

    /// A token did not match any enumeration member.
    #[error("invalid choice for {field}: '{token}' (choose from {choices})")]
    InvalidChoice {
        /// Flag whose value failed choice validation.
        field: String,
        /// The offending token.
        token: String,
        /// Rendered choice set.
        choices: String,
    },

    /// A flag that needs at least one value got none.
    #[error("argument {flag} expected at least one value")]
    MissingValue {
        /// The flag missing its value.
        flag: String,
    },

    /// Leftover tokens when `permit_remaining` was not requested.
    #[error("unrecognized arguments: {}", .0.join(" "))]
    UnrecognizedArguments(Vec<String>),

    /// `--help`/`-h` was seen; carries the rendered help text.
    #[error("help requested")]
    HelpRequested(String),
}

/// Umbrella error for one-shot entry points that both build and run a
/// parser.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Construction failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Parsing failed.
    #[error(transparent)]
    Usage(#[from] UsageError),
}
