//! Schema-driven argument parsing.
//!
//! This crate compiles declarative record schemas into a working CLI
//! parser:
//!
//! - [`FieldSpec`] / [`RecordSchema`] — the declaration surface: named,
//!   typed fields with defaults (or default factories), aliases, help
//!   text, and group labels.
//! - [`resolve_shape`] — normalizes declared types (including
//!   Union/Optional ambiguity) into the closed shape set
//!   ([`FieldShape`]).
//! - [`compile_field`] — maps one resolved field to its
//!   [`CompiledArgument`]s, synthesizing `--no_<name>` negation flags for
//!   true-default booleans.
//! - [`merge_token_sources`] — loads config-file token streams and merges
//!   them with the command line under fixed precedence (command line
//!   wins).
//! - [`ArgParser`] — owns the compiled-argument table; matches flags,
//!   coerces and choice-validates values, and assembles the results into
//!   one [`ParsedRecord`] per schema plus an auxiliary [`Namespace`].
//!
//! Construction problems are [`SchemaError`]s and abort setup; parse
//! problems are [`UsageError`]s returned to the caller, which decides
//! whether to terminate the process.
//!
//! # Example
//!
//! ```
//! use record_args_core::{parse_records, DeclaredType, FieldSpec, RecordSchema};
//!
//! let schema = RecordSchema::new("train")
//!     .with_field(FieldSpec::new("epochs", DeclaredType::Int).with_help("Number of epochs"))
//!     .with_field(
//!         FieldSpec::new("lr", DeclaredType::Float)
//!             .with_default(0.1)
//!             .with_alias("--lr"),
//!     )
//!     .with_field(FieldSpec::new("flag", DeclaredType::Bool).with_default(true));
//!
//! let args: Vec<String> = ["--epochs", "5", "--no_flag"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//! let out = parse_records(vec![schema], &args).unwrap();
//!
//! let train = &out.records[0];
//! assert_eq!(train.get_int("epochs"), Some(5));
//! assert_eq!(train.get_float("lr"), Some(0.1));
//! assert_eq!(train.get_bool("flag"), Some(false));
//! ```

mod assemble;
mod compile;
mod error;
mod merge;
mod parser;
mod resolve;
mod types;
mod value;

pub use assemble::{Namespace, ParsedRecord};
pub use compile::{Arity, Coercion, CompiledArgument, choice_set_repr, compile_field};
pub use error::{Error, SchemaError, UsageError};
pub use merge::{ConfigOptions, MergeWarning, merge_token_sources};
pub use parser::{ArgParser, ParseOptions, ParseOutput};
pub use resolve::{FieldShape, ListItem, resolve_shape};
pub use types::{DeclaredType, DefaultFactory, FieldDefault, FieldSpec, RecordSchema};
pub use value::{ArgValue, FALSY_TOKENS, ScalarType, TRUTHY_TOKENS};

/// One-shot convenience: builds a parser for the given schemas and parses
/// the tokens with config-file merging enabled under the default `--cfg`
/// flag.
///
/// # Errors
///
/// Returns [`Error::Schema`] when parser construction fails and
/// [`Error::Usage`] when parsing fails.
pub fn parse_records(
    schemas: Vec<RecordSchema>,
    args: &[String],
) -> Result<ParseOutput, Error> {
    let parser = ArgParser::new(schemas)?;
    let options = ParseOptions {
        permit_remaining: false,
        config: Some(ConfigOptions::default()),
    };
    Ok(parser.parse_with(args, &options)?)
}
