//! The parser core: compiled-argument registration and token matching.
//!
//! [`ArgParser`] owns the registered [`CompiledArgument`] table for one
//! schema set. Construction compiles every field and fails fast on
//! destination-key or flag collisions; parsing walks the (merged) token
//! stream, consuming each recognized flag's arity-bound tokens, coercing
//! and choice-validating them, and writing into the namespace where a
//! later occurrence of the same destination overrides an earlier one.
//! Tokens matching no registered flag collect into a remaining list so the
//! caller decides whether they are acceptable.
//!
//! # Example
//!
//! ```
//! use record_args_core::{ArgParser, DeclaredType, FieldSpec, RecordSchema};
//!
//! let schema = RecordSchema::new("train")
//!     .with_field(FieldSpec::new("epochs", DeclaredType::Int))
//!     .with_field(FieldSpec::new("lr", DeclaredType::Float).with_default(0.1).with_alias("--lr"))
//!     .with_field(FieldSpec::new("flag", DeclaredType::Bool).with_default(true));
//!
//! let parser = ArgParser::new(vec![schema]).unwrap();
//! let out = parser.parse(&["--epochs".into(), "5".into(), "--no_flag".into()]).unwrap();
//!
//! let train = &out.records[0];
//! assert_eq!(train.get_int("epochs"), Some(5));
//! assert_eq!(train.get_float("lr"), Some(0.1));
//! assert_eq!(train.get_bool("flag"), Some(false));
//! ```

use std::collections::{HashMap, HashSet};

use crate::assemble::{Namespace, ParsedRecord, RecordMembership, assemble};
use crate::compile::{Arity, CompiledArgument, choice_set_repr, compile_field};
use crate::error::{SchemaError, UsageError};
use crate::merge::{ConfigOptions, MergeWarning, merge_token_sources};
use crate::types::{FieldSpec, RecordSchema};
use crate::value::ArgValue;

/// Per-call parse options.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Return unmatched tokens in the output instead of failing on them.
    pub permit_remaining: bool,
    /// Config-file merging; `None` parses the given tokens as-is.
    pub config: Option<ConfigOptions>,
}

/// The caller-visible result of a successful parse.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    /// One record per registered schema, in registration order.
    pub records: Vec<ParsedRecord>,
    /// Values of fields registered directly on the parser, outside any
    /// schema.
    pub extras: Namespace,
    /// Tokens that matched no registered flag (empty unless
    /// [`ParseOptions::permit_remaining`] was set).
    pub remaining: Vec<String>,
    /// Non-fatal config-file warnings.
    pub warnings: Vec<MergeWarning>,
}

/// A compiled schema-driven argument parser.
///
/// One instance owns its compiled-argument table for the lifetime of one
/// invocation; instances are independent and may coexist freely.
#[derive(Debug)]
pub struct ArgParser {
    prog: String,
    args: Vec<CompiledArgument>,
    lookup: HashMap<String, usize>,
    memberships: Vec<RecordMembership>,
    sections: Vec<(String, Vec<usize>)>,
    seen_dests: HashSet<String>,
}

impl ArgParser {
    /// Compiles the given schemas into a parser.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] for destination-key collisions across
    /// schemas, duplicate flag/alias strings (`--help`/`-h` are reserved),
    /// and any shape-resolution failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use record_args_core::{ArgParser, DeclaredType, FieldSpec, RecordSchema, SchemaError};
    ///
    /// // Destination keys must be unique across all schemas on one parser.
    /// let a = RecordSchema::new("a").with_field(FieldSpec::new("x", DeclaredType::Int));
    /// let b = RecordSchema::new("b").with_field(FieldSpec::new("x", DeclaredType::Str));
    /// assert_eq!(
    ///     ArgParser::new(vec![a, b]).unwrap_err(),
    ///     SchemaError::DuplicateDestination("x".to_string()),
    /// );
    /// ```
    pub fn new(schemas: impl IntoIterator<Item = RecordSchema>) -> Result<Self, SchemaError> {
        let mut parser = Self {
            prog: "program".to_string(),
            args: Vec::new(),
            lookup: HashMap::new(),
            memberships: Vec::new(),
            sections: Vec::new(),
            seen_dests: HashSet::new(),
        };

        for schema in schemas {
            let label = schema.group.clone().unwrap_or_else(|| schema.name.clone());
            let mut indices = Vec::new();
            let mut dests = Vec::new();
            for field in &schema.fields {
                indices.extend(parser.register_field(field)?);
                dests.push(field.name.clone());
            }
            parser.memberships.push(RecordMembership {
                name: schema.name.clone(),
                dests,
            });
            parser.sections.push((label, indices));
        }

        Ok(parser)
    }

    /// Compiles a single schema into a parser.
    pub fn from_schema(schema: RecordSchema) -> Result<Self, SchemaError> {
        Self::new([schema])
    }

    /// Sets the program name shown in generated help.
    pub fn with_prog(mut self, prog: &str) -> Self {
        self.prog = prog.to_string();
        self
    }

    /// Registers an extra field directly on the parser, outside any
    /// schema. Its value lands in the auxiliary namespace after assembly.
    pub fn add_field(&mut self, field: FieldSpec) -> Result<(), SchemaError> {
        let indices = self.register_field(&field)?;
        match self
            .sections
            .iter_mut()
            .find(|(label, _)| label == "additional arguments")
        {
            Some((_, existing)) => existing.extend(indices),
            None => self
                .sections
                .push(("additional arguments".to_string(), indices)),
        }
        Ok(())
    }

    fn register_field(&mut self, field: &FieldSpec) -> Result<Vec<usize>, SchemaError> {
        if !self.seen_dests.insert(field.name.clone()) {
            return Err(SchemaError::DuplicateDestination(field.name.clone()));
        }

        let mut indices = Vec::new();
        for arg in compile_field(field)? {
            let names: Vec<String> = arg.names().map(str::to_string).collect();
            for name in &names {
                if name == "--help" || name == "-h" || self.lookup.contains_key(name) {
                    return Err(SchemaError::DuplicateFlag(name.clone()));
                }
            }
            let idx = self.args.len();
            for name in names {
                self.lookup.insert(name, idx);
            }
            self.args.push(arg);
            indices.push(idx);
        }
        Ok(indices)
    }

    /// Parses the given tokens with default options (no config merging,
    /// unmatched tokens are an error).
    pub fn parse(&self, args: &[String]) -> Result<ParseOutput, UsageError> {
        self.parse_with(args, &ParseOptions::default())
    }

    /// Parses the given tokens under the given options.
    ///
    /// # Errors
    ///
    /// Any coercion failure, invalid choice, missing required field, or
    /// (unless permitted) unmatched token fails the whole parse with a
    /// [`UsageError`]; there is no partial result. `--help`/`-h` yields
    /// [`UsageError::HelpRequested`] carrying the rendered help text.
    pub fn parse_with(
        &self,
        args: &[String],
        options: &ParseOptions,
    ) -> Result<ParseOutput, UsageError> {
        let (tokens, warnings) = match &options.config {
            Some(config) => merge_token_sources(args, config),
            None => (args.to_vec(), Vec::new()),
        };

        let mut pool: HashMap<String, ArgValue> = HashMap::new();
        let mut remaining: Vec<String> = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            let (name, inline) = split_flag_token(token);
            if name == "--help" || name == "-h" {
                return Err(UsageError::HelpRequested(self.help()));
            }
            let Some(&idx) = self.lookup.get(name) else {
                remaining.push(token.clone());
                i += 1;
                continue;
            };
            let arg = &self.args[idx];
            i += 1;

            match &arg.arity {
                Arity::Zero { value } => {
                    pool.insert(arg.dest.clone(), value.clone());
                }
                Arity::ExactlyOne => {
                    let value_token = match inline {
                        Some(v) => v.to_string(),
                        None => match self.next_value_token(&tokens, i) {
                            Some(t) => {
                                i += 1;
                                t.to_string()
                            }
                            None => {
                                return Err(UsageError::MissingValue {
                                    flag: arg.flag.clone(),
                                });
                            }
                        },
                    };
                    let value = self.coerce_and_validate(arg, &value_token)?;
                    pool.insert(arg.dest.clone(), value);
                }
                Arity::ZeroOrOne { bare } => {
                    let value = match inline {
                        Some(v) => self.coerce_and_validate(arg, v)?,
                        None => match self.next_value_token(&tokens, i) {
                            Some(t) => {
                                let value = self.coerce_and_validate(arg, t)?;
                                i += 1;
                                value
                            }
                            None => bare.clone(),
                        },
                    };
                    pool.insert(arg.dest.clone(), value);
                }
                Arity::OneOrMore => {
                    let mut items = Vec::new();
                    match inline {
                        Some(v) => items.push(self.coerce_and_validate(arg, v)?),
                        None => {
                            while let Some(t) = self.next_value_token(&tokens, i) {
                                items.push(self.coerce_and_validate(arg, t)?);
                                i += 1;
                            }
                            if items.is_empty() {
                                return Err(UsageError::MissingValue {
                                    flag: arg.flag.clone(),
                                });
                            }
                        }
                    }
                    pool.insert(arg.dest.clone(), ArgValue::List(items));
                }
            }
        }

        // Defaults fill for absent destinations; factories run once per
        // parse so container defaults are never shared across parses.
        for arg in &self.args {
            if !pool.contains_key(&arg.dest) {
                if let Some(value) = arg.default.produce() {
                    pool.insert(arg.dest.clone(), value);
                }
            }
        }

        let missing: Vec<String> = self
            .args
            .iter()
            .filter(|arg| arg.required && !pool.contains_key(&arg.dest))
            .map(|arg| arg.flag.clone())
            .collect();
        if !missing.is_empty() {
            return Err(UsageError::MissingRequired(missing));
        }

        if !options.permit_remaining && !remaining.is_empty() {
            return Err(UsageError::UnrecognizedArguments(remaining));
        }

        let (records, extras) = assemble(&self.memberships, pool);
        Ok(ParseOutput {
            records,
            extras,
            remaining,
            warnings,
        })
    }

    /// Renders the auto-generated help text: usage line, then each
    /// record's fields as a section with type tag and default.
    pub fn help(&self) -> String {
        let mut out = format!("usage: {} [options]\n", self.prog);
        out.push_str("\noptions:\n");
        out.push_str("  -h, --help            show this help message and exit\n");
        for (label, indices) in &self.sections {
            out.push_str(&format!("\n{label}:\n"));
            for &idx in indices {
                out.push_str(&render_arg_help(&self.args[idx]));
            }
        }
        out
    }

    fn next_value_token<'t>(&self, tokens: &'t [String], i: usize) -> Option<&'t str> {
        tokens
            .get(i)
            .map(String::as_str)
            .filter(|t| !self.is_flag_token(t))
    }

    fn is_flag_token(&self, token: &str) -> bool {
        let (name, _) = split_flag_token(token);
        name == "--help" || name == "-h" || self.lookup.contains_key(name)
    }

    fn coerce_and_validate(
        &self,
        arg: &CompiledArgument,
        token: &str,
    ) -> Result<ArgValue, UsageError> {
        let value = arg
            .coercion
            .apply(token)
            .map_err(|expected| UsageError::InvalidValue {
                field: arg.flag.clone(),
                token: token.to_string(),
                expected,
            })?;
        if let Some(choices) = &arg.choices {
            if !choices.contains(&value) {
                return Err(UsageError::InvalidChoice {
                    field: arg.flag.clone(),
                    token: token.to_string(),
                    choices: choice_set_repr(choices),
                });
            }
        }
        Ok(value)
    }
}

/// Splits `--flag=value` into the flag name and the inline value.
fn split_flag_token(token: &str) -> (&str, Option<&str>) {
    if token.starts_with("--") {
        if let Some(pos) = token.find('=') {
            return (&token[..pos], Some(&token[pos + 1..]));
        }
    }
    (token, None)
}

fn render_arg_help(arg: &CompiledArgument) -> String {
    let mut invocation = arg.names().collect::<Vec<_>>().join(", ");
    if !arg.metavar.is_empty() {
        invocation.push(' ');
        invocation.push_str(&arg.metavar);
    }

    let mut detail = arg.help.clone().unwrap_or_default();
    let note = match arg.default.produce() {
        Some(value) => format!("(default: {value})"),
        None if arg.required => "(required)".to_string(),
        None => String::new(),
    };
    if !note.is_empty() {
        if !detail.is_empty() {
            detail.push(' ');
        }
        detail.push_str(&note);
    }

    if invocation.len() <= 20 {
        format!("  {invocation:<22}{detail}\n")
    } else {
        format!("  {invocation}\n                        {detail}\n")
    }
}
