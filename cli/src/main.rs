//! Demo entry point: a training-style schema set parsed from argv.
//!
//! This binary owns the process concerns the core deliberately avoids:
//! it maps usage errors to exit status 2, `--help`/`--version` to exit
//! status 0, and prints the assembled records as JSON. Config files can
//! be supplied with the repeatable `--cfg <path>` flag.

use std::process::ExitCode;

use record_args_core::{
    ArgParser, ArgValue, ConfigOptions, DeclaredType, FieldSpec, ParseOptions, RecordSchema,
    SchemaError, UsageError,
};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

fn train_schema() -> RecordSchema {
    RecordSchema::new("train")
        .with_group("Training options")
        .with_field(FieldSpec::new("epochs", DeclaredType::Int).with_help("Number of epochs"))
        .with_field(
            FieldSpec::new("learning_rate", DeclaredType::Float)
                .with_alias("--lr")
                .with_help("Required argument (no default)"),
        )
        .with_field(
            FieldSpec::new("data_path", DeclaredType::Str)
                .with_default("./data/")
                .with_aliases(["--data", "-d"]),
        )
        .with_field(
            FieldSpec::new("extra_data", DeclaredType::optional(DeclaredType::Str))
                .with_default(""),
        )
        .with_field(
            FieldSpec::new("cuda", DeclaredType::Bool)
                .with_default(true)
                .with_help("A --no_cuda flag is generated automatically"),
        )
        .with_field(
            FieldSpec::new(
                "precision",
                DeclaredType::choice([
                    ArgValue::Int(32),
                    ArgValue::Int(16),
                    ArgValue::Int(8),
                    ArgValue::Str("bf16".into()),
                    ArgValue::Str("tf32".into()),
                ]),
            )
            .with_default(32i64)
            .with_help("Choices with mixed types are supported"),
        )
        .with_field(
            FieldSpec::new("some_list_arg", DeclaredType::list(DeclaredType::Int))
                .with_default(vec![1i64, 2, 3]),
        )
        .with_field(
            FieldSpec::new(
                "evaluation_datasets",
                DeclaredType::list(DeclaredType::choice(["xnli", "tydiqa", "wikiann", "squad"])),
            )
            .with_default(vec!["xnli", "wikiann"])
            .with_help("Select any number of datasets to evaluate on"),
        )
}

fn logging_schema() -> RecordSchema {
    RecordSchema::new("logging")
        .with_group("Logging options")
        .with_field(
            FieldSpec::new("log_dir", DeclaredType::optional(DeclaredType::Str))
                .with_default("./logs/"),
        )
        .with_field(
            FieldSpec::new(
                "log_backends",
                DeclaredType::list(DeclaredType::choice(["wandb", "tensorboard", "neptune"])),
            )
            .with_default(vec!["wandb"]),
        )
        .with_field(
            FieldSpec::new(
                "log_level",
                DeclaredType::choice(["debug", "info", "warning", "error", "critical"]),
            )
            .with_default("info"),
        )
}

fn build_parser() -> Result<ArgParser, SchemaError> {
    Ok(ArgParser::new(vec![train_schema(), logging_schema()])?.with_prog("record-args"))
}

fn run(args: &[String]) -> Result<String, UsageError> {
    // Schema mistakes in the demo set are programmer errors.
    let parser = build_parser().expect("demo schemas are valid");

    let options = ParseOptions {
        permit_remaining: false,
        config: Some(ConfigOptions::default()),
    };
    let out = parser.parse_with(args, &options)?;

    for warning in &out.warnings {
        eprintln!("record-args | warning: {warning}");
    }

    Ok(serde_json::to_string_pretty(&out.records).expect("records serialize to JSON"))
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.first().map(String::as_str) == Some("--version") {
        println!("record-args {PACKAGE_VERSION}");
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(UsageError::HelpRequested(text)) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("record-args | error: {err}");
            ExitCode::from(2)
        }
    }
}
