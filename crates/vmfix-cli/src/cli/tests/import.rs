//! Tests for `vmfix import` parsing and request building.

use super::parse;
use crate::cli::commands::build_request;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use vmfix_core::model::{SampleValue, ValueSpec};

#[test]
fn cli_parse_import_defaults() {
    match parse(&["vmfix", "import", "tme_routes_routes_step_security"]) {
        CliCommand::Import(args) => {
            assert_eq!(args.name, "tme_routes_routes_step_security");
            assert_eq!(args.window.minutes, 60);
            assert_eq!(args.window.step, 60);
            assert!(args.value.is_none());
            assert_eq!((args.min, args.max), (0, 1000));
            assert_eq!(args.security, "Unsafe");
            assert!(args.step_count.is_none());
            assert!(args.risk_name.is_none());
            assert!(!args.keep_existing);
        }
        _ => panic!("expected Import"),
    }
}

#[test]
fn cli_parse_import_with_labels() {
    match parse(&[
        "vmfix",
        "import",
        "m",
        "--minutes",
        "10",
        "--step",
        "30",
        "--security",
        "Safe",
        "--step-count",
        "3",
        "--risk-name",
        "Phishing",
        "--keep-existing",
    ]) {
        CliCommand::Import(args) => {
            assert_eq!(args.window.minutes, 10);
            assert_eq!(args.window.step, 30);
            assert_eq!(args.security, "Safe");
            assert_eq!(args.step_count, Some(3));
            assert_eq!(args.risk_name.as_deref(), Some("Phishing"));
            assert!(args.keep_existing);
        }
        _ => panic!("expected Import with labels"),
    }
}

#[test]
fn cli_parse_import_value_conflicts_with_range() {
    assert!(Cli::try_parse_from(["vmfix", "import", "m", "--value", "1", "--min", "2"]).is_err());
}

#[test]
fn import_request_from_args() {
    let args = match parse(&["vmfix", "import", "m", "--minutes", "5", "--value", "7", "--step-count", "2"]) {
        CliCommand::Import(args) => args,
        _ => panic!("expected Import"),
    };
    let req = build_request(&args).unwrap();
    assert_eq!(req.values, ValueSpec::Fixed(SampleValue::Int(7)));
    assert!(req.delete_first);
    assert_eq!(req.delete_selector(), r#"m{security="Unsafe", step_count="2"}"#);
    assert_eq!(req.build().unwrap().len(), 5);
}

#[test]
fn import_request_fractional_value_and_range() {
    let args = match parse(&["vmfix", "import", "m", "--value", "0.5"]) {
        CliCommand::Import(args) => args,
        _ => panic!("expected Import"),
    };
    let req = build_request(&args).unwrap();
    assert_eq!(req.values, ValueSpec::Fixed(SampleValue::Float(0.5)));

    let args = match parse(&["vmfix", "import", "m", "--min", "10", "--max", "20"]) {
        CliCommand::Import(args) => args,
        _ => panic!("expected Import"),
    };
    let req = build_request(&args).unwrap();
    assert_eq!(req.values, ValueSpec::Random { min: 10, max: 20 });
}

#[test]
fn import_request_rejects_empty_window() {
    let args = match parse(&["vmfix", "import", "m", "--minutes", "0"]) {
        CliCommand::Import(args) => args,
        _ => panic!("expected Import"),
    };
    assert!(build_request(&args).is_err());
}

#[test]
fn import_request_rejects_overflowing_window() {
    let args = match parse(&["vmfix", "import", "m", "--minutes", "150000000000"]) {
        CliCommand::Import(args) => args,
        _ => panic!("expected Import"),
    };
    assert!(build_request(&args).is_err());
}
