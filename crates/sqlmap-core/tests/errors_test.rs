//! Tests for the sqlmap error taxonomy.

use std::collections::HashSet;
use std::path::PathBuf;

use sqlmap_core::errors::error_code::{self, SqlMapErrorCode};
use sqlmap_core::errors::*;

#[test]
fn every_error_has_a_code() {
    let errors: Vec<SqlMapError> = vec![
        RegistryError::UnknownStatement { key: "a.b".into() }.into(),
        RegistryError::DuplicateKey { key: "a.b".into() }.into(),
        TemplateError::Syntax {
            key: "a.b".into(),
            line: 1,
            message: "unclosed action".into(),
        }
        .into(),
        TemplateError::Render {
            key: "a.b".into(),
            message: "missing field".into(),
        }
        .into(),
        BindError::NoRecordFound.into(),
        BindError::MultipleRecordsFound.into(),
        SessionError::NotInitialized.into(),
        DatabaseError::DbBusy.into(),
        LoadError::MissingRoot {
            path: PathBuf::from("x.xml"),
        }
        .into(),
        ConfigError::ValidationFailed {
            field: "database.driver".into(),
            message: "must not be empty".into(),
        }
        .into(),
        SqlMapError::EngineNotInitialized,
    ];
    for err in &errors {
        assert!(!err.error_code().is_empty(), "{err}");
    }
}

#[test]
fn aggregate_error_forwards_subsystem_codes() {
    let err: SqlMapError = RegistryError::UnknownStatement { key: "x.y".into() }.into();
    assert_eq!(err.error_code(), error_code::UNKNOWN_STATEMENT);

    let err: SqlMapError = BindError::Scan {
        column: "id".into(),
        field: "id".into(),
        message: "invalid digit".into(),
    }
    .into();
    assert_eq!(err.error_code(), error_code::SCAN_ERROR);

    assert_eq!(
        SqlMapError::EngineNotInitialized.error_code(),
        error_code::ENGINE_NOT_INITIALIZED
    );
}

#[test]
fn cardinality_and_session_codes_are_distinct() {
    let codes: HashSet<&str> = [
        BindError::NoRecordFound.error_code(),
        BindError::MultipleRecordsFound.error_code(),
        SessionError::NotInitialized.error_code(),
        SqlMapError::EngineNotInitialized.error_code(),
    ]
    .into_iter()
    .collect();
    assert_eq!(codes.len(), 4);
}

#[test]
fn coded_string_prefixes_the_code() {
    let err = TemplateError::Render {
        key: "user.find".into(),
        message: "missing parameter field `id`".into(),
    };
    let text = err.coded_string();
    assert!(text.starts_with("[RENDER_ERROR]"));
    assert!(text.contains("user.find"));
    assert_eq!(err.key(), Some("user.find"));
}

#[test]
fn load_duplicate_key_shares_registry_code() {
    let err = LoadError::DuplicateKey {
        key: "ns.a".into(),
        path: PathBuf::from("a.xml"),
    };
    assert_eq!(err.error_code(), error_code::DUPLICATE_KEY);
}
