//! Record binding: binding names, discarded columns, cardinality, scan
//! failures and unusable destinations.

use std::sync::Arc;

use sqlmap_core::errors::BindError;
use sqlmap_storage::{bind_list, bind_one, record, Record, ResultSet};

#[derive(Debug, Default, Clone, PartialEq)]
struct User {
    id: i64,
    name: String,
    nickname: Option<String>,
}

record!(User {
    id: "id",
    name: "user_name",
    nickname: "nick",
});

#[derive(Debug, Default)]
struct Nothing {}

record!(Nothing {});

#[derive(Debug, Default)]
struct Clash {
    a: String,
    b: String,
}

record!(Clash {
    a: "x",
    b: "x",
});

fn rs(columns: &[&str], rows: &[&[Option<&str>]]) -> ResultSet {
    ResultSet::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|v| v.map(|s| s.as_bytes().to_vec())).collect())
            .collect(),
    )
}

#[test]
fn binds_by_declared_name_and_discards_the_rest() {
    let set = rs(
        &["id", "user_name", "extra"],
        &[&[Some("1"), Some("ann"), Some("zzz")], &[Some("2"), Some("bob"), None]],
    );
    let mut users: Vec<User> = Vec::new();
    let bound = bind_list(&mut users, &set).unwrap();
    assert_eq!(bound, 2);
    assert_eq!(
        users,
        vec![
            User { id: 1, name: "ann".into(), nickname: None },
            User { id: 2, name: "bob".into(), nickname: None },
        ]
    );
}

#[test]
fn field_names_do_not_match_columns_implicitly() {
    // `name` is bound as `user_name`; a `name` column is discarded.
    let set = rs(&["id", "name"], &[&[Some("1"), Some("ann")]]);
    let mut user = User::default();
    bind_one(&mut user, &set).unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.name, "");
}

#[test]
fn matching_is_case_sensitive() {
    let set = rs(&["ID"], &[&[Some("5")]]);
    let mut user = User::default();
    bind_one(&mut user, &set).unwrap();
    assert_eq!(user.id, 0);
}

#[test]
fn nulls_become_zero_values_or_none() {
    let set = rs(&["id", "user_name", "nick"], &[&[None, None, None]]);
    let mut user = User { id: 9, name: "old".into(), nickname: Some("x".into()) };
    bind_one(&mut user, &set).unwrap();
    assert_eq!(user, User::default());
}

#[test]
fn select_one_cardinality() {
    let mut user = User::default();

    let empty = rs(&["id"], &[]);
    assert_eq!(bind_one(&mut user, &empty), Err(BindError::NoRecordFound));
    assert_eq!(user, User::default());

    let two = rs(&["id"], &[&[Some("1")], &[Some("2")]]);
    assert_eq!(bind_one(&mut user, &two), Err(BindError::MultipleRecordsFound));
    assert_eq!(user.id, 1, "first row is bound before the cardinality error");

    let one = rs(&["id", "nick"], &[&[Some("3"), Some("c")]]);
    bind_one(&mut user, &one).unwrap();
    assert_eq!(user.id, 3);
    assert_eq!(user.nickname.as_deref(), Some("c"));
}

#[test]
fn list_binding_accepts_zero_rows() {
    let mut users: Vec<User> = Vec::new();
    assert_eq!(bind_list(&mut users, &rs(&["id"], &[])).unwrap(), 0);
    assert!(users.is_empty());
}

#[test]
fn list_binding_appends_to_existing_entries() {
    let mut users = vec![User { id: 100, ..User::default() }];
    bind_list(&mut users, &rs(&["id"], &[&[Some("1")]])).unwrap();
    assert_eq!(users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![100, 1]);
}

#[test]
fn boxed_and_shared_lists() {
    let set = rs(&["id"], &[&[Some("1")], &[Some("2")]]);

    let mut boxed: Vec<Box<User>> = Vec::new();
    bind_list(&mut boxed, &set).unwrap();
    assert_eq!(boxed[1].id, 2);

    let mut shared: Vec<Arc<User>> = Vec::new();
    bind_list(&mut shared, &set).unwrap();
    assert_eq!(shared[0].id, 1);
}

#[test]
fn failed_list_binding_leaves_the_destination_untouched() {
    // Row 2 fails to scan after row 1 bound cleanly.
    let set = rs(&["id"], &[&[Some("1")], &[Some("two")], &[Some("3")]]);

    let mut users = vec![User { id: 100, ..User::default() }];
    let err = bind_list(&mut users, &set).unwrap_err();
    assert!(matches!(err, BindError::Scan { .. }), "{err:?}");
    assert_eq!(users, vec![User { id: 100, ..User::default() }]);

    let mut boxed: Vec<Box<User>> = Vec::new();
    assert!(bind_list(&mut boxed, &set).is_err());
    assert!(boxed.is_empty());
}

#[test]
fn scan_error_names_column_and_field() {
    let set = rs(&["id"], &[&[Some("not-a-number")]]);
    let mut users: Vec<User> = Vec::new();
    match bind_list(&mut users, &set).unwrap_err() {
        BindError::Scan { column, field, .. } => {
            assert_eq!(column, "id");
            assert_eq!(field, "id");
        }
        other => panic!("expected a scan error, got {other:?}"),
    }
}

#[test]
fn record_without_bindings_is_an_invalid_destination() {
    let mut dest = Nothing::default();
    let err = bind_one(&mut dest, &rs(&["id"], &[&[Some("1")]])).unwrap_err();
    assert!(matches!(err, BindError::InvalidDestinationType { .. }));
}

#[test]
fn duplicate_binding_names_are_an_invalid_destination() {
    let mut dest: Vec<Clash> = Vec::new();
    match bind_list(&mut dest, &rs(&["x"], &[])).unwrap_err() {
        BindError::InvalidDestinationType { type_name, message } => {
            assert_eq!(type_name, "Clash");
            assert!(message.contains("`x`"), "{message}");
        }
        other => panic!("expected an invalid destination, got {other:?}"),
    }
}

#[test]
fn descriptor_is_built_once() {
    let first = User::descriptor() as *const _;
    let second = User::descriptor() as *const _;
    assert_eq!(first, second);
    assert_eq!(User::descriptor().type_name(), "User");
    assert_eq!(User::descriptor().fields().len(), 3);
}
