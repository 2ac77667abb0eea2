//! Engine call surface against a file-backed database and a statement
//! directory on disk.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use sqlmap_core::config::SqlMapConfig;
use sqlmap_core::errors::{
    BindError, DatabaseError, LoadError, RegistryError, SqlMapErrorCode, TemplateError,
};
use sqlmap_core::SqlMapError;
use sqlmap_engine::{record, CompiledTemplate, Engine, TemplateBackend};
use tempfile::TempDir;

const USERS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<sqlmap namespace="users">
  <sql id="create">
    CREATE TABLE users (
      id        INTEGER PRIMARY KEY,
      user_name TEXT NOT NULL,
      nick      TEXT,
      age       INTEGER
    )
  </sql>
  <sql id="insert">
    INSERT INTO users (user_name, nick, age)
    VALUES ({{ quote .name }}, {{ quote .nick }}, {{ .age }})
  </sql>
  <sql id="all">SELECT id, user_name, nick, age FROM users ORDER BY id</sql>
  <sql id="by_name">
    SELECT id, user_name, nick FROM users WHERE user_name = {{ quote .name }}
  </sql>
  <sql id="younger_than"><![CDATA[
    SELECT id, user_name FROM users
     WHERE age < {{ .age }}
    {{ if .nick }} AND nick = {{ quote .nick }} {{ end }}
     ORDER BY id
  ]]></sql>
  <sql id="rename">UPDATE users SET user_name = {{ quote .to }} WHERE user_name = {{ quote .from }}</sql>
</sqlmap>
"#;

const ADMIN_XML: &str = r#"<sqlmap namespace="admin">
  <sql id="count">SELECT COUNT(*) AS n FROM users</sql>
</sqlmap>
"#;

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

#[derive(Serialize)]
struct NewUser<'a> {
    name: &'a str,
    nick: Option<&'a str>,
    age: u32,
}

struct Fixture {
    _dir: TempDir,
    engine: Engine,
}

fn write_statements(root: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let statements = dir.path().join("sql");
    write_statements(
        &statements,
        &[("users.xml", USERS_XML), ("nested/admin.xml", ADMIN_XML)],
    );
    let db = dir.path().join("app.db");
    let engine = Engine::open("sqlite", db.to_str().unwrap(), &statements).unwrap();
    engine.execute("users.create", &()).unwrap();
    Fixture { _dir: dir, engine }
}

fn seed(engine: &Engine) {
    for (name, nick, age) in [("ann", Some("a"), 31), ("bob", None, 25), ("cyd", Some("c"), 19)] {
        engine
            .execute("users.insert", &NewUser { name, nick, age })
            .unwrap();
    }
}

// ── execute / query ──────────────────────────────────────────────────────

#[test]
fn execute_reports_rows_affected_and_last_insert_id() {
    let fx = fixture();
    let first = fx
        .engine
        .execute("users.insert", &NewUser { name: "ann", nick: None, age: 30 })
        .unwrap();
    assert_eq!(first.rows_affected, 1);
    assert_eq!(first.last_insert_id, 1);

    let second = fx
        .engine
        .execute("users.insert", &NewUser { name: "bob", nick: None, age: 40 })
        .unwrap();
    assert_eq!(second.last_insert_id, 2);

    let renamed = fx
        .engine
        .execute("users.rename", &json!({"from": "bob", "to": "rob"}))
        .unwrap();
    assert_eq!(renamed.rows_affected, 1);
}

#[test]
fn query_returns_one_dictionary_per_row_with_null_as_empty_string() {
    let fx = fixture();
    seed(&fx.engine);

    let rows = fx.engine.query("users.all", &()).unwrap();
    assert_eq!(rows.len(), 3);
    let expected: HashMap<String, String> = [
        ("id", "2"),
        ("user_name", "bob"),
        ("nick", ""),
        ("age", "25"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    assert_eq!(rows[1], expected);
}

#[test]
fn query_with_no_rows_is_empty_not_an_error() {
    let fx = fixture();
    let rows = fx.engine.query("users.all", &()).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn cdata_statements_and_conditional_clauses() {
    let fx = fixture();
    seed(&fx.engine);

    let rows = fx
        .engine
        .query("users.younger_than", &json!({"age": 30, "nick": null}))
        .unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r["user_name"].as_str()).collect();
    assert_eq!(names, vec!["bob", "cyd"]);

    let rows = fx
        .engine
        .query("users.younger_than", &json!({"age": 30, "nick": "c"}))
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user_name"], "cyd");
}

#[test]
fn statements_in_nested_directories_are_loaded() {
    let fx = fixture();
    seed(&fx.engine);
    let rows = fx.engine.query("admin.count", &()).unwrap();
    assert_eq!(rows[0]["n"], "3");
}

#[test]
fn query_raw_keeps_column_order_and_nulls() {
    let fx = fixture();
    seed(&fx.engine);
    let set = fx.engine.query_raw("users.by_name", &json!({"name": "bob"})).unwrap();
    assert_eq!(set.columns(), ["id", "user_name", "nick"]);
    assert_eq!(set.len(), 1);
    assert_eq!(set.rows()[0][2], None);
}

#[test]
fn render_returns_normalized_sql() {
    let fx = fixture();
    let sql = fx
        .engine
        .render("users.younger_than", &json!({"age": 18, "nick": "o'k"}))
        .unwrap();
    assert_eq!(
        sql,
        "SELECT id, user_name FROM users WHERE age < 18 AND nick = 'o''k' ORDER BY id"
    );
}

// ── select / select_one ──────────────────────────────────────────────────

#[test]
fn select_binds_records_and_discards_unbound_columns() {
    let fx = fixture();
    seed(&fx.engine);

    // `age` has no binding on `User` and is dropped.
    let mut users: Vec<User> = Vec::new();
    fx.engine.select(&mut users, "users.all", &()).unwrap();
    assert_eq!(
        users,
        vec![
            User { id: 1, name: "ann".into(), nickname: Some("a".into()) },
            User { id: 2, name: "bob".into(), nickname: None },
            User { id: 3, name: "cyd".into(), nickname: Some("c".into()) },
        ]
    );
}

#[test]
fn select_appends_to_existing_contents() {
    let fx = fixture();
    seed(&fx.engine);
    let mut users = vec![User::default()];
    fx.engine
        .select(&mut users, "users.younger_than", &json!({"age": 20, "nick": null}))
        .unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].name, "cyd");
}

#[test]
fn select_one_binds_the_single_row() {
    let fx = fixture();
    seed(&fx.engine);
    let mut user = User::default();
    fx.engine
        .select_one(&mut user, "users.by_name", &json!({"name": "ann"}))
        .unwrap();
    assert_eq!(user, User { id: 1, name: "ann".into(), nickname: Some("a".into()) });
}

#[test]
fn select_one_enforces_cardinality() {
    let fx = fixture();
    seed(&fx.engine);

    let mut user = User::default();
    let err = fx
        .engine
        .select_one(&mut user, "users.by_name", &json!({"name": "nobody"}))
        .unwrap_err();
    assert!(matches!(err, SqlMapError::Bind(BindError::NoRecordFound)));
    assert_eq!(user, User::default());

    let err = fx
        .engine
        .select_one(&mut user, "users.all", &())
        .unwrap_err();
    assert!(matches!(err, SqlMapError::Bind(BindError::MultipleRecordsFound)));
    assert_eq!(err.error_code(), "MULTIPLE_RECORDS");
}

// ── failures ─────────────────────────────────────────────────────────────

#[test]
fn unknown_statement_key() {
    let fx = fixture();
    let err = fx.engine.query("users.missing", &()).unwrap_err();
    match err {
        SqlMapError::Registry(RegistryError::UnknownStatement { key }) => {
            assert_eq!(key, "users.missing")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn render_failure_names_the_statement() {
    let fx = fixture();
    // A list cannot be printed inline.
    let err = fx
        .engine
        .execute("users.insert", &json!({"name": "ann", "nick": null, "age": [1, 2]}))
        .unwrap_err();
    match err {
        SqlMapError::Template(e @ TemplateError::Render { .. }) => {
            assert_eq!(e.key(), Some("users.insert"))
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn database_errors_surface_as_is() {
    let fx = fixture();
    fx.engine
        .register_statement("users.bogus", "SELECT nope FROM users")
        .unwrap();
    let err = fx.engine.query("users.bogus", &()).unwrap_err();
    assert!(matches!(err, SqlMapError::Database(DatabaseError::SqliteError { .. })));
}

#[test]
fn register_statement_never_overwrites() {
    let fx = fixture();
    fx.engine
        .register_statement("extra.one", "SELECT 1 AS one")
        .unwrap();
    assert_eq!(fx.engine.query("extra.one", &()).unwrap()[0]["one"], "1");

    let err = fx
        .engine
        .register_statement("users.all", "SELECT 2")
        .unwrap_err();
    assert!(matches!(
        err,
        SqlMapError::Registry(RegistryError::DuplicateKey { ref key }) if key == "users.all"
    ));
    assert_eq!(
        fx.engine.render("users.all", &()).unwrap(),
        "SELECT id, user_name, nick, age FROM users ORDER BY id"
    );
}

// ── init ─────────────────────────────────────────────────────────────────

#[test]
fn every_call_fails_before_init() {
    let engine = Engine::new();
    let mut users: Vec<User> = Vec::new();
    let mut user = User::default();

    let errors = vec![
        engine.execute("a.b", &()).unwrap_err(),
        engine.query("a.b", &()).unwrap_err(),
        engine.query_raw("a.b", &()).unwrap_err(),
        engine.select(&mut users, "a.b", &()).unwrap_err(),
        engine.select_one(&mut user, "a.b", &()).unwrap_err(),
        engine.render("a.b", &()).unwrap_err(),
        engine.register_statement("a.b", "SELECT 1").unwrap_err(),
        engine.new_session().unwrap_err(),
        engine.pool().unwrap_err(),
        engine.registry().unwrap_err(),
        engine.config().unwrap_err(),
    ];
    for err in errors {
        assert!(matches!(err, SqlMapError::EngineNotInitialized), "{err}");
        assert_eq!(err.error_code(), "ENGINE_NOT_INITIALIZED");
    }
    assert!(!engine.is_initialized());
}

#[test]
fn unsupported_driver_leaves_the_engine_uninitialized() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = Engine::new();
    let err = engine.init("postgres", ":memory:", dir.path()).unwrap_err();
    assert!(matches!(
        err,
        SqlMapError::Database(DatabaseError::UnsupportedDriver { ref name }) if name == "postgres"
    ));
    assert!(!engine.is_initialized());
}

#[test]
fn unsupported_template_backend_is_rejected() {
    let mut config = SqlMapConfig::default();
    config.template.backend = Some("mustache".into());
    let mut engine = Engine::new();
    let err = engine.init_with_config(config).unwrap_err();
    assert!(matches!(
        err,
        SqlMapError::Template(TemplateError::UnsupportedBackend { ref name }) if name == "mustache"
    ));
}

#[test]
fn duplicate_keys_across_documents_fail_init() {
    let dir = tempfile::tempdir().unwrap();
    write_statements(
        dir.path(),
        &[
            ("a.xml", r#"<sqlmap namespace="users"><sql id="all">SELECT 1</sql></sqlmap>"#),
            ("b.xml", r#"<sqlmap namespace="users"><sql id="all">SELECT 2</sql></sqlmap>"#),
        ],
    );
    let mut engine = Engine::new();
    let err = engine.init("sqlite", ":memory:", dir.path()).unwrap_err();
    match err {
        SqlMapError::Load(LoadError::DuplicateKey { key, path }) => {
            assert_eq!(key, "users.all");
            assert!(path.ends_with("b.xml"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!engine.is_initialized());
}

#[test]
fn missing_namespace_falls_back_to_the_default() {
    let dir = tempfile::tempdir().unwrap();
    write_statements(dir.path(), &[("x.xml", r#"<sqlmap><sql id="one">SELECT 1 AS v</sql></sqlmap>"#)]);
    let engine = Engine::open("sqlite3", ":memory:", dir.path()).unwrap();
    let rows = engine.query("default_namespace.one", &()).unwrap();
    assert_eq!(rows[0]["v"], "1");
}

#[test]
fn init_from_config_without_a_statement_dir() {
    let config = SqlMapConfig::from_toml(
        r#"
        [database]
        driver = "sqlite"
        data_source = ":memory:"
        read_pool_size = 2

        [logging]
        log_sql = false
        "#,
    )
    .unwrap();
    let mut engine = Engine::new();
    engine.init_with_config(config).unwrap();
    assert!(engine.registry().unwrap().is_empty());
    assert_eq!(engine.pool().unwrap().reader_count(), 2);

    engine
        .register_statement("kv.create", "CREATE TABLE kv (k TEXT PRIMARY KEY, v TEXT)")
        .unwrap();
    engine
        .register_statement("kv.put", "INSERT INTO kv VALUES ({{ quote .k }}, {{ quote .v }})")
        .unwrap();
    engine
        .register_statement("kv.get", "SELECT v FROM kv WHERE k = {{ quote .k }}")
        .unwrap();
    engine.execute("kv.create", &()).unwrap();
    engine.execute("kv.put", &json!({"k": "a", "v": "1"})).unwrap();
    assert_eq!(engine.query("kv.get", &json!({"k": "a"})).unwrap()[0]["v"], "1");
}

// ── template backends ────────────────────────────────────────────────────

#[derive(Debug)]
struct Fixed(String);

impl CompiledTemplate for Fixed {
    fn render(&self, _params: &serde_json::Value) -> Result<String, TemplateError> {
        Ok(self.0.clone())
    }
}

/// Ignores the statement text and always produces `SELECT '<key>' AS stmt`.
struct EchoKeyBackend;

impl TemplateBackend for EchoKeyBackend {
    fn name(&self) -> &str {
        "echo-key"
    }

    fn compile(
        &self,
        name: &str,
        _text: &str,
    ) -> Result<Arc<dyn CompiledTemplate>, TemplateError> {
        Ok(Arc::new(Fixed(format!("SELECT   '{name}'\n AS stmt"))))
    }
}

#[test]
fn an_injected_backend_replaces_the_default() {
    let dir = tempfile::tempdir().unwrap();
    write_statements(dir.path(), &[("admin.xml", ADMIN_XML)]);
    let mut engine = Engine::new().with_template_backend(Arc::new(EchoKeyBackend));
    engine.init("sqlite", ":memory:", dir.path()).unwrap();

    assert_eq!(engine.render("admin.count", &()).unwrap(), "SELECT 'admin.count' AS stmt");
    assert_eq!(engine.query("admin.count", &()).unwrap()[0]["stmt"], "admin.count");
}

// ── concurrency ──────────────────────────────────────────────────────────

#[test]
fn engine_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();
}

#[test]
fn concurrent_writers_and_readers_share_one_engine() {
    let fx = fixture();
    let engine = &fx.engine;

    std::thread::scope(|s| {
        for t in 0..4 {
            s.spawn(move || {
                for i in 0..10 {
                    let name = format!("t{t}-{i}");
                    engine
                        .execute("users.insert", &NewUser { name: &name, nick: None, age: i })
                        .unwrap();
                    engine.query("admin.count", &()).unwrap();
                }
            });
        }
    });

    let rows = engine.query("admin.count", &()).unwrap();
    assert_eq!(rows[0]["n"], "40");
}
