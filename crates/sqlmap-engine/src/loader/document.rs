//! Statement document parsing.
//!
//! ```xml
//! <sqlmap namespace="users">
//!   <sql id="find">SELECT * FROM users WHERE id = {{ .id }}</sql>
//!   <sql id="search"><![CDATA[ ... {{ if .name }} ... ]]></sql>
//! </sqlmap>
//! ```

use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use sqlmap_core::constants::{statement_key, DOCUMENT_ROOT, STATEMENT_ELEMENT};
use sqlmap_core::errors::LoadError;

/// One `<sql>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementDef {
    pub namespace: String,
    pub id: String,
    pub text: String,
}

impl StatementDef {
    pub fn key(&self) -> String {
        statement_key(&self.namespace, &self.id)
    }
}

/// Parse one document. `default_namespace` applies when the root has no
/// (or an empty) `namespace` attribute.
pub fn parse_document(
    path: &Path,
    content: &str,
    default_namespace: &str,
) -> Result<Vec<StatementDef>, LoadError> {
    let xml_err = |message: String| LoadError::Xml {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = Reader::from_str(content);
    let mut namespace: Option<String> = None;
    let mut open: Option<StatementDef> = None;
    let mut statements = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| xml_err(format!("at byte {}: {e}", reader.error_position())))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = element_name(e);

                if namespace.is_none() {
                    if name != DOCUMENT_ROOT {
                        return Err(LoadError::MissingRoot {
                            path: path.to_path_buf(),
                        });
                    }
                    let declared = attribute(e, "namespace").map_err(&xml_err)?;
                    namespace = Some(
                        declared
                            .filter(|ns| !ns.trim().is_empty())
                            .unwrap_or_else(|| default_namespace.to_string()),
                    );
                    continue;
                }
                let ns = namespace.as_deref().unwrap_or(default_namespace);

                if let Some(statement) = &open {
                    return Err(LoadError::UnexpectedElement {
                        element: name,
                        key: statement.key(),
                        path: path.to_path_buf(),
                    });
                }

                if name == STATEMENT_ELEMENT {
                    let id = attribute(e, "id")
                        .map_err(&xml_err)?
                        .filter(|id| !id.trim().is_empty())
                        .ok_or_else(|| LoadError::MissingId {
                            namespace: ns.to_string(),
                            path: path.to_path_buf(),
                        })?;
                    let statement = StatementDef {
                        namespace: ns.to_string(),
                        id,
                        text: String::new(),
                    };
                    if is_empty {
                        statements.push(statement);
                    } else {
                        open = Some(statement);
                    }
                } else if !is_empty {
                    tracing::debug!(path = %path.display(), element = %name, "skipping unknown element");
                    reader
                        .read_to_end(e.name())
                        .map_err(|err| xml_err(err.to_string()))?;
                }
            }
            Event::Text(ref t) => {
                if let Some(statement) = open.as_mut() {
                    let text = t.unescape().map_err(|e| xml_err(e.to_string()))?;
                    statement.text.push_str(&text);
                }
            }
            Event::CData(ref c) => {
                if let Some(statement) = open.as_mut() {
                    let text = std::str::from_utf8(c)
                        .map_err(|e| xml_err(format!("CDATA is not valid UTF-8: {e}")))?;
                    statement.text.push_str(text);
                }
            }
            Event::End(ref e) => {
                if e.name().as_ref() == STATEMENT_ELEMENT.as_bytes() {
                    if let Some(statement) = open.take() {
                        statements.push(statement);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if namespace.is_none() {
        return Err(LoadError::MissingRoot {
            path: path.to_path_buf(),
        });
    }
    Ok(statements)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, String> {
    let attr = e.try_get_attribute(name).map_err(|err| err.to_string())?;
    attr.map(|a| {
        a.unescape_value()
            .map(|v| v.into_owned())
            .map_err(|err| err.to_string())
    })
    .transpose()
}
