//! Per-type binding descriptors: binding name → field setter.

use std::collections::HashSet;

use sqlmap_core::errors::BindError;

/// Writes one raw cell into a field of `T`.
pub type Setter<T> = fn(&mut T, Option<&[u8]>) -> Result<(), String>;

/// One field that accepts a column.
pub struct FieldBinding<T> {
    /// Column name this field binds to (exact match).
    pub column: &'static str,
    /// Rust field name, used in scan errors.
    pub field: &'static str,
    pub set: Setter<T>,
}

impl<T> FieldBinding<T> {
    pub const fn new(column: &'static str, field: &'static str, set: Setter<T>) -> Self {
        Self { column, field, set }
    }
}

/// Everything the binder knows about a record type. Built once per type.
pub struct RecordDescriptor<T> {
    type_name: &'static str,
    fields: Vec<FieldBinding<T>>,
}

impl<T> RecordDescriptor<T> {
    pub fn new(type_name: &'static str, fields: Vec<FieldBinding<T>>) -> Self {
        Self { type_name, fields }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldBinding<T>] {
        &self.fields
    }

    /// The field bound to `column`, if any.
    pub fn field_for(&self, column: &str) -> Option<&FieldBinding<T>> {
        self.fields.iter().find(|f| f.column == column)
    }

    /// A usable destination binds at least one field and every binding
    /// name is unique.
    pub fn check(&self) -> Result<(), BindError> {
        if self.fields.is_empty() {
            return Err(BindError::InvalidDestinationType {
                type_name: self.type_name.to_string(),
                message: "expected a record with at least one bound field".to_string(),
            });
        }
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.column) {
                return Err(BindError::InvalidDestinationType {
                    type_name: self.type_name.to_string(),
                    message: format!(
                        "expected one field per binding name, but `{}` is bound twice",
                        field.column
                    ),
                });
            }
        }
        Ok(())
    }
}

impl<T> std::fmt::Debug for RecordDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordDescriptor")
            .field("type_name", &self.type_name)
            .field(
                "bindings",
                &self.fields.iter().map(|b| (b.column, b.field)).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A type that result rows can be bound into.
///
/// Usually implemented with [`record!`](crate::record).
pub trait Record: Default + Sized + 'static {
    fn descriptor() -> &'static RecordDescriptor<Self>;
}

/// Implement [`Record`] by listing `field: "column"` pairs. The descriptor
/// is built on first use and cached for the life of the process. The type
/// also becomes a [`RecordSlot`](crate::binding::RecordSlot), so `Vec<T>`
/// is a record list alongside `Vec<Box<T>>` and `Vec<Arc<T>>`.
///
/// ```ignore
/// #[derive(Default)]
/// struct User { id: i64, name: String }
///
/// sqlmap_storage::record!(User {
///     id: "id",
///     name: "user_name",
/// });
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($field:ident : $column:expr),* $(,)? }) => {
        impl $crate::binding::Record for $ty {
            fn descriptor() -> &'static $crate::binding::RecordDescriptor<Self> {
                static DESCRIPTOR: ::std::sync::OnceLock<$crate::binding::RecordDescriptor<$ty>> =
                    ::std::sync::OnceLock::new();
                DESCRIPTOR.get_or_init(|| {
                    $crate::binding::RecordDescriptor::new(
                        stringify!($ty),
                        vec![
                            $(
                                $crate::binding::FieldBinding::new(
                                    $column,
                                    stringify!($field),
                                    |record: &mut $ty, raw: Option<&[u8]>| {
                                        record.$field = $crate::binding::FromColumn::from_column(raw)?;
                                        Ok(())
                                    },
                                ),
                            )*
                        ],
                    )
                })
            }
        }

        impl $crate::binding::RecordSlot for $ty {
            type Record = $ty;

            fn from_record(record: $ty) -> Self {
                record
            }
        }
    };
}
