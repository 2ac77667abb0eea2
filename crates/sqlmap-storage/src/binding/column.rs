//! Conversion of one raw column value into a record field.

/// Builds a field value from a raw cell. `None` is SQL NULL and yields the
/// type's zero value, except for `Option<T>` where it yields `None`.
pub trait FromColumn: Sized {
    fn from_column(raw: Option<&[u8]>) -> Result<Self, String>;
}

fn utf8(raw: &[u8]) -> Result<&str, String> {
    std::str::from_utf8(raw).map_err(|e| format!("not valid UTF-8: {e}"))
}

impl FromColumn for String {
    fn from_column(raw: Option<&[u8]>) -> Result<Self, String> {
        match raw {
            Some(bytes) => utf8(bytes).map(str::to_string),
            None => Ok(String::new()),
        }
    }
}

impl FromColumn for Vec<u8> {
    fn from_column(raw: Option<&[u8]>) -> Result<Self, String> {
        Ok(raw.map(<[u8]>::to_vec).unwrap_or_default())
    }
}

impl FromColumn for bool {
    fn from_column(raw: Option<&[u8]>) -> Result<Self, String> {
        let Some(bytes) = raw else {
            return Ok(false);
        };
        match utf8(bytes)?.trim() {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            other => Err(format!("`{other}` is not a boolean")),
        }
    }
}

macro_rules! from_column_parse {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromColumn for $ty {
                fn from_column(raw: Option<&[u8]>) -> Result<Self, String> {
                    let Some(bytes) = raw else {
                        return Ok(<$ty>::default());
                    };
                    let text = utf8(bytes)?.trim();
                    text.parse::<$ty>().map_err(|e| {
                        format!("`{text}` is not a valid {}: {e}", stringify!($ty))
                    })
                }
            }
        )*
    };
}

from_column_parse!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<T: FromColumn> FromColumn for Option<T> {
    fn from_column(raw: Option<&[u8]>) -> Result<Self, String> {
        match raw {
            Some(bytes) => T::from_column(Some(bytes)).map(Some),
            None => Ok(None),
        }
    }
}
