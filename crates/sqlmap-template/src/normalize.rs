//! Whitespace normalization for rendered SQL.

/// Trim, then collapse every run of whitespace into a single space.
pub fn normalize_whitespace(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    for word in sql.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(normalize_whitespace("  a\n\t b   c "), "a b c");
    }

    #[test]
    fn blank_input_becomes_empty() {
        assert_eq!(normalize_whitespace(" \n\t "), "");
    }

    #[test]
    fn multi_line_statement_becomes_one_line() {
        let sql = "\n    SELECT id,\n           name\n      FROM users\n     WHERE id = 1\n";
        assert_eq!(normalize_whitespace(sql), "SELECT id, name FROM users WHERE id = 1");
    }

    proptest! {
        #[test]
        fn output_is_trimmed_and_single_spaced(input in "[ a-z\t\n\r]{0,64}") {
            let out = normalize_whitespace(&input);
            prop_assert_eq!(out.trim(), out.as_str());
            prop_assert!(!out.contains("  "));
            prop_assert!(!out.contains('\n') && !out.contains('\t') && !out.contains('\r'));
        }

        #[test]
        fn normalization_is_idempotent(input in "[ a-z0-9\t\n]{0,64}") {
            let once = normalize_whitespace(&input);
            prop_assert_eq!(normalize_whitespace(&once), once.clone());
        }
    }
}
