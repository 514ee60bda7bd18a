//! SQL identifier and literal quoting for MySQL.

/// Quote identifier (MySQL style): doubles embedded backticks and wraps in
/// backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Escape a string literal: doubles embedded single quotes, escapes
/// backslashes (MySQL treats them as escape characters by default), wraps in
/// single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}
