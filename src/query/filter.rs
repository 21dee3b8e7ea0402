//! Syntactic check of NQL-style filter expressions.
//!
//! Grammar (as consumed by the server, not evaluated here):
//!
//! ```text
//! expr    := clause (('+' | ',') clause)*
//! clause  := '(' expr ')' | field ':' predicate
//! field   := ident ('.' ident)*
//! predicate := '-'? op? value
//! op      := '>=' | '<=' | '>' | '<' | '~^' | '~$' | '~'
//! value   := '[' item (',' item)* ']' | quoted | bare
//! ```
//!
//! Field references are checked against the allowed set (resource fields
//! plus selected includes); only the root of a dotted path is looked up,
//! relation sub-fields (`authors.slug`) are the relation's concern.

use crate::error::ValidationError;

/// Validate a filter expression against an allowed-field predicate.
pub fn check_filter<F>(expr: &str, field_allowed: F) -> Result<(), ValidationError>
where
    F: Fn(&str) -> bool,
{
    if expr.trim().is_empty() {
        return Err(ValidationError::InvalidFilter("empty expression".into()));
    }
    check_balance(expr)?;
    check_expr(expr, &field_allowed)
}

/// Quote-aware bracket/paren balance over the whole expression.
fn check_balance(expr: &str) -> Result<(), ValidationError> {
    let mut parens = 0i32;
    let mut brackets = 0i32;
    let mut in_quote = false;
    for c in expr.chars() {
        if in_quote {
            if c == '\'' {
                in_quote = false;
            }
            continue;
        }
        match c {
            '\'' => in_quote = true,
            '(' => parens += 1,
            ')' => parens -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            _ => {}
        }
        if parens < 0 || brackets < 0 {
            return Err(ValidationError::InvalidFilter(format!(
                "unbalanced grouping in '{expr}'"
            )));
        }
    }
    if parens != 0 || brackets != 0 || in_quote {
        return Err(ValidationError::InvalidFilter(format!(
            "unbalanced grouping in '{expr}'"
        )));
    }
    Ok(())
}

fn check_expr<F>(expr: &str, field_allowed: &F) -> Result<(), ValidationError>
where
    F: Fn(&str) -> bool,
{
    for clause in split_top_level(expr) {
        let clause = clause.trim();
        if clause.is_empty() {
            return Err(ValidationError::InvalidFilter(format!(
                "empty clause in '{expr}'"
            )));
        }
        if clause.starts_with('(') && clause.ends_with(')') {
            check_expr(&clause[1..clause.len() - 1], field_allowed)?;
            continue;
        }
        check_clause(clause, field_allowed)?;
    }
    Ok(())
}

/// Split on `+` and `,` outside quotes, parens and brackets.
fn split_top_level(expr: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_quote = false;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        if in_quote {
            if c == '\'' {
                in_quote = false;
            }
            continue;
        }
        match c {
            '\'' => in_quote = true,
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            '+' | ',' if depth == 0 => {
                parts.push(&expr[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&expr[start..]);
    parts
}

fn check_clause<F>(clause: &str, field_allowed: &F) -> Result<(), ValidationError>
where
    F: Fn(&str) -> bool,
{
    let Some((field, predicate)) = clause.split_once(':') else {
        return Err(ValidationError::InvalidFilter(format!(
            "clause '{clause}' is not of the form field:value"
        )));
    };
    check_field(field.trim(), field_allowed)?;
    check_predicate(clause, predicate)
}

fn check_field<F>(field: &str, field_allowed: &F) -> Result<(), ValidationError>
where
    F: Fn(&str) -> bool,
{
    if field.is_empty()
        || !field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return Err(ValidationError::InvalidFilter(format!(
            "invalid field reference '{field}'"
        )));
    }
    let root = field.split('.').next().unwrap_or(field);
    if !field_allowed(root) {
        return Err(ValidationError::UnknownField {
            field: root.to_string(),
            context: "filter".to_string(),
        });
    }
    Ok(())
}

fn check_predicate(clause: &str, predicate: &str) -> Result<(), ValidationError> {
    let mut rest = predicate.strip_prefix('-').unwrap_or(predicate);
    for op in ["~^", "~$", ">=", "<=", ">", "<", "~"] {
        if let Some(stripped) = rest.strip_prefix(op) {
            rest = stripped;
            break;
        }
    }
    if rest.is_empty() {
        return Err(ValidationError::InvalidFilter(format!(
            "clause '{clause}' has no value"
        )));
    }
    if rest.starts_with('[') {
        // Group value: non-empty comma list, balance was already checked.
        let inner = rest
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or("");
        if inner.is_empty() || inner.split(',').any(|item| item.trim().is_empty()) {
            return Err(ValidationError::InvalidFilter(format!(
                "empty group value in '{clause}'"
            )));
        }
        return Ok(());
    }
    if rest.starts_with('\'') {
        // Quoted values were balance-checked; nothing may trail the quote.
        if !rest.ends_with('\'') || rest.len() < 2 {
            return Err(ValidationError::InvalidFilter(format!(
                "malformed quoted value in '{clause}'"
            )));
        }
        return Ok(());
    }
    if rest.chars().any(|c| c.is_whitespace() || "()[]'".contains(c)) {
        return Err(ValidationError::InvalidFilter(format!(
            "malformed value in '{clause}'"
        )));
    }
    Ok(())
}
