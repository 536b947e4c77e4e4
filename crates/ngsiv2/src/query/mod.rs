//! The `q` simple query language used to filter entity lists.

pub mod statement;

pub use statement::{MatchOperator, QueryStatement, SimpleOperator, STATEMENT_SEPARATOR};

/// Joins statements into one `q` value. All statements must hold (AND).
///
/// Returns `None` for an empty slice so callers can skip the parameter.
pub fn join_statements(statements: &[QueryStatement]) -> Option<String> {
    if statements.is_empty() {
        return None;
    }
    let rendered: Vec<String> = statements.iter().map(QueryStatement::render).collect();
    Some(rendered.join(&STATEMENT_SEPARATOR.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_statements() {
        let statements = [
            QueryStatement::binary("temperature", SimpleOperator::GreaterThan, "30").unwrap(),
            QueryStatement::exists("humidity").unwrap(),
            QueryStatement::range("pressure", MatchOperator::Equal, "700", "800").unwrap(),
        ];
        assert_eq!(
            join_statements(&statements).as_deref(),
            Some("temperature>30;humidity;pressure==700..800")
        );
    }

    #[test]
    fn test_join_empty() {
        assert_eq!(join_statements(&[]), None);
    }
}
