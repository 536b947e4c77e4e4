//! Single filter predicates of the `q` query grammar.
//!
//! | Form | Rendered |
//! |------|----------|
//! | binary | `temperature>30` |
//! | range | `temperature==20..30`, `temperature!=20..30` |
//! | list | `color==red,blue`, `color!=red,blue` |
//! | pattern | `name~=^Room` |
//! | exists | `temperature` |
//! | not exists | `!temperature` |
//!
//! Statements are validated when constructed and immutable afterwards.
//! Rendering does no escaping; the query-string encoder escapes the composed
//! `q` value as a whole.

use std::fmt;

use crate::error::QueryError;

/// Separator between statements of a `q` expression (logical AND).
pub const STATEMENT_SEPARATOR: char = ';';

const RANGE_SEPARATOR: &str = "..";
const LIST_SEPARATOR: char = ',';

/// Characters that would make the attribute path ambiguous when rendered.
const ATTRIBUTE_FORBIDDEN: &[char] = &['=', '!', '<', '>', '~', ';', ','];

/// Comparison operators for simple binary statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleOperator {
    Equal,
    Unequal,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

impl SimpleOperator {
    /// Returns the operator token.
    pub fn token(self) -> &'static str {
        match self {
            SimpleOperator::Equal => "==",
            SimpleOperator::Unequal => "!=",
            SimpleOperator::GreaterThan => ">",
            SimpleOperator::LessThan => "<",
            SimpleOperator::GreaterOrEqual => ">=",
            SimpleOperator::LessOrEqual => "<=",
        }
    }

    /// Parses an operator token.
    pub fn from_token(token: &str) -> Result<SimpleOperator, QueryError> {
        match token {
            "==" => Ok(SimpleOperator::Equal),
            "!=" => Ok(SimpleOperator::Unequal),
            ">" => Ok(SimpleOperator::GreaterThan),
            "<" => Ok(SimpleOperator::LessThan),
            ">=" => Ok(SimpleOperator::GreaterOrEqual),
            "<=" => Ok(SimpleOperator::LessOrEqual),
            _ => Err(invalid("unknown operator")),
        }
    }
}

/// Membership operators for range and list statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchOperator {
    /// Value is inside the range / one of the list.
    Equal,
    /// Value is outside the range / none of the list.
    Unequal,
}

impl MatchOperator {
    pub fn token(self) -> &'static str {
        match self {
            MatchOperator::Equal => "==",
            MatchOperator::Unequal => "!=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Binary {
        operator: SimpleOperator,
        value: String,
    },
    Range {
        operator: MatchOperator,
        from: String,
        to: String,
    },
    List {
        operator: MatchOperator,
        values: Vec<String>,
    },
    Pattern(String),
    Exists,
    NotExists,
}

/// A validated filter predicate on one attribute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryStatement {
    attribute: String,
    predicate: Predicate,
}

fn invalid(reason: &'static str) -> QueryError {
    QueryError::InvalidQueryStatement { reason }
}

fn check_attribute(attribute: &str) -> Result<(), QueryError> {
    if attribute.is_empty() {
        return Err(invalid("attribute name is empty"));
    }
    if attribute.contains(ATTRIBUTE_FORBIDDEN) {
        return Err(invalid("attribute name contains an operator character"));
    }
    Ok(())
}

fn check_operand(value: &str) -> Result<(), QueryError> {
    if value.is_empty() {
        return Err(invalid("value is empty"));
    }
    if value.contains(STATEMENT_SEPARATOR) {
        return Err(invalid("value contains the statement separator"));
    }
    Ok(())
}

impl QueryStatement {
    /// Creates a simple binary statement such as `temperature>30`.
    pub fn binary(
        attribute: impl Into<String>,
        operator: SimpleOperator,
        value: impl Into<String>,
    ) -> Result<Self, QueryError> {
        let attribute = attribute.into();
        let value = value.into();
        check_attribute(&attribute)?;
        check_operand(&value)?;
        Ok(QueryStatement {
            attribute,
            predicate: Predicate::Binary { operator, value },
        })
    }

    /// Creates a range statement such as `temperature==20..30`.
    pub fn range(
        attribute: impl Into<String>,
        operator: MatchOperator,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Result<Self, QueryError> {
        let attribute = attribute.into();
        let from = from.into();
        let to = to.into();
        check_attribute(&attribute)?;
        for bound in [&from, &to] {
            check_operand(bound)?;
            if bound.contains(RANGE_SEPARATOR) {
                return Err(invalid("range bound contains the range separator"));
            }
            // A leading or trailing dot would merge into the separator.
            if bound.starts_with('.') || bound.ends_with('.') {
                return Err(invalid("range bound starts or ends with a dot"));
            }
        }
        Ok(QueryStatement {
            attribute,
            predicate: Predicate::Range { operator, from, to },
        })
    }

    /// Creates a list statement such as `color==red,blue`.
    pub fn list<I, V>(
        attribute: impl Into<String>,
        operator: MatchOperator,
        values: I,
    ) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let attribute = attribute.into();
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        check_attribute(&attribute)?;
        if values.is_empty() {
            return Err(invalid("value list is empty"));
        }
        for value in &values {
            check_operand(value)?;
            if value.contains(LIST_SEPARATOR) {
                return Err(invalid("list element contains the list separator"));
            }
        }
        Ok(QueryStatement {
            attribute,
            predicate: Predicate::List { operator, values },
        })
    }

    /// Creates a pattern statement such as `name~=^Room`.
    pub fn pattern(
        attribute: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Result<Self, QueryError> {
        let attribute = attribute.into();
        let pattern = pattern.into();
        check_attribute(&attribute)?;
        check_operand(&pattern)?;
        Ok(QueryStatement {
            attribute,
            predicate: Predicate::Pattern(pattern),
        })
    }

    /// Matches entities that have the attribute.
    pub fn exists(attribute: impl Into<String>) -> Result<Self, QueryError> {
        let attribute = attribute.into();
        check_attribute(&attribute)?;
        Ok(QueryStatement {
            attribute,
            predicate: Predicate::Exists,
        })
    }

    /// Matches entities that lack the attribute.
    pub fn not_exists(attribute: impl Into<String>) -> Result<Self, QueryError> {
        let attribute = attribute.into();
        check_attribute(&attribute)?;
        Ok(QueryStatement {
            attribute,
            predicate: Predicate::NotExists,
        })
    }

    /// The attribute path this statement filters on.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Renders the statement in the `q` grammar.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QueryStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attr = &self.attribute;
        match &self.predicate {
            Predicate::Binary { operator, value } => {
                write!(f, "{}{}{}", attr, operator.token(), value)
            }
            Predicate::Range { operator, from, to } => {
                write!(f, "{}{}{}{}{}", attr, operator.token(), from, RANGE_SEPARATOR, to)
            }
            Predicate::List { operator, values } => {
                write!(f, "{}{}", attr, operator.token())?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", LIST_SEPARATOR)?;
                    }
                    f.write_str(value)?;
                }
                Ok(())
            }
            Predicate::Pattern(pattern) => write!(f, "{}~={}", attr, pattern),
            Predicate::Exists => f.write_str(attr),
            Predicate::NotExists => write!(f, "!{}", attr),
        }
    }
}
