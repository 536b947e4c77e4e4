//! Query parameters for entity retrieval and listing.

use crate::query::{join_statements, QueryStatement};

/// Optional parameters of `GET /v2/entities/{id}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrieveEntityParams {
    entity_type: Option<String>,
    attrs: Vec<String>,
    metadata: Vec<String>,
}

impl RetrieveEntityParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disambiguates entities that share an id.
    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    /// Restricts the response to the named attributes.
    pub fn attr(mut self, name: impl Into<String>) -> Self {
        self.attrs.push(name.into());
        self
    }

    /// Restricts the metadata included with each attribute.
    pub fn metadata(mut self, name: impl Into<String>) -> Self {
        self.metadata.push(name.into());
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(entity_type) = &self.entity_type {
            pairs.push(("type", entity_type.clone()));
        }
        push_list(&mut pairs, "attrs", &self.attrs);
        push_list(&mut pairs, "metadata", &self.metadata);
        pairs
    }
}

/// Optional parameters of `GET /v2/entities`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListEntitiesParams {
    ids: Vec<String>,
    entity_type: Option<String>,
    id_pattern: Option<String>,
    type_pattern: Option<String>,
    statements: Vec<QueryStatement>,
    attrs: Vec<String>,
    metadata: Vec<String>,
    limit: Option<u32>,
    offset: Option<u32>,
    order_by: Option<String>,
}

impl ListEntitiesParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity id to match; several ids are OR-ed.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.ids.push(id.into());
        self
    }

    pub fn entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    /// Regular expression the entity id must match.
    pub fn id_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.id_pattern = Some(pattern.into());
        self
    }

    /// Regular expression the entity type must match.
    pub fn type_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.type_pattern = Some(pattern.into());
        self
    }

    /// Adds a filter statement. All statements must hold.
    pub fn query(mut self, statement: QueryStatement) -> Self {
        self.statements.push(statement);
        self
    }

    pub fn attr(mut self, name: impl Into<String>) -> Self {
        self.attrs.push(name.into());
        self
    }

    pub fn metadata(mut self, name: impl Into<String>) -> Self {
        self.metadata.push(name.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sort criteria, e.g. `temperature,!name`.
    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_list(&mut pairs, "id", &self.ids);
        if let Some(entity_type) = &self.entity_type {
            pairs.push(("type", entity_type.clone()));
        }
        if let Some(pattern) = &self.id_pattern {
            pairs.push(("idPattern", pattern.clone()));
        }
        if let Some(pattern) = &self.type_pattern {
            pairs.push(("typePattern", pattern.clone()));
        }
        if let Some(q) = join_statements(&self.statements) {
            pairs.push(("q", q));
        }
        push_list(&mut pairs, "attrs", &self.attrs);
        push_list(&mut pairs, "metadata", &self.metadata);
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(order_by) = &self.order_by {
            pairs.push(("orderBy", order_by.clone()));
        }
        pairs
    }
}

fn push_list(pairs: &mut Vec<(&'static str, String)>, key: &'static str, values: &[String]) {
    if !values.is_empty() {
        pairs.push((key, values.join(",")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SimpleOperator;

    #[test]
    fn test_retrieve_pairs() {
        assert!(RetrieveEntityParams::new().query_pairs().is_empty());

        let pairs = RetrieveEntityParams::new()
            .entity_type("Room")
            .attr("temperature")
            .attr("pressure")
            .query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("type", "Room".to_string()),
                ("attrs", "temperature,pressure".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_pairs() {
        let pairs = ListEntitiesParams::new()
            .entity_type("Room")
            .query(QueryStatement::binary("temperature", SimpleOperator::GreaterThan, "30").unwrap())
            .query(QueryStatement::exists("pressure").unwrap())
            .limit(20)
            .offset(40)
            .order_by("!temperature")
            .query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("type", "Room".to_string()),
                ("q", "temperature>30;pressure".to_string()),
                ("limit", "20".to_string()),
                ("offset", "40".to_string()),
                ("orderBy", "!temperature".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_ids_and_patterns() {
        let pairs = ListEntitiesParams::new()
            .id("r1")
            .id("r2")
            .id_pattern("^r")
            .type_pattern("Ro+m")
            .query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("id", "r1,r2".to_string()),
                ("idPattern", "^r".to_string()),
                ("typePattern", "Ro+m".to_string()),
            ]
        );
    }
}
