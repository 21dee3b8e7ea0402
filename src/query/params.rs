//! Structured browse parameters and their query-string form.

use std::fmt;

use crate::error::ValidationError;
use crate::schema::{IncludeSchema, ResourceSchema};

use super::{check_filter, check_order};

/// Page-size selector: a positive count or the literal `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u32),
    All,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Count(n) => write!(f, "{n}"),
            Limit::All => write!(f, "all"),
        }
    }
}

impl Limit {
    fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw == "all" {
            return Ok(Limit::All);
        }
        match raw.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Limit::Count(n)),
            _ => Err(ValidationError::InvalidLimit(raw.to_string())),
        }
    }
}

/// Parameters for a browse request. All parts are optional; the server
/// applies its own defaults for anything left unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseParams {
    pub filter: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<Limit>,
    pub fields: Vec<String>,
    pub include: Vec<String>,
}

impl BrowseParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, expr: impl Into<String>) -> Self {
        self.filter = Some(expr.into());
        self
    }

    pub fn order(mut self, expr: impl Into<String>) -> Self {
        self.order = Some(expr.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: Limit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn include(mut self, relations: &[&str]) -> Self {
        self.include = relations.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Pre-flight validation against the resource's schemas. Filter and
    /// order expressions may reference schema fields plus the includes
    /// actually selected on this request.
    pub fn check(
        &self,
        schema: &ResourceSchema,
        includes: &IncludeSchema,
    ) -> Result<(), ValidationError> {
        if let Some(page) = self.page {
            if page == 0 {
                return Err(ValidationError::InvalidPage(0));
            }
        }
        if let Some(Limit::Count(0)) = self.limit {
            return Err(ValidationError::InvalidLimit("0".to_string()));
        }
        for relation in &self.include {
            if !includes.contains(relation) {
                return Err(ValidationError::UnknownInclude(relation.clone()));
            }
        }
        for field in &self.fields {
            if !schema.has_field(field) {
                return Err(ValidationError::UnknownField {
                    field: field.clone(),
                    context: "fields".to_string(),
                });
            }
        }
        let field_allowed =
            |name: &str| schema.has_field(name) || self.include.iter().any(|i| i == name);
        if let Some(filter) = &self.filter {
            check_filter(filter, field_allowed)?;
        }
        if let Some(order) = &self.order {
            check_order(order, field_allowed)?;
        }
        Ok(())
    }

    /// Render to query pairs, in a stable order. Values are raw here;
    /// escaping happens in [`Self::to_query_string`].
    pub fn encode(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(filter) = &self.filter {
            pairs.push(("filter".to_string(), filter.clone()));
        }
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if !self.fields.is_empty() {
            pairs.push(("fields".to_string(), self.fields.join(",")));
        }
        if !self.include.is_empty() {
            pairs.push(("include".to_string(), self.include.join(",")));
        }
        pairs
    }

    /// URL-safe query string (no leading `?`).
    pub fn to_query_string(&self) -> String {
        self.encode()
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parse a query string produced by [`Self::to_query_string`] back into
    /// parameters. Keys this module does not produce are ignored.
    pub fn from_query_str(query: &str) -> Result<Self, ValidationError> {
        let mut params = BrowseParams::default();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let value = urlencoding::decode(raw)
                .map_err(|_| ValidationError::InvalidFilter(format!("undecodable value in '{pair}'")))?
                .into_owned();
            match key {
                "filter" => params.filter = Some(value),
                "order" => params.order = Some(value),
                "page" => {
                    let page = value
                        .parse::<u32>()
                        .ok()
                        .filter(|p| *p > 0)
                        .ok_or(ValidationError::InvalidPage(
                            value.parse::<i64>().unwrap_or(-1),
                        ))?;
                    params.page = Some(page);
                }
                "limit" => params.limit = Some(Limit::parse(&value)?),
                "fields" => params.fields = value.split(',').map(str::to_string).collect(),
                "include" => params.include = value.split(',').map(str::to_string).collect(),
                _ => {}
            }
        }
        Ok(params)
    }
}
