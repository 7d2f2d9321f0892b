//! Job listing query: exact filters, free-text search, whitelisted ordering, paging.

use std::str::FromStr;

use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use tracing::debug;

use crate::errors::AppError;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;
const DEFAULT_ORDERING: JobOrdering = JobOrdering {
    field: JobOrderField::CreatedAt,
    descending: true,
};
const SEARCH_COLUMNS: [&str; 4] = ["title", "description", "company", "location"];

#[derive(Debug, Default, Deserialize)]
pub struct JobQuery {
    pub job_type: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOrderField {
    PostedDate,
    CreatedAt,
    Title,
}

impl JobOrderField {
    fn column(self) -> &'static str {
        match self {
            JobOrderField::PostedDate => "posted_date",
            JobOrderField::CreatedAt => "created_at",
            JobOrderField::Title => "title",
        }
    }
}

/// `field` or `-field` (descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobOrdering {
    pub field: JobOrderField,
    pub descending: bool,
}

impl FromStr for JobOrdering {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let (descending, name) = match raw.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, raw),
        };
        let field = match name {
            "posted_date" => JobOrderField::PostedDate,
            "created_at" => JobOrderField::CreatedAt,
            "title" => JobOrderField::Title,
            other => {
                return Err(AppError::Validation(format!(
                    "Cannot order by '{other}'; use posted_date, created_at or title"
                )))
            }
        };
        Ok(Self { field, descending })
    }
}

impl JobOrdering {
    fn sql(self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!("{} {direction} NULLS LAST", self.field.column())
    }
}

/// Parses a comma-separated ordering such as `title,-posted_date`.
///
/// Unknown or repeated fields are dropped; if nothing usable remains the default
/// `-created_at` applies.
pub fn parse_ordering(raw: Option<&str>) -> Vec<JobOrdering> {
    let mut orderings: Vec<JobOrdering> = Vec::new();
    for term in raw.unwrap_or_default().split(',') {
        let term = term.trim();
        if term.is_empty() {
            continue;
        }
        match term.parse::<JobOrdering>() {
            Ok(ordering) if !orderings.iter().any(|o| o.field == ordering.field) => {
                orderings.push(ordering)
            }
            Ok(_) => debug!(term, "Ignoring repeated ordering field"),
            Err(e) => debug!(term, "Ignoring ordering term: {e}"),
        }
    }
    if orderings.is_empty() {
        orderings.push(DEFAULT_ORDERING);
    }
    orderings
}

/// Splits a search string into terms on whitespace and commas.
pub fn search_terms(raw: &str) -> Vec<&str> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect()
}

/// Escapes LIKE wildcards so the search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Builds the listing query. Only bound parameters carry user input.
///
/// Every search term must match at least one of title, description, company or
/// location.
pub fn build_list_query(query: &JobQuery) -> Result<QueryBuilder<'static, Postgres>, AppError> {
    let orderings = parse_ordering(query.ordering.as_deref());
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    let offset = query.offset.unwrap_or(0);
    if offset < 0 {
        return Err(AppError::Validation("offset cannot be negative".to_string()));
    }

    let mut builder = QueryBuilder::new(
        "SELECT id, title, company, location, job_type, description, url, posted_date, created_at \
         FROM jobs WHERE TRUE",
    );

    for (column, value) in [
        ("job_type", &query.job_type),
        ("location", &query.location),
        ("company", &query.company),
    ] {
        if let Some(value) = non_blank(value) {
            builder
                .push(format!(" AND {column} = "))
                .push_bind(value.to_string());
        }
    }

    for term in search_terms(query.search.as_deref().unwrap_or_default()) {
        let pattern = like_pattern(term);
        builder.push(" AND (");
        for (i, column) in SEARCH_COLUMNS.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder
                .push(format!("{column} ILIKE "))
                .push_bind(pattern.clone());
        }
        builder.push(")");
    }

    let order_by: Vec<String> = orderings.iter().map(|o| o.sql()).collect();
    builder
        .push(format!(" ORDER BY {}, id ASC", order_by.join(", ")))
        .push(" LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);

    Ok(builder)
}
