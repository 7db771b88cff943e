//! Response envelope
//!
//! Every endpoint answers with `{errors, message, data}`, plus `pagination`
//! for listings. Validation failures map to a 400 envelope whose message
//! depends on which part of the request was validated.

use crate::engine::Validator;
use crate::errors::ValidationError;
use crate::schema::RuleSet;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Default page for listings
pub const DEFAULT_PAGE: u64 = 1;

/// Default page size for listings
pub const DEFAULT_LIMIT: u64 = 10;

/// Part of the request a rule set is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    /// JSON body
    Body,
    /// Query string
    Query,
    /// Path parameters
    Params,
}

impl RequestSource {
    /// Message of the 400 envelope
    pub fn failure_message(&self) -> &'static str {
        match self {
            RequestSource::Body => "Validation failed",
            RequestSource::Query => "Query validation failed",
            RequestSource::Params => "Parameter validation failed",
        }
    }

    fn error_context(&self) -> &'static str {
        match self {
            RequestSource::Body => "Validation middleware error",
            RequestSource::Query => "Query validation middleware error",
            RequestSource::Params => "Parameter validation middleware error",
        }
    }
}

impl fmt::Display for RequestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestSource::Body => "body",
            RequestSource::Query => "query",
            RequestSource::Params => "params",
        })
    }
}

/// Pagination block of a listing response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub limit: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total_count: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_count / limit + u64::from(total_count % limit != 0)
        };

        Self {
            current_page: page,
            total_pages,
            total_count,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
            limit,
        }
    }
}

/// Paging parameters read from a (sanitized) query object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: None,
        }
    }
}

impl PageQuery {
    /// Read `page`, `limit` and `search`.
    ///
    /// Missing, zero or unparseable numbers fall back to the defaults.
    pub fn from_query(query: &Value) -> Self {
        let number = |key: &str, default: u64| {
            query
                .get(key)
                .and_then(|v| match v {
                    Value::Number(n) => n.as_u64(),
                    Value::String(s) => s.trim().parse::<u64>().ok(),
                    _ => None,
                })
                .filter(|n| *n > 0)
                .unwrap_or(default)
        };

        let search = query
            .get("search")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            page: number("page", DEFAULT_PAGE),
            limit: number("limit", DEFAULT_LIMIT),
            search,
        }
    }

    /// Number of records to skip
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Pagination block for a listing of `total_count` records
    pub fn pagination(&self, total_count: u64) -> Pagination {
        Pagination::new(self.page, self.limit, total_count)
    }
}

/// The `{errors, message, data, pagination}` envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    #[serde(skip)]
    status: u16,
    pub errors: Vec<String>,
    pub message: String,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl ApiResponse {
    /// 200 envelope carrying `data`
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self {
            status: 200,
            errors: Vec::new(),
            message: message.into(),
            data,
            pagination: None,
        }
    }

    /// 200 envelope for a page of a listing
    pub fn with_pagination(message: impl Into<String>, data: Value, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::success(message, data)
        }
    }

    /// 400 envelope listing every violation
    pub fn validation_failed(source: RequestSource, messages: Vec<String>) -> Self {
        Self {
            status: 400,
            errors: messages,
            message: source.failure_message().to_string(),
            data: Value::Null,
            pagination: None,
        }
    }

    /// 500 envelope; the cause is logged, never exposed
    pub fn internal_error(source: RequestSource, err: &ValidationError) -> Self {
        log::error!("{}: {}", source.error_context(), err);
        Self {
            status: 500,
            errors: vec!["Internal server error".to_string()],
            message: "Something went wrong!".to_string(),
            data: Value::Null,
            pagination: None,
        }
    }

    /// HTTP status code of the envelope
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl Validator {
    /// Validate one part of a request.
    ///
    /// Returns the sanitized payload for the handler, or the envelope to
    /// answer with: 400 on violations, 500 on internal errors.
    pub fn validate_request(
        &self,
        source: RequestSource,
        rules: &RuleSet,
        payload: &Value,
    ) -> Result<Value, ApiResponse> {
        match self.validate(rules, payload) {
            Ok(outcome) => outcome
                .into_result()
                .map_err(|messages| {
                    log::debug!("Rejected request {} with {} violation(s)", source, messages.len());
                    ApiResponse::validation_failed(source, messages)
                }),
            Err(err) => Err(ApiResponse::internal_error(source, &err)),
        }
    }
}
