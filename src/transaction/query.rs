//! Query string handling for the transactions page.
//!
//! Every value arrives as text and is parsed leniently: anything that does not
//! parse is treated as unset instead of rejecting the request.

use serde::Deserialize;

use crate::{
    api::{BudgetId, CategoryId, TransactionFilter, TransactionId, TransactionType},
    pagination::PaginationConfig,
    validation::{non_empty, parse_date},
};

/// The raw query parameters of the transactions page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionsQueryParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub budget_id: Option<String>,
    pub category_id: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub search: Option<String>,
    pub new: Option<String>,
    pub edit: Option<String>,
}

/// Which inline form, if any, is open on the transactions page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Closed,
    New,
    Edit(TransactionId),
}

/// The normalized state of the transactions page.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionsQuery {
    /// The 1-based page number.
    pub page: u64,
    pub size: u64,
    pub filter: TransactionFilter,
    pub form: FormMode,
}

fn parse_number<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|value| value.trim().parse().ok())
}

impl TransactionsQuery {
    pub fn from_params(params: &TransactionsQueryParams, config: &PaginationConfig) -> Self {
        let page = config.page_or_default(parse_number(params.page.as_deref()));
        let size = config.page_size_or_default(parse_number(params.size.as_deref()));

        let filter = TransactionFilter {
            budget_id: parse_number::<BudgetId>(params.budget_id.as_deref()),
            category_id: parse_number::<CategoryId>(params.category_id.as_deref()),
            transaction_type: params
                .transaction_type
                .as_deref()
                .and_then(TransactionType::parse),
            start_date: params.start_date.as_deref().and_then(parse_date),
            end_date: params.end_date.as_deref().and_then(parse_date),
            search: params.search.as_deref().and_then(non_empty),
        };

        let form = match (
            parse_number::<TransactionId>(params.edit.as_deref()),
            params.new.as_deref(),
        ) {
            (Some(id), _) => FormMode::Edit(id),
            (None, Some("true")) => FormMode::New,
            _ => FormMode::Closed,
        };

        Self {
            page,
            size,
            filter,
            form,
        }
    }

    pub fn with_page(&self, page: u64) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn with_form(&self, form: FormMode) -> Self {
        Self {
            form,
            ..self.clone()
        }
    }

    /// The query string that reproduces this state, without a leading '?'.
    pub fn to_query_string(&self) -> String {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ];

        if let Some(budget_id) = self.filter.budget_id {
            pairs.push(("budget_id", budget_id.to_string()));
        }
        if let Some(category_id) = self.filter.category_id {
            pairs.push(("category_id", category_id.to_string()));
        }
        if let Some(transaction_type) = self.filter.transaction_type {
            pairs.push(("type", transaction_type.as_str().to_owned()));
        }
        if let Some(start_date) = self.filter.start_date {
            pairs.push(("start_date", start_date.to_string()));
        }
        if let Some(end_date) = self.filter.end_date {
            pairs.push(("end_date", end_date.to_string()));
        }
        if let Some(search) = &self.filter.search {
            pairs.push(("search", search.clone()));
        }

        match self.form {
            FormMode::Closed => {}
            FormMode::New => pairs.push(("new", "true".to_owned())),
            FormMode::Edit(id) => pairs.push(("edit", id.to_string())),
        }

        serde_urlencoded::to_string(pairs).unwrap_or_default()
    }

    pub fn to_url(&self, route: &str) -> String {
        format!("{route}?{}", self.to_query_string())
    }
}
