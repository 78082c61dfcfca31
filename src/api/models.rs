//! The JSON data transfer objects exchanged with the budget API.
//!
//! Field names are camelCase on the wire and enum values are upper case.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;

pub type BudgetId = i64;
pub type TransactionId = i64;
pub type CategoryId = i64;

/// A page of results. `number` is the 0-based page index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub size: u64,
    pub number: u64,
}

impl<T> PageResponse<T> {
    /// An empty page, used when a list has nothing to show.
    pub fn empty(size: u64) -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            size,
            number: 0,
        }
    }
}

/// A request for one page of a collection. `page` is 0-based, as the API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub preferred_currency: String,
    pub preferred_locale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub preferred_currency: String,
    pub preferred_locale: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    pub user: UserProfile,
}

fn default_token_type() -> String {
    "Bearer".to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettingsRequest {
    pub preferred_currency: String,
    pub preferred_locale: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetPeriod {
    Monthly,
    Biweekly,
}

impl BudgetPeriod {
    pub const ALL: [BudgetPeriod; 2] = [BudgetPeriod::Monthly, BudgetPeriod::Biweekly];

    /// The value used on the wire and in HTML forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Monthly => "MONTHLY",
            BudgetPeriod::Biweekly => "BIWEEKLY",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetPeriod::Monthly => "Monthly",
            BudgetPeriod::Biweekly => "Biweekly",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|period| period.as_str().eq_ignore_ascii_case(text.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    pub name: String,
    pub total_amount: f64,
    pub period: BudgetPeriod,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,
    pub name: String,
    pub total_amount: f64,
    #[serde(default)]
    pub spent_amount: f64,
    #[serde(default)]
    pub remaining_amount: f64,
    #[serde(default)]
    pub usage_percentage: f64,
    pub period: BudgetPeriod,
    pub start_date: Date,
    pub end_date: Date,
    pub currency: String,
    #[serde(default)]
    pub active: bool,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(text.trim()))
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub transaction_date: Date,
    pub budget_id: BudgetId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub transaction_date: Date,
    pub notes: Option<String>,
    pub category_name: Option<String>,
    pub category_id: Option<CategoryId>,
    pub budget_name: Option<String>,
    pub budget_id: BudgetId,
    pub created_at: Option<String>,
}

/// Optional filters for the transaction list. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub budget_id: Option<BudgetId>,
    pub category_id: Option<CategoryId>,
    pub transaction_type: Option<TransactionType>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub search: Option<String>,
}

impl TransactionFilter {
    /// The query parameters for the filters that are set, in the API's naming.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(budget_id) = self.budget_id {
            pairs.push(("budgetId", budget_id.to_string()));
        }
        if let Some(category_id) = self.category_id {
            pairs.push(("categoryId", category_id.to_string()));
        }
        if let Some(transaction_type) = self.transaction_type {
            pairs.push(("type", transaction_type.as_str().to_owned()));
        }
        if let Some(start_date) = self.start_date {
            pairs.push(("startDate", start_date.to_string()));
        }
        if let Some(end_date) = self.end_date {
            pairs.push(("endDate", end_date.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            pairs.push(("search", search.to_owned()));
        }

        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseType {
    Fixed,
    Variable,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 2] = [ExpenseType::Fixed, ExpenseType::Variable];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::Fixed => "FIXED",
            ExpenseType::Variable => "VARIABLE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseType::Fixed => "Fixed",
            ExpenseType::Variable => "Variable",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(text.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub expense_type: ExpenseType,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub expense_type: ExpenseType,
    #[serde(default)]
    pub is_default: bool,
}

/// The optional date range for the dashboard report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardQuery {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl DashboardQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(start_date) = self.start_date {
            pairs.push(("startDate", start_date.to_string()));
        }
        if let Some(end_date) = self.end_date {
            pairs.push(("endDate", end_date.to_string()));
        }

        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardReport {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub monthly_average_expense: f64,
    pub total_savings: f64,
    pub budget_usage_percentage: f64,
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub budget_vs_actual: Vec<BudgetVsActual>,
    pub balance_history: Vec<BalancePoint>,
    pub fixed_vs_variable: Vec<FixedVsVariable>,
    pub income_vs_expenses: Vec<IncomeVsExpense>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category_name: String,
    pub color: Option<String>,
    pub amount: f64,
    #[serde(default)]
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetVsActual {
    pub category_name: String,
    pub budgeted: f64,
    pub actual: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancePoint {
    pub date: String,
    pub balance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedVsVariable {
    pub month: String,
    pub fixed_expenses: f64,
    pub variable_expenses: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeVsExpense {
    pub month: String,
    pub income: f64,
    pub expense: f64,
}
