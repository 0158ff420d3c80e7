use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One catalog entry. `thumbnail`, `sort_order` and `prompt` are nullable
/// columns; `None` and an empty string are distinct values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub(crate) struct App {
    pub(crate) id: i64,
    pub(crate) url: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) thumbnail: Option<String>,
    pub(crate) sort_order: Option<i64>,
    pub(crate) prompt: Option<String>,
    pub(crate) click_count: i64,
}

/// The mutable field set for create and update. `id` and `click_count` are
/// managed by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct NewApp {
    pub(crate) url: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) thumbnail: Option<String>,
    pub(crate) sort_order: Option<i64>,
    pub(crate) prompt: Option<String>,
}
