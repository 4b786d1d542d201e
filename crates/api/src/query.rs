//! Shared query parameter types for API handlers.

use newsdesk_core::types::DbId;
use serde::Deserialize;

/// `GET /articles?status=&author=&editor=&search=`
#[derive(Debug, Default, Deserialize)]
pub struct ArticleListParams {
    pub status: Option<String>,
    pub author: Option<DbId>,
    pub editor: Option<DbId>,
    pub search: Option<String>,
}

/// `GET /articles/search?q=`
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// `GET /users?role=&search=`
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub role: Option<String>,
    pub search: Option<String>,
}

/// `GET /ws?token=`
#[derive(Debug, Deserialize)]
pub struct TokenParams {
    pub token: Option<String>,
}
