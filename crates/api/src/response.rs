//! The `{ "data": ... }` envelope wrapped around every successful body
//! except the auth token responses.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
