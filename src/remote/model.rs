//! Wire format of the Oompa Loompa API.
//!
//! Field names follow the API's snake_case contract (`first_name`,
//! `random_string`). Unknown fields such as the `favorite` block embedded in
//! list results are ignored.
use serde::Deserialize;

/// `GET /oompa-loompas?page={n}`
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub current: u32,
    pub total: u32,
    pub results: Vec<ResultResponse>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResultResponse {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub image: String,
    pub profession: String,
    pub age: u32,
}

/// `GET /oompa-loompas/{id}`
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DetailsResponse {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub image: String,
    pub profession: String,
    pub age: u32,
    pub description: String,
    pub quota: String,
    pub height: u32,
    pub country: String,
    pub email: String,
    pub favorite: FavoriteResponse,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FavoriteResponse {
    pub color: String,
    pub food: String,
    pub random_string: String,
    pub song: String,
}
