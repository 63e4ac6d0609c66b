//! Wire response → domain record conversions.
use crate::model::{Favorite, OompaLoompa, OompaLoompaDetails, PageResult};
use crate::remote::model::{DetailsResponse, FavoriteResponse, PageResponse, ResultResponse};

impl From<PageResponse> for PageResult {
    fn from(res: PageResponse) -> Self {
        Self {
            current_page: res.current,
            total_pages: res.total,
            oompa_loompas: res.results.into_iter().map(OompaLoompa::from).collect(),
        }
    }
}

impl From<ResultResponse> for OompaLoompa {
    fn from(res: ResultResponse) -> Self {
        Self {
            id: res.id,
            first_name: res.first_name,
            last_name: res.last_name,
            image: res.image,
            profession: res.profession,
            age: res.age,
            gender: res.gender,
        }
    }
}

impl From<DetailsResponse> for OompaLoompaDetails {
    fn from(res: DetailsResponse) -> Self {
        Self {
            first_name: res.first_name,
            last_name: res.last_name,
            image: res.image,
            profession: res.profession,
            age: res.age,
            gender: res.gender,
            description: res.description,
            quota: res.quota,
            height: res.height,
            country: res.country,
            email: res.email,
            favorite: res.favorite.into(),
        }
    }
}

impl From<FavoriteResponse> for Favorite {
    fn from(res: FavoriteResponse) -> Self {
        Self {
            color: res.color,
            food: res.food,
            random_string: res.random_string,
            song: res.song,
        }
    }
}
