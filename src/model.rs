/// One Oompa Loompa as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OompaLoompa {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub image: String,
    pub profession: String,
    pub age: u32,
    pub gender: String,
}

impl OompaLoompa {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One page of records plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub current_page: u32,
    pub total_pages: u32,
    pub oompa_loompas: Vec<OompaLoompa>,
}

/// Expanded single-entity view fetched by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OompaLoompaDetails {
    pub first_name: String,
    pub last_name: String,
    pub image: String,
    pub profession: String,
    pub age: u32,
    pub gender: String,
    pub description: String,
    pub quota: String,
    pub height: u32,
    pub country: String,
    pub email: String,
    pub favorite: Favorite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favorite {
    pub color: String,
    pub food: String,
    pub random_string: String,
    pub song: String,
}
