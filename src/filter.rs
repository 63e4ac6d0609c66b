//! Client-side filtering of the visible page by gender and profession.
use crate::model::OompaLoompa;

/// Active filters. `None` or a blank value means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub gender: Option<String>,
    pub profession: Option<String>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        active(&self.gender).is_none() && active(&self.profession).is_none()
    }

    pub fn matches(&self, oompa_loompa: &OompaLoompa) -> bool {
        let gender_ok = active(&self.gender).map_or(true, |g| oompa_loompa.gender == g);
        let profession_ok =
            active(&self.profession).map_or(true, |p| oompa_loompa.profession == p);
        gender_ok && profession_ok
    }

    pub fn apply<'a>(&self, oompa_loompas: &'a [OompaLoompa]) -> Vec<&'a OompaLoompa> {
        oompa_loompas.iter().filter(|o| self.matches(o)).collect()
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Distinct genders on the page, in first-seen order.
pub fn available_genders(oompa_loompas: &[OompaLoompa]) -> Vec<String> {
    distinct(oompa_loompas.iter().map(|o| o.gender.as_str()))
}

/// Distinct professions on the page, in first-seen order.
pub fn available_professions(oompa_loompas: &[OompaLoompa]) -> Vec<String> {
    distinct(oompa_loompas.iter().map(|o| o.profession.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|seen| seen == value) {
            out.push(value.to_string());
        }
    }
    out
}
