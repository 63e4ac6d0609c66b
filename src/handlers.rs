//! Commands of the interactive browse session and their rendering.
use std::fmt::Write as _;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, instrument};

use crate::filter::{available_genders, available_professions, Filters};
use crate::viewmodel::{DetailUiState, DetailViewModel, ListUiState, ListViewModel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Page(u32),
    Reload,
    Gender(Option<String>),
    Profession(Option<String>),
    ClearFilters,
    Show(u32),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{0} expects a positive number")]
    InvalidNumber(&'static str),
    #[error("empty input")]
    Empty,
}

pub const HELP: &str = "\
commands:
  next | prev           move one page forward or back
  page <n>              jump to page n
  reload                re-fetch the current page
  gender [value]        filter by gender (no value clears it)
  profession [value]    filter by profession (no value clears it)
  clear                 clear all filters
  show <id>             show the details of one oompa loompa
  help                  print this help
  quit                  leave";

impl Command {
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();
        let (head, rest) = match input.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (input, ""),
        };
        let arg = Some(rest).filter(|r| !r.is_empty()).map(str::to_string);
        match head.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "next" | "n" => Ok(Self::Next),
            "prev" | "p" => Ok(Self::Previous),
            "page" => parse_number(rest, "page").map(Self::Page),
            "reload" | "r" => Ok(Self::Reload),
            "gender" => Ok(Self::Gender(arg)),
            "profession" => Ok(Self::Profession(arg)),
            "clear" => Ok(Self::ClearFilters),
            "show" => parse_number(rest, "show").map(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_number(value: &str, command: &'static str) -> Result<u32, CommandError> {
    value
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or(CommandError::InvalidNumber(command))
}

/// Outcome of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Output(String),
    Quit,
}

/// One browsing session: a list view, a detail view and the active filters.
pub struct Session {
    list: ListViewModel,
    detail: DetailViewModel,
    filters: Filters,
}

impl Session {
    pub fn new(list: ListViewModel, detail: DetailViewModel) -> Self {
        Self {
            list,
            detail,
            filters: Filters::default(),
        }
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Load the first page.
    pub async fn start(&mut self) -> String {
        self.list.fetch(1);
        let state = settled_list(self.list.subscribe()).await;
        render_page(&state, &self.filters)
    }

    #[instrument(skip(self))]
    pub async fn handle(&mut self, command: Command) -> Reply {
        let current = self.list.state();
        match command {
            Command::Quit => return Reply::Quit,
            Command::Help => return Reply::Output(format!("{}\n", HELP)),
            Command::Next if !current.has_next() => {
                return Reply::Output("already on the last page\n".to_string())
            }
            Command::Previous if !current.has_previous() => {
                return Reply::Output("already on the first page\n".to_string())
            }
            Command::Page(page) if page > current.total_pages => {
                return Reply::Output(format!(
                    "page {} is out of range (1-{})\n",
                    page, current.total_pages
                ))
            }
            Command::Next => self.goto(current.current_page + 1),
            Command::Previous => self.goto(current.current_page - 1),
            Command::Page(page) => self.goto(page),
            Command::Reload => {
                self.filters = Filters::default();
                self.list.reload();
            }
            Command::Gender(value) => self.filters.gender = value,
            Command::Profession(value) => self.filters.profession = value,
            Command::ClearFilters => self.filters = Filters::default(),
            Command::Show(id) => {
                self.detail.fetch_details(Some(id));
                let state = settled_detail(self.detail.subscribe()).await;
                return Reply::Output(render_details(&state));
            }
        }
        let state = settled_list(self.list.subscribe()).await;
        Reply::Output(render_page(&state, &self.filters))
    }

    fn goto(&mut self, page: u32) {
        info!(page, "navigating");
        // Filter options belong to the page they were built from.
        self.filters = Filters::default();
        self.list.fetch(page);
    }
}

/// Wait until the list view is no longer loading and return that state.
pub async fn settled_list(mut rx: watch::Receiver<ListUiState>) -> ListUiState {
    let settled = rx.wait_for(|s| !s.is_loading).await.map(|s| s.clone());
    settled.unwrap_or_else(|_| rx.borrow().clone())
}

/// Wait until the detail view is no longer loading and return that state.
pub async fn settled_detail(mut rx: watch::Receiver<DetailUiState>) -> DetailUiState {
    let settled = rx.wait_for(|s| !s.is_loading).await.map(|s| s.clone());
    settled.unwrap_or_else(|_| rx.borrow().clone())
}

pub fn render_page(state: &ListUiState, filters: &Filters) -> String {
    let mut out = String::new();
    if !state.error_messages.is_empty() {
        for message in &state.error_messages {
            let _ = writeln!(out, "error: {}", message);
        }
        return out;
    }

    let _ = writeln!(out, "page {}/{}", state.current_page, state.total_pages);
    let visible = filters.apply(&state.oompa_loompas);
    if visible.is_empty() {
        let _ = writeln!(out, "  (no oompa loompas)");
    }
    for o in visible {
        let _ = writeln!(
            out,
            "  #{:<4} {:<28} {:<2} {:>3}  {}",
            o.id,
            o.full_name(),
            o.gender,
            o.age,
            o.profession
        );
    }
    let _ = writeln!(
        out,
        "genders: {} | professions: {}",
        available_genders(&state.oompa_loompas).join(", "),
        available_professions(&state.oompa_loompas).join(", ")
    );
    if !filters.is_empty() {
        let _ = writeln!(
            out,
            "filters: gender={} profession={}",
            filters.gender.as_deref().unwrap_or("-"),
            filters.profession.as_deref().unwrap_or("-")
        );
    }
    out
}

pub fn render_details(state: &DetailUiState) -> String {
    let mut out = String::new();
    for message in &state.error_messages {
        let _ = writeln!(out, "error: {}", message);
    }
    if let Some(d) = &state.details {
        let _ = writeln!(out, "{} {}", d.first_name, d.last_name);
        let _ = writeln!(out, "  profession:  {}", d.profession);
        let _ = writeln!(out, "  gender:      {}", d.gender);
        let _ = writeln!(out, "  age:         {}", d.age);
        let _ = writeln!(out, "  height:      {}", d.height);
        let _ = writeln!(out, "  country:     {}", d.country);
        let _ = writeln!(out, "  email:       {}", d.email);
        let _ = writeln!(out, "  image:       {}", d.image);
        let _ = writeln!(
            out,
            "  favorite:    color={} food={} song={}",
            d.favorite.color, d.favorite.food, d.favorite.song
        );
        let _ = writeln!(out, "  description: {}", d.description.trim());
        let _ = writeln!(out, "  quota:       {}", d.quota.trim());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OompaLoompa;

    #[test]
    fn parses_navigation_commands() {
        assert_eq!(Command::parse("next"), Ok(Command::Next));
        assert_eq!(Command::parse("  P "), Ok(Command::Previous));
        assert_eq!(Command::parse("page 4"), Ok(Command::Page(4)));
        assert_eq!(Command::parse("reload"), Ok(Command::Reload));
        assert_eq!(Command::parse("show 12"), Ok(Command::Show(12)));
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
    }

    #[test]
    fn parses_filters_with_spaces() {
        assert_eq!(
            Command::parse("profession Gem cutter"),
            Ok(Command::Profession(Some("Gem cutter".into())))
        );
        assert_eq!(Command::parse("gender"), Ok(Command::Gender(None)));
        assert_eq!(Command::parse("clear"), Ok(Command::ClearFilters));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(Command::parse(""), Err(CommandError::Empty));
        assert_eq!(Command::parse("page zero"), Err(CommandError::InvalidNumber("page")));
        assert_eq!(Command::parse("show 0"), Err(CommandError::InvalidNumber("show")));
        assert_eq!(
            Command::parse("dance"),
            Err(CommandError::Unknown("dance".into()))
        );
    }

    #[test]
    fn render_page_shows_errors_instead_of_content() {
        let state = ListUiState {
            error_messages: vec!["Error fetching oompa loompas".into()],
            ..Default::default()
        };
        let out = render_page(&state, &Filters::default());
        assert_eq!(out, "error: Error fetching oompa loompas\n");
    }

    #[test]
    fn render_page_applies_filters() {
        let mk = |id: u32, gender: &str| OompaLoompa {
            id,
            first_name: format!("Name{}", id),
            last_name: "Loompa".into(),
            image: "image".into(),
            profession: "Developer".into(),
            age: 20,
            gender: gender.into(),
        };
        let state = ListUiState {
            current_page: 2,
            total_pages: 20,
            oompa_loompas: vec![mk(1, "F"), mk(2, "M")],
            ..Default::default()
        };
        let filters = Filters {
            gender: Some("M".into()),
            profession: None,
        };
        let out = render_page(&state, &filters);
        assert!(out.starts_with("page 2/20\n"));
        assert!(out.contains("Name2 Loompa"));
        assert!(!out.contains("Name1 Loompa"));
        assert!(out.contains("genders: F, M"));
        assert!(out.contains("filters: gender=M profession=-"));
    }
}
