pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod mappers;
pub mod model;
pub mod remote;
pub mod repository;
pub mod viewmodel;
