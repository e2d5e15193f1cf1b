pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
