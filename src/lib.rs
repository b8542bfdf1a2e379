pub mod action;
pub mod app;
pub mod bookmark;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod map;
pub mod store;
pub mod view;
