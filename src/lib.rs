#![forbid(unsafe_code)]

pub mod analyzer;
pub mod app;
pub mod bus;
pub mod config;
pub mod constants;
pub mod error;
pub mod language;
pub mod styler;
pub mod widget;
pub mod window;
