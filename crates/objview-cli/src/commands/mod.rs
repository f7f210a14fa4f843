pub mod config;
pub mod locations;
pub mod source;
pub mod view;
