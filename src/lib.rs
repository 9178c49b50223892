pub mod compute;
pub mod config;
pub mod controller;
pub mod display;
pub mod entities;
pub mod input;
