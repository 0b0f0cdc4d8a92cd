pub mod config;
pub mod controller;
pub mod errors;
pub mod geo;
pub mod helpers;
pub mod index;
pub mod models;
pub mod places;
pub mod repositories;
pub mod service;
