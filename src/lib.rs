//! Perseus: a read-mostly catalogue API for stars and deep-sky objects,
//! searchable by name, position, constellation and visibility.

pub mod astro;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod pagination;
pub mod query;
pub mod repo;
pub mod routes;
pub mod seed;
pub mod services;
pub mod utils;
