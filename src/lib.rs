pub mod config;
pub mod db;
pub mod domain;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

use repository::DieselRepository;
use services::prices::PriceService;
use services::resilience::ResilientPriceLookup;

/// Price lookup wired the way the server runs it.
pub type AppPriceLookup = ResilientPriceLookup<PriceService<DieselRepository>>;
