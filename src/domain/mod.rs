pub mod price;
pub mod resolver;
