pub mod align;
pub mod compare;
pub mod dsasa;
pub mod fetch;
pub mod interface;
