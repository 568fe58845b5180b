pub mod date;
pub mod dto;
pub mod model;
