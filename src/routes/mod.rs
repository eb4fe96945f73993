pub mod dictionary;
pub mod page;
