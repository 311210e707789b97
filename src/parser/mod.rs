pub mod detail;
pub mod dom;
pub mod index;
