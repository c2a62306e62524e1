pub mod category;
pub mod directive;
pub mod request;
