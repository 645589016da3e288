pub mod expander;
pub mod search_service;

pub use search_service::{CompanyStore, SearchService};
