pub mod criteria;
pub mod in_memory_search;

pub use in_memory_search::InMemorySearchEngine;
