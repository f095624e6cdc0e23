mod query;
mod retrieval;

pub use query::QueryProcessor;
pub use retrieval::RetrievalService;
