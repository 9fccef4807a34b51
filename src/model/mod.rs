pub mod enrichment;
pub mod movie;
