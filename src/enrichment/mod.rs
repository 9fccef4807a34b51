pub mod enrichment_pass;
pub mod fallback_table;
