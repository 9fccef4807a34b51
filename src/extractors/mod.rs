pub mod omdb_extractor;
