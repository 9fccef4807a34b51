pub mod movie_lookup;
pub mod omdb_client;
pub mod retrying_lookup;
