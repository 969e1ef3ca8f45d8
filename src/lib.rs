pub mod cliopt;
pub mod enrich;
pub mod error;
pub mod forward;
pub mod geo;
pub mod model;
pub mod output;
pub mod parser;
pub mod server;
