mod profile;

pub use profile::{ConnectionProfile, DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT};
