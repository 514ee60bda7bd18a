pub mod profile_file;
pub mod profile_store;

pub use profile_store::{ProfileStoreError, TomlProfileStore};
