pub mod collect;
pub mod files;
pub mod provider;
pub mod types;
