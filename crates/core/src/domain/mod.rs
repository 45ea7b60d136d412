pub mod bar;
pub mod snapshot;
