//! FFI surface for the laporan UI shell.
//! Thin synchronous wrappers over `laporan_core` use-cases.

pub mod api;
