//! Pure string utilities

pub mod base_path;
