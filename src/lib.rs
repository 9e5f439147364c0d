// Library entry point shared by the binary and tests
pub mod commands;
pub mod config;
pub mod fetch;
pub mod models;
pub mod raster;
pub mod utils;
