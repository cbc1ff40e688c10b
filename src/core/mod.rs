//! Core types shared by the route table, the client and the gateway payloads.

pub mod config;
pub mod image;
pub mod models;
pub mod snowflake;

pub use image::ImageData;
pub use snowflake::Snowflake;
