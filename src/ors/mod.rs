pub mod client;
pub mod entities;
pub mod error;

pub use client::{OrsClient, Router};
