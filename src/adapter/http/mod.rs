//! Control-plane REST adapter.

pub mod client;
pub mod dto;

pub use client::HttpControlPlaneClient;
