//! Domain types: persisted entities, token claims, and wire DTOs.

pub mod auth;
pub mod dto;
pub mod entities;
