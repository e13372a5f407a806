//! Wire types shared by the backend and the frontend.

pub mod api;
pub mod models;
