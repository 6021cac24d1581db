/// API route modules
pub mod assets;
pub mod downloads;
pub mod health;
pub mod playlists;
pub mod transfer;
pub mod web;
