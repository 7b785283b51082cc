pub mod access;
pub mod auth;
pub mod error;
pub mod favorites;
pub mod folders;
pub mod gallery;
pub mod image;
pub mod media;
pub mod settings;
pub mod share;
pub mod storage;
