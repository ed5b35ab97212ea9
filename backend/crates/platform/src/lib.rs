//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, Base64, HMAC-SHA256)
//! - Password hashing (salted PBKDF2-HMAC-SHA256)
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;
