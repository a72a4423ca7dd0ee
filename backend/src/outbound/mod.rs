//! Outbound adapters implementing the domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: process-local store used without a database
//! - **gemini**: hosted language model intent classifier
//! - **media**: Cloudinary image hosting
//! - **password**: Argon2id hashing
//!
//! Adapters translate between domain types and wire or storage formats and
//! contain no business rules.

pub mod gemini;
pub mod media;
pub mod memory;
pub mod password;
pub mod persistence;
