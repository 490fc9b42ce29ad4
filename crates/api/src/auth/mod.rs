//! Authentication building blocks: argon2 password hashing, HS256 access
//! tokens, and opaque refresh tokens stored hashed in the `sessions` table.

pub mod jwt;
pub mod password;
