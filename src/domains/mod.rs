//! Domains module containing the server's business logic.
//!
//! Tools are the only capability this server advertises.

pub mod tools;
