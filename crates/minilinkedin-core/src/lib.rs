//! # MiniLinkedIn Core
//!
//! The domain layer of the MiniLinkedIn backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, pagination, validation rules, ports and the services built on them.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, FieldError, RepoError};
