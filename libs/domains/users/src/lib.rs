//! User accounts domain.
//!
//! ```text
//! UserService ──> UserRepository (trait)
//!                   ├── InMemoryUserRepository   (tests, prototyping)
//!                   └── MongoUserRepository      (production)
//! ```
//!
//! Accounts carry a pre-computed password hash and a [`models::Role`];
//! hashing and session handling live outside this crate.

pub mod error;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{CreateUser, Role, User};
pub use mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
