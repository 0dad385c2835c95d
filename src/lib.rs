//! # Cohort
//!
//! Account, membership, and access-resolution core for a self-hostable
//! collaboration platform. Owns the user lifecycle (`active ⇄ blocked` with
//! cascading membership revocation on block) and the resolution of which
//! projects and groups an account may access across every ownership and
//! membership path.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use cohort::authz::AccessResolver;
//! use cohort::config::Defaults;
//! use cohort::identity::{self, NewUser};
//! use cohort::store::{SqliteStore, Store};
//!
//! let store = SqliteStore::new("./data/cohort.db").unwrap();
//! store.initialize().unwrap();
//!
//! let defaults = Defaults::default();
//! let user = identity::create_user(&store, &defaults, NewUser::new(
//!     "alice", "alice@example.com", "Alice",
//! )).unwrap();
//!
//! let mut resolver = AccessResolver::new(&store, user);
//! let projects = resolver.authorized_projects().unwrap();
//! ```

pub mod authz;
pub mod config;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod membership;
pub mod store;
pub mod types;
pub mod validation;
