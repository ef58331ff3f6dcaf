//! `millgate-catalog` — the static module registry.
//!
//! Modules are the named business capabilities a permission can be scoped
//! to (products, suppliers, production-orders, ...). Each module belongs
//! to one sidebar category and declares the subset of the action
//! vocabulary it supports. The catalog is pure and static: no I/O, no
//! errors, shared by the resolver (which cells are meaningful) and the
//! guards (what to enumerate).

pub mod action;
pub mod catalog;
pub mod module;

pub use action::{Action, BASE_ACTIONS};
pub use catalog::Catalog;
pub use module::{Category, ModuleDescriptor, ModuleKey};
