//! # heka
//!
//! A tool service layer that drives a Prolog-style logic-programming engine.
//! heka does not resolve queries itself; it wraps any engine implementing
//! [`engine::LogicEngine`] and exposes three operations to a transport
//! collaborator:
//!
//! - **query** ([`collect`]): run a query under a hard per-call deadline and
//!   materialize every solution, with timeout / engine-fault / no-solutions
//!   outcomes kept strictly apart.
//! - **exec** ([`consult`]): load a program into the engine's persistent
//!   knowledge base, at-least-applied (no rollback past a failing clause).
//! - **discover** ([`catalog`]): snapshot the registered predicates through
//!   an explicit enumeration capability — engines without it get a clean
//!   `Unsupported`, never introspection tricks.
//!
//! The [`tool`] module is the dispatch boundary: signatures, validated
//! inputs, and a registry the external transport drives. Transport framing
//! itself stays outside this crate.
//!
//! ## Library usage
//!
//! ```no_run
//! use heka::fixture::FactEngine;
//! use heka::tool::ToolInput;
//! use heka::tools;
//!
//! let engine = FactEngine::new();
//! let registry = tools::default_registry();
//!
//! let input = ToolInput::new().with_param("program", "parent(tom, bob).");
//! registry.execute("exec", input, &engine).unwrap();
//!
//! let input = ToolInput::new().with_param("query", "parent(tom, X)");
//! let out = registry.execute("query", input, &engine).unwrap();
//! assert_eq!(out.text, r#"[{"X":"bob"}]"#);
//! ```

pub mod cancel;
pub mod catalog;
pub mod collect;
pub mod consult;
pub mod engine;
pub mod error;
pub mod fixture;
pub mod tool;
pub mod tools;
