//! Schema-driven form engine.
//!
//! Callers describe a form as an ordered list of [`schema::FieldSchema`]
//! values. The engine resolves each field's `type` tag through the
//! [`registry::FieldRegistry`], binds validation rules when the form collects
//! real submissions, and renders a framework-neutral [`render::FormTree`]
//! that a host UI layer turns into widgets. User interactions are fed back
//! into the [`engine::FormEngine`], which returns [`engine::Action`]s for the
//! host to process (field-change events for live schema editors, submit
//! events carrying the collected values).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`schema`] | Field schema, form config, and sparse field updates |
//! | [`registry`] | Type-tag dispatch table: widget kind and rule builder per type |
//! | [`validate`] | Compiled rules and per-field evaluation |
//! | [`session`] | Ephemeral values, errors, and the submission state machine |
//! | [`render`] | Pure schema-to-tree rendering |
//! | [`engine`] | Top-level engine tying schema, session, and events together |
//! | [`builder`] | Live form builder that consumes field-change events |
//! | [`store`] | Persistence seam for saved form configs |
//! | [`error`] | Configuration and storage error types |
//! | [`consts`] | Shared default labels and messages |

pub mod builder;
pub mod consts;
pub mod engine;
pub mod error;
pub mod registry;
pub mod render;
pub mod schema;
pub mod session;
pub mod store;
pub mod validate;
