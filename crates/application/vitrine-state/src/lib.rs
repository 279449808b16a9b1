//! Reusable UI-state toolkit: a reducer-driven store with middleware and
//! subscriptions, plus the state machines built on it (form submission,
//! confirmation gating, image gallery, grid visibility).
//!
//! Everything here is single-owner, cooperatively scheduled state. Stores are
//! explicit handles passed to whoever needs read or write access; there is no
//! ambient context to fall out of.

pub mod cycle;
pub mod form;
pub mod gallery;
pub mod grid;
pub mod store;

pub use cycle::CycleTimer;
pub use form::{
    confirm_gate, reduce_form, FormAction, FormController, FormState, Navigator, SubmitOutcome,
    GENERIC_SUBMIT_ERROR,
};
pub use gallery::{reduce_gallery, GalleryAction, GalleryImage, GalleryState};
pub use grid::{reduce_grid, standard_columns, GridAction, GridState};
pub use store::{Middleware, Store, StoreHandle};
