//! HTTP request handlers.

mod api;
mod extract;
mod sessions;

pub use api::{capabilities, health};
pub use sessions::{
    analyze, ask, create_session, delete_session, get_session, session_history, translate,
};
