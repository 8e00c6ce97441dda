//! Client-side state layer for the notes app: the session context that
//! tracks who is logged in, the note workspace binding the list and the
//! editor to server persistence, and the HTTP API client they share.

pub mod api_client;
pub mod editor;
pub mod notes;
pub mod session;
pub mod types;
