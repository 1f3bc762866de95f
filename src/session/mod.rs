//! Per-browser session state.
//!
//! A session is identified by a random id carried in a cookie and owns the
//! cache epoch used to version image URLs. Sessions live in a bounded
//! in-memory store; a request without a usable cookie gets a new session at
//! the baseline epoch instead of an error.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod epoch;
mod store;

pub use epoch::CacheEpoch;
pub use store::{SearchInfo, SessionOrigin, SessionState, SessionStore};
