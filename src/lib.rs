// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive form.
//
// Module responsibilities:
// - `creds`: the four-value credential set and the tagged choice between
//   environment and user-supplied credentials.
// - `oauth`: OAuth 1.0a request signing (HMAC-SHA1).
// - `api`: the two authenticated Twitter handles (tweet creation and media
//   upload) and the publish orchestration.
// - `form`: the view-state record (draft + posted flag) and the character
//   counter.
// - `error`: the three user-visible failure classes.
// - `ui`: the terminal form flow, delegating to `api`.

pub mod api;
pub mod creds;
pub mod error;
pub mod form;
pub mod oauth;
pub mod ui;
