//! Destin is a terminal chat front-end for the DestinAI trip planner.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript, the conversation state machine, the chat
//!   endpoint client, and configuration.
//! - [`ui`] renders the header bar, message list, and input box, and runs the
//!   interactive event loop.
//! - [`commands`] implements slash-command parsing and execution used by the
//!   chat loop.
//! - [`api`] defines the JSON payloads exchanged with the chat endpoint.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into [`ui::chat_loop`] for
//! interactive sessions or [`cli::say`] for one-shot requests.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
