//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: terminal setup, the event loop, and request dispatch.
//! - [`renderer`] and [`layout`]: frame composition and the prewrapped
//!   transcript.
//! - [`markdown`] and [`wrap`]: message rendering.
//! - [`theme`]: color and style policy.

pub mod chat_loop;
pub mod layout;
pub mod markdown;
pub mod renderer;
pub mod theme;
pub mod wrap;
