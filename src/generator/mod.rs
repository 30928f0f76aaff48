//! Text generation: the external service that writes graph descriptions and
//! answers questions about them.

pub mod http;
pub mod prompts;

pub use http::HttpGenerator;

use crate::error::Result;

/// A service that turns a prompt into text.
///
/// Calls are blocking from the caller's point of view: one prompt, one
/// response, no streaming, no retry.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
