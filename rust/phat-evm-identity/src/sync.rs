//! Cross-target `Send` bound for signer futures.
//!
//! Wallet integrations on `wasm32-unknown-unknown` hand back `!Send` futures
//! (they await JavaScript promises), while native signers are usually driven
//! from a multi-threaded runtime. On wasm the bound below is empty; everywhere
//! else it is `Send`.

#[allow(missing_docs)]
#[cfg(not(target_arch = "wasm32"))]
pub trait ConditionalSend: Send {}

#[cfg(not(target_arch = "wasm32"))]
impl<S> ConditionalSend for S where S: Send {}

#[allow(missing_docs)]
#[cfg(target_arch = "wasm32")]
pub trait ConditionalSend {}

#[cfg(target_arch = "wasm32")]
impl<S> ConditionalSend for S {}
