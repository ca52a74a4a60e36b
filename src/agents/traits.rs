//! Agent plugin interface.
//!
//! The engine talks to strategies only through these traits. Where a
//! strategy lives (in this process, behind a child process, anywhere
//! else) is the resolver's business, never the engine's.

use std::sync::Arc;

use crate::core::{Action, AgentError, AuctionView, SeatId, StateView, TradeOffer};

/// Interface version a module must report to be loaded.
pub const AGENT_ABI_VERSION: u32 = 1;

/// One strategy instance sitting in one seat.
///
/// Every answer is untrusted: the engine validates it and penalises
/// anything ill-formed. An `Err` is treated the same as a malformed reply.
pub trait Agent {
    /// Called once before play with the assigned seat and a private seed.
    fn game_start(&mut self, _seat: SeatId, _seed: u64) -> Result<(), AgentError> {
        Ok(())
    }

    /// Choose one action during the seat's own turn.
    fn take_turn(&mut self, state: &StateView) -> Result<Action, AgentError>;

    /// Answer an auction round. Expected reply: `Action::AuctionBid`.
    fn bid(&mut self, state: &StateView, auction: &AuctionView) -> Result<Action, AgentError>;

    /// Answer a trade proposal from the acting seat. Expected reply:
    /// `Action::TradeResponse`.
    fn respond_to_trade(
        &mut self,
        state: &StateView,
        offer: &TradeOffer,
    ) -> Result<Action, AgentError>;
}

/// A loadable strategy: a version probe plus an instance constructor.
///
/// A module may hand out any number of independent instances.
pub trait AgentModule: Send + Sync {
    /// Interface version the module was built against.
    fn abi_version(&self) -> u32;

    /// Construct a fresh instance from an opaque configuration string.
    fn create(&self, config: &str) -> Result<Box<dyn Agent>, AgentError>;
}

/// Maps a module path from a `SeatSpec` to a loaded module.
pub trait ModuleResolver {
    fn resolve(&self, path: &str) -> Result<Arc<dyn AgentModule>, AgentError>;
}

/// Resolve, version-check and instantiate the module at `path`.
pub fn instantiate(
    resolver: &dyn ModuleResolver,
    path: &str,
    config: &str,
) -> Result<Box<dyn Agent>, AgentError> {
    let module = resolver.resolve(path)?;
    let found = module.abi_version();
    if found != AGENT_ABI_VERSION {
        return Err(AgentError::VersionMismatch {
            path: path.to_string(),
            found,
            expected: AGENT_ABI_VERSION,
        });
    }
    module.create(config)
}
