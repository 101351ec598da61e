//! Network-facing implementations of the collaborator traits.
//!
//! An alloy HTTP [`ChainProvider`](bridge_types::ChainProvider) per
//! configured chain, a static registry over them, and signers that report
//! the wallet address estimations are attributed to.

pub mod registry;
pub mod rpc;
pub mod signer;

pub use registry::StaticProviderRegistry;
pub use rpc::AlloyChainProvider;
pub use signer::{LocalSigner, ReadOnlySigner};
