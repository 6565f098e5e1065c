pub mod peers;
pub mod transport;

pub use peers::PeerRegistry;
pub use transport::{ChainFetcher, ChainSnapshot, HttpChainFetcher};

/// Per-request timeout for peer chain fetches, so one unresponsive peer
/// cannot stall a whole resolution pass.
pub const PEER_FETCH_TIMEOUT_SECS: u64 = 5;
