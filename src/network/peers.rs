use std::collections::HashSet;

use url::Url;

use crate::error::{Error, Result};

/// The set of peer nodes known to this node, stored as normalized
/// `host[:port]` authorities. Grows only through explicit registration.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    nodes: HashSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self {
            nodes: HashSet::new(),
        }
    }

    /// Normalize and insert a peer address. Accepts full URLs and bare
    /// `host:port` strings; registration is idempotent. Returns the
    /// normalized authority.
    pub fn register(&mut self, address: &str) -> Result<String> {
        let authority = normalize_address(address)?;
        self.nodes.insert(authority.clone());
        Ok(authority)
    }

    /// Registered peers in a stable order.
    pub fn list(&self) -> Vec<String> {
        let mut nodes: Vec<String> = self.nodes.iter().cloned().collect();
        nodes.sort();
        nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Reduce a URL-like address to its `host[:port]` authority. Scheme-less
/// inputs like "127.0.0.1:5000" parse as a URL without a host, so they
/// get a second pass with an http prefix.
fn normalize_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("peer address is required".to_string()));
    }

    let parsed = match Url::parse(trimmed) {
        Ok(url) if url.has_host() => url,
        _ => Url::parse(&format!("http://{trimmed}"))
            .map_err(|_| Error::Validation(format!("invalid peer address: {address}")))?,
    };

    let host = parsed
        .host_str()
        .ok_or_else(|| Error::Validation(format!("invalid peer address: {address}")))?;

    Ok(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::PeerRegistry;

    #[test]
    fn accepts_urls_and_bare_authorities() {
        let mut registry = PeerRegistry::new();
        assert_eq!(
            registry.register("http://127.0.0.1:5000").unwrap(),
            "127.0.0.1:5000"
        );
        assert_eq!(
            registry.register("localhost:5001").unwrap(),
            "localhost:5001"
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn normalization_strips_scheme_and_path() {
        let mut registry = PeerRegistry::new();
        assert_eq!(
            registry.register("http://192.168.0.5:5000/api/v1/chain/").unwrap(),
            "192.168.0.5:5000"
        );
    }

    #[test]
    fn registration_is_idempotent() {
        let mut registry = PeerRegistry::new();
        registry.register("http://127.0.0.1:5000").unwrap();
        registry.register("127.0.0.1:5000").unwrap();
        registry.register("http://127.0.0.1:5000/").unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.list(), vec!["127.0.0.1:5000".to_string()]);
    }

    #[test]
    fn rejects_malformed_addresses() {
        let mut registry = PeerRegistry::new();
        assert!(registry.register("").is_err());
        assert!(registry.register("   ").is_err());
        assert!(registry.register("not a url").is_err());
        assert_eq!(registry.len(), 0);
    }
}
