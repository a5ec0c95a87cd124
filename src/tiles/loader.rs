use crate::core::geo::TileAddress;
use crate::{MapError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use std::sync::Arc;
use std::thread;

/// Shared blocking HTTP client with a custom User-Agent so that public tile
/// servers (e.g. OpenStreetMap) don't reject the request. Building the client
/// once avoids the cost of TLS and connection pool setup for every tile.
static HTTP_CLIENT: Lazy<std::result::Result<Client, String>> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("fleetmap/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| e.to_string())
});

/// Fetches the raw bytes behind a tile URL.
pub trait TileFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// [`TileFetcher`] backed by the shared reqwest client.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTileFetcher;

impl TileFetcher for HttpTileFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let client = HTTP_CLIENT
            .as_ref()
            .map_err(|e| MapError::Network(e.clone()))?;
        let resp = client.get(url).send()?;
        if !resp.status().is_success() {
            return Err(MapError::Network(format!("HTTP {} for {}", resp.status(), url)).into());
        }
        Ok(resp.bytes()?.to_vec())
    }
}

/// Outcome of one tile request
#[derive(Debug)]
pub struct TileResult {
    pub address: TileAddress,
    pub data: Result<Vec<u8>>,
}

/// Fire-and-forget tile loader.
///
/// Each request runs on a detached thread; completed downloads (successful
/// or not) are reported through a channel the owner drains when it renders.
pub struct TileLoader {
    fetcher: Arc<dyn TileFetcher>,
    tx: Sender<TileResult>,
    rx: Receiver<TileResult>,
}

impl TileLoader {
    pub fn new(fetcher: Arc<dyn TileFetcher>) -> Self {
        let (tx, rx) = unbounded();
        Self { fetcher, tx, rx }
    }

    /// Loader fetching over HTTP
    pub fn http() -> Self {
        Self::new(Arc::new(HttpTileFetcher))
    }

    /// Start downloading `url` for `address` without blocking the caller.
    pub fn request(&self, address: TileAddress, url: String) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.tx.clone();

        let spawned = thread::Builder::new()
            .name(format!("tile-{}", address))
            .spawn(move || {
                log::debug!("fetch tile {} from {}", address, url);
                let data = fetcher.fetch(&url);
                if let Err(e) = &data {
                    log::warn!("tile {} download failed: {}", address, e);
                }
                // The receiver is gone once the map instance is dropped
                let _ = tx.send(TileResult { address, data });
            });

        if let Err(e) = spawned {
            log::error!("could not spawn loader for tile {}: {}", address, e);
            let _ = self.tx.send(TileResult {
                address,
                data: Err(e.into()),
            });
        }
    }

    /// Completed loads since the last call, without waiting
    pub fn drain(&self) -> Vec<TileResult> {
        let mut results = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(result) => results.push(result),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        results
    }

    /// Blocks until one load completes; used by tests and headless hosts
    pub fn wait_one(&self, timeout: std::time::Duration) -> Option<TileResult> {
        self.rx.recv_timeout(timeout).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct EchoFetcher;

    impl TileFetcher for EchoFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            if url.contains("missing") {
                return Err(MapError::Network(format!("HTTP 404 Not Found for {}", url)).into());
            }
            Ok(url.as_bytes().to_vec())
        }
    }

    #[test]
    fn test_completed_loads_are_reported() {
        let loader = TileLoader::new(Arc::new(EchoFetcher));
        let address = TileAddress::new(1, 2, 3);
        loader.request(address, "tile://3/1/2".to_string());

        let result = loader.wait_one(Duration::from_secs(5)).unwrap();
        assert_eq!(result.address, address);
        assert_eq!(result.data.unwrap(), b"tile://3/1/2".to_vec());
    }

    #[test]
    fn test_failures_are_reported_not_dropped() {
        let loader = TileLoader::new(Arc::new(EchoFetcher));
        loader.request(TileAddress::new(0, 0, 0), "tile://missing".to_string());

        let result = loader.wait_one(Duration::from_secs(5)).unwrap();
        assert!(result.data.is_err());
    }

    #[test]
    fn test_drain_is_non_blocking() {
        let loader = TileLoader::new(Arc::new(EchoFetcher));
        assert!(loader.drain().is_empty());
    }
}
