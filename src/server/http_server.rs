//! Listener lifecycle for `entitygen serve`.
//!
//! [`HttpServer`] binds the address and runs the accept loop as a `may`
//! coroutine. [`ServerHandle`] is what the CLI keeps while it waits for a
//! shutdown signal, and what integration tests use to wait for the port and
//! tear the server down between cases.

use may::coroutine::JoinHandle;
use may_minihttp::HttpService;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::Duration;

/// Typed wrapper around may_minihttp's server
///
/// Generic over the service so tests can start the same loop as the CLI.
pub struct HttpServer<T>(pub T);

/// A running accept loop and the address it is bound to
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl ServerHandle {
    /// Resolved listen address, useful when binding an ephemeral port.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Poll the listen address until it accepts connections.
    ///
    /// # Errors
    ///
    /// `TimedOut` when the server is not reachable within ~250ms.
    pub fn wait_ready(&self) -> io::Result<()> {
        for _ in 0..50 {
            if TcpStream::connect(self.addr).is_ok() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(5));
        }
        Err(io::Error::new(io::ErrorKind::TimedOut, "server not ready"))
    }

    /// Cancel the accept loop and wait for it to finish.
    ///
    /// Called once the CLI has received SIGINT, SIGTERM or SIGQUIT.
    /// Requests already being served run to completion on their own
    /// coroutines; no new connections are accepted afterwards.
    pub fn stop(self) {
        // SAFETY: cancellation unwinds the accept loop at its next yield point.
        // The loop owns only the listener and the cloned service, and the
        // handle is consumed here, so it is cancelled exactly once.
        unsafe {
            self.handle.coroutine().cancel();
        }
        let _ = self.handle.join();
    }

    /// Block until the accept loop exits.
    ///
    /// Used where no signal handling is available.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    /// Bind `addr` and start accepting connections.
    ///
    /// Only the first resolved address is used.
    ///
    /// # Errors
    ///
    /// Fails if the address does not resolve or cannot be bound.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid address"))?;
        let handle = may_minihttp::HttpServer(self.0).start(addr)?;
        Ok(ServerHandle { addr, handle })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::GenerateService;

    #[test]
    fn test_start_rejects_unresolvable_address() {
        assert!(HttpServer(GenerateService::default())
            .start("not an address")
            .is_err());
    }
}
