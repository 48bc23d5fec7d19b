use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument};

use crate::config::ServerConfig;
use crate::error::{ProtocolError, Result};
use crate::protocol::handshake::Role;
use crate::protocol::worker::{handle_connection, WorkerSettings};
use crate::transport::tcp;

/// Connection dispatcher for one service role.
///
/// Owns the listening socket. Every accepted connection goes to its own task, which
/// shares nothing with the others; a failing worker never reaches the accept loop.
pub struct Server {
    listener: TcpListener,
    settings: WorkerSettings,
}

impl Server {
    /// Bind the listening socket described by `config`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind(role: Role, config: &ServerConfig) -> Result<Self> {
        let listener = tcp::bind(&config.address, config.backlog)?;
        Ok(Self {
            listener,
            settings: WorkerSettings::new(role, config),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn role(&self) -> Role {
        self.settings.role
    }

    /// Accept connections until `accept` fails.
    ///
    /// Does not wait for workers; after each accept, workers that have already
    /// finished are reaped without blocking.
    ///
    /// # Errors
    /// `Accept` when the listening socket fails. Worker failures are never returned.
    #[instrument(skip(self), fields(role = %self.settings.role))]
    pub async fn run(self) -> Result<()> {
        let mut workers = JoinSet::new();
        info!("Dispatcher running");

        loop {
            let (stream, peer) = self
                .listener
                .accept()
                .await
                .map_err(ProtocolError::Accept)?;
            debug!(%peer, "Accepted connection");

            workers.spawn(handle_connection(stream, peer, self.settings.clone()));

            let reaped = reap_finished(&mut workers);
            debug!(reaped, active = workers.len(), "Workers reaped");
        }
    }
}

/// Collect every worker that has already finished, without waiting on the rest.
fn reap_finished(workers: &mut JoinSet<()>) -> usize {
    let mut reaped = 0;
    while let Some(joined) = workers.try_join_next() {
        reaped += 1;
        if let Err(e) = joined {
            if e.is_panic() {
                error!(error = %e, "Worker panicked");
            }
        }
    }
    reaped
}
