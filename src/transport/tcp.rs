//! TCP listener and connector setup.

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tracing::{info, instrument};

use crate::error::{ProtocolError, Result};

/// Bind a listening socket on `address` with the given accept backlog.
///
/// # Errors
/// `ConfigError` for an unparsable address, `Bind` for socket, bind or listen failures.
#[instrument]
pub fn bind(address: &str, backlog: u32) -> Result<TcpListener> {
    let addr = address.parse::<SocketAddr>().map_err(|_| {
        ProtocolError::ConfigError(format!("Invalid listen address: '{address}'"))
    })?;

    let bind_error = |source| ProtocolError::Bind {
        address: address.to_string(),
        source,
    };

    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(bind_error)?;

    #[cfg(unix)]
    socket.set_reuseaddr(true).map_err(bind_error)?;

    socket.bind(addr).map_err(bind_error)?;
    let listener = socket.listen(backlog).map_err(bind_error)?;

    info!(address = %listener.local_addr().map_err(bind_error)?, backlog, "Listening");
    Ok(listener)
}

/// Open a connection to `address` (`host:port`, resolved by the OS).
///
/// # Errors
/// `ConnectFailed` for resolution or connection failures.
#[instrument]
pub async fn connect(address: &str) -> Result<TcpStream> {
    TcpStream::connect(address)
        .await
        .map_err(|source| ProtocolError::ConnectFailed {
            address: address.to_string(),
            source,
        })
}
