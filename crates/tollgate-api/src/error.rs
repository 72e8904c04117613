//! Listener lifecycle failures for the admin API.

use std::net::SocketAddr;

use thiserror::Error;

/// Result alias for API server operations.
pub type ApiServerResult<T> = std::result::Result<T, ApiServerError>;

/// Failures while hosting the admin API.
#[derive(Debug, Error)]
pub enum ApiServerError {
    /// The configured listen address was unavailable.
    #[error("admin api could not listen")]
    Bind {
        /// Address from `TOLLGATE_BIND_ADDR`.
        addr: SocketAddr,
        /// Socket error.
        source: std::io::Error,
    },
    /// The accept loop stopped before shutdown was requested.
    #[error("admin api stopped unexpectedly")]
    Serve {
        /// Socket error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    #[test]
    fn bind_failure_names_address() -> anyhow::Result<()> {
        let err = ApiServerError::Bind {
            addr: "127.0.0.1:3000".parse()?,
            source: io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        };
        assert_eq!(err.to_string(), "admin api could not listen");
        assert!(matches!(err, ApiServerError::Bind { addr, .. } if addr.port() == 3000));
        Ok(())
    }

    #[test]
    fn serve_failure_keeps_socket_error() {
        let err = ApiServerError::Serve {
            source: io::Error::new(io::ErrorKind::ConnectionAborted, "reset"),
        };
        assert_eq!(err.to_string(), "admin api stopped unexpectedly");
        assert!(err.source().is_some());
    }
}
