//! Live TLS handshake probe.
//!
//! Connects to port 443, completes a verified handshake against the
//! webpki root store, and reports how many peer certificates were
//! presented. A handshake that fails verification surfaces as `Err`, which
//! the extractor scores as phishing-leaning.

use crate::error::{PhishscanError, Result};
use crate::timeout::{with_timeout, ProbeTimeout};
use once_cell::sync::Lazy;
use rustls::{ClientConfig, RootCertStore};
use rustls_pki_types::ServerName;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

const TLS_PORT: u16 = 443;

static TLS_CONFIG: Lazy<Arc<ClientConfig>> = Lazy::new(|| {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    Arc::new(
        ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth(),
    )
});

/// Perform the handshake and count peer certificates.
pub async fn peer_certificate_count(host: &str, timeout: Duration) -> Result<usize> {
    let server_name = ServerName::try_from(host.to_string())
        .map_err(|e| PhishscanError::Tls(format!("invalid server name {:?}: {}", host, e)))?;

    let connector = TlsConnector::from(TLS_CONFIG.clone());

    let count = with_timeout(ProbeTimeout::new(timeout, "tls"), async {
        let tcp = TcpStream::connect((host, TLS_PORT)).await?;
        let tls = connector
            .connect(server_name, tcp)
            .await
            .map_err(|e| PhishscanError::Tls(e.to_string()))?;
        let (_, session) = tls.get_ref();
        Ok(session.peer_certificates().map_or(0, |certs| certs.len()))
    })
    .await?;

    debug!(host, certs = count, "TLS handshake complete");
    Ok(count)
}
