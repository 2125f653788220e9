//! rustls client configuration for `wss://` signaling.
//!
//! With no `[TLS] signaling_ca` configured the WebSocket layer uses the
//! bundled webpki roots. A configured CA replaces them, pinning the signaling
//! server to that authority (useful for self-hosted servers behind mkcert).

use crate::config::Config;
use rustls::{ClientConfig, RootCertStore, pki_types::CertificateDer};
use rustls_pemfile::certs;
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    sync::Arc,
};

/// Reads every certificate from a PEM stream.
///
/// # Errors
/// Invalid PEM, or a stream that holds no certificate at all.
pub fn read_certs(reader: &mut dyn BufRead) -> io::Result<Vec<CertificateDer<'static>>> {
    let certs: Vec<CertificateDer<'static>> = certs(reader)
        .collect::<Result<_, _>>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid certs: {e}")))?;

    if certs.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "PEM did not contain any certificates",
        ));
    }
    Ok(certs)
}

/// Loads a certificate chain from a PEM file.
///
/// # Errors
/// The file cannot be opened or does not hold valid certificates.
pub fn load_certs(path: &str) -> io::Result<Vec<CertificateDer<'static>>> {
    let file = File::open(path)
        .map_err(|e| io::Error::new(e.kind(), format!("opening cert {path}: {e}")))?;
    read_certs(&mut BufReader::new(file))
}

/// Builds a root store trusting exactly `ca_certs`.
///
/// # Errors
/// A certificate rustls refuses to use as a trust anchor.
pub fn build_root_store(ca_certs: Vec<CertificateDer<'static>>) -> io::Result<RootCertStore> {
    let mut root_store = RootCertStore::empty();
    for cert in ca_certs {
        root_store
            .add(cert)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("bad CA cert: {e}")))?;
    }
    Ok(root_store)
}

/// Client config that trusts only the CA(s) in `ca_path`.
///
/// # Errors
/// See [`load_certs`] and [`build_root_store`].
pub fn client_config_with_ca(ca_path: &str) -> io::Result<Arc<ClientConfig>> {
    let roots = build_root_store(load_certs(ca_path)?)?;
    let cfg = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(Arc::new(cfg))
}

/// Resolves the TLS settings for the signaling connection from `[TLS] signaling_ca`.
///
/// `Ok(None)` means "use the default roots".
///
/// # Errors
/// The configured CA file is unreadable or invalid.
pub fn signaling_tls_config(config: &Config) -> io::Result<Option<Arc<ClientConfig>>> {
    config
        .get_non_empty("TLS", "signaling_ca")
        .map(client_config_with_ca)
        .transpose()
}
