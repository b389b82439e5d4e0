//! TLS client used by the prober.
//!
//! Certificates are not validated: scanned hosts are expected to present
//! certificates that are neither trusted nor issued for the SNI name, and
//! nothing learned from them is trusted afterwards. Handshake signatures are
//! still checked so the session itself is well formed.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use tokio_rustls::rustls::crypto::{self, CryptoProvider};
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tokio_rustls::rustls::{self, ClientConfig, DigitallySignedStruct, SignatureScheme};
use tokio_rustls::TlsConnector;

#[derive(Debug, Error)]
pub enum TlsSetupError {
    #[error("invalid TLS server name '{0}'")]
    ServerName(String),
    #[error("failed to build TLS client configuration: {0}")]
    Config(#[from] rustls::Error),
}

/// A connector bound to one SNI name, shared by every probe of a run.
#[derive(Clone)]
pub struct TlsClient {
    connector: TlsConnector,
    server_name: ServerName<'static>,
}

impl TlsClient {
    pub fn new(sni_host: &str) -> Result<Self, TlsSetupError> {
        let server_name = ServerName::try_from(sni_host.to_string())
            .map_err(|_| TlsSetupError::ServerName(sni_host.to_string()))?;

        let provider = Arc::new(crypto::ring::default_provider());
        let verifier = Arc::new(AcceptAnyCertificate {
            provider: Arc::clone(&provider),
        });

        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .dangerous()
            .with_custom_certificate_verifier(verifier)
            .with_no_client_auth();

        Ok(Self {
            connector: TlsConnector::from(Arc::new(config)),
            server_name,
        })
    }

    pub async fn handshake<IO>(&self, stream: IO) -> io::Result<TlsStream<IO>>
    where
        IO: AsyncRead + AsyncWrite + Unpin,
    {
        self.connector
            .connect(self.server_name.clone(), stream)
            .await
    }
}

impl std::fmt::Debug for TlsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsClient")
            .field("server_name", &self.server_name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
struct AcceptAnyCertificate {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[test]
    fn accepts_dns_sni() {
        assert!(TlsClient::new("workers.uowo.de").is_ok());
    }

    #[test]
    fn rejects_invalid_sni() {
        assert!(matches!(
            TlsClient::new("not a hostname!"),
            Err(TlsSetupError::ServerName(_))
        ));
    }

    #[tokio::test]
    async fn handshake_with_plaintext_peer_fails() {
        let client = TlsClient::new("workers.uowo.de").unwrap();
        let (local, mut remote) = tokio::io::duplex(8192);

        tokio::spawn(async move {
            let _ = remote
                .write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n")
                .await;
            let _ = remote.shutdown().await;
        });

        assert!(client.handshake(local).await.is_err());
    }
}
