//! Self-signed certificate bootstrap.
//!
//! Phones require a secure context for camera and sensor access, so the
//! server prefers HTTPS even though the certificate is self-signed. The PEM
//! pair is persisted next to the served directory and reused across runs;
//! any failure here falls back to plain HTTP at the call site.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Certificate/key PEM pair used to serve HTTPS.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TlsFiles {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Reuse an existing certificate pair or generate a fresh self-signed one
/// covering `localhost` plus the given addresses.
pub fn ensure_self_signed(
    cert: &Path,
    key: &Path,
    ips: &[IpAddr],
) -> anyhow::Result<TlsFiles> {
    if cert.exists() && key.exists() {
        return Ok(TlsFiles {
            cert: cert.to_path_buf(),
            key: key.to_path_buf(),
        });
    }

    let mut sans = vec!["localhost".to_string()];
    sans.extend(ips.iter().map(ToString::to_string));

    let generated = rcgen::generate_simple_self_signed(sans)
        .context("generate self-signed certificate")?;
    std::fs::write(cert, generated.cert.pem())
        .with_context(|| format!("write {}", cert.display()))?;
    std::fs::write(key, generated.key_pair.serialize_pem())
        .with_context(|| format!("write {}", key.display()))?;

    Ok(TlsFiles {
        cert: cert.to_path_buf(),
        key: key.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::net::Ipv4Addr;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("beacon-tls-{}", uuid::Uuid::now_v7()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn generates_pem_pair() {
        let dir = temp_dir();
        let cert = dir.join("cert.pem");
        let key = dir.join("key.pem");

        let files =
            ensure_self_signed(&cert, &key, &[IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20))])
                .unwrap();
        assert_eq!(files.cert, cert);

        let cert_pem = fs::read_to_string(&cert).unwrap();
        let key_pem = fs::read_to_string(&key).unwrap();
        assert!(cert_pem.contains("BEGIN CERTIFICATE"));
        assert!(key_pem.contains("PRIVATE KEY"));
    }

    #[test]
    fn reuses_existing_pair() {
        let dir = temp_dir();
        let cert = dir.join("cert.pem");
        let key = dir.join("key.pem");

        ensure_self_signed(&cert, &key, &[]).unwrap();
        let first = fs::read_to_string(&cert).unwrap();

        ensure_self_signed(&cert, &key, &[]).unwrap();
        let second = fs::read_to_string(&cert).unwrap();
        assert_eq!(first, second, "existing certificate must not be regenerated");
    }
}
