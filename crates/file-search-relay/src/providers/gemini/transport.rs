//! HTTP transport configuration for the file-search API
//!
//! Proxy precedence: per-request proxy, then the process-wide proxy from
//! config, then reqwest's defaults. A custom CA bundle is loaded once when
//! the settings are built; every certificate in it becomes an extra root.

use reqwest::{Certificate, Client, Proxy};
use std::path::Path;
use std::time::Duration;

use crate::config::TransportConfig;
use crate::error::{Error, Result};

/// Connect timeout for every file-search call
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Boot-time transport settings shared by every request
#[derive(Clone, Default)]
pub struct TransportSettings {
    proxy_url: Option<String>,
    root_certificates: Vec<Certificate>,
}

impl TransportSettings {
    /// Resolve the config, reading the CA bundle if one is set
    pub fn from_config(config: &TransportConfig) -> Result<Self> {
        let root_certificates = match &config.ssl_cert_file {
            Some(path) => load_ca_bundle(path)?,
            None => Vec::new(),
        };

        Ok(Self {
            proxy_url: config.proxy_url.clone(),
            root_certificates,
        })
    }

    /// Proxy that applies to a request carrying `request_proxy`
    pub fn effective_proxy<'a>(&'a self, request_proxy: Option<&'a str>) -> Option<&'a str> {
        request_proxy
            .filter(|p| !p.trim().is_empty())
            .or(self.proxy_url.as_deref())
    }

    /// Build an HTTP client for one request
    pub fn build_client(&self, request_proxy: Option<&str>) -> Result<Client> {
        let mut builder = Client::builder().connect_timeout(CONNECT_TIMEOUT);

        if let Some(proxy_url) = self.effective_proxy(request_proxy) {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| Error::config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::debug!("Routing file-search calls through proxy");
        }

        for cert in &self.root_certificates {
            builder = builder.add_root_certificate(cert.clone());
        }

        builder.build().map_err(Error::from)
    }
}

/// Read every certificate in a PEM bundle. A file without any is an error.
fn load_ca_bundle(path: &Path) -> Result<Vec<Certificate>> {
    let pem = std::fs::read(path).map_err(|e| {
        Error::config(format!(
            "Failed to read SSL certificate {}: {}",
            path.display(),
            e
        ))
    })?;
    let certs = Certificate::from_pem_bundle(&pem).map_err(|e| {
        Error::config(format!("Invalid SSL certificate {}: {}", path.display(), e))
    })?;
    if certs.is_empty() {
        return Err(Error::config(format!(
            "No certificates found in {}",
            path.display()
        )));
    }

    tracing::info!(
        "Using {} custom CA certificate(s) from {}",
        certs.len(),
        path.display()
    );
    Ok(certs)
}
