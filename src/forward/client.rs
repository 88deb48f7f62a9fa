//! Outbound HTTP clients.
//!
//! Redirect and certificate policies are properties of a `reqwest::Client`,
//! so one client is built per combination up front and the matching one is
//! picked for each call. Skipping certificate checks therefore only ever
//! applies to the calls that ask for it.

use reqwest::redirect::Policy;
use reqwest::Client;

use crate::config::ForwardingConfig;
use crate::forward::error::TransportError;

/// One client per (follow redirects, verify TLS) combination.
#[derive(Debug, Clone)]
pub struct ClientSet {
    clients: [Client; 4],
}

impl ClientSet {
    pub fn new(config: &ForwardingConfig) -> Result<Self, TransportError> {
        Ok(Self {
            clients: [
                build_client(config, false, false)?,
                build_client(config, false, true)?,
                build_client(config, true, false)?,
                build_client(config, true, true)?,
            ],
        })
    }

    /// Client matching the per-call settings.
    pub fn select(&self, follow_redirects: bool, verify_tls: bool) -> &Client {
        &self.clients[slot(follow_redirects, verify_tls)]
    }
}

fn slot(follow_redirects: bool, verify_tls: bool) -> usize {
    (usize::from(follow_redirects) << 1) | usize::from(verify_tls)
}

fn build_client(
    config: &ForwardingConfig,
    follow_redirects: bool,
    verify_tls: bool,
) -> Result<Client, TransportError> {
    let redirect = if follow_redirects {
        Policy::default()
    } else {
        Policy::none()
    };

    // No idle connections are kept: calls never share connection state.
    let mut builder = Client::builder()
        .redirect(redirect)
        .danger_accept_invalid_certs(!verify_tls)
        .pool_max_idle_per_host(0)
        .user_agent(config.user_agent.as_str());

    if !config.system_proxy {
        builder = builder.no_proxy();
    }

    builder.build().map_err(TransportError::ClientBuild)
}
