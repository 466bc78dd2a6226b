use crate::settings::Settings;
use anyhow::{Result, bail};
use std::net::{IpAddr, SocketAddr};

/// Validate the configuration values
pub fn validate_config(settings: &Settings) -> Result<()> {
    // Validate log level
    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&settings.log_level.to_lowercase().as_str()) {
        bail!(
            "Invalid log level '{}'. Valid options are: {:?}",
            settings.log_level,
            valid_log_levels
        );
    }

    // Validate server address
    if !validate_socket_addr(&settings.server.addr) {
        bail!("Invalid server address: {}", settings.server.addr);
    }

    // Validate dataset settings
    if settings.dataset.paths.is_empty() {
        bail!("Dataset candidate path list cannot be empty");
    }
    if settings.dataset.paths.iter().any(|p| p.is_empty()) {
        bail!("Dataset candidate paths cannot contain empty entries");
    }

    Ok(())
}

fn validate_socket_addr(addr: &SocketAddr) -> bool {
    match addr.ip() {
        IpAddr::V4(ipv4) => !ipv4.is_broadcast() && !ipv4.is_multicast(),
        IpAddr::V6(ipv6) => !ipv6.is_multicast(),
    }
}
