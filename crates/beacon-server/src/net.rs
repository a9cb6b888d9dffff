//! Local network address discovery for the startup banner and cert SANs.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Best-effort discovery of this host's LAN address.
///
/// Connecting a datagram socket sends no packets; it only asks the OS which
/// local address it would route from. Falls back to loopback when the host
/// has no route at all.
pub fn local_ips() -> Vec<IpAddr> {
    let mut ips = Vec::new();

    if let Ok(socket) = UdpSocket::bind(("0.0.0.0", 0)) {
        if socket.connect(("8.8.8.8", 80)).is_ok() {
            if let Ok(addr) = socket.local_addr() {
                if !addr.ip().is_loopback() {
                    ips.push(addr.ip());
                }
            }
        }
    }

    if ips.is_empty() {
        ips.push(IpAddr::V4(Ipv4Addr::LOCALHOST));
    }
    ips
}
