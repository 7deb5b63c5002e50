use std::net::IpAddr;

use axum::http::HeaderMap;
use ipnet::IpNet;

/// Where a submission came from, for the logs only.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMetadata {
    pub ip: IpAddr,
    pub user_agent: String,
    pub referer: String,
}

/// Extract submission metadata from request headers.
pub fn extract(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> RequestMetadata {
    RequestMetadata {
        ip: client_ip(headers, peer_addr, trusted_proxies),
        user_agent: header_text(headers, "user-agent"),
        referer: header_text(headers, "referer"),
    }
}

fn header_text(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

fn client_ip(headers: &HeaderMap, peer_addr: Option<IpAddr>, trusted_proxies: &[IpNet]) -> IpAddr {
    let peer = peer_addr.unwrap_or(IpAddr::from([127, 0, 0, 1]));

    // X-Forwarded-For only counts when the direct connection is a trusted proxy
    if !trusted_proxies.iter().any(|net| net.contains(&peer)) {
        return peer;
    }

    // Right to left: the first hop that isn't ours is the client
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .into_iter()
        .flat_map(|xff| xff.split(',').rev())
        .filter_map(|s| s.trim().parse::<IpAddr>().ok())
        .find(|ip| !trusted_proxies.iter().any(|net| net.contains(ip)))
        .unwrap_or(peer)
}
