use crate::terminal::colors;
use cidr2ip_common::network::family::AddressFamily;
use cidr2ip_core::cache::ArtifactSummary;
use colored::*;

/// Groups digits in threes: `16777216` becomes `16,777,216`.
pub fn count(n: u128) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn family_color(family: AddressFamily) -> Color {
    match family {
        AddressFamily::Ipv4 => colors::IPV4_ADDR,
        AddressFamily::Ipv6 => colors::IPV6_ADDR,
    }
}

pub fn artifact_details(summary: &ArtifactSummary) -> Vec<(String, ColoredString)> {
    vec![
        (
            String::from("Family"),
            summary.family.to_string().color(family_color(summary.family)),
        ),
        (
            String::from("Blocks"),
            count(summary.records as u128).color(colors::ACCENT),
        ),
        (
            String::from("IPs"),
            count(summary.addresses).color(colors::ACCENT),
        ),
        (
            String::from("File"),
            summary.path.display().to_string().color(colors::TEXT_DEFAULT),
        ),
    ]
}
