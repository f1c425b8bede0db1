//! `Accept-Encoding` negotiation.

use super::Encoding;

/// One parsed client preference.
struct Preference {
    name: String,
    q: f32,
}

/// Parse an `Accept-Encoding` header value into `(name, weight)` pairs.
///
/// Tokens are comma-separated `name[;q=weight]` entries; the weight defaults
/// to 1.0 and is clamped to `[0, 1]`. Unparseable weights fall back to the
/// default rather than poisoning the whole header.
fn parse_preferences(header: &str) -> Vec<Preference> {
    header
        .split(',')
        .filter_map(|token| {
            let mut parts = token.trim().split(';');
            let name = parts.next()?.trim().to_ascii_lowercase();
            if name.is_empty() {
                return None;
            }
            let mut q = 1.0f32;
            for param in parts {
                let Some((key, value)) = param.split_once('=') else {
                    continue;
                };
                if key.trim().eq_ignore_ascii_case("q") {
                    if let Ok(parsed) = value.trim().parse::<f32>() {
                        q = parsed.clamp(0.0, 1.0);
                    }
                }
            }
            Some(Preference { name, q })
        })
        .collect()
}

/// Select exactly one content encoding, or [`Encoding::Identity`].
///
/// The highest-weight candidate present in both the client list and
/// `candidates` wins. Ties break by the server's own preference order (the
/// order of `candidates`), not the client's declared order. A wildcard `*`
/// with nonzero weight matches any supported encoding the client did not
/// explicitly list; an explicit `q=0` excludes an encoding even from the
/// wildcard. An empty or absent header yields identity.
#[must_use]
pub fn negotiate(accept_encoding: &str, candidates: &[Encoding]) -> Encoding {
    let preferences = parse_preferences(accept_encoding);
    let wildcard_q = preferences
        .iter()
        .find(|p| p.name == "*")
        .map(|p| p.q);

    let mut best: Option<(Encoding, f32)> = None;
    for &candidate in candidates {
        if candidate == Encoding::Identity {
            continue;
        }
        let explicit = preferences
            .iter()
            .filter(|p| Encoding::parse(&p.name) == Some(candidate))
            .last()
            .map(|p| p.q);
        let q = match explicit.or(wildcard_q) {
            Some(q) if q > 0.0 => q,
            _ => continue,
        };
        // Strict comparison keeps the earliest (most preferred) candidate on
        // ties, implementing the server-order tie-break.
        match best {
            Some((_, best_q)) if q <= best_q => {}
            _ => best = Some((candidate, q)),
        }
    }

    best.map(|(encoding, _)| encoding).unwrap_or(Encoding::Identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highest_weight_wins() {
        let selected = negotiate("br;q=0.5, gzip;q=0.8", &[Encoding::Gzip, Encoding::Brotli]);
        assert_eq!(selected, Encoding::Gzip);
    }

    #[test]
    fn default_weight_is_one() {
        let selected = negotiate("br, gzip;q=0.9", &Encoding::SUPPORTED);
        assert_eq!(selected, Encoding::Brotli);
    }

    #[test]
    fn ties_break_by_server_order() {
        // Client prefers neither; the server's order (zstd first) decides.
        let selected = negotiate("gzip, zstd", &Encoding::SUPPORTED);
        assert_eq!(selected, Encoding::Zstd);
        // Reversed server order flips the outcome.
        let selected = negotiate("gzip, zstd", &[Encoding::Gzip, Encoding::Zstd]);
        assert_eq!(selected, Encoding::Gzip);
    }

    #[test]
    fn wildcard_matches_unlisted_encodings() {
        let selected = negotiate("*;q=0.1", &Encoding::SUPPORTED);
        assert_eq!(selected, Encoding::Zstd);
    }

    #[test]
    fn explicit_zero_excludes_from_wildcard() {
        let selected = negotiate("*, zstd;q=0", &Encoding::SUPPORTED);
        assert_eq!(selected, Encoding::Brotli);
    }

    #[test]
    fn zero_weight_means_unacceptable() {
        assert_eq!(
            negotiate("gzip;q=0", &[Encoding::Gzip]),
            Encoding::Identity
        );
    }

    #[test]
    fn empty_header_yields_identity() {
        assert_eq!(negotiate("", &Encoding::SUPPORTED), Encoding::Identity);
        assert_eq!(negotiate("  ", &Encoding::SUPPORTED), Encoding::Identity);
    }

    #[test]
    fn unknown_encodings_are_ignored() {
        assert_eq!(
            negotiate("sdch, compress", &Encoding::SUPPORTED),
            Encoding::Identity
        );
    }

    #[test]
    fn weights_clamp_to_unit_interval() {
        let selected = negotiate("gzip;q=7, br;q=1", &[Encoding::Brotli, Encoding::Gzip]);
        // gzip's q clamps to 1.0; the tie goes to the server-preferred brotli.
        assert_eq!(selected, Encoding::Brotli);
    }

    #[test]
    fn malformed_weight_falls_back_to_default() {
        let selected = negotiate("gzip;q=banana", &[Encoding::Gzip]);
        assert_eq!(selected, Encoding::Gzip);
    }
}
