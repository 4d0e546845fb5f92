use http::{request::Parts, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// An allowed origin, either exact or with one `*` standing for any host label run,
/// e.g. `https://*.vercel.app`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPattern {
    Exact(String),
    Wildcard { prefix: String, suffix: String },
}

impl OriginPattern {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().trim_end_matches('/');
        match raw.split_once('*') {
            Some((prefix, suffix)) => Self::Wildcard { prefix: prefix.to_owned(), suffix: suffix.to_owned() },
            None => Self::Exact(raw.to_owned()),
        }
    }

    pub fn matches(&self, origin: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == origin,
            Self::Wildcard { prefix, suffix } => {
                origin.len() > prefix.len() + suffix.len()
                    && origin.starts_with(prefix.as_str())
                    && origin.ends_with(suffix.as_str())
                    && !origin[prefix.len()..origin.len() - suffix.len()].contains(['/', ':'])
            }
        }
    }
}

pub fn layer(origins: &[OriginPattern]) -> CorsLayer {
    let origins = origins.to_vec();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _parts: &Parts| {
            origin.to_str().is_ok_and(|origin| origins.iter().any(|pattern| pattern.matches(origin)))
        }))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:3000", "http://localhost:3000", true)]
    #[case("http://localhost:3000", "http://localhost:3001", false)]
    #[case("https://*.vercel.app", "https://my-app.vercel.app", true)]
    #[case("https://*.vercel.app", "https://a.b.vercel.app", true)]
    #[case("https://*.vercel.app", "https://vercel.app", false)]
    #[case("https://*.vercel.app", "http://my-app.vercel.app", false)]
    #[case("https://*.vercel.app", "https://evil.com/.vercel.app", false)]
    #[case("https://*.vercel.app", "https://evil.com:1.vercel.app", false)]
    #[case("https://vercel.app/", "https://vercel.app", true)]
    fn origin_matching(#[case] pattern: &str, #[case] origin: &str, #[case] allowed: bool) {
        assert_eq!(OriginPattern::parse(pattern).matches(origin), allowed);
    }
}
