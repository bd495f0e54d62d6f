//! Magic-link callback URL parsing and scrubbing.
//!
//! The auth provider redirects back with `access_token`, `refresh_token` and
//! a `type`/`token_type` discriminator in either the fragment or the query
//! string. Those values must be removed from the address bar once read so a
//! reload or a shared link cannot replay them.

#[cfg(test)]
#[path = "callback_url_test.rs"]
mod callback_url_test;

/// Parameters removed from the URL after a callback has been consumed.
const SENSITIVE_PARAMS: &[&str] = &[
    "access_token",
    "refresh_token",
    "type",
    "token_type",
    "expires_in",
    "expires_at",
    "provider_token",
];

/// Tokens carried by a one-time-link callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// `type` or `token_type` discriminator (e.g. `magiclink`, `bearer`).
    pub kind: Option<String>,
    /// Access token lifetime in seconds.
    pub expires_in: Option<i64>,
    /// Absolute access token expiry, unix seconds.
    pub expires_at: Option<i64>,
}

impl CallbackTokens {
    /// Unix-seconds expiry of the access token, preferring the absolute value.
    pub fn expiry(&self, now_secs: i64) -> Option<i64> {
        self.expires_at.or_else(|| self.expires_in.map(|ttl| now_secs + ttl))
    }
}

struct UrlParts<'a> {
    base: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

fn split_url(url: &str) -> UrlParts<'_> {
    let (rest, fragment) = match url.split_once('#') {
        Some((rest, frag)) => (rest, Some(frag)),
        None => (url, None),
    };
    let (base, query) = match rest.split_once('?') {
        Some((base, q)) => (base, Some(q)),
        None => (rest, None),
    };
    UrlParts { base, query, fragment }
}

fn parse_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(k), decode(v))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or_else(|_| spaced.clone(), std::borrow::Cow::into_owned)
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.as_str())
}

/// Read callback tokens from `url`, preferring the fragment over the query string.
///
/// Returns `None` unless both an access and a refresh token are present.
pub fn extract_tokens(url: &str) -> Option<CallbackTokens> {
    let parts = split_url(url);
    let fragment = parts.fragment.map(parse_pairs).unwrap_or_default();
    let query = parts.query.map(parse_pairs).unwrap_or_default();

    let pick = |key: &str| lookup(&fragment, key).or_else(|| lookup(&query, key)).map(str::to_owned);

    let access_token = pick("access_token")?;
    let refresh_token = pick("refresh_token")?;
    let kind = pick("type").or_else(|| pick("token_type"));
    let seconds = |key: &str| pick(key).and_then(|v| v.trim().parse::<i64>().ok());
    Some(CallbackTokens {
        access_token,
        refresh_token,
        kind,
        expires_in: seconds("expires_in"),
        expires_at: seconds("expires_at"),
    })
}

/// Whether `url` carries any callback parameter that should be scrubbed.
pub fn has_sensitive_params(url: &str) -> bool {
    let parts = split_url(url);
    [parts.query, parts.fragment]
        .into_iter()
        .flatten()
        .flat_map(parse_pairs)
        .any(|(k, _)| SENSITIVE_PARAMS.contains(&k.as_str()))
}

fn filter_component(raw: &str) -> Option<String> {
    let kept: Vec<&str> = raw
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split_once('=').map_or(*pair, |(k, _)| k);
            !SENSITIVE_PARAMS.contains(&decode(key).as_str())
        })
        .collect();
    if kept.is_empty() { None } else { Some(kept.join("&")) }
}

/// Return `url` with every callback parameter removed from query and fragment.
///
/// Unrelated parameters are kept byte-for-byte; empty `?`/`#` markers are dropped.
pub fn strip_tokens(url: &str) -> String {
    let parts = split_url(url);
    let mut out = parts.base.to_owned();
    if let Some(query) = parts.query.and_then(filter_component) {
        out.push('?');
        out.push_str(&query);
    }
    if let Some(fragment) = parts.fragment.and_then(filter_component) {
        out.push('#');
        out.push_str(&fragment);
    }
    out
}
