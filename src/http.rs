use std::time::Duration;

use serde_json::Value;

use crate::config;

#[derive(Debug, Clone)]
pub(crate) enum ParamValue {
    One(String),
    Many(Vec<String>),
}

impl ParamValue {
    pub(crate) fn one(value: impl Into<String>) -> Self {
        Self::One(value.into())
    }

    pub(crate) fn many<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Many(values.into_iter().map(Into::into).collect())
    }
}

pub(crate) fn fetch_json(path: &str, params: &[(&str, ParamValue)]) -> Result<Value, String> {
    let primary_url = build_url(config::API_BASE, path, params);
    fetch_json_with_relays(
        &primary_url,
        config::RELAY_BASES,
        config::CONNECT_TIMEOUT,
        config::READ_TIMEOUT,
    )
}

// One attempt against the primary URL, then one attempt per relay in
// configured order. Callers see a single terminal error, never the
// per-endpoint diagnostics.
pub(crate) fn fetch_json_with_relays(
    primary_url: &str,
    relay_bases: &[&str],
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<Value, String> {
    let agent = ureq::AgentBuilder::new()
        .timeout_connect(connect_timeout)
        .timeout_read(read_timeout)
        .timeout_write(read_timeout)
        .build();

    if let Ok(value) = attempt_json(&agent, primary_url) {
        return Ok(value);
    }

    for relay in relay_bases {
        let relayed = relay_url(relay, primary_url);
        if let Ok(value) = attempt_json(&agent, &relayed) {
            return Ok(value);
        }
    }

    Err(format!(
        "request failed: primary endpoint and {} relay(s) unreachable",
        relay_bases.len()
    ))
}

fn attempt_json(agent: &ureq::Agent, url: &str) -> Result<Value, String> {
    let request = agent.get(url).set("Cache-Control", "no-store");
    match request.call() {
        Ok(response) => match response.into_string() {
            Ok(body) => {
                serde_json::from_str(&body).map_err(|err| format!("response decode failed: {err}"))
            }
            Err(err) => Err(format!("response read failed: {err}")),
        },
        Err(ureq::Error::Status(status, response)) => {
            let response_body = response.into_string().ok().unwrap_or_default();
            let body = response_body.trim();
            if body.is_empty() {
                Err(format!("HTTP status {status}"))
            } else {
                let truncated = body.chars().take(240).collect::<String>();
                Err(format!("HTTP status {status} ({truncated})"))
            }
        }
        Err(ureq::Error::Transport(err)) => Err(format!("transport error: {err}")),
    }
}

pub(crate) fn build_url(base: &str, path: &str, params: &[(&str, ParamValue)]) -> String {
    let query = encode_query(params);
    if query.is_empty() {
        format!("{base}{path}")
    } else {
        format!("{base}{path}?{query}")
    }
}

// A sequence value becomes repeated same-key entries, preserving element
// order; the upstream API keys on that for `includes[]` and friends.
pub(crate) fn encode_query(params: &[(&str, ParamValue)]) -> String {
    let mut entries = Vec::new();
    for (key, value) in params {
        match value {
            ParamValue::One(single) => {
                entries.push(format!(
                    "{}={}",
                    encode_component(key),
                    encode_component(single)
                ));
            }
            ParamValue::Many(values) => {
                for item in values {
                    entries.push(format!(
                        "{}={}",
                        encode_component(key),
                        encode_component(item)
                    ));
                }
            }
        }
    }
    entries.join("&")
}

// RFC 3986 unreserved set, plus literal `[` and `]` so parameter names
// like `includes[]` and `order[chapter]` survive as the API expects.
pub(crate) fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'[' | b']' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

pub(crate) fn relay_url(relay_base: &str, primary_url: &str) -> String {
    if relay_base.ends_with('/') {
        format!("{relay_base}{primary_url}")
    } else {
        format!("{relay_base}/{primary_url}")
    }
}
