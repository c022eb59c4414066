use serde_json::Value;
use std::io::{self, Read};

/// Request document piped on stdin. `None` when stdin is a terminal, so the
/// caller can ask for `--input` instead.
pub fn read_piped_request() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;
    parse_request(&raw).map(Some)
}

fn parse_request(raw: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let body = raw.trim();
    if body.is_empty() {
        return Err("no analysis request on stdin".into());
    }
    serde_json::from_str(body).map_err(|e| format!("stdin is not a JSON request: {e}").into())
}
