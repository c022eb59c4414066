pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Deserialize the request from `--input`, or from piped stdin.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json(path);
    }
    match stdin::read_piped_request()? {
        Some(data) => Ok(serde_json::from_value(data)?),
        None => Err(format!("--input file (or JSON on stdin) is required for {what}").into()),
    }
}
