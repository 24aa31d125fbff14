use anyhow::{Context, Result};
use tracing::debug;

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Reads a schema document from a file or an `http(s)://` URL.
pub fn read_input(input: &str) -> Result<Vec<u8>> {
    if is_url(input) {
        debug!(url = input, "fetching schema");
        let response = reqwest::blocking::get(input)
            .and_then(|response| response.error_for_status())
            .with_context(|| format!("fetching {input}"))?;
        let body = response
            .bytes()
            .with_context(|| format!("reading response body of {input}"))?;
        Ok(body.to_vec())
    } else {
        debug!(path = input, "reading schema");
        std::fs::read(input).with_context(|| format!("reading {input}"))
    }
}

/// Decodes a hex string, with or without a `0x` prefix.
pub fn parse_payload(payload: &str) -> Result<Vec<u8>> {
    let digits = payload.trim();
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    hex::decode(digits).with_context(|| format!("payload {payload:?} is not valid hex"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_urls() {
        assert!(is_url("https://example.com/schema.yaml"));
        assert!(is_url("http://localhost:8080/schema.yaml"));
        assert!(!is_url("schema.yaml"));
        assert!(!is_url("./https/schema.yaml"));
    }

    #[test]
    fn parses_payloads() {
        assert_eq!(parse_payload("0xa9059cbb").unwrap(), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(parse_payload("A905").unwrap(), [0xa9, 0x05]);
        assert!(parse_payload("0xabc").is_err());
        assert!(parse_payload("zz").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_input("does/not/exist.yaml").unwrap_err();
        assert_eq!(err.to_string(), "reading does/not/exist.yaml");
    }
}
