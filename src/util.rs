use reqwest::blocking::Response;

use crate::errors::{Error, RequestError, Result};

/// Convert non-2xx responses into a structured error that includes the server body.
///
/// If the status is successful (2xx), the original response is returned.
/// If the status is an error (4xx or 5xx), the response body is consumed
/// to create an `Error::Request(RequestError::Server)` and returned as an `Err`.
pub(crate) fn check_http_status(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let message = response.text().unwrap_or_else(|_| {
        status
            .canonical_reason()
            .unwrap_or("Unknown Error")
            .to_string()
    });

    Err(Error::from(RequestError::Server { status, message }))
}

/// Parse the bare `"0"`/`"1"` body some mutation endpoints return.
///
/// Any integer body is accepted; non-zero means the server reported success.
pub(crate) fn success_flag(body: &str) -> Result<bool> {
    body.trim()
        .parse::<i64>()
        .map(|flag| flag != 0)
        .map_err(|_| {
            Error::from(RequestError::DecodeBody {
                message: format!("expected an integer success flag, got {body:?}"),
            })
        })
}

/// Decode a JSON response body into a `serde_json::Value`.
pub(crate) fn json_body(response: Response) -> Result<serde_json::Value> {
    let text = response.text()?;
    serde_json::from_str(&text).map_err(|err| {
        Error::from(RequestError::DecodeBody {
            message: format!("invalid JSON body: {err}"),
        })
    })
}

/// The backend escapes slashes in message IDs; identity comparisons need the
/// unescaped form.
pub(crate) fn strip_backslashes(text: &str) -> String {
    text.replace('\\', "")
}

/// Drop non-ASCII codepoints (emoji, mostly) for terminal-friendly display.
pub(crate) fn strip_non_ascii(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}
