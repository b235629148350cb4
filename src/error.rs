use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupSourceError {
    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Graph API error: {0}")]
    GraphApiError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Names file '{0}' was not found.")]
    NamesFileNotFound(String),

    #[error("No valid group names were found in '{0}'.")]
    NoGroupNames(String),

    #[error("Environment variable '{0}' is required but missing. Set it and retry.")]
    MissingEnvVar(String),

    #[error("Failed to obtain Graph token: {0}")]
    TokenAcquisition(String),
}

pub type Result<T> = std::result::Result<T, GroupSourceError>;

impl GroupSourceError {
    /// Message plus the underlying causes (timeouts, refused connections, ...)
    pub fn detail(&self) -> String {
        error_chain(self)
    }
}

/// Join an error and each distinct cause in its `source()` chain with ": "
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        // thiserror wrappers already embed their direct source in the message
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}

/// Parse a Graph API error body and append a hint for the common failure codes
pub fn enhance_graph_error(error_response: &str) -> String {
    if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(error_response) {
        if let Some(error_obj) = error_json.get("error") {
            let code = error_obj
                .get("code")
                .and_then(|c| c.as_str())
                .unwrap_or("Unknown");
            let message = error_obj
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("No message");

            let hint = match code {
                "Unauthorized" | "InvalidAuthenticationToken" => {
                    " (hint: the access token was rejected; check AZURE_CLIENT_ID and AZURE_CLIENT_SECRET)"
                }
                "Forbidden" | "Authorization_RequestDenied" | "InsufficientPrivileges" => {
                    " (hint: the app registration needs Group.Read.All with admin consent)"
                }
                "Request_UnsupportedQuery" | "BadRequest" => {
                    " (hint: advanced $filter queries require ConsistencyLevel: eventual)"
                }
                "TooManyRequests" => " (hint: Graph throttled the request; run again later)",
                _ => "",
            };

            return format!("{}: {}{}", code, message, hint);
        }
    }

    error_response.to_string()
}
