use thiserror::Error;

/// Failure kinds of a weather fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeatherFetchError {
    /// Provider could not resolve the location (HTTP 400)
    #[error("location not found")]
    NotFound,

    /// Provider rejected the API key (HTTP 401)
    #[error("API key rejected by provider")]
    Unauthorized,

    /// Any other non-2xx status, transport failure, timeout or cancellation
    #[error("upstream error: {0}")]
    Upstream(String),

    /// 2xx response whose body does not match the expected payload
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl WeatherFetchError {
    /// Message suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            WeatherFetchError::NotFound => {
                "Location not found. Please try another city.".to_string()
            }
            WeatherFetchError::Unauthorized => {
                "Invalid API key. Please check your configuration.".to_string()
            }
            WeatherFetchError::Upstream(msg) => format!("API Error: {msg}"),
            WeatherFetchError::Malformed(msg) => {
                format!("Failed to read weather data: {msg}")
            }
        }
    }
}
