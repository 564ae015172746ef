use thiserror::Error;

/// Errors raised while setting up the runtime.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid logging or runtime configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_carries_its_message() {
        let err = Error::Config("bad filter directive".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad filter directive");
    }
}
