use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    Message(String),
}

impl ViewError {
    pub const FALLBACK_MESSAGE: &'static str = "Something went wrong. Please try again.";

    /// Keep the error's own text; blank messages fall back to `Unknown`.
    #[must_use]
    pub fn from_error(err: &impl fmt::Display) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            Self::Unknown
        } else {
            Self::Message(message)
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Unknown => Self::FALLBACK_MESSAGE,
            Self::Message(message) => message,
        }
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

impl<T> ViewState<T> {
    #[must_use]
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Error(ViewError::from_error(&err)),
        }
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_error_uses_fallback() {
        assert_eq!(ViewError::from_error(&"  ").message(), ViewError::FALLBACK_MESSAGE);
        assert_eq!(ViewError::from_error(&"offline").message(), "offline");
    }

    #[test]
    fn from_result_maps_both_arms() {
        let ok: ViewState<u8> = ViewState::from_result(Ok::<u8, String>(3));
        assert_eq!(ok.ready(), Some(&3));
        let err: ViewState<u8> = ViewState::from_result(Err::<u8, _>("down"));
        assert_eq!(err, ViewState::Error(ViewError::Message("down".into())));
    }
}
