/// Error types shared by the capture and board surfaces
use thiserror::Error;
use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("browser API failed: {0}")]
    Bridge(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please enter a Job Title!")]
    EmptyTitle,
}

impl From<serde_wasm_bindgen::Error> for Error {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// Wrap a rejected promise or thrown JS exception
    pub fn bridge(context: &str, value: JsValue) -> Self {
        Error::Bridge(format!("{}: {:?}", context, value))
    }
}
