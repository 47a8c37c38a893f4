#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Profile '{profile}' has no fallback output")]
    MissingFallback { profile: String },
    #[error("Profile '{profile}' has an invalid type pattern: '{pattern}'")]
    InvalidTypePattern { profile: String, pattern: String },
}
