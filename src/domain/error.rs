//! Domain error types.

/// Top-level error type for lutrader.
#[derive(Debug, thiserror::Error)]
pub enum LutraderError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unknown {kind} strategy: {name}")]
    UnknownStrategy { kind: &'static str, name: String },

    #[error("malformed bar on {date}: non-finite {field}")]
    MalformedBar { date: chrono::NaiveDate, field: &'static str },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&LutraderError> for std::process::ExitCode {
    fn from(err: &LutraderError) -> Self {
        let code: u8 = match err {
            LutraderError::Io(_) => 1,
            LutraderError::ConfigParse { .. }
            | LutraderError::ConfigMissing { .. }
            | LutraderError::ConfigInvalid { .. } => 2,
            LutraderError::Data { .. } => 3,
            LutraderError::UnknownStrategy { .. } => 4,
            LutraderError::MalformedBar { .. } | LutraderError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
