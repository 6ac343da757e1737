use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoriaError {
    #[error("Country not found: {0}")]
    CountryNotFound(String),

    #[error("Bloc not found: {0}")]
    BlocNotFound(String),

    #[error("Currency not found: {0}")]
    CurrencyNotFound(String),

    #[error("Leader not found for country: {0}")]
    LeaderNotFound(String),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Save slot not found: {0}")]
    SaveNotFound(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Incompatible save format: expected version {expected}, found {found}")]
    IncompatibleSave { expected: u32, found: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl HistoriaError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidAction(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CountryNotFound(_)
                | Self::BlocNotFound(_)
                | Self::CurrencyNotFound(_)
                | Self::LeaderNotFound(_)
                | Self::ScenarioNotFound(_)
                | Self::SaveNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HistoriaError>;
