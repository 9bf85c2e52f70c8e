use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchWxError {
    #[error("Invalid weather provider specification: {0}")]
    InvalidProviderSpec(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON decoding error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Malformed weather provider response: {0}")]
    ProviderResponse(String),

    #[error("Weather provider temporarily unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Base dir creation error for the weather cache: {0}")]
    UnableToCreateBaseDir(String),

    #[error("UTF-8 Path error: {0}")]
    Utf8PathError(String),

    #[error("Input table has no header row: {0}")]
    MissingHeader(String),

    #[error("Missing column in table: {0}")]
    MissingColumn(String),

    #[error("Invalid value in column {column}: {value}")]
    InvalidCell { column: String, value: String },

    #[error("Weather noise generation failed: {0}")]
    NoiseInjectionError(String),
}

impl From<rand_distr::NormalError> for LaunchWxError {
    fn from(err: rand_distr::NormalError) -> Self {
        LaunchWxError::NoiseInjectionError(format!("{err:?}"))
    }
}

impl From<rand_distr::ExpError> for LaunchWxError {
    fn from(err: rand_distr::ExpError) -> Self {
        LaunchWxError::NoiseInjectionError(format!("{err:?}"))
    }
}

impl PartialEq for LaunchWxError {
    fn eq(&self, other: &Self) -> bool {
        use LaunchWxError::*;
        match (self, other) {
            (InvalidProviderSpec(a), InvalidProviderSpec(b)) => a == b,
            (InvalidUrl(a), InvalidUrl(b)) => a == b,

            // Wrapped foreign errors are not comparable: equal when the variant matches
            (UreqHttpError(_), UreqHttpError(_)) => true,
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (JsonError(_), JsonError(_)) => true,

            (ProviderResponse(a), ProviderResponse(b)) => a == b,
            (ProviderUnavailable(a), ProviderUnavailable(b)) => a == b,
            (UnableToCreateBaseDir(a), UnableToCreateBaseDir(b)) => a == b,
            (Utf8PathError(a), Utf8PathError(b)) => a == b,
            (MissingHeader(a), MissingHeader(b)) => a == b,
            (MissingColumn(a), MissingColumn(b)) => a == b,
            (
                InvalidCell {
                    column: c1,
                    value: v1,
                },
                InvalidCell {
                    column: c2,
                    value: v2,
                },
            ) => c1 == c2 && v1 == v2,
            (NoiseInjectionError(a), NoiseInjectionError(b)) => a == b,

            _ => false,
        }
    }
}
