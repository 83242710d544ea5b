use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    /// 只顯示第一個違反的規則，完整清單保留在 `messages`
    #[error("{}", first_message(.messages))]
    ValidationError { messages: Vec<String> },

    #[error("Unknown input field: {name}")]
    UnknownFieldError { name: String },

    #[error("Invalid chart range: {reason}")]
    ChartRangeError { reason: String },

    #[error("Logging sink rejected the write (HTTP {status}): {body}")]
    SinkError { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, CalcError>;

fn first_message(messages: &[String]) -> &str {
    messages.first().map(String::as_str).unwrap_or("Invalid inputs")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Network,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CalcError {
    pub fn validation(messages: Vec<String>) -> Self {
        CalcError::ValidationError { messages }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CalcError::ValidationError { .. }
            | CalcError::UnknownFieldError { .. }
            | CalcError::ChartRangeError { .. }
            | CalcError::UrlError(_) => ErrorCategory::Input,
            CalcError::SinkError { .. } | CalcError::HttpError(_) => ErrorCategory::Network,
            CalcError::ZipError(_)
            | CalcError::CsvError(_)
            | CalcError::IoError(_)
            | CalcError::SerializationError(_) => ErrorCategory::Export,
            CalcError::ConfigError { .. }
            | CalcError::MissingConfigError { .. }
            | CalcError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 日誌寫入失敗不影響計算結果
            ErrorCategory::Network => ErrorSeverity::Low,
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Export => match self {
                CalcError::IoError(_) => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CalcError::ValidationError { .. } => self.to_string(),
            CalcError::UnknownFieldError { name } => {
                format!("'{}' is not one of the calculator inputs", name)
            }
            CalcError::ChartRangeError { reason } => format!("Cannot draw chart: {}", reason),
            CalcError::SinkError { .. } | CalcError::HttpError(_) => {
                "The calculation could not be logged remotely".to_string()
            }
            CalcError::UrlError(e) => format!("The share link is not a valid URL: {}", e),
            CalcError::ConfigError { message } => format!("Configuration problem: {}", message),
            CalcError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            CalcError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            CalcError::ZipError(_) | CalcError::CsvError(_) | CalcError::SerializationError(_) => {
                "Failed to build the export file".to_string()
            }
            CalcError::IoError(e) => format!("File system error: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CalcError::ValidationError { .. } => {
                "Enter a selling price above 0 and non-negative costs"
            }
            CalcError::UnknownFieldError { .. } => {
                "Use one of: productCost, sellingPrice, referralFee, fbaFee, shippingCost, ppcBudget, otherFees"
            }
            CalcError::ChartRangeError { .. } => {
                "Pick a finite price range with from <= to and at least one step"
            }
            CalcError::SinkError { .. } | CalcError::HttpError(_) => {
                "Check the sink endpoint and API key, or disable the sink in the config file"
            }
            CalcError::UrlError(_) => "Paste the full link including http:// or https://",
            CalcError::ConfigError { .. }
            | CalcError::MissingConfigError { .. }
            | CalcError::InvalidConfigValueError { .. } => {
                "Review the TOML config file and the environment variables it references"
            }
            CalcError::ZipError(_) | CalcError::CsvError(_) | CalcError::SerializationError(_) => {
                "Retry the export; if it keeps failing, export a single format"
            }
            CalcError::IoError(_) => "Check that the output directory exists and is writable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_displays_first_message() {
        let err = CalcError::validation(vec![
            "Selling price must be greater than 0".to_string(),
            "Product cost cannot be negative".to_string(),
        ]);
        assert_eq!(err.to_string(), "Selling price must be greater than 0");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_sink_errors_are_low_severity() {
        let err = CalcError::SinkError {
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }
}
