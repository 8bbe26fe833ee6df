//! 데이터 모듈 오류 타입.

use dca_core::SimError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 필수 컬럼 누락
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingRequiredColumns(Vec<String>),

    /// 심볼 데이터 파일을 찾을 수 없음
    #[error("Data file not found for symbol {symbol}: {path}")]
    SymbolNotFound { symbol: String, path: String },

    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV 읽기/쓰기 오류
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 시계열 검증 실패
    #[error(transparent)]
    Sim(#[from] SimError),
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = DataError::MissingRequiredColumns(vec!["Close".to_string(), "Volume".to_string()]);
        assert_eq!(err.to_string(), "Missing required columns: Close, Volume");
    }

    #[test]
    fn test_sim_error_is_transparent() {
        let err: DataError = SimError::InvalidSeries("중복 날짜".to_string()).into();
        assert!(matches!(err, DataError::Sim(_)));
        assert!(err.to_string().contains("중복 날짜"));
    }
}
