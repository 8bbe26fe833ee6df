//! 심볼 카탈로그.
//!
//! 데이터 디렉토리의 `<SYMBOL>_data.csv` 파일을 심볼로 취급합니다.

use std::fs;
use std::path::{Path, PathBuf};

use dca_core::PriceSeries;
use tracing::debug;

use crate::csv_loader::load_price_series;
use crate::error::{DataError, Result};

/// 데이터 파일 이름 접미사.
pub const DATA_FILE_SUFFIX: &str = "_data.csv";

/// 데이터 디렉토리 기반 심볼 카탈로그.
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    data_dir: PathBuf,
}

impl SymbolCatalog {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// 심볼의 데이터 파일 경로.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}{}", symbol, DATA_FILE_SUFFIX))
    }

    /// 사용 가능한 심볼 목록 (정렬됨).
    ///
    /// 디렉토리가 없으면 빈 목록을 반환합니다.
    pub fn list_symbols(&self) -> Result<Vec<String>> {
        if !self.data_dir.is_dir() {
            debug!(dir = %self.data_dir.display(), "데이터 디렉토리 없음");
            return Ok(Vec::new());
        }

        let mut symbols = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            if let Some(symbol) = name
                .to_str()
                .and_then(|n| n.strip_suffix(DATA_FILE_SUFFIX))
                .filter(|s| !s.is_empty())
            {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    /// 심볼의 가격 시계열을 로드합니다.
    pub fn load(&self, symbol: &str) -> Result<PriceSeries> {
        let path = self.path_for(symbol);
        if !path.is_file() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
                path: path.display().to_string(),
            });
        }
        load_price_series(&path)
    }
}
