//! 사용 가능한 심볼 목록 명령어.

use anyhow::{Context, Result};

use dca_core::AppConfig;
use dca_data::SymbolCatalog;

/// 데이터 디렉토리의 심볼 목록을 출력합니다.
pub fn list_symbols(config: &AppConfig) -> Result<Vec<String>> {
    let catalog = SymbolCatalog::new(&config.data.data_dir);
    let symbols = catalog
        .list_symbols()
        .with_context(|| format!("Failed to read {}", catalog.data_dir().display()))?;

    if symbols.is_empty() {
        println!("{}에 데이터 파일이 없습니다", catalog.data_dir().display());
    } else {
        println!("사용 가능한 심볼 ({}개):", symbols.len());
        for symbol in &symbols {
            println!("  - {}", symbol);
        }
    }

    Ok(symbols)
}
