//! 가격 데이터 로드 및 결과 내보내기.
//!
//! 이 crate는 다음을 제공합니다:
//! - CSV 일별 OHLCV 로더 (필수 컬럼 검증)
//! - 데이터 디렉토리 기반 심볼 카탈로그
//! - 비교 결과/상세 분석/롤링 리포트 JSON 내보내기와 시나리오/월별 CSV 내보내기

pub mod catalog;
pub mod csv_loader;
pub mod error;
pub mod export;

pub use catalog::{SymbolCatalog, DATA_FILE_SUFFIX};
pub use csv_loader::{load_price_series, read_price_series, REQUIRED_COLUMNS};
pub use error::{DataError, Result};
pub use export::{
    export_comparison, export_detailed_scenario, export_monthly_csv, export_scenarios_csv,
    export_sweep_report, write_json, write_monthly_csv, write_scenarios_csv,
};
