//! 일시투자 vs 적립투자 시뮬레이션 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 단일 시점 비교 (나스닥, 2000년 1월 시작)
//! dca backtest -s NASDAQ --start 2000-01 --years 10
//!
//! # 월별 기록과 상세 지표
//! dca detail -s NASDAQ --start 2000-01 --years 10 --csv results/monthly.csv
//!
//! # 롤링 분석 (1980년 1월 ~ 2015년 1월 매월 시작)
//! dca rolling -s SP500 --from 1980-01 --to 2015-01 --parallel 8 -o results/sp500.json
//!
//! # 사용 가능한 심볼 목록
//! dca symbols
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use dca_cli::commands::backtest::{run_backtest, BacktestOptions};
use dca_cli::commands::detail::{run_detail, DetailOptions};
use dca_cli::commands::rolling::{cancel_on_ctrl_c, run_rolling, RollingOptions};
use dca_cli::commands::symbols::list_symbols;
use dca_core::{init_logging, AppConfig, LogConfig, YearMonth};

#[derive(Parser)]
#[command(name = "dca")]
#[command(about = "일시투자 vs 적립투자(DCA) 과거 데이터 시뮬레이션", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (없으면 기본값과 DCA__ 환경 변수만 사용)
    #[arg(long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 단일 시점 일시투자 vs 적립투자 비교
    Backtest {
        /// 심볼 (data 디렉토리의 <SYMBOL>_data.csv)
        #[arg(short, long)]
        symbol: Option<String>,

        /// 총 투자금
        #[arg(long)]
        capital: Option<Decimal>,

        /// DCA 분할 횟수 (개월)
        #[arg(long)]
        installments: Option<u32>,

        /// 투자 시작 월 (YYYY-MM)
        #[arg(long)]
        start: Option<YearMonth>,

        /// 투자 기간 (년)
        #[arg(long)]
        years: Option<u32>,

        /// 결과 JSON 저장 경로
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 단일 시점 월별 기록과 상세 지표
    Detail {
        /// 심볼 (data 디렉토리의 <SYMBOL>_data.csv)
        #[arg(short, long)]
        symbol: Option<String>,

        /// 총 투자금
        #[arg(long)]
        capital: Option<Decimal>,

        /// DCA 분할 횟수 (개월)
        #[arg(long)]
        installments: Option<u32>,

        /// 투자 시작 월 (YYYY-MM)
        #[arg(long)]
        start: Option<YearMonth>,

        /// 투자 기간 (년)
        #[arg(long)]
        years: Option<u32>,

        /// 결과 JSON 저장 경로
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 월별 기록 CSV 저장 경로
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// 매월 시작 시점을 바꿔가며 반복 비교
    Rolling {
        /// 심볼 (data 디렉토리의 <SYMBOL>_data.csv)
        #[arg(short, long)]
        symbol: Option<String>,

        /// 스윕 시작 월 (YYYY-MM, 포함)
        #[arg(long)]
        from: Option<YearMonth>,

        /// 스윕 종료 월 (YYYY-MM, 제외)
        #[arg(long)]
        to: Option<YearMonth>,

        /// 투자 기간 (년)
        #[arg(long)]
        years: Option<u32>,

        /// DCA 분할 횟수 (개월)
        #[arg(long)]
        installments: Option<u32>,

        /// 총 투자금
        #[arg(long)]
        capital: Option<Decimal>,

        /// 동시에 실행할 시나리오 수
        #[arg(long)]
        parallel: Option<usize>,

        /// 리포트 JSON 저장 경로
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 시나리오 CSV 저장 경로
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// 사용 가능한 심볼 목록
    Symbols,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;

    init_logging(LogConfig::from_settings(&config.logging))
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;
    debug!(config = %cli.config.display(), "설정 로드 완료");

    let result = match cli.command {
        Commands::Backtest {
            symbol,
            capital,
            installments,
            start,
            years,
            output,
        } => {
            let options = BacktestOptions {
                symbol,
                capital,
                installments,
                start,
                years,
                output,
            };
            run_backtest(config, options).map(|_| ())
        }

        Commands::Detail {
            symbol,
            capital,
            installments,
            start,
            years,
            output,
            csv,
        } => {
            let options = DetailOptions {
                scenario: BacktestOptions {
                    symbol,
                    capital,
                    installments,
                    start,
                    years,
                    output,
                },
                csv,
            };
            run_detail(config, options).map(|_| ())
        }

        Commands::Rolling {
            symbol,
            from,
            to,
            years,
            installments,
            capital,
            parallel,
            output,
            csv,
        } => {
            let options = RollingOptions {
                symbol,
                from,
                to,
                years,
                installments,
                capital,
                parallel,
                output,
                csv,
            };

            let cancel = CancellationToken::new();
            let watcher = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

            let result = run_rolling(config, options, cancel).await.map(|_| ());
            watcher.abort();
            result
        }

        Commands::Symbols => list_symbols(&config).map(|_| ()),
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
