use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "car-auction")]
#[command(about = "자동차 경매 제목 파싱・카탈로그 매칭 도구", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 상세 로그 출력
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 제목을 파싱해 JSON 으로 출력
    Parse {
        /// 경매 제목 (여러 개 가능)
        #[arg(required = true)]
        titles: Vec<String>,
    },

    /// 경매 CSV 를 정규화 레코드 JSON 으로 변환
    Ingest {
        /// CSV 파일. 생략하면 --date 로 소스 폴더에서 찾는다.
        input: Option<PathBuf>,

        /// 경매 날짜 (YYMMDD). 생략하면 파일명에서 읽는다.
        #[arg(short, long)]
        date: Option<String>,

        /// 출력 JSON 파일 (생략 시 표준 출력)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 진행 표시 끄기
        #[arg(long)]
        quiet: bool,
    },

    /// 소스 폴더의 경매 날짜 목록
    Dates {
        /// 날짜별 다음 영업일도 표시
        #[arg(long)]
        next: bool,
    },

    /// 카탈로그 통계・모델 검색
    Catalog {
        /// 모델명으로 검색
        #[arg(short, long)]
        find: Option<String>,

        /// id 중복 검사
        #[arg(long)]
        check: bool,
    },

    /// 설정 표시/편집
    Config {
        /// 소스 폴더 설정
        #[arg(long)]
        set_sources_dir: Option<PathBuf>,

        /// 설정 표시
        #[arg(long)]
        show: bool,
    },
}
