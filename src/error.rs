use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuctionError {
    #[error("설정 오류: {0}")]
    Config(String),

    #[error("파일을 찾을 수 없습니다: {0}")]
    FileNotFound(String),

    #[error("폴더를 찾을 수 없습니다: {0}")]
    FolderNotFound(String),

    #[error("날짜 형식이 올바르지 않습니다 (YYMMDD): {0}")]
    InvalidDate(String),

    #[error("JSON 파싱 오류: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO 오류: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] car_auction_common::Error),
}

pub type Result<T> = std::result::Result<T, AuctionError>;
