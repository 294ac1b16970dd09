//! 설정 관리.
//!
//! 기본값 → `config/default.toml`(선택) → `INVENTORY__*` 환경 변수 순으로 병합하고,
//! 관례적인 단일 환경 변수(`DATABASE_URL`, `JWT_SECRET`, `API_HOST`, `API_PORT`,
//! `CORS_ORIGINS`)로 마지막에 덮어씁니다.

use std::net::SocketAddr;
use std::path::Path;

use config::builder::DefaultState;
use config::ConfigBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::error::{InventoryError, InventoryResult};

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// CORS 설정
    #[serde(default)]
    pub cors: CorsConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 URL
    #[serde(default)]
    pub url: String,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub connection_timeout_secs: u64,
    /// 테이블이 비어 있으면 샘플 상품 삽입
    pub seed_sample_data: bool,
}

/// 인증 설정.
///
/// JWT 서명 비밀 키는 기본값이 없으며, 누락 시 [`AppConfig::validate`]가 실패합니다.
#[derive(Debug, Default, Deserialize)]
pub struct AuthConfig {
    /// HS256 공유 비밀 키
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub jwt_secret: Option<SecretString>,
}

impl AuthConfig {
    /// 비밀 키 반환. 설정되지 않았으면 에러.
    pub fn secret(&self) -> InventoryResult<&str> {
        self.jwt_secret
            .as_ref()
            .map(|s| s.expose_secret())
            .ok_or_else(|| InventoryError::Config("JWT_SECRET이 설정되지 않았습니다".to_string()))
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(|s| SecretString::new(s.into())))
}

/// CORS 설정.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// 허용 origin 목록. 비어 있으면 모든 origin 허용 (개발 모드)
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨 필터
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 건너뜁니다. 로드 후 [`AppConfig::validate`]를 수행합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> InventoryResult<Self> {
        let builder = Self::defaults()?
            // 파일에서 로드 (선택)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("INVENTORY")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            // 관례적인 단일 환경 변수
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("auth.jwt_secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("server.host", std::env::var("API_HOST").ok())?
            .set_override_option("server.port", std::env::var("API_PORT").ok())?
            .set_override_option("logging.format", std::env::var("LOG_FORMAT").ok())?;

        let mut config: AppConfig = builder.build()?.try_deserialize()?;

        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.cors.allowed_origins = split_list(&origins);
        }

        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> InventoryResult<Self> {
        Self::load("config/default.toml")
    }

    /// 필수 설정 검증.
    ///
    /// JWT 비밀 키와 데이터베이스 URL이 없으면 시작하지 않습니다.
    pub fn validate(&self) -> InventoryResult<()> {
        self.auth.secret()?;
        if self.database.url.trim().is_empty() {
            return Err(InventoryError::Config(
                "DATABASE_URL이 설정되지 않았습니다".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(InventoryError::Config(
                "database.max_connections는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("database.max_connections", 10)?
            .set_default("database.connection_timeout_secs", 10)?
            .set_default("database.seed_sample_data", false)?
            .set_default("logging.level", "inventory_api=info,tower_http=info")?
            .set_default("logging.format", "pretty")
    }
}

/// 쉼표로 구분된 목록 파싱 (빈 항목 제거).
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
