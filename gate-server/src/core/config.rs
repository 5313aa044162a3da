use chrono_tz::Tz;

/// 服务器配置 - 门禁节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | FACILITY_TIMEZONE | America/La_Paz | 设施时区（日历日判断） |
/// | GATE_LOCATION | Main Entrance | 告警中记录的位置名 |
/// | PAIRING_TTL_MINUTES | 5 | 配对码有效期（分钟） |
/// | ENVIRONMENT | development | 运行环境 |
///
/// # 示例
///
/// ```ignore
/// FACILITY_TIMEZONE=Europe/Madrid HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 设施时区：会籍过期和当日活动都按这个时区的日历日判断
    pub timezone: Tz,
    /// 告警里记录的闸机位置名
    pub gate_location: String,
    /// 配对码有效期（分钟）
    pub pairing_ttl_minutes: i64,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值；无法解析的时区回退到默认值。
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            timezone: std::env::var("FACILITY_TIMEZONE")
                .ok()
                .and_then(|tz| tz.parse().ok())
                .unwrap_or(chrono_tz::America::La_Paz),
            gate_location: std::env::var("GATE_LOCATION")
                .unwrap_or_else(|_| "Main Entrance".into()),
            pairing_ttl_minutes: std::env::var("PAIRING_TTL_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(http_port: u16, timezone: Tz) -> Self {
        let mut config = Self::from_env();
        config.http_port = http_port;
        config.timezone = timezone;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
