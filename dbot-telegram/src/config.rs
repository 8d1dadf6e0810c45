//! 框架最小配置：token、API URL、webhook secret、轮询间隔、日志路径。
//! 与外部交互：从环境变量 BOT_TOKEN、TELEGRAM_API_URL、WEBHOOK_SECRET、POLL_INTERVAL_MS、LOG_FILE 加载。

use anyhow::Result;
use std::env;
use std::time::Duration;

/// 未设置 POLL_INTERVAL_MS 时两次轮询之间的间隔（毫秒）。
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Telegram Bot 客户端配置。
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    /// webhook 推送时平台在 X-Telegram-Bot-Api-Secret-Token 头中携带的值
    pub webhook_secret: Option<String>,
    pub poll_interval_ms: u64,
    pub log_file: Option<String>,
}

impl TelegramConfig {
    /// 从环境变量加载：BOT_TOKEN 必填，其余可选。
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// 从环境变量加载；若传入 `token` 则覆盖 BOT_TOKEN（此时 BOT_TOKEN 可不设置）。
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL").ok();
        let webhook_secret = env::var("WEBHOOK_SECRET").ok().filter(|s| !s.is_empty());
        let poll_interval_ms = match env::var("POLL_INTERVAL_MS") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("POLL_INTERVAL_MS is not a number: {}", raw))?,
            Err(_) => DEFAULT_POLL_INTERVAL_MS,
        };
        let log_file = env::var("LOG_FILE").ok();

        let config = Self {
            bot_token,
            telegram_api_url,
            webhook_secret,
            poll_interval_ms,
            log_file,
        };
        config.validate()?;
        Ok(config)
    }

    /// 使用给定 token 构造，其余为默认值。
    pub fn with_token(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            telegram_api_url: None,
            webhook_secret: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            log_file: None,
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.telegram_api_url = Some(url.into());
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// 校验：token 非空；若设置了 TELEGRAM_API_URL 则必须是合法 URL。
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!("TELEGRAM_API_URL is set but not a valid URL: {}", url_str);
            }
        }
        Ok(())
    }
}
