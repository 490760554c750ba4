use crate::config::GoogleSheetsConfig;
use crate::error::{AppError, AppResult};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

const OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// 服务账号 JWT 声明 (RFC 7523, 用于换取访问令牌)
#[derive(Debug, Serialize)]
struct ServiceAccountClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Google Sheets REST 客户端。
/// 访问令牌由服务账号私钥签发的 JWT 换取, 缓存到过期前 60 秒。
pub struct GoogleSheetsClient {
    client: Client,
    config: GoogleSheetsConfig,
    token: Option<String>,
    token_expires_at: i64,
}

impl GoogleSheetsClient {
    pub fn new(config: GoogleSheetsConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            token: None,
            token_expires_at: 0,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    async fn ensure_token(&mut self) -> AppResult<String> {
        if !self.is_configured() {
            return Err(AppError::ExternalApiError(
                "Google Sheets 未配置, 同步功能停用".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        if let Some(token) = &self.token
            && now < self.token_expires_at - 60
        {
            return Ok(token.clone());
        }

        let claims = ServiceAccountClaims {
            iss: &self.config.service_account_email,
            scope: SHEETS_SCOPE,
            aud: OAUTH_TOKEN_URL,
            iat: now,
            exp: now + 3600,
        };
        let key = EncodingKey::from_rsa_pem(self.config.private_key.as_bytes())
            .map_err(|e| AppError::ExternalApiError(format!("服务账号私钥无效: {e}")))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &key)?;

        let response = self
            .client
            .post(OAUTH_TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "获取 Google 访问令牌失败: HTTP {}",
                response.status()
            )));
        }

        let token: TokenResponse = response.json().await?;
        self.token_expires_at = now + token.expires_in;
        self.token = Some(token.access_token.clone());
        log::info!("Google Sheets access token refreshed");

        Ok(token.access_token)
    }

    /// 试算表标题与第一个工作表名称
    pub async fn spreadsheet_info(&mut self) -> AppResult<(String, String)> {
        let token = self.ensure_token().await?;
        let url = format!(
            "{SHEETS_API_BASE}/{}?fields=properties.title,sheets.properties.title",
            self.config.spreadsheet_id
        );

        let response = self.client.get(&url).bearer_auth(&token).send().await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "读取试算表信息失败: HTTP {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        let title = body["properties"]["title"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        let sheet_name = body["sheets"][0]["properties"]["title"]
            .as_str()
            .unwrap_or("Sheet1")
            .to_string();

        Ok((title, sheet_name))
    }

    /// 清空一个区域 (如 "工作表1!A:D")
    pub async fn clear_range(&mut self, range: &str) -> AppResult<()> {
        let token = self.ensure_token().await?;
        let url = format!(
            "{SHEETS_API_BASE}/{}/values/{range}:clear",
            self.config.spreadsheet_id
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&json!({}))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "清空试算表区域 {range} 失败: HTTP {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// 以 RAW 模式覆写一个区域
    pub async fn update_rows(&mut self, range: &str, rows: &[Vec<String>]) -> AppResult<()> {
        let token = self.ensure_token().await?;
        let url = format!(
            "{SHEETS_API_BASE}/{}/values/{range}?valueInputOption=RAW",
            self.config.spreadsheet_id
        );

        let response = self
            .client
            .put(&url)
            .bearer_auth(&token)
            .json(&json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": rows,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalApiError(format!(
                "写入试算表区域 {range} 失败: HTTP {}",
                response.status()
            )));
        }

        Ok(())
    }
}
