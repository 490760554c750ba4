use crate::error::{AppError, AppResult};
use regex::Regex;

/// 验证日期格式 (YYYY-MM-DD), 任何读取之前先行拒绝
pub fn validate_date(date: &str) -> AppResult<()> {
    let date_regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();

    if !date_regex.is_match(date) {
        return Err(AppError::ValidationError(
            "日期格式错误, 应为 YYYY-MM-DD".to_string(),
        ));
    }

    // 形如 2026-13-99 的日期也要拒绝
    if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(AppError::ValidationError(format!("无效日期: {date}")));
    }

    Ok(())
}

/// 验证会员编号为正整数
pub fn validate_member_id(id: i64) -> AppResult<()> {
    if id <= 0 {
        return Err(AppError::ValidationError("会员编号必须是正整数".to_string()));
    }
    Ok(())
}

/// 验证非空字符串长度上限 (trim 后)
pub fn validate_name(name: &str, what: &str, max: usize) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{what}不能为空")));
    }
    if trimmed.chars().count() > max {
        return Err(AppError::ValidationError(format!(
            "{what}不能超过 {max} 个字符"
        )));
    }
    Ok(trimmed.to_string())
}

/// 验证可选字符串长度上限, 空白串按 None 处理
pub fn validate_optional_text(
    text: Option<String>,
    what: &str,
    max: usize,
) -> AppResult<Option<String>> {
    match text {
        None => Ok(None),
        Some(t) => {
            let trimmed = t.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if trimmed.chars().count() > max {
                return Err(AppError::ValidationError(format!(
                    "{what}不能超过 {max} 个字符"
                )));
            }
            Ok(Some(trimmed.to_string()))
        }
    }
}
