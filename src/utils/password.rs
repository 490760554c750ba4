use crate::error::{AppError, AppResult};
use bcrypt::verify;

/// 校验明文密码与配置中的 bcrypt 哈希是否匹配
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    verify(password, hash).map_err(|e| AppError::InternalError(format!("密码验证失败: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcrypt::{DEFAULT_COST, hash};

    #[test]
    fn test_verify_password() {
        let hashed = hash("Password123", DEFAULT_COST).unwrap();

        assert!(verify_password("Password123", &hashed).unwrap());
        assert!(!verify_password("WrongPassword", &hashed).unwrap());
    }

    #[test]
    fn test_verify_password_bad_hash() {
        assert!(verify_password("whatever", "not-a-bcrypt-hash").is_err());
    }
}
