use crate::error::{AppError, AppResult};
use crate::models::{AdminLoginRequest, AdminLoginResponse};
use crate::utils::{JwtService, verify_password};

/// 管理员登录。凭证校验能力注入自配置 (bcrypt 哈希), 代码中不出现明文密码。
#[derive(Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    admin_password_hash: String,
}

impl AuthService {
    pub fn new(jwt_service: JwtService, admin_password_hash: String) -> Self {
        Self {
            jwt_service,
            admin_password_hash,
        }
    }

    pub fn login(&self, req: AdminLoginRequest) -> AppResult<AdminLoginResponse> {
        if !verify_password(&req.password, &self.admin_password_hash)? {
            return Err(AppError::AuthError("密码错误".to_string()));
        }

        let access_token = self.jwt_service.generate_access_token("admin")?;
        Ok(AdminLoginResponse {
            access_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcrypt::{DEFAULT_COST, hash};

    fn service() -> AuthService {
        let hash = hash("Hunter2026", DEFAULT_COST).unwrap();
        AuthService::new(JwtService::new("unit-test-secret", 3600), hash)
    }

    #[test]
    fn test_login_with_correct_password() {
        let result = service()
            .login(AdminLoginRequest {
                password: "Hunter2026".to_string(),
            })
            .unwrap();
        assert!(!result.access_token.is_empty());
        assert_eq!(result.expires_in, 3600);
    }

    #[test]
    fn test_login_with_wrong_password() {
        let err = service()
            .login(AdminLoginRequest {
                password: "wrong".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }
}
