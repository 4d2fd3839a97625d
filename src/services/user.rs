use super::UserService;
use crate::error::ClientResult;
use crate::request::HttpClient;
use crate::token::TokenStore;
use taskflow_shared::User;

impl<C: HttpClient, S: TokenStore> UserService<'_, C, S> {
    /// 邮箱是用户的第二查找键；作为路径段发送前先做百分号编码
    pub async fn get_by_email(&self, email: &str) -> ClientResult<Option<User>> {
        let segment = urlencoding::encode(email.trim());
        self.api
            .get_one_at::<User>(&format!("users/email/{}", segment))
            .await
            .map_err(|e| e.in_op_with("users.get_by_email", email))
    }
}
