use std::fmt;

// =========================================================
// 错误状态枚举
// =========================================================

/// 错误状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorStatus {
    /// 传输层失败（fetch 异常、断网）
    Network,
    /// 非 2xx 响应，附带状态码
    Http(u16),
    /// 响应体无法解析或形状不符
    Decode,
    /// 登录/注册被拒绝
    InvalidCredentials,
    /// 表单校验失败（未发出请求）
    InvalidInput,
    /// 当前角色在界面层面不允许此操作（未发出请求）
    Forbidden,
    /// 没有可用的令牌或声明
    Unauthenticated,
}

impl ClientErrorStatus {
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientErrorStatus::Network => "NETWORK_ERROR",
            ClientErrorStatus::Http(_) => "HTTP_ERROR",
            ClientErrorStatus::Decode => "DECODE_ERROR",
            ClientErrorStatus::InvalidCredentials => "INVALID_CREDENTIALS",
            ClientErrorStatus::InvalidInput => "INVALID_INPUT",
            ClientErrorStatus::Forbidden => "FORBIDDEN",
            ClientErrorStatus::Unauthenticated => "UNAUTHENTICATED",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "tasks.list", "auth.sign_in"
    pub operation: String,
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端错误
///
/// - status: 错误类型
/// - message: 面向用户或日志的消息
/// - source: 原始错误（可选）
/// - spans: 操作追踪栈
#[derive(Debug)]
pub struct ClientError {
    pub status: ClientErrorStatus,
    pub message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl ClientError {
    pub fn new(status: ClientErrorStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Network, message)
    }

    pub fn http(status: u16) -> Self {
        Self::new(
            ClientErrorStatus::Http(status),
            format!("Network response was not ok ({})", status),
        )
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Decode, message)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(
            ClientErrorStatus::InvalidCredentials,
            "Los credenciales no son validos en esta sucursal",
        )
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::InvalidInput, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ClientErrorStatus::Forbidden, message)
    }

    pub fn unauthenticated() -> Self {
        Self::new(ClientErrorStatus::Unauthenticated, "No hay una sesión activa")
    }

    // --- Context builders ---

    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.status.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::decode(e.to_string()).with_source(e)
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
