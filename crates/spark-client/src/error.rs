use crate::Error;
use alloc::{borrow::Cow, boxed::Box};
use core::fmt;

/// `ErrorCause` 封装底层原因，保持 `Send + Sync` 以方便跨线程传递。
pub type ErrorCause = Box<dyn Error + Send + Sync + 'static>;

/// `ClientError` 表示激活层对外暴露的稳定错误域，是所有可观察故障的最终形态。
///
/// # 设计背景（Why）
/// - 校验、策略派生、通道打开与代理装配在不同层次产生的故障需要合流为统一的错误码，
///   以便日志与告警系统执行精确的自动化治理。
/// - 激活核心需兼容 `no_std + alloc` 场景，因此不依赖 `std::error::Error`，而是复用 crate 内部的轻量抽象。
///
/// # 逻辑解析（How）
/// - 结构体以 Builder 风格方法叠加底层原因，并通过 `source()` 暴露完整链路。
/// - 错误码 `code` 始终为 `'static` 字符串，承载稳定语义；`message` 面向排障人员。
/// - [`ClientError::category`] 按错误码归类，供实例化边界执行“配置/通信直通、其余包装”的翻译策略。
///
/// # 契约说明（What）
/// - **前置条件**：调用方必须使用 [`codes`] 模块或遵循 `<域>.<语义>` 约定的自定义码值。
/// - **返回值**：构造函数返回拥有所有权的 `ClientError`，可安全跨线程移动（`Send + Sync + 'static`）。
/// - **后置条件**：除非显式调用 `with_cause`，错误不会包含底层原因。
///
/// # 设计取舍与风险（Trade-offs）
/// - 采用 `Cow` 保存消息，静态文案零分配，动态文案仅一次堆分配。
/// - 不内建重试语义：本层所有故障均为结构性问题，重试属于传输层职责。
#[derive(Debug)]
pub struct ClientError {
    code: &'static str,
    message: Cow<'static, str>,
    cause: Option<ErrorCause>,
}

impl ClientError {
    /// 使用稳定错误码与消息构造激活错误。
    pub fn new(code: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
            cause: None,
        }
    }

    /// 附带底层原因并返回新的错误，形成 `激活 → 协作者` 的错误链。
    pub fn with_cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// 获取稳定错误码。
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// 获取人类可读的错误描述。
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 获取底层原因。
    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }

    /// 按错误码返回错误类别。
    ///
    /// # 契约说明（What）
    /// - [`codes`] 中列出的码值映射到确定类别；
    /// - 任何未知码值（通常来自代理工厂等协作者）归入 [`ErrorCategory::Uncategorized`]，
    ///   由实例化边界统一包装为 `activation.failed`。
    pub fn category(&self) -> ErrorCategory {
        match self.code {
            codes::CONTRACT_MISSING
            | codes::MODEL_MISSING
            | codes::ENDPOINT_MISSING
            | codes::CONTRACT_MISMATCH
            | codes::MODEL_TYPE_MISMATCH => ErrorCategory::Configuration,
            codes::CREATOR_UNAVAILABLE | codes::CHANNEL_OPEN => ErrorCategory::Communication,
            codes::ACTIVATION_FAILED => ErrorCategory::Activation,
            _ => ErrorCategory::Uncategorized,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_ref()
            .map(|boxed| boxed.as_ref() as &(dyn Error + 'static))
    }
}

/// 错误类别，驱动实例化边界的传播策略。
///
/// # 契约说明（What）
/// - `Configuration`：契约缺失/不匹配、端点缺失等装配期错误，立即失败且不重试。
/// - `Communication`：策略无法派生创建函数或通道打开失败，指向可达性或注册缺陷。
/// - `Activation`：已经过实例化边界包装的激活失败。
/// - `Uncategorized`：协作者自有码值，将在实例化边界被包装一次。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Communication,
    Activation,
    Uncategorized,
}

/// 激活层的稳定错误码清单。
///
/// # 设计背景（Why）
/// - 错误码采用 `<域>.<语义>` 的命名约定，与日志聚合、告警阈值匹配等自动化流程对齐。
///
/// # 契约说明（What）
/// - 所有码值为 `'static` 字符串常量，语义一经发布不得变更；新增语义必须新增码值。
pub mod codes {
    /// 组件与客户端模型均未声明服务契约。
    pub const CONTRACT_MISSING: &str = "activation.contract_missing";
    /// 无请求级覆盖时，组件未注册默认客户端模型。
    pub const MODEL_MISSING: &str = "activation.model_missing";
    /// 客户端模型缺少端点，无法用于通道构造。
    pub const ENDPOINT_MISSING: &str = "activation.endpoint_missing";
    /// 组件声明契约与客户端模型契约指向不同类型。
    pub const CONTRACT_MISMATCH: &str = "activation.contract_mismatch";
    /// 策略收到的模型变体与注册时声明的类型不一致。
    pub const MODEL_TYPE_MISMATCH: &str = "activation.model_type_mismatch";
    /// 策略未能派生出通道创建函数，指向不可达端点或注册缺陷。
    pub const CREATOR_UNAVAILABLE: &str = "channel.creator_unavailable";
    /// 通道打开失败。
    pub const CHANNEL_OPEN: &str = "channel.open_failed";
    /// 实例化过程中出现未预期故障，已按契约名包装。
    pub const ACTIVATION_FAILED: &str = "activation.failed";
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[derive(Debug)]
    struct StubCause;

    impl fmt::Display for StubCause {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("stub cause")
        }
    }

    impl Error for StubCause {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            None
        }
    }

    #[test]
    fn display_prefixes_code() {
        let error = ClientError::new(codes::ENDPOINT_MISSING, "endpoint absent");
        assert_eq!(
            error.to_string(),
            "[activation.endpoint_missing] endpoint absent"
        );
    }

    #[test]
    fn cause_chain_is_reachable_via_source() {
        let error = ClientError::new(codes::ACTIVATION_FAILED, "wrapped").with_cause(StubCause);
        let source = error.source().expect("cause should be linked");
        assert_eq!(source.to_string(), "stub cause");
    }

    #[test]
    fn categories_follow_codes() {
        for code in [
            codes::CONTRACT_MISSING,
            codes::MODEL_MISSING,
            codes::ENDPOINT_MISSING,
            codes::CONTRACT_MISMATCH,
            codes::MODEL_TYPE_MISMATCH,
        ] {
            assert_eq!(
                ClientError::new(code, "x").category(),
                ErrorCategory::Configuration
            );
        }
        for code in [codes::CREATOR_UNAVAILABLE, codes::CHANNEL_OPEN] {
            assert_eq!(
                ClientError::new(code, "x").category(),
                ErrorCategory::Communication
            );
        }
        assert_eq!(
            ClientError::new(codes::ACTIVATION_FAILED, "x").category(),
            ErrorCategory::Activation
        );
        assert_eq!(
            ClientError::new("proxy.generation_failed", "x").category(),
            ErrorCategory::Uncategorized
        );
    }
}
