use alloc::borrow::Cow;

use crate::Error;

/// 日志级别枚举，保留激活层实际使用的子集。
///
/// # 契约说明（What）
/// - `Info` 表示业务常规事件，`Warn` 表示潜在风险，`Error` 表示故障，`Debug` 用于装配细节。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogSeverity {
    Debug,
    Info,
    Warn,
    Error,
}

/// 结构化日志的键值属性。
///
/// # 设计背景（Why）
/// - 激活层只记录契约名、端点等低基数文本字段，值类型收敛为 `Cow<str>` 即可覆盖全部场景。
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue<'a> {
    pub key: Cow<'a, str>,
    pub value: Cow<'a, str>,
}

impl<'a> KeyValue<'a> {
    /// 构建新的属性键值对。
    pub fn new(key: impl Into<Cow<'a, str>>, value: impl Into<Cow<'a, str>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// 结构化字段集合别名。
pub type LogField<'a> = &'a [KeyValue<'a>];

/// 单条结构化日志记录。
///
/// # 契约说明（What）
/// - `message` 使用 `Cow<'a, str>`，既支持静态字符串也支持动态构建的消息；
/// - `error` 允许携带实现 [`Error`] 的对象，用于根因追溯；
/// - **前置条件**：`attributes` 必须在 [`Logger::log`] 返回前保持有效。
#[derive(Debug)]
pub struct LogRecord<'a> {
    pub message: Cow<'a, str>,
    pub severity: LogSeverity,
    pub error: Option<&'a dyn Error>,
    pub attributes: LogField<'a>,
}

impl<'a> LogRecord<'a> {
    /// 构建新的日志记录，仅持有引用，不进行任何复制。
    pub fn new(
        message: impl Into<Cow<'a, str>>,
        severity: LogSeverity,
        error: Option<&'a dyn Error>,
        attributes: LogField<'a>,
    ) -> Self {
        Self {
            message: message.into(),
            severity,
            error,
            attributes,
        }
    }
}

/// 日志接口的核心契约。
///
/// # 设计背景（Why）
/// - 统一激活层对宿主日志实现的依赖，允许对接 `tracing`、OpenTelemetry Logger 或自研后端；
///   核心自身不绑定任何具体日志生态。
///
/// # 逻辑解析（How）
/// - `log` 为唯一必需方法；`debug`/`info`/`warn`/`error` 便捷方法内部构造 [`LogRecord`]
///   再调用 `log`，确保所有路径共享相同逻辑。
///
/// # 契约说明（What）
/// - **后置条件**：实现应尽量保证非阻塞，必要时可将日志异步写入后台线程。
pub trait Logger: Send + Sync + 'static {
    /// 提交结构化日志。
    fn log(&self, record: &LogRecord<'_>);

    /// 输出带字段的 DEBUG 日志。
    fn debug(&self, message: &str, attributes: LogField<'_>) {
        self.log(&LogRecord::new(
            message,
            LogSeverity::Debug,
            None,
            attributes,
        ));
    }

    /// 输出带字段的 INFO 日志。
    fn info(&self, message: &str, attributes: LogField<'_>) {
        self.log(&LogRecord::new(message, LogSeverity::Info, None, attributes));
    }

    /// 输出带字段的 WARN 日志。
    fn warn(&self, message: &str, attributes: LogField<'_>) {
        self.log(&LogRecord::new(message, LogSeverity::Warn, None, attributes));
    }

    /// 输出带错误与字段的 ERROR 日志。
    fn error(&self, message: &str, error: Option<&dyn Error>, attributes: LogField<'_>) {
        self.log(&LogRecord::new(
            message,
            LogSeverity::Error,
            error,
            attributes,
        ));
    }
}

/// 空实现：丢弃所有日志，供未注入日志后端的场景与测试使用。
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _record: &LogRecord<'_>) {}
}
