use alloc::{collections::BTreeMap, string::String};
use core::time::Duration;

use serde::{Deserialize, Serialize};

/// 端点分类。
///
/// # 设计动机（Why）
/// - 区分逻辑发现地址与物理直连地址，便于上层按 `EndpointKind` 选择不同的解析流程；
/// - 激活层本身不做解析，分类信息由策略或外部服务发现协作者消费。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointKind {
    /// 逻辑地址（如 `srv://orders`）。
    Logical,
    /// 物理地址（如 `tcp://10.0.0.8:8080`）。
    Physical,
}

/// `Endpoint` 将协议方案、访问主体与可选路径统一表达。
///
/// # 设计背景（Why）
/// - 客户端模型需要一个跨协议一致的“服务在哪里”描述，scheme/authority/path 三元组是业界通用抽象；
/// - 引入 `kind` 与参数表，方便策略按端点语义注入额外行为（寻址、握手参数等）。
///
/// # 契约说明（What）
/// - `scheme`：协议或访问方式（如 `tcp`、`quic`、`mem`）。
/// - `authority`：主机、服务名或控制面注册名。
/// - `port`：可选端口；逻辑地址允许缺省，由策略或服务发现补全。
/// - `resource`：可选路径/资源名，兼容 HTTP/WS/RPC 多种模式。
/// - `params`：额外参数，遵循 [`EndpointParams`] 约定。
/// - **前置条件**：`scheme` 与 `authority` 必须为非空字符串。
/// - **后置条件**：调用者可通过访问器读取所有字段；`params` 默认为空表。
///
/// # 风险提示（Trade-offs）
/// - 未内建 URI 语法校验，保持 `no_std` 轻量；若需严格校验，请在构造前完成。
/// - 派生 serde 序列化以支撑外部的声明式端点装载，但本层不负责任何配置文件解析。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    scheme: String,
    authority: String,
    port: Option<u16>,
    resource: Option<String>,
    params: EndpointParams,
    kind: EndpointKind,
}

impl Endpoint {
    /// 构建物理端点，通常用于直连。
    pub fn physical(scheme: impl Into<String>, authority: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            authority: authority.into(),
            port: Some(port),
            resource: None,
            params: EndpointParams::new(),
            kind: EndpointKind::Physical,
        }
    }

    /// 构建逻辑端点，常见于服务发现。
    pub fn logical(scheme: impl Into<String>, authority: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            authority: authority.into(),
            port: None,
            resource: None,
            params: EndpointParams::new(),
            kind: EndpointKind::Logical,
        }
    }

    /// 自定义构建流程，供高级场景使用。
    pub fn builder(scheme: impl Into<String>, authority: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder::new(scheme.into(), authority.into())
    }

    /// 返回协议方案。
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// 返回主体（主机名/服务名）。
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// 返回端口（若存在）。
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// 返回资源路径或 Topic。
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// 返回参数表。
    pub fn params(&self) -> &EndpointParams {
        &self.params
    }

    /// 返回端点类型。
    pub fn kind(&self) -> EndpointKind {
        self.kind
    }
}

/// `EndpointBuilder` 以链式 API 构建复杂端点。
///
/// # 设计理由（Why）
/// - 与常见的 Channel Builder 实践一致，使用 Builder 提供易扩展的配置入口，新增字段不破坏现有调用。
#[derive(Clone, Debug)]
pub struct EndpointBuilder {
    inner: Endpoint,
}

impl EndpointBuilder {
    fn new(scheme: String, authority: String) -> Self {
        Self {
            inner: Endpoint {
                scheme,
                authority,
                port: None,
                resource: None,
                params: EndpointParams::new(),
                kind: EndpointKind::Logical,
            },
        }
    }

    /// 指定端口并切换为物理端点。
    pub fn with_port(mut self, port: u16) -> Self {
        self.inner.port = Some(port);
        self.inner.kind = EndpointKind::Physical;
        self
    }

    /// 指定资源路径。
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.inner.resource = Some(resource.into());
        self
    }

    /// 覆盖端点类型。
    pub fn with_kind(mut self, kind: EndpointKind) -> Self {
        self.inner.kind = kind;
        self
    }

    /// 设置参数表（覆盖）。
    pub fn with_params(mut self, params: EndpointParams) -> Self {
        self.inner.params = params;
        self
    }

    /// 完成构造，返回端点。
    pub fn finish(self) -> Endpoint {
        self.inner
    }
}

/// `EndpointParams` 表达端点附带的键值参数。
///
/// # 设计背景（Why）
/// - 将可选项集中在统一的键值表，避免接口碎片化；策略可按键名约定读取握手超时、缓冲大小等参数。
///
/// # 契约说明（What）
/// - 所有键与值均为 UTF-8 字符串，键名建议使用 `snake_case`。
/// - 提供若干类型安全的访问器，帮助调用方减少样板解析代码。
/// - **后置条件**：解析成功时返回 `Some(value)`，失败时返回 `None` 并保持原值不变。
///
/// # 设计取舍与风险（Trade-offs）
/// - 使用 `BTreeMap` 保证遍历顺序稳定，利于配置 diff；牺牲部分插入性能。
/// - 未内建 schema 校验，保持轻量；若需强约束，可结合外部验证器。
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EndpointParams(BTreeMap<String, String>);

impl EndpointParams {
    /// 创建空参数表。
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或覆盖键值。
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// 合并另一个参数表，右侧优先。
    pub fn merge(&mut self, other: &EndpointParams) -> &mut Self {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
        self
    }

    /// 以不可变引用形式暴露内部映射，供调试或一次性遍历。
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    /// 读取字符串值。
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|value| value.as_str())
    }

    /// 解析布尔值，接受 `true/false`（大小写敏感）。
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_str(key)
            .and_then(|value| value.parse::<bool>().ok())
    }

    /// 解析无符号整数，常用于端口、并发上限。
    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get_str(key)
            .and_then(|value| value.parse::<u64>().ok())
    }

    /// 按毫秒解析持续时间。
    pub fn get_duration(&self, key: &str) -> Option<Duration> {
        self.get_u64(key).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_switches_kind_on_port() {
        let endpoint = Endpoint::builder("tcp", "orders.internal")
            .with_port(8080)
            .with_resource("/v1")
            .finish();
        assert_eq!(endpoint.kind(), EndpointKind::Physical);
        assert_eq!(endpoint.port(), Some(8080));
        assert_eq!(endpoint.resource(), Some("/v1"));
    }

    #[test]
    fn params_typed_getters() {
        let mut params = EndpointParams::new();
        params.insert("open_timeout_ms", "1500");
        params.insert("nodelay", "true");
        assert_eq!(
            params.get_duration("open_timeout_ms"),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(params.get_bool("nodelay"), Some(true));
        assert_eq!(params.get_u64("missing"), None);
    }

    #[test]
    fn merge_prefers_right_hand_side() {
        let mut base = EndpointParams::new();
        base.insert("retries", "1");
        let mut overlay = EndpointParams::new();
        overlay.insert("retries", "3");
        base.merge(&overlay);
        assert_eq!(base.get_u64("retries"), Some(3));
    }
}
