use alloc::{boxed::Box, sync::Arc};
use core::fmt;

use crate::burden::Burden;
use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::extensions::Extensions;

/// 通道生命周期状态机。
///
/// # 契约说明（What）
/// - `Initialized`：资源分配完成但尚未投入 I/O。
/// - `Active`：打开完毕，可承载调用。
/// - `Closed`：终态，任何后续操作均应被忽略或立即失败。
///
/// # 设计取舍（Trade-offs）
/// - 激活层只关心“用前必须打开”这一条时序约束，故保持最小状态集合；
///   更细粒度的协议状态应通过扩展属性暴露，避免破坏共识。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[non_exhaustive]
pub enum ChannelState {
    /// 初始态：已构造但尚未打开。
    Initialized,
    /// 活跃态：已打开，可收发。
    Active,
    /// 终止态：所有资源已释放。
    Closed,
}

/// `Channel` 是一条绑定到具体端点、可打开的通信连接。
///
/// # 设计背景（Why）
/// - 底层传输的首次使用若发生在未打开的通道上，请求会在传输内部排队等待隐式打开，
///   时序难以观测；激活层因此要求通道显式暴露 `open`，并在创建包装中立即调用。
///
/// # 契约说明（What）
/// - `open`：将通道推进到 `Active`；对已打开的通道应幂等返回 `Ok`；失败时返回
///   携带通信类错误码的 [`ClientError`]。
/// - `close`：释放底层资源并推进到 `Closed`；可重复调用。
/// - `extensions`：跨组件共享的元数据表，激活层用它为通道附着 [`Burden`]。
/// - `remote_endpoint`：通道实际绑定的端点，供诊断与测试断言使用。
///
/// # 线程安全说明
/// - `Send + Sync + 'static`：通道可能被封装进 `Arc`/`Box` 后跨线程移动，生命周期覆盖整个会话。
pub trait Channel: Send + Sync + 'static {
    /// 返回当前状态。
    fn state(&self) -> ChannelState;

    /// 打开通道；已处于 `Active` 时幂等成功。
    fn open(&self) -> Result<(), ClientError>;

    /// 关闭通道并释放资源。
    fn close(&self);

    /// 返回通道绑定的端点。
    fn remote_endpoint(&self) -> &Endpoint;

    /// 访问通道的扩展元数据表。
    fn extensions(&self) -> &Extensions;
}

/// 对象安全的通道别名。
pub type BoxChannel = Box<dyn Channel>;

/// `ChannelCreator` 封装零参创建函数：每次调用产出一条全新通道。
///
/// # 设计背景（Why）
/// - 策略派生的创建逻辑需要被激活器包装（先打开、再挂负担）并在默认路径上跨请求复用，
///   因此以 `Arc` 闭包承载，克隆即共享同一份策略绑定。
///
/// # 契约说明（What）
/// - 创建函数与一个确定的（模型变体、端点）组合绑定，绝不跨端点共享；
/// - **后置条件**：`create` 每次返回独立的新通道实例，失败时传播策略或传输层错误。
#[derive(Clone)]
pub struct ChannelCreator {
    inner: Arc<dyn Fn() -> Result<BoxChannel, ClientError> + Send + Sync>,
}

impl ChannelCreator {
    /// 以创建闭包构造。
    pub fn new<F>(create: F) -> Self
    where
        F: Fn() -> Result<BoxChannel, ClientError> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(create),
        }
    }

    /// 调用创建函数，产出一条新通道。
    pub fn create(&self) -> Result<BoxChannel, ClientError> {
        (self.inner)()
    }

    /// 判断两个创建器是否共享同一份底层闭包，供复用断言使用。
    pub fn ptr_eq(&self, other: &ChannelCreator) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ChannelCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelCreator").finish_non_exhaustive()
    }
}

/// `ChannelHolder` 将创建函数与其负担成对打包，交给代理生成协作者。
///
/// # 契约说明（What）
/// - `obtain_channel`：调用内部创建函数，返回已按激活器包装语义打开并挂好负担的通道；
/// - `burden`：该创建路径关联的资源账本，代理层可据此登记额外资源。
#[derive(Clone, Debug)]
pub struct ChannelHolder {
    creator: ChannelCreator,
    burden: Arc<Burden>,
}

impl ChannelHolder {
    /// 以创建函数与负担构造持有者。
    pub fn new(creator: ChannelCreator, burden: Arc<Burden>) -> Self {
        Self { creator, burden }
    }

    /// 产出一条新通道。
    pub fn obtain_channel(&self) -> Result<BoxChannel, ClientError> {
        self.creator.create()
    }

    /// 访问创建函数。
    pub fn creator(&self) -> &ChannelCreator {
        &self.creator
    }

    /// 访问负担账本。
    pub fn burden(&self) -> &Arc<Burden> {
        &self.burden
    }
}
