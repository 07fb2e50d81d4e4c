#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![allow(clippy::result_large_err)]
#![doc = "spark-client: 客户端通道激活与代理装配核心。"]
#![doc = ""]
#![doc = "== 定位 =="]
#![doc = "- **Why**：将抽象的服务契约转化为“可打开的通信通道 + 面向调用方的代理”，并把按变体类型缓存建造策略、默认/覆盖配置解析、资源负担追踪这三件易错的事集中到一处；"]
#![doc = "- **What**：提供 `ChannelActivator` 编排入口、`BuilderRegistry`/`CreatorFactoryCache` 策略派生设施与 `Burden` 资源账本；代理生成、传输序列化、容器生命周期与声明式端点装载均为外部协作者；"]
#![doc = "- **How**：依赖 `no_std + alloc` 环境，并发原语统一使用 `spin`，错误遵循稳定错误码约定，可观测性通过对象安全的 `Logger` 契约注入。"]

#[cfg(not(feature = "alloc"))]
compile_error!(
    "spark-client 依赖堆分配能力：请启用默认特性或通过 `--features alloc` 显式打开该功能。"
);

extern crate alloc;

pub mod activation;
pub mod builder;
pub mod burden;
pub mod channel;
pub mod contract;
pub mod endpoint;
pub mod error;
pub mod extensions;
pub mod model;
pub mod observability;
/// 测试桩命名空间，集中暴露官方维护的内存通道、记录型代理工厂等实现，供集成测试与示例复用。
///
/// # 设计背景（Why）
/// - 统一维护常见桩对象，避免在各测试文件中重复定义内存通道与记录器；
/// - 当激活契约演进时，通过单点更新保证所有测试同步适配。
pub mod test_stubs;

pub use activation::{
    BoxProxy, ChannelActivator, ComponentDescriptor, CreationContext, ProxyFactory, ProxyRequest,
};
pub use builder::{
    BuilderRegistrationError, BuilderRegistry, ChannelBuilder, CreatorBundle, CreatorFactory,
    CreatorFactoryCache, DynChannelBuilder, TypedChannelBuilderAdapter,
};
pub use burden::{Burden, BurdenResource};
pub use channel::{BoxChannel, Channel, ChannelCreator, ChannelHolder, ChannelState};
pub use contract::ServiceContract;
pub use endpoint::{Endpoint, EndpointBuilder, EndpointKind, EndpointParams};
pub use error::{ClientError, ErrorCategory, ErrorCause, codes};
pub use extensions::Extensions;
pub use model::{ClientModel, StandardClientModel};
pub use observability::{KeyValue, LogField, LogRecord, LogSeverity, Logger, NoopLogger};

use alloc::boxed::Box;
use core::fmt;

/// `spark-client` 中所有错误必须实现的 `no_std` 基础 Trait。
///
/// # 设计背景（Why）
/// - `std::error::Error` 在 `no_std` 环境中不可用，因此需要一个对象安全、与平台无关的错误抽象来串联底层错误链。
/// - 该 Trait 作为所有错误类型的最小公共接口，帮助激活层在 `alloc` 场景下完成跨模块错误传递。
///
/// # 逻辑解析（How）
/// - 约束实现者提供 `Debug` 与 `Display`，便于日志与可观测性收集。
/// - 通过 `source` 方法递归返回链路上的上游错误，保持与 `std::error::Error::source` 一致的语义。
///
/// # 契约说明（What）
/// - **前置条件**：实现类型若需跨线程传递，应额外满足 `Send + Sync + 'static`（参见 [`ErrorCause`]）。
/// - **后置条件**：`source` 返回的引用生命周期受限于 `self`，以防悬垂引用。
///
/// # 设计取舍与风险（Trade-offs）
/// - 未强加 `Send + Sync` 约束，避免对单线程调用方造成多余负担；需要线程安全时请使用 [`ErrorCause`] 类型别名。
pub trait Error: fmt::Debug + fmt::Display {
    /// 返回当前错误的上游来源。
    fn source(&self) -> Option<&(dyn Error + 'static)>;
}

impl<E> Error for Box<E>
where
    E: Error + ?Sized,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        (**self).source()
    }
}

/// 统一的结果别名，默认错误类型为 [`ClientError`]。
pub type Result<T, E = ClientError> = core::result::Result<T, E>;
