//! 通道建造策略子系统：按客户端模型变体类型解析策略，并缓存派生结果。
//!
//! # 模块职责（Why）
//! - `strategy`：定义泛型策略契约与对象安全桥接，承载“一个变体一种建法”的扩展点；
//! - `registry`：维护变体类型到策略对象的注册表，注册期即捕获重复冲突；
//! - `cache`：保证每个变体类型的策略派生在进程生命周期内至多执行一次。

mod cache;
mod registry;
mod strategy;

pub use cache::{CreatorFactory, CreatorFactoryCache};
pub use registry::{BuilderRegistrationError, BuilderRegistry};
pub use strategy::{ChannelBuilder, CreatorBundle, DynChannelBuilder, TypedChannelBuilderAdapter};
