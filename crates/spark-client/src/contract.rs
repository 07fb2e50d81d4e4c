use core::any::{self, TypeId};
use core::fmt;

/// `ServiceContract` 以运行时类型标签标识一个服务契约。
///
/// # 设计背景（Why）
/// - 激活层需要在组件描述符与客户端模型之间比对“是否指向同一契约”，并在诊断信息中报出契约名；
/// - 以 `TypeId` 作为身份、以 `type_name` 作为展示名，避免在 `no_std` 环境引入任何反射式注册表。
///
/// # 契约说明（What）
/// - [`ServiceContract::of`] 接受任意 `'static` 类型（含 `dyn Trait`），同一类型的两次构造产生相等的契约；
/// - 相等性仅由 `TypeId` 决定，`name` 只用于日志与错误消息；
/// - **后置条件**：值可廉价复制（`Copy`）并跨线程共享。
///
/// # 风险提示（Trade-offs）
/// - `type_name` 的具体文本由编译器决定，仅适合人读，不得作为序列化标识或比较依据。
#[derive(Clone, Copy, Debug)]
pub struct ServiceContract {
    type_id: TypeId,
    name: &'static str,
}

impl ServiceContract {
    /// 以契约类型构造标签，通常传入服务 Trait 对象类型，例如 `ServiceContract::of::<dyn OrderService>()`。
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    /// 返回契约类型标识。
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// 返回契约的人类可读名称。
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ServiceContract {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ServiceContract {}

impl fmt::Display for ServiceContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait OrderService {}
    trait BillingService {}

    #[test]
    fn identity_follows_type_not_name() {
        assert_eq!(
            ServiceContract::of::<dyn OrderService>(),
            ServiceContract::of::<dyn OrderService>()
        );
        assert_ne!(
            ServiceContract::of::<dyn OrderService>(),
            ServiceContract::of::<dyn BillingService>()
        );
    }

    #[test]
    fn name_is_human_readable() {
        let contract = ServiceContract::of::<dyn OrderService>();
        assert!(contract.name().contains("OrderService"));
    }
}
