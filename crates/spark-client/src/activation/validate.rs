use alloc::format;

use crate::activation::descriptor::ComponentDescriptor;
use crate::contract::ServiceContract;
use crate::error::{ClientError, codes};
use crate::model::ClientModel;

/// 校验客户端模型与组件描述符的组合，返回本次创建生效的服务契约。
///
/// # 契约说明（What）
/// 规则按序执行，任一失败即为致命配置错误，先于任何资源操作返回，绝不重试：
/// 1. 契约必须可从描述符或模型二者之一确定，否则 [`codes::CONTRACT_MISSING`]；
/// 2. 模型必须绑定端点，否则 [`codes::ENDPOINT_MISSING`]；
/// 3. 双方均声明契约时必须指向同一类型，否则 [`codes::CONTRACT_MISMATCH`]。
///
/// # 逻辑解析（How）
/// - 生效契约优先取组件声明（覆盖模型自述），双方一致时二者等价。
pub fn validate_client_model(
    descriptor: &ComponentDescriptor,
    model: &dyn ClientModel,
) -> Result<ServiceContract, ClientError> {
    let component_contract = descriptor.contract();
    let model_contract = model.contract();

    let effective = match (component_contract, model_contract) {
        (Some(contract), _) | (None, Some(contract)) => *contract,
        (None, None) => {
            return Err(ClientError::new(
                codes::CONTRACT_MISSING,
                "组件与客户端模型均未声明服务契约，无法确定通道面向的接口",
            ));
        }
    };

    if model.endpoint().is_none() {
        return Err(ClientError::new(
            codes::ENDPOINT_MISSING,
            format!("客户端模型未绑定端点，无法为契约 `{}` 构造通道", effective),
        ));
    }

    if let (Some(component), Some(declared)) = (component_contract, model_contract)
        && component != declared
    {
        return Err(ClientError::new(
            codes::CONTRACT_MISMATCH,
            format!(
                "组件声明契约 `{component}` 与客户端模型契约 `{declared}` 指向不同类型",
            ),
        ));
    }

    Ok(effective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Endpoint;
    use crate::model::StandardClientModel;

    trait OrderService {}
    trait BillingService {}

    #[test]
    fn missing_contract_everywhere_fails_first() {
        let descriptor = ComponentDescriptor::new();
        let model = StandardClientModel::new();
        let error = validate_client_model(&descriptor, &model).unwrap_err();
        assert_eq!(error.code(), codes::CONTRACT_MISSING);
    }

    #[test]
    fn missing_endpoint_fails_before_mismatch_check() {
        let descriptor =
            ComponentDescriptor::new().with_contract(ServiceContract::of::<dyn OrderService>());
        let model =
            StandardClientModel::new().with_contract(ServiceContract::of::<dyn BillingService>());
        let error = validate_client_model(&descriptor, &model).unwrap_err();
        assert_eq!(error.code(), codes::ENDPOINT_MISSING);
    }

    #[test]
    fn diverging_contracts_fail() {
        let descriptor =
            ComponentDescriptor::new().with_contract(ServiceContract::of::<dyn OrderService>());
        let model = StandardClientModel::new()
            .with_contract(ServiceContract::of::<dyn BillingService>())
            .with_endpoint(Endpoint::physical("tcp", "billing", 9000));
        let error = validate_client_model(&descriptor, &model).unwrap_err();
        assert_eq!(error.code(), codes::CONTRACT_MISMATCH);
    }

    #[test]
    fn component_contract_wins_as_effective() {
        let contract = ServiceContract::of::<dyn OrderService>();
        let descriptor = ComponentDescriptor::new().with_contract(contract);
        let model =
            StandardClientModel::new().with_endpoint(Endpoint::physical("tcp", "orders", 9000));
        let effective = validate_client_model(&descriptor, &model).expect("combination is valid");
        assert_eq!(effective, contract);
    }
}
