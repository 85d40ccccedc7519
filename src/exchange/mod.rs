mod action_builder;
mod actions;
mod builder;
mod cancel;
mod exchange_client;
mod exchange_responses;
mod modify;
mod order;

pub use action_builder::ActionBuilder;
pub use actions::{
    ApproveAgent, ApproveBuilderFee, BulkCancel, BulkCancelCloid, BulkModify, BulkOrder,
    CustomUserSignedAction, Grouping, SpotSend, UpdateIsolatedMargin, UpdateLeverage,
    UsdClassTransfer, UsdSend, UserSignedAction, UserSignedKind, VaultTransfer, Withdraw3,
};
pub use builder::BuilderInfo;
pub use cancel::{CancelRequest, CancelRequestCloid, ClientCancelRequest, ClientCancelRequestCloid};
pub use exchange_client::{Action, ExchangeClient, ExchangePayload, L1Action};
pub use exchange_responses::{
    ExchangeDataStatus, ExchangeDataStatuses, ExchangeResponse, ExchangeResponseStatus,
    FilledOrder, RestingOrder,
};
pub use modify::{ClientModifyRequest, ClientOrderId, ModifyRequest, OrderId};
pub use order::{
    ClientLimit, ClientOrder, ClientOrderRequest, ClientTrigger, Limit, MarketOrderParams, Order,
    OrderRequest, OrderTypeSpec, Tif, Tpsl, Trigger,
};
