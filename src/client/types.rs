use serde::{Deserialize, Serialize};

/// Parameters for moving funds between accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferParams {
    pub currency: String,
    pub amount: String,
    pub from_account_id: i64,
    pub to_account_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferHistoryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyParams {
    pub pair: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketCurrencyParams {
    pub pair: String,
    pub market_code: String,
}

/// Listing parameters for bots. The defaults match the remote listing
/// behavior: 50 newest bots first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotsParams {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    pub sort_by: String,
    pub sort_direction: String,
}

impl Default for BotsParams {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: None,
            account_id: None,
            scope: None,
            strategy: None,
            sort_by: "created_at".to_string(),
            sort_direction: "desc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotsStatsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotOptionalParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_events: Option<bool>,
}

/// Listing parameters for deals. Defaults: 50 newest deals first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealsParams {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub order: String,
    pub order_direction: String,
}

impl Default for DealsParams {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: None,
            account_id: None,
            bot_id: None,
            scope: None,
            order: "created_at".to_string(),
            order_direction: "desc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmartTradeHistoryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// An order quantity, carried as a string to avoid float drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitsParams {
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceParams {
    pub value: String,
}

/// Entry order of a smart trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionParams {
    #[serde(rename = "type")]
    pub position_type: String,
    pub units: UnitsParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceParams>,
    pub order_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeProfitStep {
    pub order_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceParams>,
    pub volume: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TakeProfitParams {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub steps: Vec<TakeProfitStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopLossParams {
    pub enabled: bool,
    pub order_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakeven: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeverageParams {
    pub enabled: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub leverage_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

/// Parameters for creating a smart trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartTradeParams {
    pub account_id: i64,
    pub pair: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instant: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage: Option<LeverageParams>,
    pub position: PositionParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<TakeProfitParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<StopLossParams>,
}

/// Parameters for adding funds to or reducing funds on a smart trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundParams {
    pub order_type: String,
    pub units: UnitsParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceParams>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted() {
        let params = BotsParams::default();
        let value = serde_json::to_value(&params).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.get("limit").unwrap(), 50);
        assert_eq!(object.get("sort_by").unwrap(), "created_at");
        assert!(!object.contains_key("account_id"));
        assert!(!object.contains_key("scope"));
    }

    #[test]
    fn position_type_renames_on_the_wire() {
        let position = PositionParams {
            position_type: "buy".to_string(),
            units: UnitsParams {
                value: "0.01".to_string(),
            },
            price: None,
            order_type: "market".to_string(),
        };

        let value = serde_json::to_value(&position).unwrap();
        assert_eq!(value["type"], "buy");
        assert!(value.get("position_type").is_none());
        assert!(value.get("price").is_none());
    }
}
