//! Checkout contract
//!
//! Validates contribution amounts, builds the payment session request and maps
//! provider results onto the wheel's gate. The payment provider itself sits
//! behind [`PaymentSessionService`]; no HTTP client ships with this crate.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::CheckoutError;
use crate::wheel::Wheel;

pub const CURRENCY: &str = "usd";
pub const PRODUCT_NAME: &str = "Voluntary Gift";
/// Smallest accepted contribution, in major units
pub const MIN_AMOUNT: f64 = 1.0;
/// Placeholder the provider replaces with the session id on redirect
pub const SESSION_ID_TEMPLATE: &str = "{CHECKOUT_SESSION_ID}";

/// Amount as posted by the browser: a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AmountInput::Number(n) => Some(*n),
            AmountInput::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub amount: Option<AmountInput>,
}

/// Major units to minor units (cents)
pub fn to_minor_units(amount: f64) -> u64 {
    (amount * 100.0).round() as u64
}

/// Validate an amount and convert it to minor units
pub fn validate_amount(amount: Option<&AmountInput>) -> Result<u64, CheckoutError> {
    let value = amount
        .and_then(AmountInput::as_f64)
        .ok_or(CheckoutError::InvalidAmount)?;
    if !value.is_finite() || value < MIN_AMOUNT {
        return Err(CheckoutError::InvalidAmount);
    }
    Ok(to_minor_units(value))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductData {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceData {
    pub currency: String,
    pub product_data: ProductData,
    pub unit_amount: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub price_data: PriceData,
    pub quantity: u32,
}

/// Embedded one-off payment session request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionParams {
    pub mode: String,
    pub ui_mode: String,
    pub line_items: Vec<LineItem>,
    pub return_url: String,
}

impl SessionParams {
    /// Single "Voluntary Gift" line item for `unit_amount` cents
    pub fn gift(unit_amount: u64, origin: &str) -> Self {
        Self {
            mode: "payment".to_string(),
            ui_mode: "embedded".to_string(),
            line_items: vec![LineItem {
                price_data: PriceData {
                    currency: CURRENCY.to_string(),
                    product_data: ProductData {
                        name: PRODUCT_NAME.to_string(),
                    },
                    unit_amount,
                },
                quantity: 1,
            }],
            return_url: return_url(origin),
        }
    }

    pub fn unit_amount(&self) -> u64 {
        self.line_items
            .iter()
            .map(|item| item.price_data.unit_amount * u64::from(item.quantity))
            .sum()
    }
}

pub fn return_url(origin: &str) -> String {
    format!(
        "{}/?session_id={}",
        origin.trim_end_matches('/'),
        SESSION_ID_TEMPLATE
    )
}

/// Payment provider: creates a session and returns its opaque client token
pub trait PaymentSessionService {
    fn create_session(&self, params: &SessionParams) -> Result<String, CheckoutError>;
}

/// Successful checkout response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&CheckoutError> for ErrorBody {
    fn from(err: &CheckoutError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// Validate, then ask the provider for a session
pub fn create_checkout(
    method: &str,
    body: &str,
    origin: &str,
    service: &dyn PaymentSessionService,
) -> Result<CheckoutResponse, CheckoutError> {
    if !method.eq_ignore_ascii_case("POST") {
        return Err(CheckoutError::MethodNotAllowed);
    }

    let request: CheckoutRequest =
        serde_json::from_str(body).map_err(|_| CheckoutError::InvalidAmount)?;
    let unit_amount = validate_amount(request.amount.as_ref()).inspect_err(|_| {
        log::warn!("Rejected checkout amount {:?}", request.amount);
    })?;

    let params = SessionParams::gift(unit_amount, origin);
    let client_secret = service.create_session(&params).map_err(|e| match e {
        CheckoutError::Provider(_) => e,
        other => CheckoutError::Provider(other.to_string()),
    })?;
    log::info!("Checkout session created for {} minor units", unit_amount);

    Ok(CheckoutResponse { client_secret })
}

/// Endpoint-shaped wrapper: status code and JSON body
pub fn handle_checkout(
    method: &str,
    body: &str,
    origin: &str,
    service: &dyn PaymentSessionService,
) -> (u16, Value) {
    match create_checkout(method, body, origin, service) {
        Ok(response) => (200, json!(response)),
        Err(err) => {
            if let CheckoutError::Provider(msg) = &err {
                log::error!("Payment provider error: {}", msg);
            }
            (err.status_code(), json!(ErrorBody::from(&err)))
        }
    }
}

/// How a payment attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentResult {
    Succeeded,
    Failed,
    TimedOut,
    Cancelled,
}

/// Apply a payment result to a wheel. Only success unlocks. Returns whether
/// `unlock()` was called.
pub fn settle_payment(result: PaymentResult, wheel: &mut Wheel) -> bool {
    match result {
        PaymentResult::Succeeded => {
            wheel.unlock();
            true
        }
        other => {
            log::warn!("Payment did not complete ({:?}); wheel stays as is", other);
            false
        }
    }
}
