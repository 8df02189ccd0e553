//! The checkout state machine.
//!
//! ```text
//! Editing ──submit──▶ Submitting ──ok──▶ Succeeded
//!    ▲                    │
//!    └──────error─────────┘
//! ```

use std::time::Duration;

use thiserror::Error;
use tracing::{info, instrument, warn};

use super::form::{CheckoutField, CheckoutForm, FieldErrors};
use super::gateway::{GatewayError, Notifier, OrderGateway};
use crate::cart::{CartStorage, CartStore};
use crate::order::CreateOrderRequest;
use crate::types::OrderId;

/// How long the success view stays up before moving to the confirmation view.
pub const CONFIRMATION_DELAY: Duration = Duration::from_secs(2);

pub const MSG_FIX_FORM: &str = "Please fix the form errors";
pub const MSG_EMPTY_CART: &str = "Your cart is empty";
pub const MSG_SUBMIT_FAILED: &str = "Could not create order. Please try again.";
pub const MSG_ORDER_CREATED: &str = "Order created successfully!";

/// Where the flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    /// The form accepts edits and submissions.
    Editing,
    /// An order-creation request is in flight.
    Submitting,
    /// Terminal: the order exists and the cart has been cleared.
    Succeeded { order_id: OrderId },
}

/// Instruction to show the confirmation view for an order after a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub order_id: OrderId,
    pub after: Duration,
}

impl Redirect {
    /// Path of the confirmation view.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/orders/{}", self.order_id)
    }
}

/// Why a submit attempt did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// One or more fields failed validation. No request was sent.
    #[error("invalid checkout form: {0}")]
    Invalid(FieldErrors),

    /// The cart has no items. No request was sent.
    #[error("cart is empty")]
    EmptyCart,

    /// The persisted cart has not been read yet. Nothing changed.
    #[error("cart has not finished loading")]
    CartLoading,

    /// A request is already in flight.
    #[error("a submission is already in progress")]
    Busy,

    /// The order was already placed; this flow is finished.
    #[error("order {0} was already placed")]
    AlreadyPlaced(OrderId),

    /// The order service refused or could not be reached.
    #[error("order submission failed: {0}")]
    Submission(#[from] GatewayError),
}

/// Turns the cart plus customer details into an order.
pub struct CheckoutFlow<N> {
    form: CheckoutForm,
    errors: FieldErrors,
    state: CheckoutState,
    notifier: N,
}

impl<N: Notifier> CheckoutFlow<N> {
    /// Start a checkout with a blank form.
    pub fn new(notifier: N) -> Self {
        Self {
            form: CheckoutForm::default(),
            errors: FieldErrors::default(),
            state: CheckoutState::Editing,
            notifier,
        }
    }

    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    /// True while a request is in flight; the submit control should be disabled.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self.state, CheckoutState::Submitting)
    }

    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self.state, CheckoutState::Succeeded { .. })
    }

    /// Update one field and clear its error. Ignored unless editing.
    pub fn set_field(&mut self, field: CheckoutField, value: impl Into<String>) {
        if self.state != CheckoutState::Editing {
            return;
        }
        self.form.set(field, value);
        self.errors.clear(field);
    }

    /// Attempt to place the order.
    ///
    /// On success the cart is cleared, the form reset and a [`Redirect`] to
    /// the confirmation view returned. On any failure the cart and the form
    /// are left untouched and the flow is back in [`CheckoutState::Editing`].
    /// Dropping the returned future mid-request counts as a failure without a
    /// notification: the flow is editable again and the cart is kept.
    ///
    /// # Errors
    ///
    /// See [`CheckoutError`]. `Invalid`, `EmptyCart` and `CartLoading` are
    /// raised before any request is made.
    #[instrument(skip_all, fields(lines = cart.items().len()))]
    pub async fn submit<S, G>(
        &mut self,
        cart: &mut CartStore<S>,
        gateway: &G,
    ) -> Result<Redirect, CheckoutError>
    where
        S: CartStorage,
        G: OrderGateway,
    {
        match self.state {
            CheckoutState::Editing => {}
            CheckoutState::Submitting => return Err(CheckoutError::Busy),
            CheckoutState::Succeeded { order_id } => {
                return Err(CheckoutError::AlreadyPlaced(order_id));
            }
        }

        if cart.is_loading() {
            return Err(CheckoutError::CartLoading);
        }

        let details = match self.form.validate() {
            Ok(details) => details,
            Err(errors) => {
                self.errors = errors.clone();
                self.notifier.error(MSG_FIX_FORM);
                return Err(CheckoutError::Invalid(errors));
            }
        };

        if cart.is_empty() {
            self.notifier.error(MSG_EMPTY_CART);
            return Err(CheckoutError::EmptyCart);
        }

        let request = CreateOrderRequest::from_cart(&details, cart.items());

        self.state = CheckoutState::Submitting;
        let result = {
            let in_flight = InFlight(&mut self.state);
            let result = gateway.create_order(&request).await;
            drop(in_flight);
            result
        };

        match result {
            Ok(order) => {
                info!(order_id = %order.id, "order created");
                cart.clear_cart();
                self.form = CheckoutForm::default();
                self.errors = FieldErrors::default();
                self.state = CheckoutState::Succeeded { order_id: order.id };
                self.notifier.success(MSG_ORDER_CREATED);
                Ok(Redirect {
                    order_id: order.id,
                    after: CONFIRMATION_DELAY,
                })
            }
            Err(e) => {
                warn!(error = %e, "order submission failed");
                self.state = CheckoutState::Editing;
                self.notifier.error(MSG_SUBMIT_FAILED);
                Err(CheckoutError::Submission(e))
            }
        }
    }
}

/// Returns the flow to [`CheckoutState::Editing`] if a submission is dropped
/// before the gateway answers.
struct InFlight<'a>(&'a mut CheckoutState);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if *self.0 == CheckoutState::Submitting {
            *self.0 = CheckoutState::Editing;
        }
    }
}
