//! Checkout: turn the cart and the customer's contact details into an order.
//!
//! [`CheckoutFlow`] owns the form state and drives the submission protocol:
//! validate the form, refuse an empty cart, send `(product_id, quantity)`
//! pairs to the [`OrderGateway`], and on success clear the cart and hand back
//! a [`Redirect`] to the confirmation view.
//!
//! There is no automatic retry and no idempotency key. A manual resubmit after
//! a failed attempt creates a new, independent order if it succeeds.

mod flow;
mod form;
mod gateway;

pub use flow::{
    CONFIRMATION_DELAY, CheckoutError, CheckoutFlow, CheckoutState, MSG_EMPTY_CART, MSG_FIX_FORM,
    MSG_ORDER_CREATED, MSG_SUBMIT_FAILED, Redirect,
};
pub use form::{
    CheckoutField, CheckoutForm, CustomerDetails, FieldErrors, MIN_ADDRESS_CHARS, MIN_NAME_CHARS,
    UnknownField,
};
pub use gateway::{GatewayError, Notifier, OrderGateway};
