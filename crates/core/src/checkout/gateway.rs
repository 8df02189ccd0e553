//! Ports the checkout flow depends on.

use std::future::Future;

use thiserror::Error;

use crate::order::{CreateOrderRequest, Order};

/// Why an order-creation call failed.
///
/// The checkout flow treats every variant the same way; the distinction only
/// matters for logging.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The service answered with a non-success status.
    #[error("order service rejected the request ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// The request never produced a response (connection, timeout).
    #[error("order service unreachable: {0}")]
    Transport(String),

    /// A success response whose body could not be understood.
    #[error("invalid order service response: {0}")]
    InvalidResponse(String),
}

/// The order-creation service.
pub trait OrderGateway {
    /// Create an order. The call is a single atomic create: it either
    /// returns the created order or fails as a whole.
    fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> impl Future<Output = Result<Order, GatewayError>>;
}

/// Transient user-facing notifications (toasts).
pub trait Notifier {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn success(&self, message: &str) {
        (**self).success(message);
    }

    fn error(&self, message: &str) {
        (**self).error(message);
    }
}
