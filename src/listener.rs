//! Consumer notification hooks
//!
//! The driver holds at most one listener and calls it synchronously from
//! `connect`, `poll`, `disconnected` and `incompatible`, on the caller's
//! thread, in the order the events occur.

use crate::sample::DecodedSample;

/// Receives identity, data and error notifications from the driver
pub trait Listener {
    /// Identity byte read during initialization
    ///
    /// Fires once per connection, whether or not the identity matched.
    fn on_device_id(&mut self, device_id: u8);

    /// One decoded sample, once per successful poll
    fn on_data(&mut self, sample: DecodedSample);

    /// Non-fatal anomaly, such as an unexpected identity byte
    fn on_error(&mut self, message: &str);

    /// The bus connection was lost
    fn on_disconnected(&mut self) {}

    /// The attached hardware cannot be used
    fn on_incompatible(&mut self) {}
}

impl<L: Listener + ?Sized> Listener for &mut L {
    fn on_device_id(&mut self, device_id: u8) {
        (**self).on_device_id(device_id);
    }

    fn on_data(&mut self, sample: DecodedSample) {
        (**self).on_data(sample);
    }

    fn on_error(&mut self, message: &str) {
        (**self).on_error(message);
    }

    fn on_disconnected(&mut self) {
        (**self).on_disconnected();
    }

    fn on_incompatible(&mut self) {
        (**self).on_incompatible();
    }
}
