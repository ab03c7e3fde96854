use std::convert::Infallible;
use futures::SinkExt;
use futures::channel::mpsc::Sender;
use futures::future::pending;
use iced::subscription::{self, Subscription};
use log::warn;

use crate::device::controller::NfcController;
use crate::device::types::ConnectionStatus;

async fn forward_status(controller: NfcController, mut output: Sender<ConnectionStatus>) -> Infallible {
    let mut receiver = controller.subscribe();

    loop {
        if receiver.changed().await.is_err() {
            warn!("NFC status channel closed");
            return pending().await;
        }

        let status = *receiver.borrow_and_update();
        if output.send(status).await.is_err() {
            warn!("GUI stopped listening to NFC status");
            return pending().await;
        }
    }
}

/// Every status transition of `controller`, as a GUI subscription.
pub fn status_subscription(controller: NfcController) -> Subscription<ConnectionStatus> {
    struct StatusWatch;

    // note: subscription::channel expects the future to never resolve (Infallible)
    subscription::channel(
        std::any::TypeId::of::<StatusWatch>(),
        16,
        move |output| forward_status(controller, output),
    )
}
