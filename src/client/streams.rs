use crate::client::ThreeCommasClient;
use crate::core::errors::ThreeCommasError;
use crate::core::kernel::codec::subscribe_frame;
use crate::core::kernel::ws::MessageHandler;
use crate::core::kernel::RestClient;
use crate::core::types::Channel;

/// Streaming subscriptions. All channels share the session's single
/// connection; `unsubscribe` tears all of them down at once.
impl<R: RestClient> ThreeCommasClient<R> {
    pub fn subscribe_smart_trades(
        &self,
        handler: Option<MessageHandler>,
    ) -> Result<(), ThreeCommasError> {
        self.subscribe_channel(Channel::SmartTrades, handler)
    }

    pub fn subscribe_deals(
        &self,
        handler: Option<MessageHandler>,
    ) -> Result<(), ThreeCommasError> {
        self.subscribe_channel(Channel::Deals, handler)
    }

    fn subscribe_channel(
        &self,
        channel: Channel,
        handler: Option<MessageHandler>,
    ) -> Result<(), ThreeCommasError> {
        let frame = subscribe_frame(
            channel,
            self.config.api_key(),
            self.config.api_key_type,
            self.config.secret(),
        )?;
        self.stream.subscribe(frame, handler);
        Ok(())
    }

    /// Close the streaming connection, ending every active subscription.
    pub fn unsubscribe(&self) {
        self.stream.unsubscribe();
    }
}
