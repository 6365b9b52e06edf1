// Native emoji rendering round trip
// The renderer process draws a glyph with the system font and replies with a PNG data URL.
// Identical glyphs share a single in-flight request, and the result stays memoized.

use crate::models::render::{NativeEmojiReply, RenderCommand};
use anyhow::{Context, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};

/// Outbound side of the renderer connection
pub trait RenderChannel: Send + Sync {
    fn send(&self, command: &RenderCommand) -> Result<()>;

    /// Whether a live rendering surface exists to answer requests
    fn has_surface(&self) -> bool;
}

/// Forwards render commands to whatever task drives the renderer process
pub struct MpscRenderChannel {
    tx: mpsc::UnboundedSender<RenderCommand>,
}

impl MpscRenderChannel {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RenderCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl RenderChannel for MpscRenderChannel {
    fn send(&self, command: &RenderCommand) -> Result<()> {
        self.tx
            .send(command.clone())
            .map_err(|_| anyhow::anyhow!("renderer channel is closed"))
    }

    fn has_surface(&self) -> bool {
        !self.tx.is_closed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The command never left the process
    SendFailed(String),
    /// The pending request was dropped before a reply arrived
    BridgeClosed,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::SendFailed(reason) => write!(f, "failed to send render command: {}", reason),
            RenderError::BridgeClosed => write!(f, "render request dropped before a reply arrived"),
        }
    }
}

impl std::error::Error for RenderError {}

type RenderResult = Result<String, RenderError>;
type RenderFuture = Shared<BoxFuture<'static, RenderResult>>;

#[derive(Default)]
struct BridgeState {
    // glyph -> shared result, kept after resolution
    renders: HashMap<String, RenderFuture>,
    // glyph -> one-shot listener waiting for the renderer's reply
    listeners: HashMap<String, oneshot::Sender<RenderResult>>,
}

pub struct NativeRenderBridge {
    channel: Arc<dyn RenderChannel>,
    state: Mutex<BridgeState>,
}

impl NativeRenderBridge {
    pub fn new(channel: Arc<dyn RenderChannel>) -> Self {
        Self {
            channel,
            state: Mutex::new(BridgeState::default()),
        }
    }

    pub fn has_surface(&self) -> bool {
        self.channel.has_surface()
    }

    /// Renders `glyph` to a PNG data URL.
    ///
    /// There is no timeout: if the renderer never answers, the returned future never resolves.
    pub async fn render(&self, glyph: &str) -> Result<String, RenderError> {
        self.shared_render(glyph)?.await
    }

    fn shared_render(&self, glyph: &str) -> Result<RenderFuture, RenderError> {
        let future = {
            let mut state = self.lock_state();
            if let Some(existing) = state.renders.get(glyph) {
                return Ok(existing.clone());
            }

            let (tx, rx) = oneshot::channel::<RenderResult>();
            let future = async move { rx.await.unwrap_or(Err(RenderError::BridgeClosed)) }
                .boxed()
                .shared();

            state.listeners.insert(glyph.to_string(), tx);
            state.renders.insert(glyph.to_string(), future.clone());
            future
        };

        // The lock is released here so a renderer that replies inline can call `deliver`
        debug!("[NativeRender] Requesting render of {:?}", glyph);

        if let Err(e) = self.channel.send(&RenderCommand::render_native_emoji(glyph)) {
            warn!("[NativeRender] Failed to send render command: {}", e);
            let error = RenderError::SendFailed(e.to_string());
            let listener = {
                let mut state = self.lock_state();
                state.renders.remove(glyph);
                state.listeners.remove(glyph)
            };
            // Anyone who joined in the meantime sees the same failure
            if let Some(tx) = listener {
                let _ = tx.send(Err(error.clone()));
            }
            return Err(error);
        }

        Ok(future)
    }

    /// Inbound hook for renderer replies. Replies nobody is waiting for are dropped.
    pub fn deliver(&self, reply: NativeEmojiReply) {
        let listener = self.lock_state().listeners.remove(&reply.emoji);

        match listener {
            Some(tx) => {
                debug!("[NativeRender] Received render of {:?}", reply.emoji);
                let _ = tx.send(Ok(reply.data_url));
            }
            None => debug!(
                "[NativeRender] Ignoring reply for {:?}, no pending request",
                reply.emoji
            ),
        }
    }

    /// Same as [`deliver`](Self::deliver) for a raw `{"emoji", "dataUrl"}` message
    pub fn deliver_json(&self, message: &str) -> Result<()> {
        let reply: NativeEmojiReply =
            serde_json::from_str(message).context("Failed to parse native emoji reply")?;
        self.deliver(reply);
        Ok(())
    }

    /// Requests still waiting for a reply
    pub fn pending_count(&self) -> usize {
        self.lock_state().listeners.len()
    }

    fn lock_state(&self) -> MutexGuard<'_, BridgeState> {
        // Map updates cannot leave the state half-written, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(emoji: &str, data_url: &str) -> NativeEmojiReply {
        NativeEmojiReply {
            emoji: emoji.to_string(),
            data_url: data_url.to_string(),
        }
    }

    fn bridge() -> (Arc<NativeRenderBridge>, mpsc::UnboundedReceiver<RenderCommand>) {
        let (channel, commands) = MpscRenderChannel::new();
        (Arc::new(NativeRenderBridge::new(Arc::new(channel))), commands)
    }

    #[tokio::test]
    async fn test_same_glyph_shares_one_request() {
        let (bridge, mut commands) = bridge();

        let first = tokio::spawn({
            let bridge = bridge.clone();
            async move { bridge.render("😀").await }
        });
        let second = tokio::spawn({
            let bridge = bridge.clone();
            async move { bridge.render("😀").await }
        });

        let command = commands.recv().await.unwrap();
        assert_eq!(command, RenderCommand::render_native_emoji("😀"));

        bridge.deliver(reply("😀", "data:image/png;base64,AAAA"));

        assert_eq!(first.await.unwrap().unwrap(), "data:image/png;base64,AAAA");
        assert_eq!(second.await.unwrap().unwrap(), "data:image/png;base64,AAAA");
        assert!(commands.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolved_render_is_memoized() {
        let (bridge, mut commands) = bridge();

        let pending = tokio::spawn({
            let bridge = bridge.clone();
            async move { bridge.render("🔥").await }
        });
        commands.recv().await.unwrap();
        bridge.deliver(reply("🔥", "data:fire"));
        pending.await.unwrap().unwrap();

        assert_eq!(bridge.render("🔥").await.unwrap(), "data:fire");
        assert!(commands.try_recv().is_err());
        assert_eq!(bridge.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_different_glyphs_resolve_out_of_order() {
        let (bridge, mut commands) = bridge();

        let grin = tokio::spawn({
            let bridge = bridge.clone();
            async move { bridge.render("😁").await }
        });
        let joy = tokio::spawn({
            let bridge = bridge.clone();
            async move { bridge.render("😂").await }
        });

        commands.recv().await.unwrap();
        commands.recv().await.unwrap();
        assert_eq!(bridge.pending_count(), 2);

        bridge.deliver(reply("😂", "data:joy"));
        assert_eq!(joy.await.unwrap().unwrap(), "data:joy");
        assert_eq!(bridge.pending_count(), 1);

        bridge.deliver(reply("😁", "data:grin"));
        assert_eq!(grin.await.unwrap().unwrap(), "data:grin");
    }

    #[tokio::test]
    async fn test_unmatched_reply_is_ignored() {
        let (bridge, mut commands) = bridge();

        let pending = tokio::spawn({
            let bridge = bridge.clone();
            async move { bridge.render("🙂").await }
        });
        commands.recv().await.unwrap();

        bridge.deliver(reply("🙃", "data:wrong"));
        assert_eq!(bridge.pending_count(), 1);

        bridge
            .deliver_json(r#"{"emoji":"🙂","dataUrl":"data:right"}"#)
            .unwrap();
        assert_eq!(pending.await.unwrap().unwrap(), "data:right");
    }

    #[tokio::test]
    async fn test_send_failure_is_not_memoized() {
        let (channel, commands) = MpscRenderChannel::new();
        drop(commands);
        let bridge = NativeRenderBridge::new(Arc::new(channel));

        assert!(!bridge.has_surface());
        assert!(matches!(
            bridge.render("😀").await,
            Err(RenderError::SendFailed(_))
        ));
        assert_eq!(bridge.pending_count(), 0);
        assert!(bridge.lock_state().renders.is_empty());
    }

    /// Joins the in-flight render of the same glyph from inside `send`, then fails
    #[derive(Default)]
    struct RejectingChannel {
        bridge: std::sync::OnceLock<std::sync::Weak<NativeRenderBridge>>,
        joined: Mutex<Option<RenderFuture>>,
    }

    impl RenderChannel for RejectingChannel {
        fn send(&self, command: &RenderCommand) -> Result<()> {
            if let Some(bridge) = self.bridge.get().and_then(std::sync::Weak::upgrade) {
                let joined = bridge.shared_render(&command.payload).unwrap();
                *self.joined.lock().unwrap() = Some(joined);
            }
            anyhow::bail!("renderer window is gone")
        }

        fn has_surface(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_send_failure_reaches_joined_callers() {
        let channel = Arc::new(RejectingChannel::default());
        let bridge = Arc::new(NativeRenderBridge::new(channel.clone()));
        channel.bridge.set(Arc::downgrade(&bridge)).unwrap();

        assert!(matches!(
            bridge.render("😀").await,
            Err(RenderError::SendFailed(_))
        ));

        let joined = channel.joined.lock().unwrap().take().unwrap();
        assert!(matches!(joined.await, Err(RenderError::SendFailed(_))));
        assert_eq!(bridge.pending_count(), 0);
        assert!(bridge.lock_state().renders.is_empty());
    }

    #[test]
    fn test_malformed_reply_is_an_error() {
        let (bridge, _commands) = bridge();
        assert!(bridge.deliver_json("{\"emoji\": 1}").is_err());
    }
}
