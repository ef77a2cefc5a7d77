pub mod states;

use crate::client::WebSocketClient;
use crate::config::ClientConfig;
use crate::traits::*;
use states::*;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// How long a handler thread waits for a message before re-checking the
/// running flag
const HANDLER_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One sender per route key
type RouteSenders<R> = HashMap<
    <R as MessageRouter>::RouteKey,
    crossbeam_channel::Sender<<R as MessageRouter>::Message>,
>;

/// Route senders plus the handler threads that drain them
type SpawnedRoutes<R> = (RouteSenders<R>, Vec<JoinHandle<()>>);

/// Deferred handler spawning, stored type-erased until `build()`
type HandlerBuilderFn<R> = Box<dyn FnOnce(Arc<AtomicBool>) -> SpawnedRoutes<R> + Send>;

/// Type-state builder for WebSocketClient with routing
///
/// This builder uses Rust's type system to enforce that required
/// fields (URL and router) are set before the client can be built.
pub struct WebSocketClientBuilder<U, Ro, R, M>
where
    U: UrlState,
    Ro: RouterState,
{
    _state: TypeState<U, Ro>,
    _message_type: PhantomData<M>,
    url: Option<String>,
    router: Option<R>,
    // Closure to build handlers - boxed as Any to avoid trait bounds before the router is known
    handler_builder: Option<Box<dyn std::any::Any + Send>>,
    subscriptions: Vec<WsMessage>,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl WebSocketClientBuilder<NoUrl, NoRouter, (), ()> {
    /// Create a new builder instance
    pub fn new() -> Self {
        Self {
            _state: TypeState::new(),
            _message_type: PhantomData,
            url: None,
            router: None,
            handler_builder: None,
            subscriptions: Vec::new(),
            shutdown_flag: None,
        }
    }
}

impl Default for WebSocketClientBuilder<NoUrl, NoRouter, (), ()> {
    fn default() -> Self {
        Self::new()
    }
}

// URL setting
impl<Ro, R, M> WebSocketClientBuilder<NoUrl, Ro, R, M>
where
    Ro: RouterState,
{
    pub fn url(self, url: impl Into<String>) -> WebSocketClientBuilder<HasUrl, Ro, R, M> {
        WebSocketClientBuilder {
            _state: TypeState::new(),
            _message_type: PhantomData,
            url: Some(url.into()),
            router: self.router,
            handler_builder: self.handler_builder,
            subscriptions: self.subscriptions,
            shutdown_flag: self.shutdown_flag,
        }
    }
}

/// Routing builder helper
///
/// Registers one sequential handler per route key.
pub struct RoutingBuilder<R>
where
    R: MessageRouter,
{
    handlers: HashMap<
        R::RouteKey,
        (
            crossbeam_channel::Sender<R::Message>,
            crossbeam_channel::Receiver<R::Message>,
            Box<dyn MessageHandler<R::Message>>,
        ),
    >,
}

impl<R> RoutingBuilder<R>
where
    R: MessageRouter,
{
    fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Add a handler for a specific route key
    pub fn handler<H>(mut self, route_key: R::RouteKey, handler: H) -> Self
    where
        H: MessageHandler<R::Message>,
    {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.handlers.insert(route_key, (sender, receiver, Box::new(handler)));
        self
    }

    fn spawn(self, shutdown_flag: Arc<AtomicBool>) -> SpawnedRoutes<R> {
        let mut senders = HashMap::new();
        let mut handles = Vec::new();

        for (route_key, (sender, receiver, handler)) in self.handlers {
            senders.insert(route_key.clone(), sender);

            let shutdown_flag = Arc::clone(&shutdown_flag);

            let handle = std::thread::spawn(move || {
                let mut handler = handler;

                loop {
                    match receiver.recv_timeout(HANDLER_POLL_INTERVAL) {
                        Ok(message) => {
                            // Messages still queued when the client stops are dropped
                            if !shutdown_flag.load(Ordering::Acquire) {
                                tracing::debug!(
                                    "Shutdown flag detected, dropping queued message for route {:?}",
                                    route_key
                                );
                                break;
                            }
                            if let Err(e) = handler.handle(message) {
                                tracing::error!("Handler error for route {:?}: {}", route_key, e);
                            }
                        }
                        Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                            if !shutdown_flag.load(Ordering::Acquire) {
                                tracing::debug!(
                                    "Shutdown flag detected, handler thread for route {:?} exiting",
                                    route_key
                                );
                                break;
                            }
                        }
                        Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                            tracing::debug!(
                                "Handler channel closed for route {:?}, thread exiting",
                                route_key
                            );
                            break;
                        }
                    }
                }
            });

            handles.push(handle);
        }

        (senders, handles)
    }
}

// Router setting
impl<U> WebSocketClientBuilder<U, NoRouter, (), ()>
where
    U: UrlState,
{
    pub fn router<NewR, F>(
        self,
        router: NewR,
        configure_routing: F,
    ) -> WebSocketClientBuilder<U, HasRouter, NewR, NewR::Message>
    where
        NewR: MessageRouter,
        F: FnOnce(RoutingBuilder<NewR>) -> RoutingBuilder<NewR>,
    {
        let routing = configure_routing(RoutingBuilder::<NewR>::new());

        // Handler threads are only spawned once the running flag is known
        let handler_builder: HandlerBuilderFn<NewR> =
            Box::new(move |shutdown_flag: Arc<AtomicBool>| routing.spawn(shutdown_flag));

        WebSocketClientBuilder {
            _state: TypeState::new(),
            _message_type: PhantomData,
            url: self.url,
            router: Some(router),
            handler_builder: Some(Box::new(handler_builder) as Box<dyn std::any::Any + Send>),
            subscriptions: self.subscriptions,
            shutdown_flag: self.shutdown_flag,
        }
    }
}

// Optional configuration methods
impl<U, R> WebSocketClientBuilder<U, HasRouter, R, R::Message>
where
    U: UrlState,
    R: MessageRouter,
{
    /// Queue a message to send right after every successful handshake
    pub fn subscription(mut self, message: WsMessage) -> Self {
        self.subscriptions.push(message);
        self
    }

    pub fn subscriptions(mut self, messages: Vec<WsMessage>) -> Self {
        self.subscriptions.extend(messages);
        self
    }

    /// Set a custom running flag for coordinated shutdown across components
    ///
    /// By default, the client creates an internal flag. When the flag is set
    /// to `false` the client closes its connection and stops handling messages.
    ///
    /// # Example
    /// ```ignore
    /// let running = Arc::new(AtomicBool::new(true));
    ///
    /// let client = hypersockets::builder()
    ///     .url("wss://api.example.com")
    ///     .router(MyRouter, |routing| routing.handler(Route::Main, MyHandler))
    ///     .shutdown_flag(Arc::clone(&running))
    ///     .build()
    ///     .await?;
    ///
    /// running.store(false, Ordering::Release);
    /// ```
    pub fn shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }
}

// Build method - only available when all required fields are set
impl<R> WebSocketClientBuilder<HasUrl, HasRouter, R, R::Message>
where
    R: MessageRouter,
{
    /// Spawn the handler threads and the I/O task
    ///
    /// Must be called from within a tokio runtime. The returned client is in
    /// `Connecting` state; the handshake completes in the background.
    pub async fn build(self) -> Result<WebSocketClient<R, R::Message>> {
        let url = self
            .url
            .ok_or_else(|| HyperSocketError::Configuration("URL must be set".into()))?;
        let router = self
            .router
            .ok_or_else(|| HyperSocketError::Configuration("Router must be set".into()))?;

        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(HyperSocketError::Configuration(format!(
                "Unsupported URL scheme: {}",
                url
            )));
        }

        let shutdown_flag = self
            .shutdown_flag
            .unwrap_or_else(|| Arc::new(AtomicBool::new(true)));

        let (route_senders, handler_handles) = match self.handler_builder {
            Some(builder_any) => {
                let builder = builder_any.downcast::<HandlerBuilderFn<R>>().map_err(|_| {
                    HyperSocketError::Configuration("Handler builder type mismatch".into())
                })?;
                (*builder)(Arc::clone(&shutdown_flag))
            }
            None => (HashMap::new(), Vec::new()),
        };

        let config = ClientConfig {
            url,
            router: Arc::new(router),
            route_senders,
            subscriptions: self.subscriptions,
            shutdown_flag,
        };

        let mut client = WebSocketClient::new(config).await?;
        client.handler_handles = handler_handles;

        Ok(client)
    }
}
