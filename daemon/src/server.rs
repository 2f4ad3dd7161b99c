use anyhow::Result;
use axum::{extract::Request, Router};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
};
use modelhub_core::Config;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{TcpListener, TcpStream};
use tokio_io_timeout::TimeoutStream;
use tower::Service;

use crate::api;
use crate::state::AppState;

pub async fn run_server(config: Config) -> Result<()> {
    let state = Arc::new(AppState::new(&config)?);

    if config.uses_sample_key() {
        tracing::warn!(
            "Using the built-in sample API key; set auth.api_key or MODELHUB_API_KEY"
        );
    }
    state.log_inventory().await;

    let app = api::app(state);
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Starting model server on {}", addr);

    serve(listener, app, config.idle_timeout(), shutdown_signal()).await
}

/// Accept connections until `shutdown` resolves, serving each one on its own
/// task.
///
/// A connection is dropped once `idle_timeout` passes with no bytes moving in
/// either direction. A download the client keeps reading is never cut off,
/// however long it runs; a single write that blocks for `idle_timeout` fails.
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    idle_timeout: Duration,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    tokio::pin!(shutdown);

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                    continue;
                }
            },
            _ = &mut shutdown => {
                tracing::info!("Shutting down model server");
                break;
            }
        };

        let app = app.clone();
        tokio::spawn(async move {
            let mut stream = TimeoutStream::new(stream);
            stream.set_write_timeout(Some(idle_timeout));
            let activity = Arc::new(Activity::new());
            let io = TokioIo::new(TrackedStream {
                inner: Box::pin(stream),
                activity: activity.clone(),
            });

            let service = hyper::service::service_fn(move |request: Request<Incoming>| {
                app.clone().call(request)
            });

            let builder = auto::Builder::new(TokioExecutor::new());
            let connection = builder.serve_connection(io, service);
            tokio::pin!(connection);

            tokio::select! {
                result = connection.as_mut() => {
                    if let Err(e) = result {
                        tracing::debug!(%peer, "Connection closed: {}", e);
                    }
                }
                _ = activity.idle_for(idle_timeout) => {
                    tracing::debug!(%peer, "Closing idle connection");
                }
            }
        });
    }

    Ok(())
}

/// Time of the last byte read from or written to a connection
struct Activity {
    started: Instant,
    last_ms: AtomicU64,
}

impl Activity {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            last_ms: AtomicU64::new(0),
        }
    }

    fn touch(&self) {
        let now = self.started.elapsed().as_millis() as u64;
        self.last_ms.store(now, Ordering::Relaxed);
    }

    fn quiet(&self) -> Duration {
        let last = Duration::from_millis(self.last_ms.load(Ordering::Relaxed));
        self.started.elapsed().saturating_sub(last)
    }

    /// Resolves once no progress has been made for `limit`
    async fn idle_for(&self, limit: Duration) {
        loop {
            let quiet = self.quiet();
            if quiet >= limit {
                return;
            }
            tokio::time::sleep(limit - quiet).await;
        }
    }
}

/// Connection stream that records progress in both directions
struct TrackedStream {
    inner: Pin<Box<TimeoutStream<TcpStream>>>,
    activity: Arc<Activity>,
}

impl AsyncRead for TrackedStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let before = buf.filled().len();
        let poll = self.inner.as_mut().poll_read(cx, buf);
        if matches!(poll, Poll::Ready(Ok(()))) && buf.filled().len() > before {
            self.activity.touch();
        }
        poll
    }
}

impl AsyncWrite for TrackedStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let poll = self.inner.as_mut().poll_write(cx, buf);
        if matches!(poll, Poll::Ready(Ok(n)) if n > 0) {
            self.activity.touch();
        }
        poll
    }

    fn poll_write_vectored(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        let poll = self.inner.as_mut().poll_write_vectored(cx, bufs);
        if matches!(poll, Poll::Ready(Ok(n)) if n > 0) {
            self.activity.touch();
        }
        poll
    }

    fn is_write_vectored(&self) -> bool {
        self.inner.is_write_vectored()
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.inner.as_mut().poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.inner.as_mut().poll_shutdown(cx)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
