// This file is part of txload.
//
// txload is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// txload is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with txload.
// If not, see https://www.gnu.org/licenses/.

//! Client side request timeout for the alloy transport stack.
//!
//! A request that outlives its timeout resolves to a transport error, which
//! callers treat like any other RPC failure.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use alloy_json_rpc::{RequestPacket, ResponsePacket};
use alloy_transport::{TransportError, TransportFut};
use pin_project::pin_project;
use tokio::time::Timeout;
use tower::{Layer, Service};

#[derive(Debug, Clone)]
pub(crate) struct ProviderTimeoutLayer {
    timeout: Duration,
}

impl ProviderTimeoutLayer {
    pub(crate) fn new(timeout: Duration) -> Self {
        ProviderTimeoutLayer { timeout }
    }
}

impl<S> Layer<S> for ProviderTimeoutLayer
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError> + Sync,
{
    type Service = ProviderTimeout<S>;

    fn layer(&self, service: S) -> Self::Service {
        ProviderTimeout {
            service,
            timeout: self.timeout,
        }
    }
}

/// Transport service that fails requests exceeding a fixed duration
#[derive(Debug, Clone)]
pub struct ProviderTimeout<S> {
    service: S,
    timeout: Duration,
}

impl<S> Service<RequestPacket> for ProviderTimeout<S>
where
    S: Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Sync
        + Send
        + Clone
        + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        Box::pin(ResponseFuture {
            inner: tokio::time::timeout(self.timeout, self.service.call(request)),
            timeout: self.timeout,
        })
    }
}

/// Response future of [`ProviderTimeout`]
#[pin_project]
#[derive(Debug)]
struct ResponseFuture<F> {
    #[pin]
    inner: Timeout<F>,
    timeout: Duration,
}

impl<F, T> Future for ResponseFuture<F>
where
    F: Future<Output = Result<T, TransportError>>,
{
    type Output = Result<T, TransportError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        match this.inner.poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(res)) => Poll::Ready(res),
            Poll::Ready(Err(_elapsed)) => {
                let msg = format!("provider request timed out after {}s", this.timeout.as_secs());
                Poll::Ready(Err(TransportError::local_usage_str(&msg)))
            }
        }
    }
}
