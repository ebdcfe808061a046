//! Test doubles for the application ports.
#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use pintalk_domain::{HttpMethod, RequestSpec, ResponseSpec, Route};

use crate::ClientResult;
use crate::ports::{HttpClient, Navigator, TransportError};

struct Scripted {
    result: Result<ResponseSpec, TransportError>,
    delay: Option<Duration>,
}

/// Bare client answering from per-route queues and recording every request.
#[derive(Default)]
pub struct ScriptedClient {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Scripted>>>,
    sent: Mutex<Vec<RequestSpec>>,
}

#[allow(clippy::unwrap_used)]
impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: HttpMethod, url: &str, scripted: Scripted) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(scripted);
    }

    pub fn respond(&self, method: HttpMethod, url: &str, response: ResponseSpec) {
        self.push(
            method,
            url,
            Scripted {
                result: Ok(response),
                delay: None,
            },
        );
    }

    pub fn respond_after(
        &self,
        method: HttpMethod,
        url: &str,
        response: ResponseSpec,
        delay: Duration,
    ) {
        self.push(
            method,
            url,
            Scripted {
                result: Ok(response),
                delay: Some(delay),
            },
        );
    }

    pub fn fail(&self, method: HttpMethod, url: &str, error: TransportError) {
        self.push(
            method,
            url,
            Scripted {
                result: Err(error),
                delay: None,
            },
        );
    }

    pub fn sent(&self) -> Vec<RequestSpec> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod, url: &str) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }
}

#[async_trait]
#[allow(clippy::unwrap_used)]
impl HttpClient for ScriptedClient {
    async fn execute(&self, request: RequestSpec) -> ClientResult<ResponseSpec> {
        let key = (request.method, request.url.clone());
        self.sent.lock().unwrap().push(request);
        let scripted = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);
        let Some(scripted) = scripted else {
            return Ok(ResponseSpec::new(404, ""));
        };
        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(scripted.result?)
    }
}

/// Navigator remembering every route it was sent to.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

#[allow(clippy::unwrap_used)]
impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

#[allow(clippy::unwrap_used)]
impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}
