use async_trait::async_trait;
use blog_sync::{ClientError, HttpRequest, HttpResponse, Transport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, Window};

use crate::describe_js;

/// HTTP over the browser's `fetch`. No timeout: a hung request stays pending.
pub struct FetchConnection {
    window: Window,
}

impl FetchConnection {
    pub fn new(window: Window) -> Self {
        FetchConnection { window }
    }

    async fn fetch(&self, request: &HttpRequest) -> Result<HttpResponse, JsValue> {
        let init = RequestInit::new();
        init.set_method(request.method.as_str());

        let headers = Headers::new()?;
        for (name, value) in &request.headers {
            headers.set(name, value)?;
        }
        init.set_headers(&headers);

        if let Some(body) = &request.body {
            init.set_body(&JsValue::from_str(body));
        }

        let js_request = Request::new_with_str_and_init(&request.url, &init)?;
        let response: Response = JsFuture::from(self.window.fetch_with_request(&js_request))
            .await?
            .dyn_into()?;
        let body = JsFuture::from(response.text()?)
            .await?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse::new(response.status(), body))
    }
}

#[async_trait(?Send)]
impl Transport for FetchConnection {
    async fn send(&self, request: HttpRequest) -> blog_sync::Result<HttpResponse> {
        self.fetch(&request)
            .await
            .map_err(|err| ClientError::Transport(describe_js(&err)))
    }
}
