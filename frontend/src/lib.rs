//! Browser build of the blog client.
//!
//! `bootstrap` wires the page's controls to a [`blog_sync::BlogClient`] backed
//! by `localStorage`, `fetch` and the DOM. The remaining exports use the names
//! the page's inline handlers call.
extern crate console_error_panic_hook;

pub mod connection;
pub mod dom;
pub mod persisted;

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use blog_sync::{BlogClient, ClientConfig, Modal, PostDraft, PostFilter, PostId, View};
use log::{info, warn, LevelFilter, Metadata, Record};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, KeyboardEvent, Storage, Window};

use crate::connection::FetchConnection;
use crate::dom::{field_value, DomView, BASE_URL_INPUT_ID};
use crate::persisted::LocalStore;

pub type App = BlogClient<FetchConnection, LocalStore, DomView>;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(contents: &str);
}

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            console_log(&format!("[{}] {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = RefCell::new(None);
}

/// Buttons rendered on a post card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardAction {
    Like(PostId),
    Edit(PostId),
    Delete(PostId),
}

pub fn describe_js(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    match value.dyn_ref::<js_sys::Error>() {
        Some(err) => String::from(err.message()),
        None => format!("{:?}", value),
    }
}

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn get_local_storage() -> Result<Storage, JsValue> {
    window()?
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("localStorage unavailable"))
}

/// Runs `task` against the bootstrapped client on the event loop.
pub fn with_app<F, Fut>(task: F)
where
    F: FnOnce(Rc<App>) -> Fut,
    Fut: Future<Output = ()> + 'static,
{
    match APP.with(|slot| slot.borrow().clone()) {
        Some(app) => wasm_bindgen_futures::spawn_local(task(app)),
        None => warn!("blog client used before bootstrap"),
    }
}

pub fn dispatch(action: CardAction) {
    match action {
        CardAction::Like(id) => with_app(|app| async move {
            app.like_post(&id).await;
        }),
        CardAction::Edit(id) => with_app(|app| async move {
            app.open_edit(&id);
        }),
        CardAction::Delete(id) => with_app(|app| async move {
            app.delete_post(&id).await;
        }),
    }
}

fn read_filter(document: &Document) -> PostFilter {
    PostFilter {
        category: field_value(document, "filter-category"),
        sort: field_value(document, "sort-field"),
        direction: field_value(document, "sort-direction"),
    }
}

fn read_draft(document: &Document, prefix: &str) -> PostDraft {
    PostDraft {
        title: field_value(document, &format!("{}-title", prefix)),
        content: field_value(document, &format!("{}-content", prefix)),
        category: field_value(document, &format!("{}-category", prefix)),
    }
}

fn listen<H>(document: &Document, id: &str, event: &str, handler: H) -> Result<(), JsValue>
where
    H: FnMut(Event) + 'static,
{
    let element = match document.get_element_by_id(id) {
        Some(element) => element,
        None => {
            warn!("missing element #{}, not listening for {}", id, event);
            return Ok(());
        }
    };

    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    element.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

fn wire_controls(document: &Document) -> Result<(), JsValue> {
    listen(document, BASE_URL_INPUT_ID, "change", |_| store_base_url())?;

    listen(document, "search-input", "keydown", |event: Event| {
        let enter = event
            .dyn_ref::<KeyboardEvent>()
            .map(|key| key.key() == "Enter")
            .unwrap_or(false);
        if enter {
            search_posts();
        }
    })?;

    for id in ["filter-category", "sort-field", "sort-direction"] {
        listen(document, id, "change", |_| load_posts())?;
    }

    listen(document, "auth-button", "click", |_| handle_auth_click())?;
    listen(document, "add-save-btn", "click", |_| submit_add())?;
    listen(document, "edit-save-btn", "click", |_| submit_update())?;
    Ok(())
}

/// Entry point. `config_json` optionally overrides [`ClientConfig`] fields.
#[wasm_bindgen]
pub fn bootstrap(config_json: Option<String>) -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }

    let config = ClientConfig::load(config_json.as_deref());
    let window = window()?;
    let hostname = window.location().hostname()?;
    let document = document()?;
    info!("starting blog client on {}", hostname);

    let app = Rc::new(BlogClient::new(
        FetchConnection::new(window),
        Rc::new(LocalStore::new(get_local_storage()?)),
        DomView::new(document.clone()),
        &config,
        &hostname,
    ));
    app.set_filter(read_filter(&document));
    APP.with(|slot| *slot.borrow_mut() = Some(app));

    wire_controls(&document)?;
    with_app(|app| async move { app.start().await });
    Ok(())
}

fn current_document() -> Option<Document> {
    document()
        .map_err(|err| warn!("no document: {}", describe_js(&err)))
        .ok()
}

#[wasm_bindgen(js_name = loadPosts)]
pub fn load_posts() {
    if let Some(document) = current_document() {
        let filter = read_filter(&document);
        with_app(|app| async move {
            app.apply_filter(filter).await;
        });
    }
}

#[wasm_bindgen(js_name = searchPosts)]
pub fn search_posts() {
    if let Some(document) = current_document() {
        let query = field_value(&document, "search-input");
        with_app(|app| async move {
            app.search(&query).await;
        });
    }
}

#[wasm_bindgen(js_name = storeBaseUrl)]
pub fn store_base_url() {
    if let Some(document) = current_document() {
        let url = field_value(&document, BASE_URL_INPUT_ID);
        with_app(|app| async move {
            app.override_endpoint(&url).await;
        });
    }
}

#[wasm_bindgen(js_name = submitAdd)]
pub fn submit_add() {
    if let Some(document) = current_document() {
        let draft = read_draft(&document, "add");
        with_app(|app| async move {
            app.submit_add(&draft).await;
        });
    }
}

#[wasm_bindgen(js_name = submitUpdate)]
pub fn submit_update() {
    if let Some(document) = current_document() {
        let draft = read_draft(&document, "edit");
        with_app(|app| async move {
            app.submit_update(&draft).await;
        });
    }
}

#[wasm_bindgen(js_name = submitLogin)]
pub fn submit_login() {
    if let Some(document) = current_document() {
        let username = field_value(&document, "login-username");
        let password = field_value(&document, "login-password");
        with_app(|app| async move {
            app.login(&username, &password).await;
        });
    }
}

#[wasm_bindgen(js_name = submitSignup)]
pub fn submit_signup() {
    if let Some(document) = current_document() {
        let username = field_value(&document, "signup-username");
        let password = field_value(&document, "signup-password");
        with_app(|app| async move {
            app.signup(&username, &password).await;
        });
    }
}

#[wasm_bindgen(js_name = handleAuthClick)]
pub fn handle_auth_click() {
    with_app(|app| async move { app.handle_auth_click().await });
}

#[wasm_bindgen(js_name = openAddModal)]
pub fn open_add_modal() {
    with_app(|app| async move { app.open_add() });
}

fn toggle_modal(modal: Modal, open: bool) {
    with_app(move |app| async move {
        if open {
            app.view().open_modal(modal);
        } else {
            app.view().close_modal(modal);
        }
    });
}

#[wasm_bindgen(js_name = openLoginModal)]
pub fn open_login_modal() {
    toggle_modal(Modal::Login, true);
}

#[wasm_bindgen(js_name = closeLoginModal)]
pub fn close_login_modal() {
    toggle_modal(Modal::Login, false);
}

#[wasm_bindgen(js_name = openSignupModal)]
pub fn open_signup_modal() {
    toggle_modal(Modal::Signup, true);
}

#[wasm_bindgen(js_name = closeSignupModal)]
pub fn close_signup_modal() {
    toggle_modal(Modal::Signup, false);
}

#[wasm_bindgen(js_name = closeAddModal)]
pub fn close_add_modal() {
    toggle_modal(Modal::Add, false);
}

#[wasm_bindgen(js_name = closeModal)]
pub fn close_edit_modal() {
    toggle_modal(Modal::Edit, false);
}
