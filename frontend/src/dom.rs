use blog_sync::{Modal, PostCard, PostId, SelectOption, SelectPurpose, SessionBanner, View};
use log::{error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

use crate::{describe_js, dispatch, CardAction};

pub const POST_CONTAINER_ID: &'static str = "post-container";
pub const BASE_URL_INPUT_ID: &'static str = "api-base-url";
pub const AUTH_BUTTON_ID: &'static str = "auth-button";
pub const USER_INFO_ID: &'static str = "user-info";
pub const BACKEND_STATUS_ID: &'static str = "backend-status";
pub const HIDDEN_CLASS: &'static str = "hidden";

pub fn select_id(purpose: SelectPurpose) -> &'static str {
    match purpose {
        SelectPurpose::Filter => "filter-category",
        SelectPurpose::Add => "add-category",
        SelectPurpose::Edit => "edit-category",
    }
}

pub fn modal_id(modal: Modal) -> &'static str {
    match modal {
        Modal::Login => "login-modal",
        Modal::Signup => "signup-modal",
        Modal::Add => "add-modal",
        Modal::Edit => "update-modal",
    }
}

/// Title and content inputs of the post forms.
pub fn editor_ids(modal: Modal) -> Option<(&'static str, &'static str)> {
    match modal {
        Modal::Add => Some(("add-title", "add-content")),
        Modal::Edit => Some(("edit-title", "edit-content")),
        Modal::Login | Modal::Signup => None,
    }
}

pub fn like_count_id(id: &PostId) -> String {
    format!("like-count-{}", id)
}

/// Value of an input, textarea or select; empty when the element is missing.
pub fn field_value(document: &Document, id: &str) -> String {
    let element = match document.get_element_by_id(id) {
        Some(element) => element,
        None => return String::new(),
    };

    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else {
        String::new()
    }
}

pub fn set_field_value(document: &Document, id: &str, value: &str) {
    match document.get_element_by_id(id) {
        Some(element) => {
            if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
                input.set_value(value);
            } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
                area.set_value(value);
            }
        }
        None => warn!("missing element #{}", id),
    }
}

/// Renders into the page's fixed element ids.
pub struct DomView {
    document: Document,
}

impl DomView {
    pub fn new(document: Document) -> Self {
        DomView { document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn element(&self, id: &str) -> Option<Element> {
        let element = self.document.get_element_by_id(id);
        if element.is_none() {
            warn!("missing element #{}", id);
        }
        element
    }

    fn create(&self, tag: &str, text: Option<&str>) -> Result<Element, JsValue> {
        let element = self.document.create_element(tag)?;
        if text.is_some() {
            element.set_text_content(text);
        }
        Ok(element)
    }

    fn try_render_posts(&self, cards: &[PostCard]) -> Result<(), JsValue> {
        let container = match self.element(POST_CONTAINER_ID) {
            Some(container) => container,
            None => return Ok(()),
        };
        container.set_inner_html("");

        for card in cards {
            container.append_child(&self.card_element(card)?.into())?;
        }
        Ok(())
    }

    fn card_element(&self, card: &PostCard) -> Result<Element, JsValue> {
        let post = self.create("div", None)?;
        post.set_class_name("post");

        post.append_child(&self.create("h2", Some(&card.title))?.into())?;
        post.append_child(&self.create("p", Some(&card.content))?.into())?;

        let meta = self.create("p", Some(&card.meta))?;
        meta.set_class_name("post-meta");
        post.append_child(&meta)?;

        if let Some(updated) = &card.updated {
            let updated = self.create("p", Some(updated))?;
            updated.set_class_name("post-updated");
            post.append_child(&updated)?;
        }

        let actions = self.create("div", None)?;
        actions.set_class_name("post-actions");

        let like = self.create("button", Some("❤️ "))?;
        let count = self.create("span", Some(&card.likes.to_string()))?;
        count.set_id(&like_count_id(&card.id));
        like.append_child(&count)?;
        on_click(&like, CardAction::Like(card.id.clone()))?;
        actions.append_child(&like)?;

        if card.can_edit {
            let edit = self.create("button", Some("✏️ Edit"))?;
            on_click(&edit, CardAction::Edit(card.id.clone()))?;
            actions.append_child(&edit)?;
        }
        if card.can_delete {
            let delete = self.create("button", Some("🗑️ Delete"))?;
            on_click(&delete, CardAction::Delete(card.id.clone()))?;
            actions.append_child(&delete)?;
        }

        post.append_child(&actions)?;
        Ok(post)
    }

    fn try_render_notice(&self, message: &str) -> Result<(), JsValue> {
        if let Some(container) = self.element(POST_CONTAINER_ID) {
            container.set_inner_html("");
            container.append_child(&self.create("p", Some(message))?.into())?;
        }
        Ok(())
    }

    fn try_populate_select(&self, purpose: SelectPurpose, options: &[SelectOption]) -> Result<(), JsValue> {
        let select = match self.element(select_id(purpose)) {
            Some(select) => select.dyn_into::<HtmlSelectElement>()?,
            None => return Ok(()),
        };
        select.set_inner_html("");

        for option in options {
            let element = HtmlOptionElement::new_with_text_and_value_and_default_selected_and_selected(
                &option.label,
                &option.value,
                false,
                option.selected,
            )?;
            select.append_child(&element)?;
        }
        Ok(())
    }

    fn set_modal_hidden(&self, modal: Modal, hidden: bool) -> Result<(), JsValue> {
        if let Some(element) = self.element(modal_id(modal)) {
            let classes = element.class_list();
            if hidden {
                classes.add_1(HIDDEN_CLASS)?;
            } else {
                classes.remove_1(HIDDEN_CLASS)?;
            }
        }
        Ok(())
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(element) = self.element(id) {
            element.set_text_content(Some(text));
        }
    }
}

fn on_click(element: &Element, action: CardAction) -> Result<(), JsValue> {
    let click = Closure::<dyn FnMut()>::new(move || dispatch(action.clone()));
    element
        .dyn_ref::<HtmlElement>()
        .ok_or_else(|| JsValue::from_str("button is not an HtmlElement"))?
        .set_onclick(Some(click.as_ref().unchecked_ref()));
    click.forget();
    Ok(())
}

fn report(what: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        error!("could not {}: {}", what, describe_js(&err));
    }
}

impl View for DomView {
    fn render_posts(&self, cards: &[PostCard]) {
        report("render posts", self.try_render_posts(cards));
    }

    fn render_notice(&self, message: &str) {
        report("render notice", self.try_render_notice(message));
    }

    fn set_like_count(&self, id: &PostId, likes: u64) {
        self.set_text(&like_count_id(id), &likes.to_string());
    }

    fn populate_select(&self, purpose: SelectPurpose, options: &[SelectOption]) {
        report("populate categories", self.try_populate_select(purpose, options));
    }

    fn fill_editor(&self, modal: Modal, title: &str, content: &str) {
        if let Some((title_id, content_id)) = editor_ids(modal) {
            set_field_value(&self.document, title_id, title);
            set_field_value(&self.document, content_id, content);
        }
    }

    fn show_session(&self, banner: &SessionBanner) {
        self.set_text(AUTH_BUTTON_ID, banner.auth_label);
        self.set_text(USER_INFO_ID, &banner.welcome);
    }

    fn show_base_url(&self, url: &str) {
        set_field_value(&self.document, BASE_URL_INPUT_ID, url);
    }

    fn show_backend_status(&self, reachable: bool) {
        // the status badge is optional markup
        if let Some(element) = self.document.get_element_by_id(BACKEND_STATUS_ID) {
            element.set_text_content(Some(if reachable {
                "Backend connected"
            } else {
                "Backend unreachable"
            }));
        }
    }

    fn open_modal(&self, modal: Modal) {
        report("open modal", self.set_modal_hidden(modal, false));
    }

    fn close_modal(&self, modal: Modal) {
        report("close modal", self.set_modal_hidden(modal, true));
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            report("alert", window.alert_with_message(message));
        }
    }

    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}
