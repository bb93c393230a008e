extern crate blog_frontend;
extern crate wasm_bindgen_test;

use blog_frontend::dom::{field_value, like_count_id, select_id, DomView, POST_CONTAINER_ID};
use blog_frontend::persisted::LocalStore;
use blog_frontend::{document, get_local_storage};
use blog_sync::{
    CatalogCache, KeyValueStore, Modal, Post, PostCard, PostId, SelectPurpose, SessionBanner, View,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlSelectElement};

wasm_bindgen_test_configure!(run_in_browser);

fn mount(tag: &str, id: &str) -> Element {
    let document = document().unwrap();
    if let Some(existing) = document.get_element_by_id(id) {
        existing.remove();
    }
    let element = document.create_element(tag).unwrap();
    element.set_id(id);
    document.body().unwrap().append_child(&element).unwrap();
    element
}

fn post(id: u64, author: &str) -> Post {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": format!("Post {}", id),
        "content": "body",
        "category": "Rust",
        "author": author,
        "likes": 2
    }))
    .unwrap()
}

#[wasm_bindgen_test]
fn local_store_round_trip() {
    let store = LocalStore::new(get_local_storage().unwrap());

    store.set("blog_sync_test", "value").unwrap();
    assert_eq!(store.get("blog_sync_test").as_deref(), Some("value"));

    store.remove("blog_sync_test").unwrap();
    assert_eq!(store.get("blog_sync_test"), None);
}

#[wasm_bindgen_test]
fn renders_cards_with_owner_buttons() {
    let container = mount("div", POST_CONTAINER_ID);
    let view = DomView::new(document().unwrap());

    let cards = vec![
        PostCard::new(&post(1, "ada"), Some("ada")),
        PostCard::new(&post(2, "bob"), Some("ada")),
    ];
    view.render_posts(&cards);

    let posts = container.query_selector_all(".post").unwrap();
    assert_eq!(posts.length(), 2);
    let buttons = container.query_selector_all("button").unwrap();
    // like + edit + delete for the first post, like only for the second
    assert_eq!(buttons.length(), 4);

    view.set_like_count(&PostId::from(2), 9);
    let count = document()
        .unwrap()
        .get_element_by_id(&like_count_id(&PostId::from(2)))
        .unwrap();
    assert_eq!(count.text_content().as_deref(), Some("9"));

    view.render_notice("No posts found");
    assert_eq!(container.query_selector_all(".post").unwrap().length(), 0);
    assert_eq!(container.text_content().as_deref(), Some("No posts found"));
}

#[wasm_bindgen_test]
fn populates_select_with_selection() {
    let select = mount("select", select_id(SelectPurpose::Edit));
    let view = DomView::new(document().unwrap());
    let catalog = CatalogCache::new();
    catalog.replace(vec!["Rust".into(), "Travel".into()]);

    view.populate_select(SelectPurpose::Edit, &catalog.options(SelectPurpose::Edit, Some("travel")));

    let select = select.dyn_into::<HtmlSelectElement>().unwrap();
    assert_eq!(select.length(), 3);
    assert_eq!(select.value(), "Travel");
    assert_eq!(field_value(&document().unwrap(), select_id(SelectPurpose::Edit)), "Travel");
}

#[wasm_bindgen_test]
fn modals_and_banner() {
    let modal = mount("div", "login-modal");
    modal.set_class_name("hidden");
    let button = mount("button", "auth-button");
    let view = DomView::new(document().unwrap());

    view.open_modal(Modal::Login);
    assert!(!modal.class_list().contains("hidden"));
    view.close_modal(Modal::Login);
    assert!(modal.class_list().contains("hidden"));

    view.show_session(&SessionBanner::new(true, Some("ada")));
    assert_eq!(button.text_content().as_deref(), Some("Logout"));
}
