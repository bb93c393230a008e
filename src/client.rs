use std::cell::RefCell;
use std::rc::Rc;

use log::{error, warn};

use crate::auth::{self, Credentials};
use crate::catalog::{CatalogCache, CategorySource, SelectPurpose};
use crate::config::ClientConfig;
use crate::endpoint::{origin, EndpointResolver};
use crate::error::{ClientError, Result};
use crate::health;
use crate::mutation::MutationDispatcher;
use crate::post::{PostDraft, PostFilter, PostId};
use crate::session::SessionManager;
use crate::storage::KeyValueStore;
use crate::synchronizer::{PostSynchronizer, Refresh};
use crate::transport::Transport;
use crate::view::{Modal, View};

pub const DELETE_PROMPT: &'static str = "Delete this post?";

/// The application state and every user-facing operation.
///
/// Reads (post list, search, categories, likes, health) only log their
/// failures; the page stays usable with stale content. Mutations, login and
/// signup report failures through [`View::alert`] and leave their modal open.
pub struct BlogClient<T, S, V> {
    transport: T,
    view: V,
    hostname: String,
    category_source: CategorySource,
    session: SessionManager<S>,
    endpoint: EndpointResolver<S>,
    catalog: CatalogCache,
    posts: PostSynchronizer,
    mutations: MutationDispatcher,
    filter: RefCell<PostFilter>,
}

impl<T, S, V> BlogClient<T, S, V>
where
    T: Transport,
    S: KeyValueStore,
    V: View,
{
    pub fn new(transport: T, store: Rc<S>, view: V, config: &ClientConfig, hostname: &str) -> Self {
        BlogClient {
            transport,
            view,
            hostname: hostname.to_owned(),
            category_source: config.category_source,
            session: SessionManager::new(store.clone(), config),
            endpoint: EndpointResolver::new(store, config),
            catalog: CatalogCache::new(),
            posts: PostSynchronizer::new(),
            mutations: MutationDispatcher::new(),
            filter: RefCell::new(PostFilter::default()),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn session(&self) -> &SessionManager<S> {
        &self.session
    }

    pub fn endpoint(&self) -> &EndpointResolver<S> {
        &self.endpoint
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn posts(&self) -> &PostSynchronizer {
        &self.posts
    }

    pub fn mutations(&self) -> &MutationDispatcher {
        &self.mutations
    }

    pub fn base_url(&self) -> String {
        self.endpoint.resolve(&self.hostname)
    }

    pub fn filter(&self) -> PostFilter {
        self.filter.borrow().clone()
    }

    /// Page load: banner and base url box, then the health ping, categories
    /// and posts in flight together. A hung request only holds back its own
    /// region.
    pub async fn start(&self) {
        self.refresh_session_view();
        self.view.show_base_url(&self.base_url());
        futures_util::join!(
            self.check_backend(),
            self.refresh_categories(),
            self.load_posts()
        );
    }

    pub fn refresh_session_view(&self) {
        self.view.show_session(&self.session.banner());
    }

    pub async fn check_backend(&self) -> bool {
        let reachable = health::check(&self.transport, &self.base_url()).await;
        self.view.show_backend_status(reachable);
        reachable
    }

    // posts

    /// Authoritative refresh with the current filter.
    pub async fn load_posts(&self) -> Option<Refresh> {
        let filter = self.filter();
        let result = self
            .posts
            .load(&self.transport, &self.view, &self.session, &self.base_url(), &filter)
            .await;
        logged("loading posts", result)
    }

    /// Replaces the filter used by later loads without loading.
    pub fn set_filter(&self, filter: PostFilter) {
        *self.filter.borrow_mut() = filter;
    }

    pub async fn apply_filter(&self, filter: PostFilter) -> Option<Refresh> {
        self.set_filter(filter);
        self.load_posts().await
    }

    pub async fn search(&self, query: &str) -> Option<Refresh> {
        let filter = self.filter();
        let result = self
            .posts
            .search(&self.transport, &self.view, &self.session, &self.base_url(), &filter, query)
            .await;
        logged("searching posts", result)
    }

    /// Every later request goes to the new base, so the list is reloaded from it.
    pub async fn override_endpoint(&self, url: &str) -> Option<Refresh> {
        self.endpoint.set_override(url);
        self.load_posts().await
    }

    // categories

    /// Resets every dropdown to its sentinel, then fills all of them from one
    /// fetched snapshot. On failure they keep only the sentinel.
    pub async fn refresh_categories(&self) -> bool {
        for purpose in SelectPurpose::ALL {
            self.view
                .populate_select(purpose, &CatalogCache::sentinel_only(purpose));
        }

        let url = self.category_source.url(&self.base_url());
        match CatalogCache::fetch(&self.transport, &url).await {
            Ok(categories) => {
                self.catalog.replace(categories);
                for purpose in SelectPurpose::ALL {
                    self.view
                        .populate_select(purpose, &self.catalog.options(purpose, None));
                }
                true
            }
            Err(err) => {
                error!("error loading categories: {}", err);
                false
            }
        }
    }

    // add / edit / delete / like

    /// Unauthenticated users get the login modal instead.
    pub fn open_add(&self) {
        if !self.session.is_authenticated() {
            self.view.open_modal(Modal::Login);
            return;
        }

        self.view.fill_editor(Modal::Add, "", "");
        self.view
            .populate_select(SelectPurpose::Add, &self.catalog.options(SelectPurpose::Add, None));
        self.view.open_modal(Modal::Add);
    }

    /// Opens the edit form for a rendered post, replacing any edit in progress.
    pub fn open_edit(&self, id: &PostId) -> bool {
        let post = match self.posts.find(id) {
            Some(post) => post,
            None => {
                warn!("cannot edit post {}: not rendered", id);
                return false;
            }
        };

        self.mutations.begin_edit(post.id.clone());
        self.view.fill_editor(Modal::Edit, &post.title, &post.content);
        self.view.populate_select(
            SelectPurpose::Edit,
            &self.catalog.options(SelectPurpose::Edit, Some(&post.category)),
        );
        self.view.open_modal(Modal::Edit);
        true
    }

    pub async fn submit_add(&self, draft: &PostDraft) -> bool {
        let token = self.session.token();
        let result = self
            .mutations
            .create(&self.transport, &self.base_url(), token.as_deref(), draft)
            .await;
        self.finish_mutation(result, Some(Modal::Add)).await
    }

    pub async fn submit_update(&self, draft: &PostDraft) -> bool {
        let token = self.session.token();
        let result = self
            .mutations
            .update(&self.transport, &self.base_url(), token.as_deref(), draft)
            .await;
        self.finish_mutation(result, Some(Modal::Edit)).await
    }

    /// Asks first; declining sends nothing.
    pub async fn delete_post(&self, id: &PostId) -> bool {
        if !self.view.confirm(DELETE_PROMPT) {
            return false;
        }

        let token = self.session.token();
        let result = self
            .mutations
            .delete(&self.transport, &self.base_url(), token.as_deref(), id)
            .await;
        self.finish_mutation(result, None).await
    }

    /// Optimistic: only the liked post's counter changes, no reload.
    pub async fn like_post(&self, id: &PostId) -> bool {
        let token = self.session.token();
        let result = self
            .mutations
            .like(&self.transport, &self.base_url(), token.as_deref(), id)
            .await;

        match result {
            Ok(receipt) => self.posts.apply_like(&self.view, id, &receipt),
            Err(err) => {
                error!("error liking post {}: {}", id, err);
                false
            }
        }
    }

    async fn finish_mutation<R>(&self, result: Result<R>, modal: Option<Modal>) -> bool {
        match result {
            Ok(_) => {
                if let Some(modal) = modal {
                    self.view.close_modal(modal);
                }
                self.load_posts().await;
                true
            }
            Err(err) => {
                self.view.alert(&format!("Error: {}", err));
                false
            }
        }
    }

    // auth

    pub async fn login(&self, username: &str, password: &str) -> bool {
        let credentials = Credentials { username, password };
        let base = self.base_url();

        match auth::login(&self.transport, origin(&base), &credentials).await {
            Ok(token) => {
                self.enter_session(&token, username, Modal::Login).await;
                true
            }
            Err(ClientError::Rejected(message)) => {
                self.view.alert(&format!("Login failed: {}", message));
                false
            }
            Err(err) => {
                warn!("login request failed: {}", err);
                self.view.alert("Login request failed");
                false
            }
        }
    }

    /// Registers, then logs in with the same credentials.
    pub async fn signup(&self, username: &str, password: &str) -> bool {
        let credentials = Credentials { username, password };
        let base = self.base_url();
        let origin = origin(&base);

        let result = match auth::register(&self.transport, origin, &credentials).await {
            Ok(()) => auth::login(&self.transport, origin, &credentials).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(token) => {
                self.enter_session(&token, username, Modal::Signup).await;
                true
            }
            Err(err) => {
                self.view.alert(&format!("Signup/Login error: {}", err));
                false
            }
        }
    }

    /// Logs out when signed in, otherwise opens the login modal.
    pub async fn handle_auth_click(&self) {
        if self.session.is_authenticated() {
            self.logout().await;
        } else {
            self.view.open_modal(Modal::Login);
        }
    }

    pub async fn logout(&self) -> Option<Refresh> {
        self.session.logout();
        self.refresh_session_view();
        self.load_posts().await
    }

    async fn enter_session(&self, token: &str, username: &str, modal: Modal) {
        self.session.login(token, username);
        self.refresh_session_view();
        self.view.close_modal(modal);
        self.load_posts().await;
    }
}

fn logged(action: &str, result: Result<Refresh>) -> Option<Refresh> {
    match result {
        Ok(refresh) => Some(refresh),
        Err(err) => {
            error!("error {}: {}", action, err);
            None
        }
    }
}
