use std::cell::RefCell;

use log::debug;

use crate::error::{ClientError, Result};
use crate::post::{LikeReceipt, Post, PostFilter, PostId, PostListing};
use crate::sequence::RequestSequence;
use crate::session::SessionManager;
use crate::storage::KeyValueStore;
use crate::transport::{send_checked, url_with_query, HttpRequest, Transport};
use crate::view::{PostCard, View};

/// Outcome of an authoritative refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Refresh {
    /// The list was replaced with this many posts.
    Rendered(usize),
    /// The list was replaced with a server message (search only).
    Notice(String),
    /// A newer request was issued meanwhile; nothing was rendered.
    Stale,
}

/// Keeps the rendered post list in step with the server. There is no
/// diffing: every load replaces the whole list, in server order.
#[derive(Debug, Default)]
pub struct PostSynchronizer {
    sequence: RequestSequence,
    rendered: RefCell<Vec<Post>>,
}

impl PostSynchronizer {
    pub fn new() -> Self {
        PostSynchronizer::default()
    }

    pub async fn load<T, V, S>(
        &self,
        transport: &T,
        view: &V,
        session: &SessionManager<S>,
        base: &str,
        filter: &PostFilter,
    ) -> Result<Refresh>
    where
        T: Transport + ?Sized,
        V: View + ?Sized,
        S: KeyValueStore,
    {
        let url = url_with_query(&format!("{}/posts", base), &filter.query())?;

        match self.fetch(transport, url).await? {
            None => Ok(Refresh::Stale),
            Some(PostListing::Posts(posts)) => Ok(self.render(view, session, posts)),
            Some(PostListing::Error(message)) => Err(ClientError::Rejected(message)),
        }
    }

    /// The same text is sent as both the title and the content match. An
    /// empty query is a plain [`PostSynchronizer::load`].
    pub async fn search<T, V, S>(
        &self,
        transport: &T,
        view: &V,
        session: &SessionManager<S>,
        base: &str,
        filter: &PostFilter,
        query: &str,
    ) -> Result<Refresh>
    where
        T: Transport + ?Sized,
        V: View + ?Sized,
        S: KeyValueStore,
    {
        let query = query.trim();
        if query.is_empty() {
            return self.load(transport, view, session, base, filter).await;
        }

        let url = url_with_query(
            &format!("{}/posts/search", base),
            &[("title", query), ("content", query)],
        )?;

        // an `{error}` body is shown whatever the status
        match self.fetch(transport, url).await {
            Ok(None) => Ok(Refresh::Stale),
            Ok(Some(PostListing::Posts(posts))) => Ok(self.render(view, session, posts)),
            Ok(Some(PostListing::Error(message)))
            | Err(ClientError::Status {
                message: Some(message),
                ..
            }) => {
                self.rendered.borrow_mut().clear();
                view.render_notice(&message);
                Ok(Refresh::Notice(message))
            }
            Err(err) => Err(err),
        }
    }

    /// Patches one post's counter in place. A receipt without a count
    /// changes nothing.
    pub fn apply_like<V: View + ?Sized>(&self, view: &V, id: &PostId, receipt: &LikeReceipt) -> bool {
        let likes = match receipt.likes {
            Some(likes) => likes,
            None => return false,
        };

        if let Some(post) = self
            .rendered
            .borrow_mut()
            .iter_mut()
            .find(|post| &post.id == id)
        {
            post.likes = likes;
        }
        view.set_like_count(id, likes);
        true
    }

    /// The post as it was last rendered.
    pub fn find(&self, id: &PostId) -> Option<Post> {
        self.rendered
            .borrow()
            .iter()
            .find(|post| &post.id == id)
            .cloned()
    }

    pub fn rendered(&self) -> Vec<Post> {
        self.rendered.borrow().clone()
    }

    /// `None` when the response lost the race against a newer request.
    async fn fetch<T: Transport + ?Sized>(
        &self,
        transport: &T,
        url: String,
    ) -> Result<Option<PostListing>> {
        let ticket = self.sequence.next();
        let response = send_checked(transport, HttpRequest::get(url)).await;

        if !self.sequence.is_latest(ticket) {
            debug!("discarding stale post list response {:?}", ticket);
            return Ok(None);
        }

        Ok(Some(PostListing::parse(&response?.body)?))
    }

    fn render<V, S>(&self, view: &V, session: &SessionManager<S>, posts: Vec<Post>) -> Refresh
    where
        V: View + ?Sized,
        S: KeyValueStore,
    {
        let current_user = session.current_user();
        let cards: Vec<PostCard> = posts
            .iter()
            .map(|post| PostCard::new(post, current_user.as_deref()))
            .collect();

        view.render_posts(&cards);
        *self.rendered.borrow_mut() = posts;
        Refresh::Rendered(cards.len())
    }
}
