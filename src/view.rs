//! View models and the rendering seam.
//!
//! Everything the page shows is computed here from plain values; the
//! [`View`] implementation only copies it into whatever it renders to.

use crate::catalog::{SelectOption, SelectPurpose};
use crate::post::{Post, PostId};

pub const NO_DATE: &'static str = "No date";
pub const UNKNOWN_AUTHOR: &'static str = "Unknown";

/// One rendered post.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostCard {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub meta: String,
    /// `"Updated: ..."`, only when the post carries an update timestamp.
    pub updated: Option<String>,
    pub likes: u64,
    pub can_edit: bool,
    pub can_delete: bool,
}

impl PostCard {
    pub fn new(post: &Post, current_user: Option<&str>) -> Self {
        let date = non_empty(post.date.as_deref()).unwrap_or(NO_DATE);
        let author = non_empty(post.author.as_deref()).unwrap_or(UNKNOWN_AUTHOR);
        let is_author = match (post.author.as_deref(), current_user) {
            (Some(author), Some(user)) => author == user,
            _ => false,
        };

        PostCard {
            id: post.id.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            meta: format!("{} · by {}", date, author),
            updated: non_empty(post.updated.as_deref()).map(|updated| format!("Updated: {}", updated)),
            likes: post.likes,
            can_edit: is_author,
            can_delete: is_author,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Auth button label and welcome line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionBanner {
    pub auth_label: &'static str,
    pub welcome: String,
}

impl SessionBanner {
    pub fn new(authenticated: bool, username: Option<&str>) -> Self {
        SessionBanner {
            auth_label: if authenticated { "Logout" } else { "Login" },
            welcome: username
                .map(|username| format!("Welcome, {}!", username))
                .unwrap_or_default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modal {
    Login,
    Signup,
    Add,
    Edit,
}

/// The page. Methods are fire-and-forget: a renderer that cannot find its
/// target element logs and moves on.
pub trait View {
    /// Replaces the whole post list.
    fn render_posts(&self, cards: &[PostCard]);
    /// Replaces the post list with a single message.
    fn render_notice(&self, message: &str);
    fn set_like_count(&self, id: &PostId, likes: u64);
    fn populate_select(&self, purpose: SelectPurpose, options: &[SelectOption]);
    /// Sets the title and content inputs of the add or edit form.
    fn fill_editor(&self, modal: Modal, title: &str, content: &str);
    fn show_session(&self, banner: &SessionBanner);
    fn show_base_url(&self, url: &str);
    fn show_backend_status(&self, reachable: bool);
    fn open_modal(&self, modal: Modal);
    fn close_modal(&self, modal: Modal);
    /// Blocking notification.
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(author: Option<&str>) -> Post {
        Post {
            id: PostId::from(1),
            title: "Hello".into(),
            content: "World".into(),
            category: "Rust".into(),
            author: author.map(Into::into),
            date: None,
            updated: None,
            likes: 3,
        }
    }

    #[test]
    fn author_sees_actions() {
        let card = PostCard::new(&post(Some("ada")), Some("ada"));
        assert!(card.can_edit && card.can_delete);
    }

    #[test]
    fn others_do_not() {
        assert!(!PostCard::new(&post(Some("ada")), Some("Ada")).can_edit);
        assert!(!PostCard::new(&post(Some("ada")), Some("bob")).can_delete);
        assert!(!PostCard::new(&post(Some("ada")), None).can_edit);
        assert!(!PostCard::new(&post(None), None).can_edit);
        assert!(!PostCard::new(&post(None), Some("ada")).can_edit);
    }

    #[test]
    fn fallbacks() {
        let card = PostCard::new(&post(None), None);
        assert_eq!(card.meta, "No date · by Unknown");
        assert_eq!(card.updated, None);
        assert_eq!(card.likes, 3);

        let mut dated = post(Some("ada"));
        dated.date = Some("2024-01-02".into());
        dated.updated = Some("2024-01-03".into());
        let card = PostCard::new(&dated, None);
        assert_eq!(card.meta, "2024-01-02 · by ada");
        assert_eq!(card.updated.as_deref(), Some("Updated: 2024-01-03"));
    }

    #[test]
    fn banner() {
        assert_eq!(
            SessionBanner::new(true, Some("ada")),
            SessionBanner {
                auth_label: "Logout",
                welcome: "Welcome, ada!".into()
            }
        );
        assert_eq!(SessionBanner::new(false, None).auth_label, "Login");
        assert_eq!(SessionBanner::new(false, None).welcome, "");
    }
}
