//! Session and view synchronization core of the blog front end.
//!
//! The server owns every post; this crate keeps the page consistent with it.
//! Persistence, HTTP and rendering are injected through [`KeyValueStore`],
//! [`Transport`] and [`View`], so the browser build (`blog_frontend`) and the
//! tests drive the same [`BlogClient`].

pub mod auth;
pub mod catalog;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod health;
pub mod mutation;
pub mod post;
pub mod sequence;
pub mod session;
pub mod storage;
pub mod synchronizer;
pub mod transport;
pub mod view;

pub use catalog::{CatalogCache, CategorySource, SelectOption, SelectPurpose};
pub use client::BlogClient;
pub use config::ClientConfig;
pub use endpoint::EndpointResolver;
pub use error::{ClientError, Result};
pub use mutation::MutationDispatcher;
pub use post::{LikeReceipt, Post, PostDraft, PostFilter, PostId, PostListing};
pub use session::SessionManager;
pub use storage::{KeyValueStore, MemoryStore};
pub use synchronizer::{PostSynchronizer, Refresh};
pub use transport::{HttpRequest, HttpResponse, Method, Transport};
pub use view::{Modal, PostCard, SessionBanner, View};
