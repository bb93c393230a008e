use std::cell::RefCell;

use log::{debug, info};

use crate::error::{ClientError, Result};
use crate::post::{LikeReceipt, PostDraft, PostId};
use crate::transport::{send_checked, HttpRequest, Transport};

/// Issues post mutations and holds the single "post being edited" slot.
///
/// None of these calls touch the view; reconciling it afterwards is the
/// caller's job.
#[derive(Debug, Default)]
pub struct MutationDispatcher {
    edit_target: RefCell<Option<PostId>>,
}

impl MutationDispatcher {
    pub fn new() -> Self {
        MutationDispatcher::default()
    }

    /// Last writer wins: a previous target is dropped without warning and
    /// returned.
    pub fn begin_edit(&self, id: PostId) -> Option<PostId> {
        let previous = self.edit_target.borrow_mut().replace(id);
        if let Some(previous) = &previous {
            debug!("discarding edit of post {}", previous);
        }
        previous
    }

    pub fn edit_target(&self) -> Option<PostId> {
        self.edit_target.borrow().clone()
    }

    pub fn finish_edit(&self) {
        self.edit_target.borrow_mut().take();
    }

    pub async fn create<T: Transport + ?Sized>(
        &self,
        transport: &T,
        base: &str,
        token: Option<&str>,
        draft: &PostDraft,
    ) -> Result<()> {
        let request = HttpRequest::post(format!("{}/posts", base))
            .bearer(token)
            .json(draft)?;
        send_checked(transport, request).await?;
        info!("created post {:?}", draft.title);
        Ok(())
    }

    /// Updates the current edit target and clears it on success.
    pub async fn update<T: Transport + ?Sized>(
        &self,
        transport: &T,
        base: &str,
        token: Option<&str>,
        draft: &PostDraft,
    ) -> Result<PostId> {
        let id = self.edit_target().ok_or(ClientError::NoEditTarget)?;
        let request = HttpRequest::put(format!("{}/posts/{}", base, id))
            .bearer(token)
            .json(draft)?;
        send_checked(transport, request).await?;

        // another edit may have been opened while the request was in flight
        if self.edit_target().as_ref() == Some(&id) {
            self.finish_edit();
        }
        info!("updated post {}", id);
        Ok(id)
    }

    pub async fn delete<T: Transport + ?Sized>(
        &self,
        transport: &T,
        base: &str,
        token: Option<&str>,
        id: &PostId,
    ) -> Result<()> {
        let request = HttpRequest::delete(format!("{}/posts/{}", base, id)).bearer(token);
        send_checked(transport, request).await?;
        info!("deleted post {}", id);
        Ok(())
    }

    pub async fn like<T: Transport + ?Sized>(
        &self,
        transport: &T,
        base: &str,
        token: Option<&str>,
        id: &PostId,
    ) -> Result<LikeReceipt> {
        let request = HttpRequest::post(format!("{}/posts/{}/like", base, id)).bearer(token);
        send_checked(transport, request).await?.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_target_last_writer_wins() {
        let dispatcher = MutationDispatcher::new();
        assert_eq!(dispatcher.begin_edit(PostId::from("a")), None);
        assert_eq!(dispatcher.begin_edit(PostId::from("b")), Some(PostId::from("a")));
        assert_eq!(dispatcher.edit_target(), Some(PostId::from("b")));

        dispatcher.finish_edit();
        assert_eq!(dispatcher.edit_target(), None);
    }
}
