//! Page request handling: canonicalize, then redirect or present.

use crate::domain::page_key::{encode_title, PageKey};
use crate::domain::route::PageRoute;
use crate::domain::views::{DescriptionView, MediaView};
use crate::port::page_presenter::{PagePresenter, PresenterError, PresenterOutcome};

/// What the web layer should do with a page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageResponse<T> {
    Render(T),
    PermanentRedirect(PageRoute),
}

/// Resolves `description(key)` and `media(key)` requests.
///
/// A non-canonical key is redirected to its canonical form before the
/// presenter is consulted. A redirect requested by the presenter always
/// targets the description route, including for media requests. There is
/// no loop detection. A key made only of separators has no canonical form
/// and is reported as not found.
pub struct PageRequestHandler<P> {
    presenter: P,
}

impl<P: PagePresenter> PageRequestHandler<P> {
    pub fn new(presenter: P) -> Self {
        Self { presenter }
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub async fn handle_description(
        &self,
        raw_key: &str,
    ) -> Result<PageResponse<DescriptionView>, PresenterError> {
        let key = canonical_key(raw_key)?;
        if key != raw_key {
            tracing::debug!("Redirecting {:?} to canonical key {}", raw_key, key);
            return Ok(PageResponse::PermanentRedirect(PageRoute::Description(key)));
        }

        match self.presenter.get_description(&key).await {
            PresenterOutcome::Rendered(view) => {
                tracing::debug!("Rendering description of {}", key);
                Ok(PageResponse::Render(view))
            }
            PresenterOutcome::RedirectTo(target) => {
                tracing::debug!("Page {} moved to {}", key, target);
                Ok(PageResponse::PermanentRedirect(PageRoute::Description(target)))
            }
            PresenterOutcome::Failed(e) => {
                tracing::debug!("Description of {} failed: {}", key, e);
                Err(e)
            }
        }
    }

    pub async fn handle_media(
        &self,
        raw_key: &str,
    ) -> Result<PageResponse<MediaView>, PresenterError> {
        let key = canonical_key(raw_key)?;
        if key != raw_key {
            tracing::debug!("Redirecting {:?} to canonical key {}", raw_key, key);
            return Ok(PageResponse::PermanentRedirect(PageRoute::Media(key)));
        }

        match self.presenter.get_media(&key).await {
            PresenterOutcome::Rendered(view) => {
                tracing::debug!("Rendering media of {}", key);
                Ok(PageResponse::Render(view))
            }
            PresenterOutcome::RedirectTo(target) => {
                tracing::debug!("Page {} moved to {}", key, target);
                Ok(PageResponse::PermanentRedirect(PageRoute::Description(target)))
            }
            PresenterOutcome::Failed(e) => {
                tracing::debug!("Media of {} failed: {}", key, e);
                Err(e)
            }
        }
    }
}

/// Encode `raw_key`, refusing keys that encode to nothing.
fn canonical_key(raw_key: &str) -> Result<PageKey, PresenterError> {
    let key = encode_title(raw_key);
    if key.as_str().is_empty() {
        tracing::debug!("Key {:?} has no canonical form", raw_key);
        return Err(PresenterError::NotFound(raw_key.to_string()));
    }
    Ok(key)
}
