//! Continuation-link pager over secret listings

use std::sync::Arc;

use crate::backend::{BackendError, SecretPropertiesPage, SecretsBackend};

enum PagerState {
    Start,
    Next(String),
    Done,
}

/// Walks a listing page by page. Not restartable; once exhausted or failed,
/// [`Pager::more`] returns `false`.
pub struct Pager {
    backend: Arc<dyn SecretsBackend>,
    state: PagerState,
}

impl Pager {
    pub fn new(backend: Arc<dyn SecretsBackend>) -> Self {
        Self {
            backend,
            state: PagerState::Start,
        }
    }

    /// Whether another page can be fetched
    pub fn more(&self) -> bool {
        !matches!(self.state, PagerState::Done)
    }

    /// Fetch the next page
    pub async fn next_page(&mut self) -> Result<SecretPropertiesPage, BackendError> {
        let next_link = match std::mem::replace(&mut self.state, PagerState::Done) {
            PagerState::Start => None,
            PagerState::Next(link) => Some(link),
            PagerState::Done => return Ok(SecretPropertiesPage::default()),
        };

        let page = self.backend.list_secret_properties(next_link).await?;
        if let Some(link) = page.next_link.as_ref().filter(|link| !link.is_empty()) {
            self.state = PagerState::Next(link.clone());
        }
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DeletedSecretBundle, SecretBundle, SecretProperties, SetSecretParameters};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves fixed pages linked as "page-1", "page-2", ...
    struct PagedBackend {
        pages: Vec<Vec<&'static str>>,
        requested: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl SecretsBackend for PagedBackend {
        async fn set_secret(
            &self,
            _name: &str,
            _parameters: SetSecretParameters,
        ) -> Result<SecretBundle, BackendError> {
            unimplemented!()
        }

        async fn get_secret(&self, _name: &str, _version: &str) -> Result<SecretBundle, BackendError> {
            unimplemented!()
        }

        async fn delete_secret(&self, _name: &str) -> Result<DeletedSecretBundle, BackendError> {
            unimplemented!()
        }

        async fn list_secret_properties(
            &self,
            next_link: Option<String>,
        ) -> Result<SecretPropertiesPage, BackendError> {
            self.requested.lock().unwrap().push(next_link.clone());
            let index = match next_link {
                None => 0,
                Some(link) => link.trim_start_matches("page-").parse::<usize>().unwrap(),
            };
            let next = index + 1;
            Ok(SecretPropertiesPage {
                value: self.pages[index]
                    .iter()
                    .map(|id| SecretProperties {
                        id: id.to_string(),
                        attributes: None,
                    })
                    .collect(),
                next_link: (next < self.pages.len()).then(|| format!("page-{next}")),
            })
        }

        fn name(&self) -> &'static str {
            "paged"
        }
    }

    #[tokio::test]
    async fn test_follows_next_links_until_exhausted() {
        let backend = Arc::new(PagedBackend {
            pages: vec![vec!["a", "b"], vec![], vec!["c"]],
            requested: Mutex::new(Vec::new()),
        });
        let mut pager = Pager::new(backend.clone());

        let mut ids = Vec::new();
        while pager.more() {
            let page = pager.next_page().await.unwrap();
            ids.extend(page.value.into_iter().map(|item| item.id));
        }

        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(
            *backend.requested.lock().unwrap(),
            vec![None, Some("page-1".to_string()), Some("page-2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_single_page_listing() {
        let backend = Arc::new(PagedBackend {
            pages: vec![vec!["only"]],
            requested: Mutex::new(Vec::new()),
        });
        let mut pager = Pager::new(backend);

        assert!(pager.more());
        let page = pager.next_page().await.unwrap();
        assert_eq!(page.value.len(), 1);
        assert!(!pager.more());
        assert!(pager.next_page().await.unwrap().value.is_empty());
    }
}
