use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use linkmint::errors::LinkmintError;
use linkmint::services::{CreateLinkRequest, LinkService, MAX_GENERATE_ATTEMPTS};
use linkmint::storage::{Link, Repository};
use linkmint::utils::is_valid_code;

/// In-memory repository with the same contract as the sea-orm backend:
/// conflict on duplicate active code, soft delete frees the code.
#[derive(Default)]
struct MockRepository {
    active: Mutex<HashMap<String, Link>>,
    next_id: AtomicI64,
    lookups: AtomicUsize,
    should_fail: Mutex<bool>,
    // Simulates losing the check-then-insert race: find_active sees nothing
    // but the insert still hits the uniqueness constraint.
    conflict_on_insert: Mutex<bool>,
    all_codes_taken: Mutex<bool>,
}

impl MockRepository {
    fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock().unwrap() = fail;
    }

    fn set_conflict_on_insert(&self, conflict: bool) {
        *self.conflict_on_insert.lock().unwrap() = conflict;
    }

    fn set_all_codes_taken(&self, taken: bool) {
        *self.all_codes_taken.lock().unwrap() = taken;
    }

    fn dummy_link(&self, code: &str) -> Link {
        Link {
            id: 0,
            code: code.to_string(),
            target_url: "https://example.com".to_string(),
            clicks: 0,
            created_at: Utc::now(),
            last_clicked_at: None,
        }
    }
}

#[async_trait::async_trait]
impl Repository for MockRepository {
    async fn find_active(&self, code: &str) -> Result<Option<Link>, LinkmintError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if *self.should_fail.lock().unwrap() {
            return Err(LinkmintError::database_operation("mock storage error"));
        }
        if *self.all_codes_taken.lock().unwrap() {
            return Ok(Some(self.dummy_link(code)));
        }
        Ok(self.active.lock().unwrap().get(code).cloned())
    }

    async fn insert(&self, code: &str, target_url: &str) -> Result<Link, LinkmintError> {
        if *self.should_fail.lock().unwrap() {
            return Err(LinkmintError::database_operation("mock storage error"));
        }
        if *self.conflict_on_insert.lock().unwrap() {
            return Err(LinkmintError::conflict(format!(
                "Code '{}' is already taken",
                code
            )));
        }
        let mut active = self.active.lock().unwrap();
        if active.contains_key(code) {
            return Err(LinkmintError::conflict(format!(
                "Code '{}' is already taken",
                code
            )));
        }
        let link = Link {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            code: code.to_string(),
            target_url: target_url.to_string(),
            clicks: 0,
            created_at: Utc::now(),
            last_clicked_at: None,
        };
        active.insert(code.to_string(), link.clone());
        Ok(link)
    }

    async fn soft_delete(&self, code: &str) -> Result<(), LinkmintError> {
        if *self.should_fail.lock().unwrap() {
            return Err(LinkmintError::database_operation("mock storage error"));
        }
        match self.active.lock().unwrap().remove(code) {
            Some(_) => Ok(()),
            None => Err(LinkmintError::not_found(format!("Link not found: {}", code))),
        }
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<Link>, LinkmintError> {
        if *self.should_fail.lock().unwrap() {
            return Err(LinkmintError::database_operation("mock storage error"));
        }
        let mut links: Vec<Link> = self
            .active
            .lock()
            .unwrap()
            .values()
            .filter(|link| match search {
                Some(term) => {
                    let term = term.to_lowercase();
                    link.code.to_lowercase().contains(&term)
                        || link.target_url.to_lowercase().contains(&term)
                }
                None => true,
            })
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(links)
    }

    async fn count_active(&self) -> Result<u64, LinkmintError> {
        if *self.should_fail.lock().unwrap() {
            return Err(LinkmintError::database_operation("mock storage error"));
        }
        Ok(self.active.lock().unwrap().len() as u64)
    }
}

fn service() -> (Arc<MockRepository>, LinkService) {
    let repo = Arc::new(MockRepository::default());
    let svc = LinkService::new(repo.clone());
    (repo, svc)
}

#[tokio::test]
async fn create_with_generated_code_matches_format() {
    let (_, svc) = service();

    let result = svc
        .create_link(CreateLinkRequest {
            code: None,
            target: "https://example.com/page".to_string(),
        })
        .await
        .unwrap();

    assert!(result.generated_code);
    assert!(is_valid_code(&result.link.code));
    assert_eq!(result.link.target_url, "https://example.com/page");
    assert_eq!(result.link.clicks, 0);
    assert!(result.link.last_clicked_at.is_none());
}

#[tokio::test]
async fn generated_codes_are_unique_among_active_links() {
    let (repo, svc) = service();

    for _ in 0..20 {
        svc.create_link(CreateLinkRequest {
            code: None,
            target: "https://example.com".to_string(),
        })
        .await
        .unwrap();
    }

    assert_eq!(repo.count_active().await.unwrap(), 20);
}

#[tokio::test]
async fn create_with_custom_code_returns_exactly_that_code() {
    let (_, svc) = service();

    let result = svc
        .create_link(CreateLinkRequest {
            code: Some("my-code".to_string()),
            target: "https://example.com".to_string(),
        })
        .await
        .unwrap();

    assert!(!result.generated_code);
    assert_eq!(result.link.code, "my-code");
}

#[tokio::test]
async fn reusing_a_live_code_is_a_conflict() {
    let (_, svc) = service();

    svc.create_link(CreateLinkRequest {
        code: Some("demo".to_string()),
        target: "https://example.com".to_string(),
    })
    .await
    .unwrap();

    let err = svc
        .create_link(CreateLinkRequest {
            code: Some("demo".to_string()),
            target: "https://other.example.com".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LinkmintError::Conflict(_)));
}

#[tokio::test]
async fn too_short_code_is_a_validation_error() {
    let (_, svc) = service();

    let err = svc
        .create_link(CreateLinkRequest {
            code: Some("ab".to_string()),
            target: "https://example.com".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LinkmintError::Validation(_)));
}

#[tokio::test]
async fn bad_url_is_a_validation_error() {
    let (_, svc) = service();

    let err = svc
        .create_link(CreateLinkRequest {
            code: None,
            target: "not-a-url".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LinkmintError::Validation(_)));
}

#[tokio::test]
async fn empty_custom_code_falls_back_to_generation() {
    let (_, svc) = service();

    let result = svc
        .create_link(CreateLinkRequest {
            code: Some(String::new()),
            target: "https://example.com".to_string(),
        })
        .await
        .unwrap();

    assert!(result.generated_code);
}

#[tokio::test]
async fn code_is_reusable_after_soft_delete() {
    let (_, svc) = service();

    svc.create_link(CreateLinkRequest {
        code: Some("demo".to_string()),
        target: "https://example.com/first".to_string(),
    })
    .await
    .unwrap();

    svc.delete_link("demo").await.unwrap();

    let result = svc
        .create_link(CreateLinkRequest {
            code: Some("demo".to_string()),
            target: "https://example.com/second".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(result.link.code, "demo");
    assert_eq!(result.link.target_url, "https://example.com/second");
}

#[tokio::test]
async fn get_after_delete_is_not_found() {
    let (_, svc) = service();

    svc.create_link(CreateLinkRequest {
        code: Some("demo".to_string()),
        target: "https://example.com".to_string(),
    })
    .await
    .unwrap();

    svc.delete_link("demo").await.unwrap();

    let err = svc.get_link("demo").await.unwrap_err();
    assert!(matches!(err, LinkmintError::NotFound(_)));
}

#[tokio::test]
async fn delete_unknown_code_is_not_found() {
    let (_, svc) = service();

    let err = svc.delete_link("never-existed").await.unwrap_err();
    assert!(matches!(err, LinkmintError::NotFound(_)));
}

#[tokio::test]
async fn exhausted_after_bounded_attempts_when_keyspace_is_full() {
    let (repo, svc) = service();
    repo.set_all_codes_taken(true);

    let err = svc
        .create_link(CreateLinkRequest {
            code: None,
            target: "https://example.com".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LinkmintError::Exhausted(_)));
    assert_eq!(repo.lookups.load(Ordering::SeqCst), MAX_GENERATE_ATTEMPTS);
}

#[tokio::test]
async fn insert_race_on_generated_code_retries_then_exhausts() {
    let (repo, svc) = service();
    repo.set_conflict_on_insert(true);

    let err = svc
        .create_link(CreateLinkRequest {
            code: None,
            target: "https://example.com".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LinkmintError::Exhausted(_)));
}

#[tokio::test]
async fn insert_race_on_custom_code_is_a_conflict() {
    let (repo, svc) = service();
    repo.set_conflict_on_insert(true);

    let err = svc
        .create_link(CreateLinkRequest {
            code: Some("demo".to_string()),
            target: "https://example.com".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LinkmintError::Conflict(_)));
}

#[tokio::test]
async fn storage_failure_surfaces_as_database_error() {
    let (repo, svc) = service();
    repo.set_should_fail(true);

    let err = svc
        .create_link(CreateLinkRequest {
            code: Some("demo".to_string()),
            target: "https://example.com".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, LinkmintError::DatabaseOperation(_)));
}

#[tokio::test]
async fn list_filters_case_insensitively_and_orders_newest_first() {
    let (repo, svc) = service();

    // Seed directly so creation times are distinct and controlled.
    let base = Utc::now();
    let seed = [
        ("example-docs", "https://docs.example.com", 0),
        ("other", "https://other.io", 1),
        ("blog", "https://blog.EXAMPLE.org", 2),
    ];
    for (code, target, offset) in seed {
        let link = Link {
            id: offset + 1,
            code: code.to_string(),
            target_url: target.to_string(),
            clicks: 0,
            created_at: base + Duration::seconds(offset),
            last_clicked_at: None,
        };
        repo.active
            .lock()
            .unwrap()
            .insert(code.to_string(), link);
    }

    let matches = svc.list_links(Some("exam")).await.unwrap();
    let codes: Vec<&str> = matches.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["blog", "example-docs"]);

    let all = svc.list_links(None).await.unwrap();
    let codes: Vec<&str> = all.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, vec!["blog", "other", "example-docs"]);
}

#[tokio::test]
async fn deleted_links_never_appear_in_listing() {
    let (_, svc) = service();

    svc.create_link(CreateLinkRequest {
        code: Some("keep".to_string()),
        target: "https://example.com/keep".to_string(),
    })
    .await
    .unwrap();
    svc.create_link(CreateLinkRequest {
        code: Some("drop".to_string()),
        target: "https://example.com/drop".to_string(),
    })
    .await
    .unwrap();

    svc.delete_link("drop").await.unwrap();

    let all = svc.list_links(None).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].code, "keep");
}
