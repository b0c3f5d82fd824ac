//! Controller property tests against an in-process gateway.
//!
//! The fake gateway serves a fixed catalog, counts calls, and can hold a
//! page fetch open so tests control exactly when responses arrive.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use marquee::catalog::{Phase, Skipped, proximity};
use marquee::error::{AuthError, ProtocolError};
use marquee::{
    App, CatalogApi, CatalogItem, CatalogList, Category, Credentials, Draft, Filter, FormController,
    ItemFields, ItemId, LoadOutcome, NoticeLevel, Notices, Registration, Removal, Result,
    SessionStore, Token, UserId, UserProfile,
};

struct FakeApi {
    catalog: Mutex<Vec<CatalogItem>>,
    profile_status: Option<u16>,
    fail_mutations: bool,
    hold_pages: bool,
    release: Notify,
    started: Notify,
    profile_calls: AtomicUsize,
    list_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
}

impl FakeApi {
    fn with_titles(titles: &[&str]) -> Self {
        let catalog = titles
            .iter()
            .enumerate()
            .map(|(i, title)| item(i as u64 + 1, title, Category::Movie))
            .collect();
        Self {
            catalog: Mutex::new(catalog),
            profile_status: None,
            fail_mutations: false,
            hold_pages: false,
            release: Notify::new(),
            started: Notify::new(),
            profile_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            mutation_calls: AtomicUsize::new(0),
        }
    }

    fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn signup(&self, _registration: &Registration) -> Result<()> {
        Ok(())
    }

    async fn login(&self, _credentials: &Credentials) -> Result<Token> {
        Ok(Token::new("tok"))
    }

    async fn profile(&self, _token: &Token) -> Result<UserProfile> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = self.profile_status {
            return Err(ProtocolError::new(status, None, None).into());
        }
        Ok(UserProfile {
            id: UserId::from(7),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        })
    }

    async fn list_items(
        &self,
        _token: &Token,
        _owner: &UserId,
        page: u32,
        limit: u32,
    ) -> Result<Vec<CatalogItem>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.hold_pages {
            self.started.notify_one();
            self.release.notified().await;
        }

        let catalog = self.catalog.lock().unwrap();
        let start = ((page - 1) * limit) as usize;
        Ok(catalog
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn add_item(
        &self,
        _token: &Token,
        _owner: &UserId,
        fields: &ItemFields,
    ) -> Result<CatalogItem> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations {
            return Err(ProtocolError::new(500, None, Some("Insert failed".to_string())).into());
        }
        Ok(CatalogItem {
            id: ItemId::from(100),
            fields: fields.clone(),
        })
    }

    async fn update_item(
        &self,
        _token: &Token,
        id: &ItemId,
        fields: &ItemFields,
    ) -> Result<CatalogItem> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations {
            return Err(ProtocolError::new(500, None, None).into());
        }
        Ok(CatalogItem {
            id: id.clone(),
            fields: fields.clone(),
        })
    }

    async fn delete_item(&self, _token: &Token, _id: &ItemId) -> Result<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations {
            return Err(ProtocolError::new(500, None, None).into());
        }
        Ok(())
    }
}

fn item(id: u64, title: &str, category: Category) -> CatalogItem {
    CatalogItem {
        id: ItemId::from(id),
        fields: ItemFields {
            title: title.to_string(),
            category,
            ..ItemFields::default()
        },
    }
}

fn signed_in() -> SessionStore {
    let session = SessionStore::in_memory();
    session.sign_in(Token::new("tok")).unwrap();
    session
}

fn list_over(api: Arc<FakeApi>, page_size: u32) -> CatalogList {
    CatalogList::new(api, signed_in(), Notices::new(), page_size)
}

fn titles(list: &CatalogList) -> Vec<String> {
    list.items().iter().map(|i| i.title().to_string()).collect()
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_pages_of_two_over_five_items() {
    let api = Arc::new(FakeApi::with_titles(&["A", "B", "C", "D", "E"]));
    let list = list_over(api.clone(), 2);
    list.resolve_user().await.unwrap();

    list.load_next().await.unwrap();
    assert_eq!(titles(&list), ["A", "B"]);
    assert!(list.has_more());

    list.load_next().await.unwrap();
    assert_eq!(titles(&list), ["A", "B", "C", "D"]);
    assert!(list.has_more());

    let outcome = list.load_next().await.unwrap();
    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            page: 3,
            received: 1,
            exhausted: true
        }
    );
    assert_eq!(titles(&list), ["A", "B", "C", "D", "E"]);
    assert!(!list.has_more());

    assert_eq!(
        list.load_next().await.unwrap(),
        LoadOutcome::Skipped(Skipped::Exhausted)
    );
    assert_eq!(api.list_calls(), 3);
}

#[tokio::test]
async fn test_empty_page_exhausts_without_changing_list() {
    let api = Arc::new(FakeApi::with_titles(&["A", "B"]));
    let list = list_over(api.clone(), 2);
    list.resolve_user().await.unwrap();

    list.load_next().await.unwrap();
    let outcome = list.load_next().await.unwrap();

    assert_eq!(
        outcome,
        LoadOutcome::Loaded {
            page: 2,
            received: 0,
            exhausted: true
        }
    );
    assert_eq!(titles(&list), ["A", "B"]);
    assert_eq!(list.loaded_page(), 1);
    assert_eq!(list.phase(), Phase::Exhausted);
}

#[tokio::test]
async fn test_page_one_replaces_the_list() {
    let api = Arc::new(FakeApi::with_titles(&["A", "B", "C"]));
    let list = list_over(api.clone(), 2);
    list.resolve_user().await.unwrap();

    list.load_next().await.unwrap();
    list.prepend(item(50, "Z", Category::Movie));
    list.load_page(1).await.unwrap();

    assert_eq!(titles(&list), ["A", "B"]);
}

#[tokio::test]
async fn test_no_user_means_no_fetch() {
    let api = Arc::new(FakeApi::with_titles(&["A"]));
    let list = list_over(api.clone(), 2);

    assert_eq!(
        list.load_next().await.unwrap(),
        LoadOutcome::Skipped(Skipped::NoUser)
    );
    assert_eq!(api.list_calls(), 0);
}

#[tokio::test]
async fn test_resolving_user_again_starts_over() {
    let api = Arc::new(FakeApi::with_titles(&["A", "B", "C"]));
    let list = list_over(api.clone(), 2);
    list.resolve_user().await.unwrap();

    list.load_next().await.unwrap();
    list.load_next().await.unwrap();
    assert!(!list.has_more());

    list.resolve_user().await.unwrap();
    assert!(list.is_empty());
    assert_eq!(list.phase(), Phase::Idle);

    list.load_next().await.unwrap();
    assert_eq!(titles(&list), ["A", "B"]);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_triggers_during_fetch_are_dropped() {
    let mut fake = FakeApi::with_titles(&["A", "B", "C", "D"]);
    fake.hold_pages = true;
    let api = Arc::new(fake);
    let list = list_over(api.clone(), 2);
    list.resolve_user().await.unwrap();

    let first = tokio::spawn({
        let list = list.clone();
        async move { list.load_next().await }
    });
    api.started.notified().await;
    assert_eq!(list.phase(), Phase::Loading);

    for _ in 0..5 {
        assert_eq!(
            list.load_next().await.unwrap(),
            LoadOutcome::Skipped(Skipped::InFlight)
        );
    }

    api.release.notify_one();
    first.await.unwrap().unwrap();

    assert_eq!(api.list_calls(), 1);
    assert_eq!(titles(&list), ["A", "B"]);
}

#[tokio::test]
async fn test_stale_page_after_reset_is_discarded() {
    let mut fake = FakeApi::with_titles(&["A", "B"]);
    fake.hold_pages = true;
    let api = Arc::new(fake);
    let list = list_over(api.clone(), 2);
    list.resolve_user().await.unwrap();

    let pending = tokio::spawn({
        let list = list.clone();
        async move { list.load_next().await }
    });
    api.started.notified().await;

    list.resolve_user().await.unwrap();
    api.release.notify_one();

    assert_eq!(pending.await.unwrap().unwrap(), LoadOutcome::Stale);
    assert!(list.is_empty());
    assert_eq!(list.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_abandoned_fetch_can_be_retried() {
    let mut fake = FakeApi::with_titles(&["A", "B", "C"]);
    fake.hold_pages = true;
    let api = Arc::new(fake);
    let list = list_over(api.clone(), 2);
    list.resolve_user().await.unwrap();

    let abandoned = tokio::time::timeout(Duration::from_millis(20), list.load_next()).await;
    assert!(abandoned.is_err());
    assert_eq!(list.phase(), Phase::MoreAvailable);
    assert!(list.is_empty());

    let retry = tokio::spawn({
        let list = list.clone();
        async move { list.load_next().await }
    });
    api.release.notify_one();

    assert_eq!(
        retry.await.unwrap().unwrap(),
        LoadOutcome::Loaded {
            page: 1,
            received: 2,
            exhausted: false,
        }
    );
    assert_eq!(api.list_calls(), 2);
    assert_eq!(titles(&list), ["A", "B"]);
}

#[tokio::test]
async fn test_skipped_request_still_publishes() {
    let api = Arc::new(FakeApi::with_titles(&["A"]));
    let list = list_over(api.clone(), 10);
    let mut revisions = list.subscribe();

    assert_eq!(
        list.load_next().await.unwrap(),
        LoadOutcome::Skipped(Skipped::NoUser)
    );
    assert!(revisions.has_changed().unwrap());
    assert_eq!(api.list_calls(), 0);
}

#[tokio::test]
async fn test_proximity_drives_loading_until_released() {
    let api = Arc::new(FakeApi::with_titles(&["A", "B", "C"]));
    let list = list_over(api.clone(), 2);
    list.resolve_user().await.unwrap();
    let mut revisions = list.subscribe();

    let (signal, trigger) = proximity();
    let task = list.attach(trigger);

    signal.arm(None);
    list.load_next().await.unwrap();
    let last = list.items().last().unwrap().id.clone();
    signal.arm(Some(&last));

    assert!(!signal.row_visible(&ItemId::from(1)));
    assert!(signal.row_visible(&last));

    while list.len() < 3 {
        revisions.changed().await.unwrap();
    }
    assert!(!list.has_more());

    signal.release();
    task.await.unwrap();
    assert_eq!(api.list_calls(), 2);
}

// ============================================================================
// Filtering
// ============================================================================

#[tokio::test]
async fn test_filter_is_idempotent_and_never_fetches() {
    let api = Arc::new(FakeApi::with_titles(&[]));
    let list = list_over(api.clone(), 10);
    list.resolve_user().await.unwrap();
    *api.catalog.lock().unwrap() = vec![
        item(1, "The Dark Knight", Category::Movie),
        item(2, "Dark", Category::TvShow),
        item(3, "Heat", Category::Movie),
    ];
    list.load_next().await.unwrap();
    let calls = api.list_calls();

    let filter = Filter::new().search("DARK").category(Category::TvShow);
    let once = list.visible(&filter);
    let twice = list.visible(&filter);

    assert_eq!(once, twice);
    assert_eq!(once.len(), 1);
    assert_eq!(once[0].title(), "Dark");
    assert_eq!(list.len(), 3);
    assert_eq!(api.list_calls(), calls);
}

// ============================================================================
// Form
// ============================================================================

#[tokio::test]
async fn test_update_replaces_in_place() {
    let api = Arc::new(FakeApi::with_titles(&["A", "B", "C"]));
    let list = list_over(api.clone(), 10);
    list.resolve_user().await.unwrap();
    list.load_next().await.unwrap();

    let mut form = FormController::new(list.clone());
    form.select_for_edit(&list.find(&ItemId::from(2)).unwrap());
    form.draft_mut().title = "B2".to_string();
    form.draft_mut().year = Some(2001);
    form.submit().await.unwrap();

    assert_eq!(titles(&list), ["A", "B2", "C"]);
    assert_eq!(list.items()[1].fields.year, Some(2001));
    assert!(form.draft().is_empty());
}

#[tokio::test]
async fn test_delete_removes_exactly_one() {
    let api = Arc::new(FakeApi::with_titles(&["A", "B", "C", "D"]));
    let list = list_over(api.clone(), 10);
    list.resolve_user().await.unwrap();
    list.load_next().await.unwrap();

    let mut form = FormController::new(list.clone());
    let prompts = Mutex::new(Vec::new());
    let confirm = |prompt: &str| {
        prompts.lock().unwrap().push(prompt.to_string());
        true
    };

    let removal = form.remove(&ItemId::from(2), &confirm).await.unwrap();

    assert_eq!(removal, Removal::Deleted);
    assert_eq!(titles(&list), ["A", "C", "D"]);
    assert_eq!(prompts.lock().unwrap().as_slice(), ["Delete \"B\"?"]);
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let api = Arc::new(FakeApi::with_titles(&["A"]));
    let list = list_over(api.clone(), 10);
    list.resolve_user().await.unwrap();
    list.load_next().await.unwrap();

    let mut form = FormController::new(list.clone());
    let removal = form
        .remove(&ItemId::from(1), &|_: &str| false)
        .await
        .unwrap();

    assert_eq!(removal, Removal::Declined);
    assert_eq!(api.mutation_calls(), 0);
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn test_failed_delete_keeps_list_and_posts_notice() {
    let mut fake = FakeApi::with_titles(&["A", "B"]);
    fake.fail_mutations = true;
    let api = Arc::new(fake);
    let notices = Notices::new();
    let list = CatalogList::new(api.clone(), signed_in(), notices.clone(), 10);
    list.resolve_user().await.unwrap();
    list.load_next().await.unwrap();

    let mut form = FormController::new(list.clone());
    assert!(form.remove(&ItemId::from(1), &|_: &str| true).await.is_err());

    assert_eq!(titles(&list), ["A", "B"]);
    assert_eq!(api.mutation_calls(), 1);
    let notice = notices.active().pop().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Failed to delete movie");
}

#[tokio::test]
async fn test_empty_title_never_reaches_the_service() {
    let api = Arc::new(FakeApi::with_titles(&["A"]));
    let notices = Notices::new();
    let list = CatalogList::new(api.clone(), signed_in(), notices.clone(), 10);
    list.resolve_user().await.unwrap();

    let mut form = FormController::new(list.clone());
    *form.draft_mut() = Draft {
        category: Some(Category::Movie),
        director: Some("Nobody".to_string()),
        ..Draft::default()
    };

    assert!(form.submit().await.is_err());
    assert_eq!(api.mutation_calls(), 0);
    assert_eq!(form.draft().director.as_deref(), Some("Nobody"));
    assert_eq!(notices.active().pop().unwrap().message, "title is required");
}

#[tokio::test]
async fn test_add_prepends_and_resolves_owner_on_demand() {
    let api = Arc::new(FakeApi::with_titles(&["A"]));
    let list = list_over(api.clone(), 10);

    let mut form = FormController::new(list.clone());
    form.draft_mut().title = "New".to_string();
    form.draft_mut().category = Some(Category::TvShow);

    let submitted = form.submit().await.unwrap();

    assert!(matches!(submitted, marquee::Submitted::Added(ref item) if item.id == ItemId::from(100)));
    assert_eq!(api.profile_calls.load(Ordering::SeqCst), 1);
    assert_eq!(titles(&list), ["New"]);

    list.load_next().await.unwrap();
    list.prepend(item(101, "Newer", Category::Movie));
    assert_eq!(titles(&list), ["Newer", "A"]);
}

#[tokio::test]
async fn test_failed_add_keeps_draft() {
    let mut fake = FakeApi::with_titles(&[]);
    fake.fail_mutations = true;
    let api = Arc::new(fake);
    let notices = Notices::new();
    let list = CatalogList::new(api.clone(), signed_in(), notices.clone(), 10);
    list.resolve_user().await.unwrap();

    let mut form = FormController::new(list.clone());
    form.draft_mut().title = "Heat".to_string();
    form.draft_mut().category = Some(Category::Movie);

    assert!(form.submit().await.is_err());
    assert_eq!(form.draft().title, "Heat");
    assert!(list.is_empty());
    assert_eq!(notices.active().pop().unwrap().message, "Insert failed");
}

#[tokio::test]
async fn test_failed_update_keeps_draft_and_list() {
    let mut fake = FakeApi::with_titles(&["A", "B"]);
    fake.fail_mutations = true;
    let api = Arc::new(fake);
    let notices = Notices::new();
    let list = CatalogList::new(api.clone(), signed_in(), notices.clone(), 10);
    list.resolve_user().await.unwrap();
    list.load_next().await.unwrap();

    let mut form = FormController::new(list.clone());
    form.select_for_edit(&list.find(&ItemId::from(2)).unwrap());
    form.draft_mut().title = "B2".to_string();

    assert!(form.submit().await.is_err());

    assert_eq!(api.mutation_calls(), 1);
    assert_eq!(form.draft().id, Some(ItemId::from(2)));
    assert_eq!(form.draft().title, "B2");
    assert_eq!(titles(&list), ["A", "B"]);
    let notice = notices.active().pop().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Failed to save movie");
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_logout_then_login_starts_a_fresh_list() {
    let api = Arc::new(FakeApi::with_titles(&["A", "B", "C", "D"]));
    let app = App::with_gateway(api.clone(), signed_in(), 2);
    let list = app.list();
    list.resolve_user().await.unwrap();
    list.load_next().await.unwrap();
    assert_eq!(titles(list), ["A", "B"]);

    app.auth().logout().unwrap();
    app.auth()
        .login(&Credentials::new("alice@example.com", "secret"))
        .await
        .unwrap();

    assert!(list.user().is_none());
    assert!(list.is_empty());
    assert_eq!(
        list.load_next().await.unwrap(),
        LoadOutcome::Skipped(Skipped::NoUser)
    );
    assert_eq!(api.list_calls(), 1);

    list.resolve_user().await.unwrap();
    assert_eq!(
        list.load_next().await.unwrap(),
        LoadOutcome::Loaded {
            page: 1,
            received: 2,
            exhausted: false,
        }
    );
    assert_eq!(titles(list), ["A", "B"]);
}

#[tokio::test]
async fn test_page_arriving_after_session_change_is_discarded() {
    let mut fake = FakeApi::with_titles(&["A", "B"]);
    fake.hold_pages = true;
    let api = Arc::new(fake);
    let session = signed_in();
    let list = CatalogList::new(api.clone(), session.clone(), Notices::new(), 2);
    list.resolve_user().await.unwrap();

    let pending = tokio::spawn({
        let list = list.clone();
        async move { list.load_next().await }
    });
    api.started.notified().await;

    session.end().unwrap();
    api.release.notify_one();

    assert_eq!(pending.await.unwrap().unwrap(), LoadOutcome::Stale);
    assert!(list.is_empty());
    assert!(list.user().is_none());
}


#[tokio::test]
async fn test_profile_rejection_clears_token_and_skips_catalog() {
    let mut fake = FakeApi::with_titles(&["A"]);
    fake.profile_status = Some(401);
    let api = Arc::new(fake);
    let session = signed_in();
    let notices = Notices::new();
    let list = CatalogList::new(api.clone(), session.clone(), notices.clone(), 10);

    let err = list.resolve_user().await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(!session.is_authenticated());
    assert_eq!(
        list.load_next().await.unwrap(),
        LoadOutcome::Skipped(Skipped::NoUser)
    );
    assert_eq!(api.list_calls(), 0);
    assert_eq!(
        notices.active().pop().unwrap().message,
        marquee::catalog::SESSION_EXPIRED
    );
}

#[tokio::test]
async fn test_missing_token_is_an_auth_error() {
    let api = Arc::new(FakeApi::with_titles(&["A"]));
    let list = CatalogList::new(api.clone(), SessionStore::in_memory(), Notices::new(), 10);

    let err = list.resolve_user().await.unwrap_err();
    assert!(matches!(
        err,
        marquee::Error::Auth(AuthError::MissingToken)
    ));
    assert_eq!(api.profile_calls.load(Ordering::SeqCst), 0);
}
