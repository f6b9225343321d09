use mockito::{Matcher, Server, ServerGuard};
use recipe_feed::{
    FeedConfig, MemoryStore, ObservationId, PageOutcome, RecipeBrowser, RecipeId,
    SpoonacularSource, ViewStatus, VisibilityNotifier,
};
use std::sync::Arc;

#[derive(Default)]
struct Viewport {
    next: u64,
    live: Vec<ObservationId>,
}

impl VisibilityNotifier for Viewport {
    fn observe(&mut self, _target: &RecipeId) -> ObservationId {
        self.next += 1;
        let id = ObservationId(self.next);
        self.live.push(id);
        id
    }

    fn disconnect(&mut self, observation: ObservationId) {
        self.live.retain(|id| *id != observation);
    }
}

fn results_json(ids: &[i64]) -> String {
    let results: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{"id": {id}, "title": "Recipe {id}", "image": "https://img.example.com/{id}.jpg", "imageType": "jpg"}}"#
            )
        })
        .collect();
    format!(
        r#"{{"results": [{}], "offset": 0, "number": 12, "totalResults": 5000}}"#,
        results.join(",")
    )
}

async fn mock_page(server: &mut ServerGuard, offset: u32, ids: &[i64]) -> mockito::Mock {
    server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("number".into(), "12".into()),
            Matcher::UrlEncoded("offset".into(), offset.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(results_json(ids))
        .create_async()
        .await
}

fn source_for(server: &ServerGuard) -> Arc<SpoonacularSource> {
    Arc::new(SpoonacularSource::with_base_url(
        "test_key".to_string(),
        server.url(),
    ))
}

async fn scroll_to_bottom(browser: &mut RecipeBrowser<Viewport>) -> Option<PageOutcome> {
    let observation = *browser.notifier().live.last()?;
    browser.handle_visibility(observation, false).await.unwrap();
    browser.handle_visibility(observation, true).await.unwrap()
}

#[tokio::test]
async fn test_overlapping_pages_keep_one_copy_of_each_recipe() {
    let mut server = Server::new_async().await;
    let first: Vec<i64> = (1..=12).collect();
    let second: Vec<i64> = std::iter::once(5).chain(13..=23).collect();
    let page1 = mock_page(&mut server, 0, &first).await;
    let page2 = mock_page(&mut server, 12, &second).await;

    let mut browser = RecipeBrowser::open(
        source_for(&server),
        Arc::new(MemoryStore::new()),
        Viewport::default(),
        &FeedConfig::default(),
    )
    .await;
    assert_eq!(browser.items().len(), 12);

    let outcome = scroll_to_bottom(&mut browser).await;
    assert_eq!(
        outcome,
        Some(PageOutcome::Appended {
            added: 11,
            duplicates: 1
        })
    );

    assert_eq!(browser.items().len(), 23);
    let fives = browser
        .items()
        .iter()
        .filter(|r| r.id == RecipeId::Int(5))
        .count();
    assert_eq!(fives, 1);
    assert_eq!(browser.observed_target(), Some(&RecipeId::Int(23)));
    assert_eq!(browser.notifier().live.len(), 1);

    page1.assert_async().await;
    page2.assert_async().await;
}

#[tokio::test]
async fn test_empty_page_ends_pagination() {
    let mut server = Server::new_async().await;
    let first: Vec<i64> = (1..=12).collect();
    let _page1 = mock_page(&mut server, 0, &first).await;
    let page2 = mock_page(&mut server, 12, &[]).await;

    let mut browser = RecipeBrowser::open(
        source_for(&server),
        Arc::new(MemoryStore::new()),
        Viewport::default(),
        &FeedConfig::default(),
    )
    .await;

    assert_eq!(
        scroll_to_bottom(&mut browser).await,
        Some(PageOutcome::Exhausted)
    );
    assert!(!browser.has_more());

    // Further scrolling never reaches the source again
    assert_eq!(scroll_to_bottom(&mut browser).await, None);
    assert_eq!(
        browser.request_next_page().await.unwrap(),
        PageOutcome::Skipped
    );
    page2.assert_async().await;
    assert_eq!(browser.status(), ViewStatus::Ready);
}

#[tokio::test]
async fn test_failed_page_is_retried_at_same_offset() {
    let mut server = Server::new_async().await;
    let first: Vec<i64> = (1..=12).collect();
    let _page1 = mock_page(&mut server, 0, &first).await;
    let failing = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::UrlEncoded("offset".into(), "12".into()))
        .with_status(500)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let mut browser = RecipeBrowser::open(
        source_for(&server),
        Arc::new(MemoryStore::new()),
        Viewport::default(),
        &FeedConfig::default(),
    )
    .await;

    let result = browser.request_next_page().await;
    assert!(result.is_err());
    assert!(!browser.is_loading());
    assert!(browser.has_more());
    assert!(browser.last_error().unwrap().contains("500"));
    assert_eq!(browser.items().len(), 12);
    failing.assert_async().await;
    failing.remove_async().await;

    let second: Vec<i64> = (13..=24).collect();
    let page2 = mock_page(&mut server, 12, &second).await;
    let outcome = browser.request_next_page().await.unwrap();
    assert_eq!(
        outcome,
        PageOutcome::Appended {
            added: 12,
            duplicates: 0
        }
    );
    assert!(browser.last_error().is_none());
    page2.assert_async().await;
}

#[tokio::test]
async fn test_filters_narrow_displayed_list() {
    let mut server = Server::new_async().await;
    let _page = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"results": [
                {"id": 1, "title": "Tomato Soup", "readyInMinutes": 15},
                {"id": 2, "title": "Tomato Soup", "readyInMinutes": 45},
                {"id": 3, "title": "Bread", "readyInMinutes": 10}
            ]}"#,
        )
        .create_async()
        .await;

    let mut browser = RecipeBrowser::open(
        source_for(&server),
        Arc::new(MemoryStore::new()),
        Viewport::default(),
        &FeedConfig::default(),
    )
    .await;

    browser.set_search_text("soup");
    browser.apply_filter_patch(recipe_feed::FilterPatch::max_ready_minutes(Some(20)));

    let displayed = browser.displayed();
    assert_eq!(displayed.len(), 1);
    assert_eq!(displayed[0].id, RecipeId::Int(1));
    assert_eq!(browser.observed_target(), Some(&RecipeId::Int(1)));
}
