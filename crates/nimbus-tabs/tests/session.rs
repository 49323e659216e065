use std::sync::Arc;
use std::time::Duration;

use nimbus_fetch::{ContentFetcher, FetchError};
use nimbus_navigation::{RedirectResolver, SearchUrlBuilder};
use nimbus_render::{EnhancementPipeline, HeadlessSurface, RenderSurface, SurfaceLoad};
use nimbus_tabs::{spawn_url_sampler, LoadState, TabError, TabSession};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Boxed surface that shares its recording half with the test.
struct SharedSurface(Arc<HeadlessSurface>);

impl RenderSurface for SharedSurface {
    fn load_url(&self, url: &str) -> nimbus_render::Result<()> {
        self.0.load_url(url)
    }

    fn load_raw_content(&self, html: &str, base_url: &str) -> nimbus_render::Result<()> {
        self.0.load_raw_content(html, base_url)
    }

    fn observed_url(&self) -> Option<String> {
        self.0.observed_url()
    }
}

fn session_for(server: &MockServer) -> (Arc<TabSession>, Arc<HeadlessSurface>) {
    let surface = Arc::new(HeadlessSurface::new());
    let session = TabSession::new(
        Box::new(SharedSurface(surface.clone())),
        ContentFetcher::new("nimbus-test", Duration::from_secs(2), 5).expect("fetcher"),
        RedirectResolver::new("nimbus-test", Duration::from_secs(2), 5).expect("resolver"),
        SearchUrlBuilder::new(format!("{}/search?q=%s", server.uri())),
        EnhancementPipeline::new(false, false),
    );
    (Arc::new(session), surface)
}

async fn mount_page(server: &MockServer, route: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!("<html><head><title>{title}</title></head><body></body></html>"),
            "text/html",
        ))
        .mount(server)
        .await;
}

#[tokio::test]
async fn navigate_commits_one_entry_with_title() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "Page A").await;

    let (session, surface) = session_for(&server);
    session.navigate(&format!("{}/a", server.uri())).await.unwrap();

    assert_eq!(session.history_len(), 1);
    let entry = session.current_entry().unwrap();
    assert_eq!(entry.resolved_url, format!("{}/a", server.uri()));
    assert_eq!(entry.title, "Page A");
    assert_eq!(session.load_state(), LoadState::Idle);
    assert_eq!(
        surface.loads(),
        vec![SurfaceLoad::Url(format!("{}/a", server.uri()))]
    );
}

#[tokio::test]
async fn committed_url_reflects_server_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/end", server.uri())),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/end", "End").await;

    let (session, _surface) = session_for(&server);
    session
        .navigate(&format!("{}/start", server.uri()))
        .await
        .unwrap();

    let entry = session.current_entry().unwrap();
    assert_eq!(entry.requested_input, format!("{}/start", server.uri()));
    assert_eq!(entry.resolved_url, format!("{}/end", server.uri()));
}

#[tokio::test]
async fn search_queries_are_synthesized_and_committed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "weather today"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><head><title>Results</title></head></html>",
            "text/html",
        ))
        .mount(&server)
        .await;

    let (session, _surface) = session_for(&server);
    session.navigate("weather today").await.unwrap();

    assert_eq!(session.history_len(), 1);
    let entry = session.current_entry().unwrap();
    assert_eq!(entry.requested_input, "weather today");
    assert!(entry.resolved_url.contains("/search?q=weather+today"));
}

#[tokio::test]
async fn redirect_wrapper_input_resolves_without_fetching_the_wrapper() {
    let server = MockServer::start().await;
    mount_page(&server, "/dest", "Destination").await;

    let encoded: String =
        url::form_urlencoded::byte_serialize(format!("{}/dest", server.uri()).as_bytes()).collect();
    // No mock for /l/ is mounted: resolving must not touch the network.
    let wrapper = format!("{}/l/?uddg={}", server.uri(), encoded);

    let (session, _surface) = session_for(&server);
    session.navigate(&wrapper).await.unwrap();

    let entry = session.current_entry().unwrap();
    assert_eq!(entry.resolved_url, format!("{}/dest", server.uri()));
}

#[tokio::test]
async fn fetch_failure_never_touches_history() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "Page A").await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (session, _surface) = session_for(&server);
    session.navigate(&format!("{}/a", server.uri())).await.unwrap();

    let err = session
        .navigate(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, TabError::Fetch(FetchError::Http(404))));

    // Address bar falls back to the last committed entry.
    assert_eq!(session.history_len(), 1);
    assert_eq!(
        session.current_entry().unwrap().resolved_url,
        format!("{}/a", server.uri())
    );
    assert_eq!(session.load_state(), LoadState::Idle);
}

#[tokio::test]
async fn back_and_forward_replay_without_committing() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "A").await;
    mount_page(&server, "/b", "B").await;

    let (session, surface) = session_for(&server);
    session.navigate(&format!("{}/a", server.uri())).await.unwrap();
    session.navigate(&format!("{}/b", server.uri())).await.unwrap();
    assert!(session.can_go_back());

    session.go_back().await.unwrap();
    assert_eq!(session.history_len(), 2);
    assert_eq!(
        session.current_entry().unwrap().resolved_url,
        format!("{}/a", server.uri())
    );
    assert!(session.can_go_forward());

    session.go_forward().await.unwrap();
    assert_eq!(session.history_len(), 2);
    assert_eq!(
        session.current_entry().unwrap().resolved_url,
        format!("{}/b", server.uri())
    );

    // a, b, then one replay each direction
    assert_eq!(surface.loads().len(), 4);
}

#[tokio::test]
async fn committing_after_back_truncates_the_forward_branch() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "A").await;
    mount_page(&server, "/b", "B").await;
    mount_page(&server, "/c", "C").await;

    let (session, _surface) = session_for(&server);
    session.navigate(&format!("{}/a", server.uri())).await.unwrap();
    session.navigate(&format!("{}/c", server.uri())).await.unwrap();
    session.go_back().await.unwrap();

    session.navigate(&format!("{}/b", server.uri())).await.unwrap();

    assert_eq!(session.history_len(), 2);
    assert_eq!(
        session.current_entry().unwrap().resolved_url,
        format!("{}/b", server.uri())
    );
    assert!(!session.can_go_forward());

    session.go_back().await.unwrap();
    assert_eq!(
        session.current_entry().unwrap().resolved_url,
        format!("{}/a", server.uri())
    );
}

#[tokio::test]
async fn back_on_empty_or_single_history_is_a_no_op() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "A").await;

    let (session, surface) = session_for(&server);
    session.go_back().await.unwrap();
    assert_eq!(session.history_len(), 0);
    assert!(surface.loads().is_empty());

    session.navigate(&format!("{}/a", server.uri())).await.unwrap();
    session.go_back().await.unwrap();
    assert_eq!(
        session.current_entry().unwrap().resolved_url,
        format!("{}/a", server.uri())
    );
    assert_eq!(surface.loads().len(), 1);
}

#[tokio::test]
async fn reload_refetches_without_history_mutation() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "A").await;

    let (session, surface) = session_for(&server);
    session.navigate(&format!("{}/a", server.uri())).await.unwrap();
    session.reload().await.unwrap();

    assert_eq!(session.history_len(), 1);
    assert_eq!(surface.loads().len(), 2);

    // Reloading a fresh tab does nothing.
    let (fresh, fresh_surface) = session_for(&server);
    fresh.reload().await.unwrap();
    assert!(fresh_surface.loads().is_empty());
}

#[tokio::test]
async fn a_new_navigation_supersedes_the_one_in_flight() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(400))
                .set_body_raw("<html><head><title>Slow</title></head></html>", "text/html"),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/fast", "Fast").await;

    let (session, surface) = session_for(&server);

    let slow = {
        let session = session.clone();
        let url = format!("{}/slow", server.uri());
        tokio::spawn(async move { session.navigate(&url).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    session
        .navigate(&format!("{}/fast", server.uri()))
        .await
        .unwrap();
    slow.await.expect("join").expect("superseded navigation is not an error");

    // The superseded navigation committed nothing and rendered nothing.
    assert_eq!(session.history_len(), 1);
    assert_eq!(
        session.current_entry().unwrap().resolved_url,
        format!("{}/fast", server.uri())
    );
    assert_eq!(
        surface.loads(),
        vec![SurfaceLoad::Url(format!("{}/fast", server.uri()))]
    );
    assert_eq!(session.load_state(), LoadState::Idle);
}

#[tokio::test]
async fn stop_cancels_the_in_flight_navigation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_raw("<html></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let (session, surface) = session_for(&server);
    let slow = {
        let session = session.clone();
        let url = format!("{}/slow", server.uri());
        tokio::spawn(async move { session.navigate(&url).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    session.stop();
    assert_eq!(session.load_state(), LoadState::Idle);

    slow.await.expect("join").expect("cancelled navigation is not an error");
    assert_eq!(session.history_len(), 0);
    assert!(surface.loads().is_empty());
}

#[tokio::test]
async fn external_navigation_amends_the_current_entry() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "A").await;

    let (session, surface) = session_for(&server);
    session.navigate(&format!("{}/a", server.uri())).await.unwrap();

    // The surface wandered off on its own (an in-page link).
    surface.set_observed_url(format!("{}/a#section-2", server.uri()));
    session.sync_external_navigation();

    assert_eq!(session.history_len(), 1);
    assert_eq!(
        session.current_entry().unwrap().resolved_url,
        format!("{}/a#section-2", server.uri())
    );
}

#[tokio::test]
async fn url_sampler_picks_up_surface_navigation() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "A").await;

    let (session, surface) = session_for(&server);
    session.navigate(&format!("{}/a", server.uri())).await.unwrap();

    let handle = spawn_url_sampler(&session, Duration::from_millis(10));
    surface.set_observed_url(format!("{}/elsewhere", server.uri()));
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert_eq!(
        session.current_entry().unwrap().resolved_url,
        format!("{}/elsewhere", server.uri())
    );

    // Dropping the session ends the sampler.
    drop(session);
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("sampler exits")
        .expect("sampler task");
}

#[tokio::test]
async fn load_state_subscription_sees_the_final_state() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "A").await;

    let (session, _surface) = session_for(&server);
    let mut states = session.subscribe();

    session.navigate(&format!("{}/a", server.uri())).await.unwrap();

    assert!(states.has_changed().unwrap());
    assert_eq!(*states.borrow_and_update(), LoadState::Idle);
}
