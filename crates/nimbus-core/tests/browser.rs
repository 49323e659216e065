use nimbus_core::{Browser, Config, HeadlessSurface, LoadState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> Config {
    Config {
        request_timeout_secs: 2,
        ..Config::default()
    }
}

#[tokio::test]
async fn browser_wires_tabs_from_shared_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><head><title>Wired</title></head></html>",
            "text/html",
        ))
        .mount(&server)
        .await;

    let browser = Browser::new(test_config()).expect("browser");
    let tab = browser
        .create_tab(Box::new(HeadlessSurface::new()))
        .expect("tab");

    assert_eq!(browser.tabs().len(), 1);
    assert_eq!(browser.active_tab().unwrap().id(), tab.id());

    tab.navigate(&format!("{}/page", server.uri())).await.unwrap();
    assert_eq!(tab.current_entry().unwrap().title, "Wired");
    assert_eq!(tab.load_state(), LoadState::Idle);
}

#[tokio::test]
async fn tabs_are_independent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let browser = Browser::new(test_config()).expect("browser");
    let first = browser
        .create_tab(Box::new(HeadlessSurface::new()))
        .expect("tab");
    let second = browser
        .create_tab(Box::new(HeadlessSurface::new()))
        .expect("tab");

    let first_url = format!("{}/a", server.uri());
    let second_url = format!("{}/a", server.uri());
    let (a, b) = tokio::join!(
        first.navigate(&first_url),
        second.navigate(&second_url)
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(first.history_len(), 1);
    assert_eq!(second.history_len(), 1);

    browser.close_tab(second.id()).expect("close");
    assert_eq!(browser.tabs().len(), 1);
    assert_eq!(browser.active_tab().unwrap().id(), first.id());
}

#[tokio::test]
async fn closing_the_last_tab_leaves_no_active_tab() {
    let browser = Browser::new(test_config()).expect("browser");
    let tab = browser
        .create_tab(Box::new(HeadlessSurface::new()))
        .expect("tab");

    browser.close_tab(tab.id()).expect("close");
    assert!(browser.active_tab().is_none());
    assert!(browser.tabs().is_empty());

    // The session handle we still hold keeps working in isolation.
    assert_eq!(tab.history_len(), 0);
}
