use std::time::Duration;

use digest_engine::{BrowserStrategy, ContentStrategy, FailureKind, RenderSettings};

mod support;

fn browser(program: &str) -> BrowserStrategy {
    BrowserStrategy::new(RenderSettings {
        chromium_bin: program.to_string(),
        navigation_timeout: Duration::from_secs(5),
    })
}

#[tokio::test]
async fn unparseable_url_is_rejected_before_launch() {
    support::init_logging();
    let err = browser("feed-digest-no-such-chromium")
        .try_fetch("not a url")
        .await
        .expect_err("invalid url");

    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn missing_browser_is_a_render_failure() {
    support::init_logging();
    let err = browser("feed-digest-no-such-chromium")
        .try_fetch("https://example.com/")
        .await
        .expect_err("no browser");

    assert_eq!(err.kind, FailureKind::RenderFailed);
    assert!(err.message.contains("could not launch"), "{}", err.message);
}

#[cfg(unix)]
#[tokio::test]
async fn browser_exit_failure_is_a_render_failure() {
    support::init_logging();
    let err = browser("false")
        .try_fetch("https://example.com/")
        .await
        .expect_err("non-zero exit");

    assert_eq!(err.kind, FailureKind::RenderFailed);
}

#[cfg(unix)]
#[tokio::test]
async fn empty_dump_is_empty_content() {
    support::init_logging();
    let err = browser("true")
        .try_fetch("https://example.com/")
        .await
        .expect_err("nothing rendered");

    assert_eq!(err.kind, FailureKind::EmptyContent);
}
