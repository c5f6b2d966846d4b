//! Integration tests for the crawl engine
//!
//! These tests run real crawls against wiremock servers and observe fetch
//! counts, treatment invocations, and the mirrored output tree.

use kudzu::config::Config;
use kudzu::crawler::Crawler;
use kudzu::page::Page;
use kudzu::treatment::{SaveToRepository, Treatment};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A treatment test double that records every treated address
struct Recorder {
    addresses: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    fn new() -> (Self, Arc<Mutex<Vec<String>>>) {
        let addresses = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                addresses: Arc::clone(&addresses),
            },
            addresses,
        )
    }
}

impl Treatment for Recorder {
    fn apply(&self, page: &Page) -> anyhow::Result<()> {
        self.addresses.lock().unwrap().push(page.address().to_string());
        Ok(())
    }
}

fn html_page(links: &[String]) -> String {
    let mut body = String::from("<html><body>");
    for link in links {
        body.push_str(&format!(r#"<a href="{}">link</a>"#, link));
    }
    body.push_str("</body></html>");
    body
}

async fn mount_page(server: &MockServer, at: &str, body: String, expected: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body));
    let mock = match expected {
        Some(n) => mock.expect(n),
        None => mock,
    };
    mock.mount(server).await;
}

#[tokio::test]
async fn test_depth_zero_fetches_seeds_only() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page(&[format!("{}/page1", base)]),
        Some(1),
    )
    .await;
    // The linked page must never be requested at depth zero.
    mount_page(&server, "/page1", html_page(&[]), Some(0)).await;

    let mut config = Config::default();
    config.crawler.max_depth = 0;

    let (recorder, treated) = Recorder::new();
    let crawler = Arc::new(
        Crawler::new(&config, vec![format!("{}/", base)], vec![Box::new(recorder)]).unwrap(),
    );
    crawler.start_crawl().await;

    assert_eq!(crawler.fetch_count(), 1);
    assert_eq!(treated.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_crawl_follows_links_and_treats_every_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page(&[format!("{}/page1", base), format!("{}/page2", base)]),
        Some(1),
    )
    .await;
    mount_page(&server, "/page1", html_page(&[]), Some(1)).await;
    mount_page(&server, "/page2", html_page(&[]), Some(1)).await;

    let mut config = Config::default();
    config.crawler.max_depth = 1;

    let (recorder, treated) = Recorder::new();
    let crawler = Arc::new(
        Crawler::new(&config, vec![format!("{}/", base)], vec![Box::new(recorder)]).unwrap(),
    );
    crawler.start_crawl().await;

    assert_eq!(crawler.fetch_count(), 3);

    let treated = treated.lock().unwrap();
    assert_eq!(treated.len(), 3);
    assert!(treated.contains(&format!("{}/", base)));
    assert!(treated.contains(&format!("{}/page1", base)));
    assert!(treated.contains(&format!("{}/page2", base)));
}

#[tokio::test]
async fn test_crawl_mirrors_pages_into_repository() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page(&[format!("{}/docs/guide", base)]),
        None,
    )
    .await;
    mount_page(&server, "/docs/guide", html_page(&[]), None).await;

    let repository = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.crawler.max_depth = 1;

    let save = SaveToRepository::new(repository.path());
    let crawler = Arc::new(
        Crawler::new(&config, vec![format!("{}/", base)], vec![Box::new(save)]).unwrap(),
    );
    crawler.start_crawl().await;

    // Host labels become directories: 127.0.0.1:port -> 127/0/0/1:port.
    let port = url::Url::parse(&base).unwrap().port().unwrap();
    let host_dir = repository
        .path()
        .join("127")
        .join("0")
        .join("0")
        .join(format!("1:{}", port));

    let root_files: Vec<_> = std::fs::read_dir(&host_dir)
        .unwrap()
        .filter_map(|e| {
            let entry = e.unwrap();
            entry.file_type().unwrap().is_file().then(|| {
                entry.file_name().to_string_lossy().into_owned()
            })
        })
        .collect();
    assert!(
        root_files.iter().any(|f| f.starts_with("default.html-")),
        "seed page not mirrored as default.html, found: {:?}",
        root_files
    );

    let guide_dir = host_dir.join("docs").join("guide");
    let guide_files: Vec<_> = std::fs::read_dir(&guide_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(
        guide_files.iter().any(|f| f.starts_with("guide-")),
        "linked page not mirrored, found: {:?}",
        guide_files
    );
}

#[tokio::test]
async fn test_fetch_failure_abandons_branch_silently() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Port 1 is not listening; the branch for this link must die silently.
    mount_page(
        &server,
        "/",
        html_page(&["http://127.0.0.1:1/unreachable".to_string()]),
        Some(1),
    )
    .await;

    let mut config = Config::default();
    config.crawler.max_depth = 2;

    let (recorder, treated) = Recorder::new();
    let crawler = Arc::new(
        Crawler::new(&config, vec![format!("{}/", base)], vec![Box::new(recorder)]).unwrap(),
    );
    crawler.start_crawl().await;

    // The failed branch still counts as an initiated fetch, but only the
    // seed page is treated.
    assert_eq!(crawler.fetch_count(), 2);
    let treated = treated.lock().unwrap();
    assert_eq!(treated.len(), 1);
    assert_eq!(treated[0], format!("{}/", base));
}

#[tokio::test]
async fn test_skip_policy_never_follows() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page(&[format!("{}/page1", base)]),
        Some(1),
    )
    .await;
    mount_page(&server, "/page1", html_page(&[]), Some(0)).await;

    let mut config = Config::default();
    config.crawler.max_depth = 3;
    config.policy.disposition = kudzu::config::DispositionSetting::Skip;

    let (recorder, treated) = Recorder::new();
    let crawler = Arc::new(
        Crawler::new(&config, vec![format!("{}/", base)], vec![Box::new(recorder)]).unwrap(),
    );
    crawler.start_crawl().await;

    assert_eq!(crawler.fetch_count(), 1);
    assert_eq!(treated.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_revisits_allowed_by_default() {
    let server = MockServer::start().await;
    let base = server.uri();

    // The same link twice: every occurrence is followed, not a unique set.
    mount_page(
        &server,
        "/",
        html_page(&[format!("{}/page1", base), format!("{}/page1", base)]),
        Some(1),
    )
    .await;
    mount_page(&server, "/page1", html_page(&[]), Some(2)).await;

    let mut config = Config::default();
    config.crawler.max_depth = 1;

    let crawler = Arc::new(
        Crawler::new(&config, vec![format!("{}/", base)], Vec::new()).unwrap(),
    );
    crawler.start_crawl().await;

    assert_eq!(crawler.fetch_count(), 3);
}

#[tokio::test]
async fn test_deduplicate_fetches_each_address_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    // A two-page cycle: / -> /page1 -> /.
    mount_page(
        &server,
        "/",
        html_page(&[format!("{}/page1", base)]),
        Some(1),
    )
    .await;
    mount_page(
        &server,
        "/page1",
        html_page(&[format!("{}/", base)]),
        Some(1),
    )
    .await;

    let mut config = Config::default();
    config.crawler.max_depth = 5;
    config.crawler.deduplicate = true;

    let crawler = Arc::new(
        Crawler::new(&config, vec![format!("{}/", base)], Vec::new()).unwrap(),
    );
    crawler.start_crawl().await;

    assert_eq!(crawler.fetch_count(), 2);
}

#[tokio::test]
async fn test_max_follow_through_caps_fan_out() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        html_page(&[
            format!("{}/page1", base),
            format!("{}/page2", base),
            format!("{}/page3", base),
        ]),
        Some(1),
    )
    .await;
    // Matches are taken left to right, so only the first two are followed.
    mount_page(&server, "/page1", html_page(&[]), Some(1)).await;
    mount_page(&server, "/page2", html_page(&[]), Some(1)).await;
    mount_page(&server, "/page3", html_page(&[]), Some(0)).await;

    let mut config = Config::default();
    config.crawler.max_depth = 1;
    config.crawler.max_follow_through = 2;

    let crawler = Arc::new(
        Crawler::new(&config, vec![format!("{}/", base)], Vec::new()).unwrap(),
    );
    crawler.start_crawl().await;

    assert_eq!(crawler.fetch_count(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_treatments_never_overlap() {
    let server = MockServer::start().await;
    let base = server.uri();

    let links: Vec<String> = (1..=6).map(|i| format!("{}/page{}", base, i)).collect();
    mount_page(&server, "/", html_page(&links), None).await;
    for i in 1..=6 {
        mount_page(&server, &format!("/page{}", i), html_page(&[]), None).await;
    }

    // A deliberately slow treatment that trips a flag if two invocations
    // ever run at the same time.
    struct Exclusive {
        active: AtomicBool,
        overlapped: Arc<AtomicBool>,
        applied: Arc<AtomicUsize>,
    }

    impl Treatment for Exclusive {
        fn apply(&self, _page: &Page) -> anyhow::Result<()> {
            if self.active.swap(true, Ordering::SeqCst) {
                self.overlapped.store(true, Ordering::SeqCst);
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
            self.active.store(false, Ordering::SeqCst);
            self.applied.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    let overlapped = Arc::new(AtomicBool::new(false));
    let applied = Arc::new(AtomicUsize::new(0));
    let treatment = Exclusive {
        active: AtomicBool::new(false),
        overlapped: Arc::clone(&overlapped),
        applied: Arc::clone(&applied),
    };

    let mut config = Config::default();
    config.crawler.max_depth = 1;

    let crawler = Arc::new(
        Crawler::new(
            &config,
            vec![format!("{}/", base)],
            vec![Box::new(treatment)],
        )
        .unwrap(),
    );
    crawler.start_crawl().await;

    assert_eq!(applied.load(Ordering::SeqCst), 7);
    assert!(
        !overlapped.load(Ordering::SeqCst),
        "two treatment invocations overlapped"
    );
}

#[tokio::test]
async fn test_disjoint_seed_subtrees_fully_drained() {
    let server_a = MockServer::start().await;
    let server_b = MockServer::start().await;
    let base_a = server_a.uri();
    let base_b = server_b.uri();

    mount_page(
        &server_a,
        "/",
        html_page(&[format!("{}/leaf", base_a)]),
        Some(1),
    )
    .await;
    mount_page(&server_a, "/leaf", html_page(&[]), Some(1)).await;

    mount_page(
        &server_b,
        "/",
        html_page(&[format!("{}/leaf", base_b)]),
        Some(1),
    )
    .await;
    mount_page(&server_b, "/leaf", html_page(&[]), Some(1)).await;

    let mut config = Config::default();
    config.crawler.max_depth = 1;

    let (recorder, treated) = Recorder::new();
    let crawler = Arc::new(
        Crawler::new(
            &config,
            vec![format!("{}/", base_a), format!("{}/", base_b)],
            vec![Box::new(recorder)],
        )
        .unwrap(),
    );
    crawler.start_crawl().await;

    // Both subtrees must be drained before start_crawl returns.
    assert_eq!(crawler.fetch_count(), 4);

    let treated = treated.lock().unwrap();
    assert_eq!(treated.len(), 4);
    for address in [
        format!("{}/", base_a),
        format!("{}/leaf", base_a),
        format!("{}/", base_b),
        format!("{}/leaf", base_b),
    ] {
        assert!(treated.contains(&address), "missing treatment for {}", address);
    }
}
