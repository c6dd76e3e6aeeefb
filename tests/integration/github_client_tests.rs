/*!
 * Integration tests for the GitHub client against a local HTTP/1.1 server
 */

use anyhow::Result;
use std::fs;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use yomidict::app_config::{FetcherConfig, ReleaseDescriptor};
use yomidict::errors::FetchError;
use yomidict::fetcher::{DictionaryFetcher, SourceOutcome};
use yomidict::releases::{DownloadStream, GithubClient, ReleaseClient};
use crate::common;

/// Serves canned responses keyed by request path and records every request head
struct CannedServer {
    listener: TcpListener,
    base_url: String,
}

type RequestLog = Arc<Mutex<Vec<String>>>;

impl CannedServer {
    async fn bind() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);
        Ok(Self { listener, base_url })
    }

    fn serve(self, routes: Vec<(String, String)>) -> RequestLog {
        let requests: RequestLog = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let routes = Arc::new(routes);

        tokio::spawn(async move {
            while let Ok((socket, _)) = self.listener.accept().await {
                let routes = Arc::clone(&routes);
                let recorded = Arc::clone(&recorded);
                tokio::spawn(handle_connection(socket, routes, recorded));
            }
        });

        requests
    }
}

async fn handle_connection(mut socket: TcpStream, routes: Arc<Vec<(String, String)>>, recorded: RequestLog) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }

    let head = String::from_utf8_lossy(&head).to_string();
    let path = head.split_whitespace().nth(1).unwrap_or_default().to_string();
    recorded.lock().unwrap().push(head);

    let response = routes
        .iter()
        .find(|(route, _)| *route == path)
        .map(|(_, response)| response.clone())
        .unwrap_or_else(|| sized_response("404 Not Found", ""));
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

fn sized_response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {}\r\nConnection: close\r\nContent-Length: {}\r\n\r\n{}",
        status,
        body.len(),
        body
    )
}

fn chunked_response(body: &str) -> String {
    let mut response = String::from("HTTP/1.1 200 OK\r\nConnection: close\r\nTransfer-Encoding: chunked\r\n\r\n");
    for part in [&body[..body.len() / 2], &body[body.len() / 2..]] {
        response.push_str(&format!("{:x}\r\n{}\r\n", part.len(), part));
    }
    response.push_str("0\r\n\r\n");
    response
}

fn client_config(base_url: &str) -> FetcherConfig {
    FetcherConfig {
        api_base_url: base_url.to_string(),
        user_agent: "yomidict-tests/1.0".to_string(),
        show_progress: false,
        ..FetcherConfig::default()
    }
}

async fn read_body(stream: &mut dyn DownloadStream) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();
    while let Some(chunk) = stream.next_chunk().await? {
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// A 404 on the latest-release endpoint becomes a release query error with the status
#[tokio::test]
async fn test_latest_release_withNotFound_shouldReturnReleaseQueryError() -> Result<()> {
    let server = CannedServer::bind().await?;
    let config = client_config(&server.base_url);
    let requests = server.serve(Vec::new());
    let client = GithubClient::new(&config)?;

    let result = client.latest_release("MarvNC/missing-yomitan").await;

    match result {
        Err(FetchError::ReleaseQuery { repo, status }) => {
            assert_eq!(repo, "MarvNC/missing-yomitan");
            assert_eq!(status, 404);
        }
        other => panic!("Expected ReleaseQuery error, got {:?}", other),
    }
    assert_eq!(requests.lock().unwrap().len(), 1);
    Ok(())
}

/// A 200 release body is decoded and the request carries the GitHub headers
#[tokio::test]
async fn test_latest_release_withReleaseJson_shouldDecodeAndSendHeaders() -> Result<()> {
    let server = CannedServer::bind().await?;
    let config = client_config(&server.base_url);
    let body = r#"{
        "tag_name": "2024-06-01",
        "name": "June build",
        "assets": [
            { "name": "JMdict_english.zip", "browser_download_url": "https://example.com/JMdict_english.zip", "size": 42 },
            { "name": "JMnedict.zip", "browser_download_url": null }
        ]
    }"#;
    let requests = server.serve(vec![(
        "/repos/MarvNC/jmdict-yomitan/releases/latest".to_string(),
        sized_response("200 OK", body),
    )]);
    let client = GithubClient::new(&config)?;

    let release = client.latest_release("MarvNC/jmdict-yomitan").await?;

    assert_eq!(release.tag_name, "2024-06-01");
    assert_eq!(release.assets.len(), 2);
    assert_eq!(release.assets[0].name, "JMdict_english.zip");
    assert_eq!(release.assets[0].size, Some(42));
    assert_eq!(release.assets[1].browser_download_url, None);

    let head = requests.lock().unwrap()[0].to_lowercase();
    assert!(head.starts_with("get /repos/marvnc/jmdict-yomitan/releases/latest http/1.1"));
    assert!(head.contains("accept: application/vnd.github+json"));
    assert!(head.contains("user-agent: yomidict-tests/1.0"));
    Ok(())
}

/// A body that is not release JSON is a parse error
#[tokio::test]
async fn test_latest_release_withMalformedJson_shouldReturnParseError() -> Result<()> {
    let server = CannedServer::bind().await?;
    let config = client_config(&server.base_url);
    server.serve(vec![(
        "/repos/MarvNC/jmdict-yomitan/releases/latest".to_string(),
        sized_response("200 OK", "<html>rate limited</html>"),
    )]);
    let client = GithubClient::new(&config)?;

    let result = client.latest_release("MarvNC/jmdict-yomitan").await;

    assert!(matches!(result, Err(FetchError::Parse(_))));
    Ok(())
}

/// A sized download reports its length and streams the whole body
#[tokio::test]
async fn test_open_download_withContentLength_shouldReportLengthAndStreamBody() -> Result<()> {
    let server = CannedServer::bind().await?;
    let config = client_config(&server.base_url);
    let url = format!("{}/dl/JMnedict.zip", server.base_url);
    server.serve(vec![("/dl/JMnedict.zip".to_string(), sized_response("200 OK", "jmnedict archive bytes"))]);
    let client = GithubClient::new(&config)?;

    let mut stream = client.open_download(&url).await?;

    assert_eq!(stream.content_length(), Some(22));
    assert_eq!(read_body(stream.as_mut()).await?, b"jmnedict archive bytes");
    Ok(())
}

/// A chunked download has no length but still streams the whole body
#[tokio::test]
async fn test_open_download_withoutContentLength_shouldStreamBody() -> Result<()> {
    let server = CannedServer::bind().await?;
    let config = client_config(&server.base_url);
    let url = format!("{}/dl/PixivLight_2024.zip", server.base_url);
    server.serve(vec![("/dl/PixivLight_2024.zip".to_string(), chunked_response("pixiv light archive"))]);
    let client = GithubClient::new(&config)?;

    let mut stream = client.open_download(&url).await?;

    assert_eq!(stream.content_length(), None);
    assert_eq!(read_body(stream.as_mut()).await?, b"pixiv light archive");
    Ok(())
}

/// A failing download becomes a download error with the URL and status
#[tokio::test]
async fn test_open_download_withServerError_shouldReturnDownloadError() -> Result<()> {
    let server = CannedServer::bind().await?;
    let config = client_config(&server.base_url);
    let url = format!("{}/dl/broken.zip", server.base_url);
    server.serve(vec![("/dl/broken.zip".to_string(), sized_response("500 Internal Server Error", "oops"))]);
    let client = GithubClient::new(&config)?;

    match client.open_download(&url).await {
        Err(FetchError::Download { url: failed_url, status }) => {
            assert_eq!(failed_url, url);
            assert_eq!(status, 500);
        }
        Err(other) => panic!("Expected Download error, got {:?}", other),
        Ok(_) => panic!("Expected Download error, got a stream"),
    }
    Ok(())
}

/// A full fetcher pass over HTTP writes the tagged file and isolates the failing source
#[tokio::test]
async fn test_run_withGithubClient_shouldDownloadOverHttp() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let server = CannedServer::bind().await?;
    let release = format!(
        r#"{{ "tag_name": "2024-06-01", "assets": [
            {{ "name": "JMnedict.zip", "browser_download_url": "{}/dl/JMnedict.zip" }}
        ] }}"#,
        server.base_url
    );
    let mut config = common::test_fetcher_config(
        temp_dir.path(),
        vec![
            ReleaseDescriptor::new("MarvNC/wikipedia-yomitan", &["ja.Wikipedia"], false),
            ReleaseDescriptor::new("MarvNC/jmdict-yomitan", &["JMnedict.zip"], true),
        ],
    );
    config.api_base_url = server.base_url.clone();
    server.serve(vec![
        (
            "/repos/MarvNC/jmdict-yomitan/releases/latest".to_string(),
            sized_response("200 OK", &release),
        ),
        ("/dl/JMnedict.zip".to_string(), chunked_response("jmnedict archive")),
    ]);

    let fetcher = DictionaryFetcher::new(GithubClient::new(&config)?, config.clone());
    let reports = fetcher.run().await;

    assert!(matches!(
        reports[0].outcome,
        SourceOutcome::Failed(FetchError::ReleaseQuery { status: 404, .. })
    ));
    assert!(matches!(reports[1].outcome, SourceOutcome::Completed));
    let saved = config.target_dir().join("JMnedict_2024-06-01.zip");
    assert_eq!(reports[1].downloaded, vec![saved.clone()]);
    assert_eq!(fs::read_to_string(saved)?, "jmnedict archive");
    Ok(())
}
